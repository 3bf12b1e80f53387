//! # Arbor Core
//!
//! Core types and traits for the arbor routing engine.
//!
//! This crate provides the foundational vocabulary used throughout arbor:
//!
//! - [`Request`] / [`Response`] / [`Outcome`] - the abstract request/response model
//! - [`Args`] - captured path variables, fallibly bound
//! - [`RequestContext`] / [`ResourceContext`] - explicit per-request context
//! - [`RouteError`] - the closed failure taxonomy
//! - [`Endpoint`] - the innermost callable of a request chain

#![doc(html_root_url = "https://docs.rs/arbor-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod args;
mod context;
mod endpoint;
mod error;
mod request;
mod response;

pub use args::{ArgValue, Args};
pub use context::{RequestContext, RequestId, ResourceContext};
pub use endpoint::{BoxFuture, Endpoint, FnEndpoint};
pub use error::{ErrorDetail, ErrorEnvelope, RouteError, RouteResult};
pub use request::Request;
pub use response::{Outcome, Response};
