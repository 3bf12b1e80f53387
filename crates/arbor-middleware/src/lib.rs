//! # Arbor Middleware
//!
//! Middleware chain executor and bundled stages for the arbor routing
//! engine.
//!
//! Middleware compose in an onion shape around the final dispatch step:
//!
//! ```text
//! Request  → layer 1 → layer 2 → ... → layer N → dispatch (endpoint / routing error)
//!                                                    ↓
//! Response ← layer 1 ← layer 2 ← ... ← layer N ←────┘
//! ```
//!
//! Registration order is the pre-phase order; completion order is the
//! reverse. Each layer receives the request and a single-use [`Next`]
//! continuation, and may short-circuit, post-process the result, or
//! intercept an error. Results travel the success channel (`Ok(Outcome)`)
//! or the error channel (`Err(RouteError)`); nothing converts between the
//! two except a layer that chooses to.
//!
//! The [`stages`] module ships optional layers: trailing-slash redirects,
//! CORS, body decoding, cookie threading, and error rendering.

#![doc(html_root_url = "https://docs.rs/arbor-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod chain;
mod middleware;
pub mod stages;

pub use chain::{Chain, SharedMiddleware};
pub use middleware::{ChainResult, Dispatch, FnMiddleware, Middleware, Next};
