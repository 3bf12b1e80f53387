//! # Arbor Router
//!
//! Resource trees, path templates, and the flat router for the arbor
//! routing engine.
//!
//! Two dispatch styles share one segment-matching vocabulary:
//!
//! - **Resource tree**: hierarchical [`Resource`] nodes resolved by
//!   [`resolve`] across one or more composite roots, with
//!   method-not-allowed aggregation and per-node context.
//! - **Flat router**: an ordered [`FlatRouter`] of (method, template,
//!   endpoint) entries that participates in the middleware chain and falls
//!   through when nothing matches.
//!
//! Segment patterns come in three kinds, matched in fixed priority at each
//! position: literal, numeric variable (`#name`), string variable
//! (`$name`).
//!
//! ```text
//!                    (root)
//!                      │
//!              ┌───────┴────────┐
//!              │                │
//!           "users"          "posts"
//!              │                │
//!        ┌─────┴─────┐       "$slug"
//!        │           │          │
//!      (leaf)    "#user_id"   (leaf)
//!      [GET]        │         [GET]
//!                 (leaf)
//!              [GET,DELETE]
//! ```

#![doc(html_root_url = "https://docs.rs/arbor-router/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod flat;
mod methods;
mod resolve;
mod resource;
mod segment;
mod template;

pub use flat::{FlatRouter, RouteSet};
pub use methods::MethodTable;
pub use resolve::{resolve, Resolution};
pub use resource::Resource;
pub use segment::SegmentPattern;
pub use template::PathTemplate;
