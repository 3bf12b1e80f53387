//! # Arbor
//!
//! **Composable resource-tree routing and middleware composition for API
//! servers.**
//!
//! Arbor turns abstract requests (method, path, body, headers) into
//! structured responses by resolving them against a hierarchy of named
//! resources and running them through an ordered chain of cross-cutting
//! middleware:
//!
//! ```text
//! Request  → layer 1 → layer 2 → ... → resolver → endpoint
//!                                                    ↓
//! Response ← layer 1 ← layer 2 ← ...  ←─────────────┘
//! ```
//!
//! - **Resource trees**: literal, numeric-variable (`#id`), and
//!   string-variable (`$slug`) path segments, matched in that fixed
//!   priority; multiple composite roots searched in order with
//!   method-not-allowed aggregation across them.
//! - **Onion middleware**: registration order in, reverse order out; any
//!   layer may short-circuit, post-process, or intercept errors.
//! - **Flat router**: an ordered first-match-wins route list that plugs
//!   into the chain and falls through when nothing matches.
//! - **Typed failures**: not-found, method-not-allowed, handler faults, and
//!   configuration errors, all traveling one error channel.
//!
//! Transport is not arbor's concern: bind your HTTP server of choice to
//! [`Arbor::request`] and map its responses back out.
//!
//! ## Quick start
//!
//! ```
//! use arbor::prelude::*;
//! use http::{Method, StatusCode};
//!
//! struct Hello;
//!
//! impl Endpoint for Hello {
//!     fn call<'a>(
//!         &'a self,
//!         _ctx: &'a mut RequestContext,
//!         _request: Request,
//!     ) -> BoxFuture<'a, RouteResult<Outcome>> {
//!         Box::pin(async { Ok(Outcome::Value(serde_json::json!("hello"))) })
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> RouteResult<()> {
//! let engine = Arbor::new(Resource::new().get(Hello));
//!
//! let response = engine.request(Request::new(Method::GET, "/")).await?;
//! assert_eq!(response.status, StatusCode::OK);
//! assert_eq!(response.body, serde_json::json!("hello"));
//! # Ok(())
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/arbor/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod engine;

// Re-export core types
pub use arbor_core as core;

// Re-export middleware types
pub use arbor_middleware as middleware;

// Re-export router types
pub use arbor_router as router;

pub use engine::Arbor;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```
/// use arbor::prelude::*;
/// ```
pub mod prelude {
    pub use crate::Arbor;

    pub use arbor_core::{
        ArgValue, Args, BoxFuture, Endpoint, FnEndpoint, Outcome, Request, RequestContext,
        RequestId, ResourceContext, Response, RouteError, RouteResult,
    };

    pub use arbor_middleware::{Chain, ChainResult, Dispatch, FnMiddleware, Middleware, Next};

    pub use arbor_middleware::stages::{
        BodyParser, CookieJar, Cookies, CorsMiddleware, ErrorNormalizer, SetCookie, TrailingSlash,
    };

    pub use arbor_router::{resolve, FlatRouter, PathTemplate, Resolution, Resource, RouteSet};
}
