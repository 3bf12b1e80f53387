//! Endpoint trait for request handling.
//!
//! An [`Endpoint`] is the innermost callable of a request chain: the code a
//! resource node's method table or a flat-router entry points at. Endpoints
//! may suspend (they return a boxed future) and are awaited to completion
//! before the chain resumes.

use std::future::Future;
use std::pin::Pin;

use crate::context::RequestContext;
use crate::error::RouteResult;
use crate::request::Request;
use crate::response::Outcome;

/// A boxed future, the uniform return shape for endpoints and middleware.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A request endpoint.
///
/// Receives the per-request context (resource context, extensions) and the
/// request, and produces an [`Outcome`] or fails on the error channel. A
/// bare-value outcome is wrapped in the default success envelope at the
/// outermost boundary, not here.
///
/// # Example
///
/// ```
/// use arbor_core::{BoxFuture, Endpoint, Outcome, Request, RequestContext, RouteResult};
///
/// struct Hello;
///
/// impl Endpoint for Hello {
///     fn call<'a>(
///         &'a self,
///         _ctx: &'a mut RequestContext,
///         _request: Request,
///     ) -> BoxFuture<'a, RouteResult<Outcome>> {
///         Box::pin(async { Ok(Outcome::Value(serde_json::json!("hello"))) })
///     }
/// }
/// ```
pub trait Endpoint: Send + Sync + 'static {
    /// Handles a request.
    fn call<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        request: Request,
    ) -> BoxFuture<'a, RouteResult<Outcome>>;
}

/// An endpoint backed by a plain function.
///
/// Works best with `fn` items, which implement the required higher-ranked
/// `Fn` bound without inference trouble:
///
/// ```
/// use arbor_core::{BoxFuture, FnEndpoint, Outcome, Request, RequestContext, RouteResult};
///
/// fn hello<'a>(
///     _ctx: &'a mut RequestContext,
///     _request: Request,
/// ) -> BoxFuture<'a, RouteResult<Outcome>> {
///     Box::pin(async { Ok(Outcome::Value(serde_json::json!("hello"))) })
/// }
///
/// let endpoint = FnEndpoint::new(hello);
/// ```
pub struct FnEndpoint<F> {
    func: F,
}

impl<F> FnEndpoint<F> {
    /// Wraps a function as an endpoint.
    #[must_use]
    pub const fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> Endpoint for FnEndpoint<F>
where
    F: for<'a> Fn(&'a mut RequestContext, Request) -> BoxFuture<'a, RouteResult<Outcome>>
        + Send
        + Sync
        + 'static,
{
    fn call<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        request: Request,
    ) -> BoxFuture<'a, RouteResult<Outcome>> {
        (self.func)(ctx, request)
    }
}
