//! The composite engine: resource roots plus a middleware chain.
//!
//! An [`Arbor`] owns an ordered list of root [`Resource`] trees and an
//! ordered middleware chain. A request is resolved against the roots first,
//! so the winning node's context is present for the whole chain (the
//! pre-phase included); the resolution outcome then becomes the chain's
//! innermost dispatch step: the matched endpoint, or the not-found /
//! method-not-allowed error entering the error channel where every layer
//! can see it.

use arbor_core::{Request, RequestContext, ResourceContext, Response, RouteError, RouteResult};
use arbor_middleware::{Chain, Dispatch, Middleware, SharedMiddleware};
use arbor_router::{resolve, Resolution, Resource};

/// A routing engine assembled from resource roots and middleware.
///
/// Construction is an explicit build step; the roots and chain are
/// read-only while serving, so concurrent requests share nothing mutable.
///
/// # Example
///
/// ```ignore
/// let mut engine = Arbor::new(Resource::new().get(hello));
/// engine.attach(ErrorNormalizer);
///
/// let response = engine.request(Request::new(Method::GET, "/")).await?;
/// assert_eq!(response.status, StatusCode::OK);
/// ```
#[derive(Default)]
pub struct Arbor {
    roots: Vec<Resource>,
    chain: Chain,
}

impl Arbor {
    /// Creates an engine with a single root tree.
    #[must_use]
    pub fn new(root: Resource) -> Self {
        Self::with_roots(vec![root])
    }

    /// Creates an engine with composite roots, checked in order.
    ///
    /// An engine with no roots resolves every request to not-found, which
    /// suits setups that dispatch entirely through an attached
    /// [`FlatRouter`](arbor_router::FlatRouter).
    #[must_use]
    pub fn with_roots(roots: Vec<Resource>) -> Self {
        Self {
            roots,
            chain: Chain::new(),
        }
    }

    /// Appends a middleware. Registration order is pre-phase order.
    pub fn attach<M: Middleware>(&mut self, middleware: M) {
        self.chain.attach(middleware);
    }

    /// Appends an already shared middleware.
    pub fn attach_shared(&mut self, middleware: SharedMiddleware) {
        self.chain.attach_shared(middleware);
    }

    /// Handles one request through resolution and the middleware chain.
    ///
    /// On success the outcome is wrapped in the default envelope (a bare
    /// value becomes status 200, empty headers, body = value). An error no
    /// middleware intercepted reaches the caller unmodified in kind and
    /// payload.
    pub async fn request(&self, mut request: Request) -> RouteResult<Response> {
        let (dispatch, resource) = match resolve(&self.roots, &request.method, &request.path) {
            Ok(Resolution::Found {
                endpoint,
                args,
                context,
            }) => match request.args.merge(args) {
                Ok(()) => (Dispatch::Endpoint(endpoint), context),
                Err(err) => (Dispatch::Fail(err), context),
            },
            Ok(Resolution::MethodMiss { allowed, context }) => (
                Dispatch::Fail(RouteError::method_not_allowed(allowed)),
                context,
            ),
            Ok(Resolution::PathMiss { path }) => (
                Dispatch::Fail(RouteError::not_found(path)),
                ResourceContext::none(),
            ),
            Err(err) => (Dispatch::Fail(err), ResourceContext::none()),
        };

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            dispatch = ?dispatch,
            "resolved request"
        );

        let mut ctx = RequestContext::new().with_resource(resource);
        match self.chain.execute(&mut ctx, request, dispatch).await {
            Ok(outcome) => Ok(outcome.into_response()),
            Err(err) => {
                tracing::warn!(
                    request_id = %ctx.request_id(),
                    error = %err,
                    "request failed with no middleware intercepting"
                );
                Err(err)
            }
        }
    }
}
