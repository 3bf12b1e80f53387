//! Core middleware trait and chain plumbing.
//!
//! This module defines the [`Middleware`] trait and the [`Next`]
//! continuation that composes handlers in an onion shape around the final
//! dispatch step. A middleware runs logic before delegating to the rest of
//! the chain, may post-process the result (or intercept an error) after the
//! delegate returns, and may skip the delegate entirely to short-circuit.
//!
//! # Example
//!
//! ```
//! use arbor_core::{BoxFuture, Outcome, Request, RequestContext};
//! use arbor_middleware::{ChainResult, Middleware, Next};
//!
//! struct Logging;
//!
//! impl Middleware for Logging {
//!     fn name(&self) -> &'static str {
//!         "logging"
//!     }
//!
//!     fn process<'a>(
//!         &'a self,
//!         ctx: &'a mut RequestContext,
//!         request: Request,
//!         next: Next<'a>,
//!     ) -> BoxFuture<'a, ChainResult> {
//!         Box::pin(async move {
//!             tracing::debug!(request_id = %ctx.request_id(), "request in");
//!             let result = next.run(ctx, request).await;
//!             tracing::debug!(ok = result.is_ok(), "request out");
//!             result
//!         })
//!     }
//! }
//! ```

use std::sync::Arc;

use arbor_core::{BoxFuture, Endpoint, Outcome, Request, RequestContext, RouteError, RouteResult};

/// The value every chain layer produces: an [`Outcome`] on the success
/// channel or a [`RouteError`] on the error channel.
pub type ChainResult = RouteResult<Outcome>;

/// The core middleware trait.
///
/// Middleware receive the mutable per-request context, the request, and a
/// [`Next`] continuation representing everything registered after them
/// (ending in the final dispatch). The continuation is single-use: a
/// middleware invokes it zero or one times.
///
/// Failures from the continuation arrive as `Err` and may be returned as-is
/// (propagation) or converted to an `Ok` outcome (interception).
pub trait Middleware: Send + Sync + 'static {
    /// Returns the name of this middleware, used for logging and debugging.
    fn name(&self) -> &'static str;

    /// Processes the request through this middleware.
    fn process<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, ChainResult>;
}

/// The final step of a request chain, reached when every middleware has
/// delegated inward: either a resolved endpoint to invoke, or the routing
/// failure to inject into the error channel.
pub enum Dispatch {
    /// Invoke the endpoint the router resolved.
    Endpoint(Arc<dyn Endpoint>),
    /// Resolution failed; the error enters the chain at its innermost point
    /// so every layer's error handling sees it.
    Fail(RouteError),
}

impl std::fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Endpoint(_) => f.write_str("Dispatch::Endpoint"),
            Self::Fail(err) => write!(f, "Dispatch::Fail({err})"),
        }
    }
}

/// Continuation representing "run everything after me".
///
/// Consumed by [`Next::run`], so it can only be invoked once.
pub struct Next<'a> {
    inner: NextInner<'a>,
}

enum NextInner<'a> {
    /// More middleware to process.
    Chain {
        middleware: &'a dyn Middleware,
        next: Box<Next<'a>>,
    },
    /// End of chain.
    Terminal(Dispatch),
}

impl<'a> Next<'a> {
    /// Creates a `Next` that will invoke the given middleware.
    pub(crate) fn wrap(middleware: &'a dyn Middleware, next: Next<'a>) -> Self {
        Self {
            inner: NextInner::Chain {
                middleware,
                next: Box::new(next),
            },
        }
    }

    /// Creates a terminal `Next` from a dispatch step.
    #[must_use]
    pub fn terminal(dispatch: Dispatch) -> Self {
        Self {
            inner: NextInner::Terminal(dispatch),
        }
    }

    /// Creates a terminal `Next` that invokes an endpoint.
    #[must_use]
    pub fn endpoint(endpoint: Arc<dyn Endpoint>) -> Self {
        Self::terminal(Dispatch::Endpoint(endpoint))
    }

    /// Creates a terminal `Next` that fails with the given error.
    #[must_use]
    pub fn fail(error: RouteError) -> Self {
        Self::terminal(Dispatch::Fail(error))
    }

    /// Invokes the rest of the chain.
    ///
    /// Consumes `self` so the continuation runs at most once.
    pub async fn run(self, ctx: &mut RequestContext, request: Request) -> ChainResult {
        match self.inner {
            NextInner::Chain { middleware, next } => middleware.process(ctx, request, *next).await,
            NextInner::Terminal(Dispatch::Endpoint(endpoint)) => endpoint.call(ctx, request).await,
            NextInner::Terminal(Dispatch::Fail(error)) => Err(error),
        }
    }
}

/// A middleware backed by a plain function.
///
/// Works best with `fn` items, which implement the required higher-ranked
/// `Fn` bound without inference trouble:
///
/// ```
/// use arbor_core::{BoxFuture, Request, RequestContext};
/// use arbor_middleware::{ChainResult, FnMiddleware, Next};
///
/// fn passthrough<'a>(
///     ctx: &'a mut RequestContext,
///     request: Request,
///     next: Next<'a>,
/// ) -> BoxFuture<'a, ChainResult> {
///     Box::pin(async move { next.run(ctx, request).await })
/// }
///
/// let middleware = FnMiddleware::new("passthrough", passthrough);
/// ```
pub struct FnMiddleware<F> {
    name: &'static str,
    func: F,
}

impl<F> FnMiddleware<F> {
    /// Creates a new function-based middleware.
    #[must_use]
    pub const fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F> Middleware for FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut RequestContext, Request, Next<'a>) -> BoxFuture<'a, ChainResult>
        + Send
        + Sync
        + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, ChainResult> {
        (self.func)(ctx, request, next)
    }
}
