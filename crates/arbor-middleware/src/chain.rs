//! Ordered middleware chain executor.
//!
//! A [`Chain`] holds middleware in registration order and executes them in
//! an onion shape: the first registered layer is outermost (its pre-phase
//! runs first, its post-phase last), and the innermost position is the
//! final dispatch step supplied per request.
//!
//! The chain itself is read-only once assembled; every execution gets its
//! own continuation stack, so concurrent requests share nothing mutable.

use std::sync::Arc;

use arbor_core::{Request, RequestContext};

use crate::middleware::{ChainResult, Dispatch, Middleware, Next};

/// A type-erased middleware that can be stored in a chain.
pub type SharedMiddleware = Arc<dyn Middleware>;

/// An ordered, onion-composed middleware chain.
///
/// # Example
///
/// ```ignore
/// let mut chain = Chain::new();
/// chain.attach(Logging);
/// chain.attach(BodyParser);
///
/// let result = chain.execute(&mut ctx, request, Dispatch::Endpoint(endpoint)).await;
/// ```
#[derive(Default)]
pub struct Chain {
    /// Middleware in registration (pre-phase) order.
    layers: Vec<SharedMiddleware>,
}

impl Chain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a middleware. Registration order is pre-phase order.
    pub fn attach<M: Middleware>(&mut self, middleware: M) {
        self.layers.push(Arc::new(middleware));
    }

    /// Appends an already shared middleware.
    pub fn attach_shared(&mut self, middleware: SharedMiddleware) {
        self.layers.push(middleware);
    }

    /// Executes the chain around the given final dispatch step.
    ///
    /// Each layer is awaited to completion before the next phase step runs;
    /// there is no fan-out. An `Err` from any layer (or from the dispatch)
    /// travels outward through every enclosing layer until one converts it,
    /// or reaches the caller unmodified.
    pub async fn execute(
        &self,
        ctx: &mut RequestContext,
        request: Request,
        dispatch: Dispatch,
    ) -> ChainResult {
        self.assemble(dispatch).run(ctx, request).await
    }

    /// Builds the continuation stack, innermost first.
    fn assemble(&self, dispatch: Dispatch) -> Next<'_> {
        let mut next = Next::terminal(dispatch);
        for layer in self.layers.iter().rev() {
            next = Next::wrap(layer.as_ref(), next);
        }
        next
    }

    /// Returns the names of the layers in registration order.
    #[must_use]
    pub fn layer_names(&self) -> Vec<&'static str> {
        self.layers.iter().map(|m| m.name()).collect()
    }

    /// Returns the number of layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns true if no middleware is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
