//! Per-node HTTP method table.
//!
//! Maps HTTP methods to endpoints for a single resource node. The declared
//! method set enumerates in a canonical order (GET, POST, PUT, DELETE,
//! PATCH, HEAD, OPTIONS, TRACE, CONNECT); this order is what feeds the
//! method-not-allowed union.

use std::sync::Arc;

use arbor_core::Endpoint;
use http::Method;

/// Maps HTTP methods to endpoints for a single node.
///
/// # Example
///
/// ```ignore
/// let table = MethodTable::new()
///     .get(list_users)
///     .post(create_user);
///
/// assert!(table.endpoint(&Method::GET).is_some());
/// assert_eq!(table.allowed_methods(), vec![Method::GET, Method::POST]);
/// ```
#[derive(Clone, Default)]
pub struct MethodTable {
    get: Option<Arc<dyn Endpoint>>,
    post: Option<Arc<dyn Endpoint>>,
    put: Option<Arc<dyn Endpoint>>,
    delete: Option<Arc<dyn Endpoint>>,
    patch: Option<Arc<dyn Endpoint>>,
    head: Option<Arc<dyn Endpoint>>,
    options: Option<Arc<dyn Endpoint>>,
    trace: Option<Arc<dyn Endpoint>>,
    connect: Option<Arc<dyn Endpoint>>,
}

impl MethodTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an endpoint for a method, replacing any previous one.
    pub fn set(&mut self, method: &Method, endpoint: Arc<dyn Endpoint>) {
        let slot = match *method {
            Method::GET => &mut self.get,
            Method::POST => &mut self.post,
            Method::PUT => &mut self.put,
            Method::DELETE => &mut self.delete,
            Method::PATCH => &mut self.patch,
            Method::HEAD => &mut self.head,
            Method::OPTIONS => &mut self.options,
            Method::TRACE => &mut self.trace,
            Method::CONNECT => &mut self.connect,
            // Extension methods are not representable in the fixed table.
            _ => return,
        };
        *slot = Some(endpoint);
    }

    /// Returns the endpoint for a method.
    #[must_use]
    pub fn endpoint(&self, method: &Method) -> Option<&Arc<dyn Endpoint>> {
        match *method {
            Method::GET => self.get.as_ref(),
            Method::POST => self.post.as_ref(),
            Method::PUT => self.put.as_ref(),
            Method::DELETE => self.delete.as_ref(),
            Method::PATCH => self.patch.as_ref(),
            Method::HEAD => self.head.as_ref(),
            Method::OPTIONS => self.options.as_ref(),
            Method::TRACE => self.trace.as_ref(),
            Method::CONNECT => self.connect.as_ref(),
            _ => None,
        }
    }

    /// Returns the declared methods in canonical order.
    #[must_use]
    pub fn allowed_methods(&self) -> Vec<Method> {
        let slots = [
            (Method::GET, self.get.is_some()),
            (Method::POST, self.post.is_some()),
            (Method::PUT, self.put.is_some()),
            (Method::DELETE, self.delete.is_some()),
            (Method::PATCH, self.patch.is_some()),
            (Method::HEAD, self.head.is_some()),
            (Method::OPTIONS, self.options.is_some()),
            (Method::TRACE, self.trace.is_some()),
            (Method::CONNECT, self.connect.is_some()),
        ];
        slots
            .into_iter()
            .filter_map(|(method, set)| set.then_some(method))
            .collect()
    }

    /// Returns true if no methods are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.allowed_methods().is_empty()
    }
}

impl std::fmt::Debug for MethodTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodTable")
            .field("methods", &self.allowed_methods())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_core::{BoxFuture, Outcome, Request, RequestContext, RouteResult};

    struct Stub;

    impl Endpoint for Stub {
        fn call<'a>(
            &'a self,
            _ctx: &'a mut RequestContext,
            _request: Request,
        ) -> BoxFuture<'a, RouteResult<Outcome>> {
            Box::pin(async { Ok(Outcome::Value(serde_json::Value::Null)) })
        }
    }

    fn stub() -> Arc<dyn Endpoint> {
        Arc::new(Stub)
    }

    #[test]
    fn test_empty_table() {
        let table = MethodTable::new();
        assert!(table.is_empty());
        assert!(table.endpoint(&Method::GET).is_none());
        assert!(table.allowed_methods().is_empty());
    }

    #[test]
    fn test_set_and_lookup() {
        let mut table = MethodTable::new();
        table.set(&Method::GET, stub());
        table.set(&Method::POST, stub());

        assert!(table.endpoint(&Method::GET).is_some());
        assert!(table.endpoint(&Method::POST).is_some());
        assert!(table.endpoint(&Method::DELETE).is_none());
        assert!(!table.is_empty());
    }

    #[test]
    fn test_allowed_methods_canonical_order() {
        // Declaration order DELETE-then-PUT still enumerates canonically.
        let mut table = MethodTable::new();
        table.set(&Method::DELETE, stub());
        table.set(&Method::PUT, stub());

        assert_eq!(table.allowed_methods(), vec![Method::PUT, Method::DELETE]);
    }

    #[test]
    fn test_all_standard_methods() {
        let methods = [
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::HEAD,
            Method::OPTIONS,
            Method::TRACE,
            Method::CONNECT,
        ];

        let mut table = MethodTable::new();
        for method in &methods {
            table.set(method, stub());
        }

        assert_eq!(table.allowed_methods(), methods);
    }
}
