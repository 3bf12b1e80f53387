//! Per-request context.
//!
//! The [`RequestContext`] is the explicit replacement for ambient execution
//! state: it carries the request ID, the matched resource's context value,
//! and a typed extension map that middleware use to hand state to later
//! layers (decoded bodies, cookie jars, page flags). It is allocated fresh
//! per request and exclusively owned by that request's execution.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

/// Unique identifier for a single request (UUID v7, time-ordered).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Generates a fresh request ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The opaque context value attached to a resource node.
///
/// Whatever the tree builder attached is shared (cheaply cloned) into every
/// request resolving within that node's subtree and retrieved by type.
///
/// # Example
///
/// ```
/// use arbor_core::ResourceContext;
///
/// let ctx = ResourceContext::new("team database handle");
/// assert_eq!(ctx.get::<&str>(), Some(&"team database handle"));
/// assert!(ctx.get::<i64>().is_none());
/// ```
#[derive(Clone, Default)]
pub struct ResourceContext {
    inner: Option<Arc<dyn Any + Send + Sync>>,
}

impl ResourceContext {
    /// Wraps a context value.
    #[must_use]
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self {
            inner: Some(Arc::new(value)),
        }
    }

    /// The absent context.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns the context value, if one is attached and of type `T`.
    #[must_use]
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.inner
            .as_deref()
            .and_then(|value| value.downcast_ref::<T>())
    }

    /// Returns true if a context value is attached.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.inner.is_some()
    }
}

impl fmt::Debug for ResourceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceContext")
            .field("set", &self.is_set())
            .finish()
    }
}

/// Context that flows through the middleware chain for one request.
///
/// The resource context is populated by resolution before the chain runs, so
/// every layer (pre- and post-phase) and the endpoint see the same value.
/// Extensions are type-keyed, mirroring the usual extension-map pattern.
pub struct RequestContext {
    /// Unique identifier for this request.
    request_id: RequestId,

    /// Context of the resolved resource node (or of the first structurally
    /// matching node when resolution ends in method-not-allowed).
    resource: ResourceContext,

    /// Type-erased extension data for middleware-to-middleware state.
    extensions: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl RequestContext {
    /// Creates a context with a fresh request ID and no resource context.
    #[must_use]
    pub fn new() -> Self {
        Self {
            request_id: RequestId::new(),
            resource: ResourceContext::none(),
            extensions: HashMap::new(),
        }
    }

    /// Sets the resource context, consuming self. Used at chain setup.
    #[must_use]
    pub fn with_resource(mut self, resource: ResourceContext) -> Self {
        self.resource = resource;
        self
    }

    /// Returns the request ID.
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns the resolved resource context.
    #[must_use]
    pub fn resource(&self) -> &ResourceContext {
        &self.resource
    }

    /// Stores a typed extension value, replacing any previous value of the
    /// same type.
    pub fn set_extension<T: Send + Sync + 'static>(&mut self, value: T) {
        self.extensions.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Retrieves a typed extension value.
    #[must_use]
    pub fn get_extension<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Retrieves a typed extension value mutably.
    pub fn get_extension_mut<T: Send + Sync + 'static>(&mut self) -> Option<&mut T> {
        self.extensions
            .get_mut(&TypeId::of::<T>())
            .and_then(|v| v.downcast_mut())
    }

    /// Removes and returns a typed extension value.
    pub fn remove_extension<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.extensions
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|b| *b)
    }

    /// Checks if an extension of the given type exists.
    #[must_use]
    pub fn has_extension<T: Send + Sync + 'static>(&self) -> bool {
        self.extensions.contains_key(&TypeId::of::<T>())
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Extensions are type-erased; only their count is representable.
        f.debug_struct("RequestContext")
            .field("request_id", &self.request_id)
            .field("resource", &self.resource)
            .field("extensions", &self.extensions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_ids_are_unique() {
        assert_ne!(RequestId::new(), RequestId::new());
    }

    #[test]
    fn test_resource_context_typed_access() {
        let ctx = ResourceContext::new(String::from("first resource context"));
        assert!(ctx.is_set());
        assert_eq!(ctx.get::<String>().map(String::as_str), Some("first resource context"));
        assert!(ctx.get::<i64>().is_none());
    }

    #[test]
    fn test_resource_context_none() {
        let ctx = ResourceContext::none();
        assert!(!ctx.is_set());
        assert!(ctx.get::<String>().is_none());
    }

    #[test]
    fn test_resource_context_clone_shares_value() {
        let ctx = ResourceContext::new(7_i64);
        let cloned = ctx.clone();
        assert_eq!(cloned.get::<i64>(), Some(&7));
    }

    #[test]
    fn test_new_context_has_no_resource() {
        let ctx = RequestContext::new();
        assert!(!ctx.resource().is_set());
    }

    #[test]
    fn test_with_resource() {
        let ctx = RequestContext::new().with_resource(ResourceContext::new(42_i64));
        assert_eq!(ctx.resource().get::<i64>(), Some(&42));
    }

    #[test]
    fn test_extensions_roundtrip() {
        #[derive(Debug, Clone, PartialEq)]
        struct Marker {
            value: i32,
        }

        let mut ctx = RequestContext::new();
        assert!(!ctx.has_extension::<Marker>());

        ctx.set_extension(Marker { value: 42 });
        assert!(ctx.has_extension::<Marker>());
        assert_eq!(ctx.get_extension::<Marker>(), Some(&Marker { value: 42 }));

        ctx.get_extension_mut::<Marker>().unwrap().value = 43;
        assert_eq!(ctx.remove_extension::<Marker>(), Some(Marker { value: 43 }));
        assert!(!ctx.has_extension::<Marker>());
    }
}
