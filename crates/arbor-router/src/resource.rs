//! Resource tree nodes.
//!
//! A [`Resource`] is one node of the routing tree: a method table, a set of
//! pattern-keyed children, and an opaque context value inherited by whatever
//! handles requests resolving within the node's subtree. Trees are assembled
//! once with the fluent builder API and are immutable while serving.

use std::sync::Arc;

use arbor_core::{Endpoint, ResourceContext};
use http::Method;

use crate::methods::MethodTable;
use crate::segment::SegmentPattern;

/// One node of the resource tree.
///
/// # Example
///
/// ```ignore
/// let users = Resource::new()
///     .get(list_users)
///     .child(
///         "#user_id",
///         Resource::new().get(show_user).delete(remove_user),
///     );
///
/// let root = Resource::new()
///     .context("api v1")
///     .child("users", users);
/// ```
#[derive(Clone, Default)]
pub struct Resource {
    methods: MethodTable,
    children: Vec<(SegmentPattern, Resource)>,
    context: ResourceContext,
}

impl Resource {
    /// Creates an empty node.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an endpoint for a method.
    #[must_use]
    pub fn method<E: Endpoint>(mut self, method: Method, endpoint: E) -> Self {
        self.methods.set(&method, Arc::new(endpoint));
        self
    }

    /// Registers a GET endpoint.
    #[must_use]
    pub fn get<E: Endpoint>(self, endpoint: E) -> Self {
        self.method(Method::GET, endpoint)
    }

    /// Registers a POST endpoint.
    #[must_use]
    pub fn post<E: Endpoint>(self, endpoint: E) -> Self {
        self.method(Method::POST, endpoint)
    }

    /// Registers a PUT endpoint.
    #[must_use]
    pub fn put<E: Endpoint>(self, endpoint: E) -> Self {
        self.method(Method::PUT, endpoint)
    }

    /// Registers a DELETE endpoint.
    #[must_use]
    pub fn delete<E: Endpoint>(self, endpoint: E) -> Self {
        self.method(Method::DELETE, endpoint)
    }

    /// Registers a PATCH endpoint.
    #[must_use]
    pub fn patch<E: Endpoint>(self, endpoint: E) -> Self {
        self.method(Method::PATCH, endpoint)
    }

    /// Attaches the opaque context value handlers in this subtree see.
    #[must_use]
    pub fn context<T: Send + Sync + 'static>(mut self, value: T) -> Self {
        self.context = ResourceContext::new(value);
        self
    }

    /// Adds a child under a segment pattern (`literal`, `#numeric_var`, or
    /// `$string_var`).
    ///
    /// # Panics
    ///
    /// Panics if the pattern is already taken on this node. Child patterns
    /// must be unique; this is a definition-time configuration error and
    /// fails before the tree ever serves a request.
    #[must_use]
    pub fn child(mut self, pattern: &str, resource: Resource) -> Self {
        let pattern = SegmentPattern::parse(pattern);
        assert!(
            !self.children.iter().any(|(existing, _)| *existing == pattern),
            "duplicate child pattern '{pattern}' on resource node"
        );
        self.children.push((pattern, resource));
        self
    }

    /// Returns the method table.
    #[must_use]
    pub fn methods(&self) -> &MethodTable {
        &self.methods
    }

    /// Returns the node's context.
    #[must_use]
    pub fn resource_context(&self) -> &ResourceContext {
        &self.context
    }

    /// Finds the literal child matching a segment.
    pub(crate) fn literal_child(&self, segment: &str) -> Option<&Resource> {
        self.children.iter().find_map(|(pattern, child)| match pattern {
            SegmentPattern::Literal(literal) if literal == segment => Some(child),
            _ => None,
        })
    }

    /// Returns the first declared numeric-variable child.
    pub(crate) fn number_child(&self) -> Option<(&str, &Resource)> {
        self.children.iter().find_map(|(pattern, child)| match pattern {
            SegmentPattern::Number(name) => Some((name.as_str(), child)),
            _ => None,
        })
    }

    /// Returns the first declared string-variable child.
    pub(crate) fn text_child(&self) -> Option<(&str, &Resource)> {
        self.children.iter().find_map(|(pattern, child)| match pattern {
            SegmentPattern::Text(name) => Some((name.as_str(), child)),
            _ => None,
        })
    }
}

impl std::fmt::Debug for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let children: Vec<String> = self
            .children
            .iter()
            .map(|(pattern, _)| pattern.to_string())
            .collect();
        f.debug_struct("Resource")
            .field("methods", &self.methods)
            .field("children", &children)
            .field("context", &self.context)
            .finish()
    }
}
