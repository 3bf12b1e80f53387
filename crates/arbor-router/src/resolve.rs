//! Composite resource-tree resolution.
//!
//! Walks one or more root [`Resource`] trees in order. Within a tree, each
//! path segment is consumed by the first matching child in the fixed
//! priority literal > numeric-variable > string-variable, with no
//! backtracking: once a child consumes a segment, a dead end deeper in that
//! subtree fails the whole root rather than retrying a sibling pattern
//! kind.
//!
//! Across roots, a structural match that lacks the requested method records
//! the node's declared methods into a running union (first-seen order,
//! deduplicated) and resolution continues; the first structurally matching
//! node's context is retained so a final method-not-allowed still carries
//! it.

use std::sync::Arc;

use arbor_core::{Args, Endpoint, ResourceContext, RouteResult};
use http::Method;
use indexmap::IndexSet;

use crate::resource::Resource;
use crate::template::path_segments;

/// The outcome of resolving a method and path against composite roots.
pub enum Resolution {
    /// A node matched the path and exposes the method.
    Found {
        /// The endpoint to invoke.
        endpoint: Arc<dyn Endpoint>,
        /// Variables captured on the walk to the node.
        args: Args,
        /// The matched node's context.
        context: ResourceContext,
    },
    /// At least one node matched the path, but none exposed the method.
    MethodMiss {
        /// Union of the matching nodes' declared methods, first-seen order,
        /// duplicates removed.
        allowed: Vec<Method>,
        /// The first structurally matching node's context.
        context: ResourceContext,
    },
    /// No root matched the path.
    PathMiss {
        /// The requested path, unmodified.
        path: String,
    },
}

impl std::fmt::Debug for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Found { args, .. } => f
                .debug_struct("Resolution::Found")
                .field("args", args)
                .finish_non_exhaustive(),
            Self::MethodMiss { allowed, .. } => f
                .debug_struct("Resolution::MethodMiss")
                .field("allowed", allowed)
                .finish_non_exhaustive(),
            Self::PathMiss { path } => f
                .debug_struct("Resolution::PathMiss")
                .field("path", path)
                .finish(),
        }
    }
}

/// Resolves a method and path against the roots, in root order.
///
/// # Errors
///
/// Returns a configuration error if a walk tries to bind the same variable
/// name twice.
pub fn resolve(roots: &[Resource], method: &Method, path: &str) -> RouteResult<Resolution> {
    let segments = path_segments(path);
    let mut allowed: IndexSet<Method> = IndexSet::new();
    let mut first_context: Option<ResourceContext> = None;

    for root in roots {
        let mut args = Args::new();
        let Some(node) = walk(root, &segments, &mut args)? else {
            continue;
        };

        if first_context.is_none() {
            first_context = Some(node.resource_context().clone());
        }

        if let Some(endpoint) = node.methods().endpoint(method) {
            return Ok(Resolution::Found {
                endpoint: endpoint.clone(),
                args,
                context: node.resource_context().clone(),
            });
        }

        allowed.extend(node.methods().allowed_methods());
    }

    if allowed.is_empty() {
        Ok(Resolution::PathMiss {
            path: path.to_string(),
        })
    } else {
        Ok(Resolution::MethodMiss {
            allowed: allowed.into_iter().collect(),
            context: first_context.unwrap_or_default(),
        })
    }
}

/// Walks one tree. Each level commits to the first matching child kind;
/// there is no retry of sibling kinds when the committed subtree dead-ends.
fn walk<'a>(
    node: &'a Resource,
    segments: &[&str],
    args: &mut Args,
) -> RouteResult<Option<&'a Resource>> {
    let Some((&segment, rest)) = segments.split_first() else {
        return Ok(Some(node));
    };

    if let Some(child) = node.literal_child(segment) {
        return walk(child, rest, args);
    }

    if let Some((name, child)) = node.number_child() {
        if let Ok(value) = segment.parse::<i64>() {
            args.bind(name.to_string(), value)?;
            return walk(child, rest, args);
        }
    }

    if let Some((name, child)) = node.text_child() {
        args.bind(name.to_string(), segment)?;
        return walk(child, rest, args);
    }

    Ok(None)
}
