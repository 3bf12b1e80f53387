//! Flat, ordered route list.
//!
//! The alternative to the resource tree: an append-only list of
//! (method, path template, endpoint) entries scanned in insertion order,
//! first match wins. It plugs into the middleware chain; when nothing
//! matches, control passes to the next layer rather than failing.

use std::sync::Arc;

use arbor_core::{BoxFuture, Endpoint, Request, RequestContext};
use arbor_middleware::{ChainResult, Middleware, Next};
use http::Method;
use indexmap::IndexMap;

use crate::template::PathTemplate;

/// One flat-router entry.
struct RouteEntry {
    method: Method,
    template: PathTemplate,
    endpoint: Arc<dyn Endpoint>,
}

/// An external route table: paths, each carrying a method-to-endpoint map.
///
/// This is the bulk-load format the flat router expands, optionally under a
/// namespace prefix. Build it with the fluent API and hand it to
/// [`FlatRouter::add_route_set`].
///
/// # Example
///
/// ```ignore
/// let routes = RouteSet::new()
///     .route("/", Method::GET, home)
///     .route("/posts", Method::GET, list_posts)
///     .route("/posts", Method::POST, create_post);
///
/// router.add_route_set(routes, Some("/blog"));
/// // -> GET /blog, GET /blog/posts, POST /blog/posts
/// ```
#[derive(Default)]
pub struct RouteSet {
    entries: IndexMap<String, IndexMap<Method, Arc<dyn Endpoint>>>,
}

impl RouteSet {
    /// Creates an empty route set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an endpoint under a path and method.
    #[must_use]
    pub fn route<E: Endpoint>(mut self, path: &str, method: Method, endpoint: E) -> Self {
        self.entries
            .entry(path.to_string())
            .or_default()
            .insert(method, Arc::new(endpoint));
        self
    }

    /// Returns true if the set holds no routes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Joins a stored route path with a namespace prefix. A root path combined
/// with a non-empty prefix collapses to just the prefix.
fn prefixed_path(path: &str, prefix: &str) -> String {
    if !prefix.is_empty() && path == "/" {
        prefix.to_string()
    } else {
        format!("{prefix}{path}")
    }
}

/// An ordered first-match-wins dispatcher over typed path templates.
///
/// # Example
///
/// ```ignore
/// let mut router = FlatRouter::new();
/// router.add_route(Method::GET, "/users/#id", show_user);
/// router.add_route(Method::GET, "/users", list_users);
///
/// engine.attach(router);
/// ```
#[derive(Default)]
pub struct FlatRouter {
    routes: Vec<RouteEntry>,
}

impl FlatRouter {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a route.
    pub fn add_route<E: Endpoint>(&mut self, method: Method, path: &str, endpoint: E) {
        self.add_shared_route(method, path, Arc::new(endpoint));
    }

    /// Appends one route per path, all pointing at the same endpoint.
    pub fn add_routes(&mut self, method: Method, paths: &[&str], endpoint: Arc<dyn Endpoint>) {
        for path in paths {
            self.add_shared_route(method.clone(), path, endpoint.clone());
        }
    }

    /// Appends a route holding an already shared endpoint.
    pub fn add_shared_route(&mut self, method: Method, path: &str, endpoint: Arc<dyn Endpoint>) {
        self.routes.push(RouteEntry {
            method,
            template: PathTemplate::parse(path),
            endpoint,
        });
    }

    /// Expands a whole [`RouteSet`], optionally namespaced under a prefix.
    ///
    /// Entries land in the set's iteration order, after any routes already
    /// present.
    pub fn add_route_set(&mut self, set: RouteSet, prefix: Option<&str>) {
        let prefix = prefix.unwrap_or("");
        for (path, methods) in set.entries {
            let full_path = prefixed_path(&path, prefix);
            for (method, endpoint) in methods {
                self.add_shared_route(method, &full_path, endpoint);
            }
        }
    }

    /// Returns the number of routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Middleware for FlatRouter {
    fn name(&self) -> &'static str {
        "flat_router"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        mut request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, ChainResult> {
        Box::pin(async move {
            for entry in &self.routes {
                if entry.method != request.method {
                    continue;
                }
                if let Some(args) = entry.template.matches(&request.path)? {
                    request.args.merge(args)?;
                    return entry.endpoint.call(ctx, request).await;
                }
            }
            // No entry matched: hand the request to the next layer.
            next.run(ctx, request).await
        })
    }
}
