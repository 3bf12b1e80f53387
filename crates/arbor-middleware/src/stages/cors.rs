//! CORS (Cross-Origin Resource Sharing) middleware.
//!
//! Handles preflight OPTIONS requests (short-circuiting the chain with a
//! 204, or a 403 when the origin, method, or headers are not allowed) and
//! adds the appropriate `Access-Control-*` headers to ordinary responses.
//!
//! # Example
//!
//! ```
//! use arbor_middleware::stages::CorsMiddleware;
//! use http::Method;
//!
//! let cors = CorsMiddleware::builder()
//!     .allow_origin("http://localhost:8081")
//!     .allow_methods([Method::GET, Method::POST])
//!     .allow_headers(["Content-Type"])
//!     .build();
//! ```

use std::collections::HashSet;
use std::time::Duration;

use arbor_core::{BoxFuture, Request, RequestContext, Response};
use http::{Method, StatusCode};

use crate::middleware::{ChainResult, Middleware, Next};

/// CORS header names.
mod headers {
    pub const ALLOW_ORIGIN: &str = "access-control-allow-origin";
    pub const ALLOW_METHODS: &str = "access-control-allow-methods";
    pub const ALLOW_HEADERS: &str = "access-control-allow-headers";
    pub const ALLOW_CREDENTIALS: &str = "access-control-allow-credentials";
    pub const MAX_AGE: &str = "access-control-max-age";
    pub const REQUEST_METHOD: &str = "access-control-request-method";
    pub const REQUEST_HEADERS: &str = "access-control-request-headers";
    pub const ORIGIN: &str = "origin";
    pub const VARY: &str = "vary";
}

/// The set of allowed origins.
#[derive(Debug, Clone)]
pub enum AllowedOrigins {
    /// Allow any origin (wildcard `*`).
    Any,
    /// Allow specific origins.
    List(HashSet<String>),
}

impl AllowedOrigins {
    /// Checks if an origin is allowed.
    #[must_use]
    pub fn is_allowed(&self, origin: &str) -> bool {
        match self {
            Self::Any => true,
            Self::List(origins) => origins.contains(origin),
        }
    }

    /// Returns the `Access-Control-Allow-Origin` value for a given origin.
    fn header_value(&self, origin: &str) -> Option<String> {
        match self {
            Self::Any => Some("*".to_string()),
            Self::List(origins) => origins.contains(origin).then(|| origin.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
struct CorsConfig {
    allowed_origins: AllowedOrigins,
    allowed_methods: HashSet<Method>,
    allowed_headers: HashSet<String>,
    allow_credentials: bool,
    max_age: Option<Duration>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: AllowedOrigins::List(HashSet::new()),
            allowed_methods: HashSet::from([
                Method::GET,
                Method::HEAD,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::PATCH,
            ]),
            allowed_headers: HashSet::from(["content-type".to_string()]),
            allow_credentials: false,
            max_age: Some(Duration::from_secs(86400)),
        }
    }
}

/// Builder for [`CorsMiddleware`].
#[derive(Debug, Clone, Default)]
pub struct CorsBuilder {
    config: CorsConfig,
}

impl CorsBuilder {
    /// Creates a builder with default settings: no origins allowed, simple
    /// methods, `content-type` header, 24h preflight cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allows any origin (wildcard `*`). Should not be combined with
    /// credentials.
    #[must_use]
    pub fn allow_any_origin(mut self) -> Self {
        self.config.allowed_origins = AllowedOrigins::Any;
        self
    }

    /// Adds an allowed origin.
    #[must_use]
    pub fn allow_origin(mut self, origin: impl Into<String>) -> Self {
        if let AllowedOrigins::List(origins) = &mut self.config.allowed_origins {
            origins.insert(origin.into());
        }
        self
    }

    /// Sets the allowed HTTP methods.
    #[must_use]
    pub fn allow_methods<I>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = Method>,
    {
        self.config.allowed_methods = methods.into_iter().collect();
        self
    }

    /// Sets the allowed request headers.
    #[must_use]
    pub fn allow_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.allowed_headers = headers
            .into_iter()
            .map(|h| h.into().to_ascii_lowercase())
            .collect();
        self
    }

    /// Sets whether credentialed requests are allowed.
    #[must_use]
    pub fn allow_credentials(mut self, allow: bool) -> Self {
        self.config.allow_credentials = allow;
        self
    }

    /// Sets the preflight cache duration.
    #[must_use]
    pub fn max_age(mut self, duration: Duration) -> Self {
        self.config.max_age = Some(duration);
        self
    }

    /// Builds the middleware.
    #[must_use]
    pub fn build(self) -> CorsMiddleware {
        CorsMiddleware {
            config: self.config,
        }
    }
}

/// CORS middleware.
///
/// Attach before other stages so preflight requests short-circuit early.
#[derive(Debug, Clone)]
pub struct CorsMiddleware {
    config: CorsConfig,
}

impl CorsMiddleware {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> CorsBuilder {
        CorsBuilder::new()
    }

    /// Creates a permissive middleware that allows any origin. Development
    /// use only.
    #[must_use]
    pub fn permissive() -> Self {
        CorsBuilder::new()
            .allow_any_origin()
            .allow_headers(["*"])
            .build()
    }

    fn is_preflight(request: &Request) -> bool {
        request.method == Method::OPTIONS
            && request.header(headers::ORIGIN).is_some()
            && request.header(headers::REQUEST_METHOD).is_some()
    }

    fn handle_preflight(&self, request: &Request) -> Response {
        let Some(origin) = request.header(headers::ORIGIN) else {
            return Self::forbidden("missing Origin header");
        };

        if !self.config.allowed_origins.is_allowed(origin) {
            return Self::forbidden("origin not allowed");
        }

        if let Some(requested) = request.header(headers::REQUEST_METHOD) {
            if let Ok(method) = requested.parse::<Method>() {
                if !self.config.allowed_methods.contains(&method) {
                    return Self::forbidden("method not allowed");
                }
            }
        }

        if let Some(requested) = request.header(headers::REQUEST_HEADERS) {
            if !self.config.allowed_headers.contains("*") {
                for header in requested.split(',').map(|h| h.trim().to_ascii_lowercase()) {
                    if !self.config.allowed_headers.contains(&header) {
                        return Self::forbidden("header not allowed");
                    }
                }
            }
        }

        self.preflight_response(origin)
    }

    fn preflight_response(&self, origin: &str) -> Response {
        let mut response = Response::new(StatusCode::NO_CONTENT);

        if let Some(value) = self.config.allowed_origins.header_value(origin) {
            response.set_header(headers::ALLOW_ORIGIN, value);
        }

        let mut methods: Vec<_> = self
            .config
            .allowed_methods
            .iter()
            .map(Method::as_str)
            .collect();
        methods.sort_unstable();
        response.set_header(headers::ALLOW_METHODS, methods.join(", "));

        let mut allowed: Vec<_> = self.config.allowed_headers.iter().cloned().collect();
        allowed.sort_unstable();
        response.set_header(headers::ALLOW_HEADERS, allowed.join(", "));

        if self.config.allow_credentials {
            response.set_header(headers::ALLOW_CREDENTIALS, "true");
        }

        if let Some(max_age) = self.config.max_age {
            response.set_header(headers::MAX_AGE, max_age.as_secs().to_string());
        }

        response.set_header(
            headers::VARY,
            "Origin, Access-Control-Request-Method, Access-Control-Request-Headers",
        );
        response
    }

    fn forbidden(message: &str) -> Response {
        Response::new(StatusCode::FORBIDDEN).with_body(message)
    }

    fn add_cors_headers(&self, response: &mut Response, origin: &str) {
        if let Some(value) = self.config.allowed_origins.header_value(origin) {
            response.set_header(headers::ALLOW_ORIGIN, value);
        }
        if self.config.allow_credentials {
            response.set_header(headers::ALLOW_CREDENTIALS, "true");
        }
        response.set_header(headers::VARY, "Origin");
    }
}

impl Middleware for CorsMiddleware {
    fn name(&self) -> &'static str {
        "cors"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, ChainResult> {
        Box::pin(async move {
            if Self::is_preflight(&request) {
                return Ok(self.handle_preflight(&request).into());
            }

            let origin = request.header(headers::ORIGIN).map(String::from);
            let mut result = next.run(ctx, request).await;

            if let (Ok(outcome), Some(origin)) = (&mut result, origin) {
                if self.config.allowed_origins.is_allowed(&origin) {
                    self.add_cors_headers(outcome.response_mut(), &origin);
                }
            }

            result
        })
    }
}
