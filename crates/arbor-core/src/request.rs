//! The abstract inbound request.
//!
//! A [`Request`] is what the transport binding hands the engine: method,
//! path, an opaque (already decoded) body, and headers. It also carries the
//! mutable [`Args`] container that templated path segments bind into.

use http::Method;
use indexmap::IndexMap;
use serde_json::Value;

use crate::args::Args;

/// An abstract request, created once per call and exclusively owned by that
/// call's execution.
///
/// The body is an opaque payload: decoding by content type is the body
/// decoder collaborator's job and happens before body-dependent middleware
/// run. Header names are stored lowercased so lookups are case-insensitive.
///
/// # Example
///
/// ```
/// use arbor_core::Request;
/// use http::Method;
///
/// let request = Request::new(Method::GET, "/users/42")
///     .with_header("Accept", "application/json");
///
/// assert_eq!(request.header("accept"), Some("application/json"));
/// ```
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method.
    pub method: Method,
    /// The request path.
    pub path: String,
    /// The opaque request payload.
    pub body: Value,
    /// Request headers, keyed by lowercased name.
    pub headers: IndexMap<String, String>,
    /// Variables captured from templated path segments.
    pub args: Args,
}

impl Request {
    /// Creates a request with an empty body, no headers, and no captures.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: Value::Null,
            headers: IndexMap::new(),
            args: Args::new(),
        }
    }

    /// Sets the request body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Value>) -> Self {
        self.body = body.into();
        self
    }

    /// Adds a header. The name is lowercased.
    #[must_use]
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// Returns a header value. Lookup is case-insensitive.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}
