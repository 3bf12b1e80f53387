//! The structured response and the handler outcome channel.
//!
//! Handlers and middleware deal in [`Outcome`]s: either a bare value or an
//! explicit [`Response`]. The bare-value form travels the chain unwrapped so
//! middleware can post-process it; the default envelope (status 200, empty
//! headers, body = the value) is applied only at the outermost boundary.

use http::StatusCode;
use indexmap::IndexMap;
use serde_json::Value;

/// A structured response: status, headers, opaque body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// The HTTP status code.
    pub status: StatusCode,
    /// Response headers, keyed by lowercased name.
    pub headers: IndexMap<String, String>,
    /// The opaque response payload.
    pub body: Value,
}

impl Response {
    /// Creates an empty response with the given status.
    #[must_use]
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: IndexMap::new(),
            body: Value::Null,
        }
    }

    /// Creates the default success envelope around a bare value:
    /// status 200, empty headers, body = the value.
    #[must_use]
    pub fn ok(body: impl Into<Value>) -> Self {
        Self::new(StatusCode::OK).with_body(body)
    }

    /// Creates a 302 redirect to the given location.
    #[must_use]
    pub fn redirect(location: impl Into<String>) -> Self {
        Self::new(StatusCode::FOUND).with_header("location", location.into())
    }

    /// Sets the response body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Value>) -> Self {
        self.body = body.into();
        self
    }

    /// Adds a header. The name is lowercased.
    #[must_use]
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    /// Adds a header in place. The name is lowercased.
    pub fn set_header(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
    }

    /// Returns a header value. Lookup is case-insensitive.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// What a handler or middleware hands back on the success channel.
///
/// Endpoints usually return a bare [`Value`]; middleware that need headers
/// or a status code return an explicit [`Response`]. Interior middleware see
/// whichever form the inner chain produced and may mutate it in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A bare value, wrapped in the default envelope at the boundary.
    Value(Value),
    /// An explicit response, passed through untouched.
    Response(Response),
}

impl Outcome {
    /// Applies the default envelope: bare values become
    /// `200 / empty headers / body = value`, explicit responses pass through.
    #[must_use]
    pub fn into_response(self) -> Response {
        match self {
            Self::Value(value) => Response::ok(value),
            Self::Response(response) => response,
        }
    }

    /// Returns a mutable reference to the payload, whichever form it is in.
    pub fn body_mut(&mut self) -> &mut Value {
        match self {
            Self::Value(value) => value,
            Self::Response(response) => &mut response.body,
        }
    }

    /// Forces the explicit-response form, applying the default envelope if
    /// needed, and returns a mutable reference to it.
    pub fn response_mut(&mut self) -> &mut Response {
        if let Self::Value(value) = self {
            let enveloped = Response::ok(value.take());
            *self = Self::Response(enveloped);
        }
        match self {
            Self::Response(response) => response,
            Self::Value(_) => unreachable!("just converted to Response"),
        }
    }
}

impl From<Value> for Outcome {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<Response> for Outcome {
    fn from(response: Response) -> Self {
        Self::Response(response)
    }
}
