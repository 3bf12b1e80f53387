//! Error types for arbor.
//!
//! This module provides the [`RouteError`] type, the standard failure type
//! used throughout the engine. The taxonomy is small and closed:
//!
//! | Variant | Synthesized by | Payload |
//! |---|---|---|
//! | `NotFound` | resolver boundary | the requested path |
//! | `MethodNotAllowed` | resolver boundary | ordered allowed-method union |
//! | `Handler` | user middleware/endpoints | the original fault, unmodified |
//! | `Configuration` | route definition / first use | a description of the bad setup |
//!
//! `NotFound` and `MethodNotAllowed` are only ever created at the routing
//! boundary; they travel the middleware chain's error channel exactly like a
//! handler fault, so any middleware may intercept and convert them.

use http::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`RouteError`].
pub type RouteResult<T> = Result<T, RouteError>;

/// Standard failure type for request resolution and handling.
///
/// # Example
///
/// ```
/// use arbor_core::RouteError;
/// use http::StatusCode;
///
/// let err = RouteError::not_found("/missing");
/// assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
/// ```
#[derive(Error, Debug)]
pub enum RouteError {
    /// No resource matched the requested path structurally.
    #[error("no resource matched {path}")]
    NotFound {
        /// The requested path, unmodified.
        path: String,
    },

    /// A resource matched the path but none exposed the requested method.
    #[error("method not allowed, allowed methods: {}", format_methods(allowed))]
    MethodNotAllowed {
        /// Allowed methods across every structurally matching node, in
        /// first-seen order with duplicates removed.
        allowed: Vec<Method>,
    },

    /// A fault raised by user-supplied middleware or endpoint code.
    ///
    /// The original fault is carried unmodified.
    #[error("{0}")]
    Handler(anyhow::Error),

    /// A structurally invalid setup, such as a variable-binding name
    /// collision. Detected at route-definition time or at first use.
    #[error("configuration error: {message}")]
    Configuration {
        /// A description of the invalid setup.
        message: String,
    },
}

impl From<anyhow::Error> for RouteError {
    fn from(fault: anyhow::Error) -> Self {
        Self::Handler(fault)
    }
}

fn format_methods(methods: &[Method]) -> String {
    methods
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

impl RouteError {
    /// Creates a not-found error carrying the requested path.
    #[must_use]
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Creates a method-not-allowed error carrying the allowed-method union.
    #[must_use]
    pub fn method_not_allowed(allowed: Vec<Method>) -> Self {
        Self::MethodNotAllowed { allowed }
    }

    /// Wraps a fault from user code, preserving it unmodified.
    pub fn handler(fault: impl Into<anyhow::Error>) -> Self {
        Self::Handler(fault.into())
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns the HTTP status code this error renders as.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::Handler(_) | Self::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts this error to a serializable error envelope.
    #[must_use]
    pub fn to_envelope(&self, request_id: Option<&str>) -> ErrorEnvelope {
        ErrorEnvelope {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
                details: self.error_details(),
            },
            request_id: request_id.map(ToString::to_string),
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::MethodNotAllowed { .. } => "METHOD_NOT_ALLOWED",
            Self::Handler(_) => "HANDLER_ERROR",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
        }
    }

    /// Returns additional error details for the envelope.
    fn error_details(&self) -> Option<serde_json::Value> {
        match self {
            Self::NotFound { path } => Some(serde_json::json!({ "path": path })),
            Self::MethodNotAllowed { allowed } => Some(serde_json::json!({
                "allowed": allowed.iter().map(Method::as_str).collect::<Vec<_>>()
            })),
            Self::Handler(_) | Self::Configuration { .. } => None,
        }
    }
}

/// Serializable error envelope for rendered error responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// The error details.
    pub error: ErrorDetail,
    /// The request ID for correlation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Error detail within an envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional error details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
