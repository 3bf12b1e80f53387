//! Error-rendering middleware.
//!
//! Intercepts the error channel in its post-phase and converts any
//! [`RouteError`] into a formatted JSON response: 404 for not-found, 405 for
//! method-not-allowed, 500 for handler and configuration faults. Without
//! this stage (or another interceptor), errors reach the caller of the whole
//! chain unmodified in kind and payload.

use arbor_core::{BoxFuture, Request, RequestContext, Response};

use crate::middleware::{ChainResult, Middleware, Next};

/// Converts chain errors into JSON error responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorNormalizer;

impl Middleware for ErrorNormalizer {
    fn name(&self) -> &'static str {
        "error_normalization"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, ChainResult> {
        Box::pin(async move {
            match next.run(ctx, request).await {
                Ok(outcome) => Ok(outcome),
                Err(err) => {
                    let status = err.status_code();
                    tracing::debug!(status = %status, error = %err, "rendering error response");

                    let request_id = ctx.request_id().to_string();
                    let envelope = err.to_envelope(Some(&request_id));
                    let body = serde_json::to_value(&envelope).unwrap_or_default();

                    Ok(Response::new(status)
                        .with_header("content-type", "application/json")
                        .with_body(body)
                        .into())
                }
            }
        })
    }
}
