//! Trailing-slash redirect middleware.
//!
//! Path matching treats `/users` and `/users/` as different paths, and route
//! trees are conventionally built without trailing separators. This stage
//! short-circuits any request for a non-root path ending in `/` with a 302
//! redirect to the trimmed path, so both spellings reach the same resource.

use arbor_core::{BoxFuture, Request, RequestContext, Response};

use crate::middleware::{ChainResult, Middleware, Next};

/// Redirects `/path/` to `/path`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrailingSlash;

impl Middleware for TrailingSlash {
    fn name(&self) -> &'static str {
        "trailing_slash"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, ChainResult> {
        Box::pin(async move {
            if request.path.len() > 1 && request.path.ends_with('/') {
                let trimmed = request.path.trim_end_matches('/');
                let location = if trimmed.is_empty() { "/" } else { trimmed };
                tracing::debug!(from = %request.path, to = %location, "redirecting trailing slash");
                return Ok(Response::redirect(location).into());
            }
            next.run(ctx, request).await
        })
    }
}
