//! Request-body decoding middleware.
//!
//! Translates a raw string body into a usable value based on the declared
//! `Content-Type`:
//!
//! - `application/json` is parsed as JSON
//! - `application/x-www-form-urlencoded` is parsed into an object of
//!   string values
//! - anything else (and bodies that are already structured, or absent)
//!   passes through unchanged
//!
//! Decoding happens once, on the way in, so every body-dependent layer
//! registered after this one sees the decoded value.

use arbor_core::{BoxFuture, Request, RequestContext, RouteError};
use serde_json::Value;

use crate::middleware::{ChainResult, Middleware, Next};

/// Decodes the request body by content type.
#[derive(Debug, Clone, Copy, Default)]
pub struct BodyParser;

/// Strips parameters (`; charset=...`) and normalizes the media type.
fn media_type(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
}

fn decode(raw: &str, content_type: &str) -> Result<Option<Value>, RouteError> {
    match media_type(content_type) {
        "application/json" => {
            let parsed = serde_json::from_str(raw).map_err(|err| RouteError::handler(err))?;
            Ok(Some(parsed))
        }
        "application/x-www-form-urlencoded" => {
            let map: serde_json::Map<String, Value> = url::form_urlencoded::parse(raw.as_bytes())
                .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
                .collect();
            Ok(Some(Value::Object(map)))
        }
        _ => Ok(None),
    }
}

impl Middleware for BodyParser {
    fn name(&self) -> &'static str {
        "body_parser"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        mut request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, ChainResult> {
        Box::pin(async move {
            // Structured and absent bodies need no decoding.
            if let Value::String(raw) = &request.body {
                if let Some(content_type) = request.header("content-type") {
                    if let Some(decoded) = decode(raw, content_type)? {
                        request.body = decoded;
                    }
                }
            }
            next.run(ctx, request).await
        })
    }
}
