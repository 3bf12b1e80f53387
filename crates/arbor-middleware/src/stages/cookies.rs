//! Per-request cookie accessor.
//!
//! The [`Cookies`] stage parses the `Cookie` header into a [`CookieJar`],
//! threads the jar through the chain as a context extension, and writes any
//! pending `Set-Cookie` values onto the response on the way out. The core
//! treats the jar as an opaque per-request object; only this stage and the
//! handlers that use it know its shape.

use arbor_core::{BoxFuture, Request, RequestContext};
use indexmap::IndexMap;

use crate::middleware::{ChainResult, Middleware, Next};

/// An outgoing cookie and its attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    pub value: String,
    /// `Domain` attribute.
    pub domain: Option<String>,
    /// `Path` attribute.
    pub path: Option<String>,
    /// `Max-Age` attribute, in seconds. Zero expires the cookie.
    pub max_age: Option<i64>,
    /// `Secure` attribute.
    pub secure: bool,
    /// `HttpOnly` attribute.
    pub http_only: bool,
}

impl SetCookie {
    /// Creates a cookie with no attributes.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: None,
            path: None,
            max_age: None,
            secure: false,
            http_only: false,
        }
    }

    /// Sets the `Domain` attribute.
    #[must_use]
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Sets the `Path` attribute.
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the `Max-Age` attribute.
    #[must_use]
    pub fn max_age(mut self, seconds: i64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    /// Sets the `HttpOnly` attribute.
    #[must_use]
    pub fn http_only(mut self) -> Self {
        self.http_only = true;
        self
    }

    /// Renders the `Set-Cookie` header value.
    #[must_use]
    pub fn to_header_value(&self) -> String {
        let mut out = format!("{}={}", self.name, self.value);
        if let Some(domain) = &self.domain {
            out.push_str("; Domain=");
            out.push_str(domain);
        }
        if let Some(path) = &self.path {
            out.push_str("; Path=");
            out.push_str(path);
        }
        if let Some(max_age) = self.max_age {
            out.push_str("; Max-Age=");
            out.push_str(&max_age.to_string());
        }
        if self.secure {
            out.push_str("; Secure");
        }
        if self.http_only {
            out.push_str("; HttpOnly");
        }
        out
    }
}

/// A per-request cookie accessor: `get`/`set`/`delete` over the request's
/// cookies, accumulating outgoing `Set-Cookie` values.
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    /// The live view: incoming cookies plus any same-request mutations.
    values: IndexMap<String, String>,
    /// Outgoing `Set-Cookie` entries, in call order.
    pending: Vec<SetCookie>,
}

impl CookieJar {
    /// Parses a `Cookie` header value.
    #[must_use]
    pub fn parse(header: &str) -> Self {
        let values = header
            .split(';')
            .filter_map(|pair| {
                let (name, value) = pair.trim().split_once('=')?;
                (!name.is_empty()).then(|| (name.to_string(), value.to_string()))
            })
            .collect();
        Self {
            values,
            pending: Vec::new(),
        }
    }

    /// Returns a cookie value, reflecting same-request `set`/`delete` calls.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Sets a cookie: updates the live view and queues a `Set-Cookie`.
    pub fn set(&mut self, cookie: SetCookie) {
        self.values
            .insert(cookie.name.clone(), cookie.value.clone());
        self.pending.push(cookie);
    }

    /// Deletes a cookie: removes it from the live view and queues an
    /// immediately expiring `Set-Cookie`.
    pub fn delete(&mut self, name: &str) {
        self.values.shift_remove(name);
        self.pending.push(SetCookie::new(name, "").max_age(0));
    }

    /// Returns the queued outgoing cookies.
    #[must_use]
    pub fn pending(&self) -> &[SetCookie] {
        &self.pending
    }
}

/// Middleware that installs a [`CookieJar`] extension and flushes pending
/// cookies onto the response.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cookies;

impl Middleware for Cookies {
    fn name(&self) -> &'static str {
        "cookies"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, ChainResult> {
        Box::pin(async move {
            let jar = CookieJar::parse(request.header("cookie").unwrap_or(""));
            ctx.set_extension(jar);

            let mut result = next.run(ctx, request).await;

            if let Some(jar) = ctx.remove_extension::<CookieJar>() {
                if let (Ok(outcome), false) = (&mut result, jar.pending().is_empty()) {
                    let value = jar
                        .pending()
                        .iter()
                        .map(SetCookie::to_header_value)
                        .collect::<Vec<_>>()
                        .join(", ");
                    outcome.response_mut().set_header("set-cookie", value);
                }
            }

            result
        })
    }
}
