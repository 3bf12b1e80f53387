//! Bundled middleware stages.
//!
//! These are optional, individually attachable layers; the engine imposes no
//! fixed ordering, but the conventional arrangement is trailing-slash
//! handling and CORS outermost, then error rendering, then body parsing and
//! cookies, with routing middleware innermost.

mod body_parser;
mod cookies;
mod cors;
mod error_normalization;
mod trailing_slash;

pub use body_parser::BodyParser;
pub use cookies::{CookieJar, Cookies, SetCookie};
pub use cors::{AllowedOrigins, CorsBuilder, CorsMiddleware};
pub use error_normalization::ErrorNormalizer;
pub use trailing_slash::TrailingSlash;
