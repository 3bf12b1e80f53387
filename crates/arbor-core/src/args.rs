//! Captured path-variable storage.
//!
//! This module provides the per-request container for variables captured by
//! templated path segments. Numeric-variable segments bind numbers,
//! string-variable segments bind text. Storage uses a small-vector
//! optimization to avoid heap allocations for the common case of a handful
//! of captures.

use smallvec::SmallVec;

use crate::error::{RouteError, RouteResult};

/// Maximum number of captures stored inline (stack allocated).
const INLINE_ARGS: usize = 4;

/// A value captured from a templated path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    /// Bound by a numeric-variable segment (`#name`).
    Number(i64),
    /// Bound by a string-variable segment (`$name`).
    Text(String),
}

impl ArgValue {
    /// Returns the numeric value, if this capture is a number.
    #[must_use]
    pub const fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    /// Returns the text value, if this capture is text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Number(_) => None,
            Self::Text(s) => Some(s),
        }
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&ArgValue> for serde_json::Value {
    fn from(value: &ArgValue) -> Self {
        match value {
            ArgValue::Number(n) => Self::from(*n),
            ArgValue::Text(s) => Self::from(s.clone()),
        }
    }
}

impl std::fmt::Display for ArgValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Captured path variables for a single request.
///
/// Binding is fallible: a name may only be bound once. Rebinding an existing
/// name is a configuration error, surfaced loudly instead of silently
/// overwriting a previously captured value.
///
/// # Example
///
/// ```
/// use arbor_core::Args;
///
/// let mut args = Args::new();
/// args.bind("user_id", 12345).unwrap();
/// args.bind("action", "view").unwrap();
///
/// assert_eq!(args.number("user_id"), Some(12345));
/// assert_eq!(args.text("action"), Some("view"));
/// assert!(args.bind("user_id", 1).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Args {
    /// Storage for (name, value) pairs, in binding order.
    inner: SmallVec<[(String, ArgValue); INLINE_ARGS]>,
}

impl Args {
    /// Creates a new empty capture set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a captured value to a name.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Configuration`] if the name is already bound.
    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> RouteResult<()> {
        let name = name.into();
        if self.get(&name).is_some() {
            return Err(RouteError::configuration(format!(
                "path variable '{name}' is already bound; use a different variable name"
            )));
        }
        self.inner.push((name, value.into()));
        Ok(())
    }

    /// Returns the capture for a name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.inner
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Returns the numeric capture for a name.
    #[must_use]
    pub fn number(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(ArgValue::as_number)
    }

    /// Returns the text capture for a name.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ArgValue::as_text)
    }

    /// Moves every capture from `other` into this set.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Configuration`] on the first name collision.
    pub fn merge(&mut self, other: Args) -> RouteResult<()> {
        for (name, value) in other.inner {
            self.bind(name, value)?;
        }
        Ok(())
    }

    /// Returns true if there are no captures.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of captures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns an iterator over the captures in binding order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl<'a> IntoIterator for &'a Args {
    type Item = (&'a str, &'a ArgValue);
    type IntoIter = std::iter::Map<
        std::slice::Iter<'a, (String, ArgValue)>,
        fn(&'a (String, ArgValue)) -> (&'a str, &'a ArgValue),
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter().map(|(n, v)| (n.as_str(), v))
    }
}
