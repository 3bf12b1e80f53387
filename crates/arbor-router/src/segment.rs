//! Path-segment patterns.
//!
//! A pattern is one of three kinds, tried in a fixed priority at any single
//! segment position: literal (exact match), numeric variable (`#name`,
//! matches whole base-10 numbers only), string variable (`$name`, matches
//! any non-separator content).

use arbor_core::{Args, RouteResult};

/// One segment of a path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentPattern {
    /// Exact match against the segment text.
    Literal(String),
    /// `#name`: matches a base-10 number, binding it under `name`.
    Number(String),
    /// `$name`: matches any non-separator content, binding it under `name`.
    Text(String),
}

impl SegmentPattern {
    /// Parses a raw pattern segment by its marker prefix.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if let Some(name) = raw.strip_prefix('#') {
            Self::Number(name.to_string())
        } else if let Some(name) = raw.strip_prefix('$') {
            Self::Text(name.to_string())
        } else {
            Self::Literal(raw.to_string())
        }
    }

    /// Returns the variable name, if this pattern binds one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Literal(_) => None,
            Self::Number(name) | Self::Text(name) => Some(name),
        }
    }

    /// Tries this pattern against an actual segment, binding a capture on
    /// variable match.
    ///
    /// Returns `Ok(false)` on a plain mismatch. Returns an error only for a
    /// binding-name collision, which is a configuration fault rather than a
    /// mismatch.
    pub fn capture(&self, actual: &str, args: &mut Args) -> RouteResult<bool> {
        match self {
            Self::Literal(literal) => Ok(literal == actual),
            Self::Number(name) => match actual.parse::<i64>() {
                Ok(value) => {
                    args.bind(name.clone(), value)?;
                    Ok(true)
                }
                Err(_) => Ok(false),
            },
            Self::Text(name) => {
                args.bind(name.clone(), actual)?;
                Ok(true)
            }
        }
    }
}

impl std::fmt::Display for SegmentPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal(literal) => f.write_str(literal),
            Self::Number(name) => write!(f, "#{name}"),
            Self::Text(name) => write!(f, "${name}"),
        }
    }
}
