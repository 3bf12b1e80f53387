//! Whole-path templates.
//!
//! A [`PathTemplate`] is an ordered list of [`SegmentPattern`]s matched
//! against an actual path segment-by-segment. Both sides are split on `/`
//! with the leading empty segment (from a leading separator) dropped; a
//! segment-count mismatch fails immediately, and a failure at any position
//! aborts the whole match with no partial bindings retained.

use arbor_core::{Args, RouteResult};

use crate::segment::SegmentPattern;

/// Splits a path into segments: the leading separator contributes nothing,
/// every other separator delimits a (possibly empty) segment. `/` and the
/// empty path have no segments.
pub(crate) fn path_segments(path: &str) -> Vec<&str> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed.split('/').collect()
    }
}

/// A parsed path pattern, e.g. `/users/#user_id/posts/$slug`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<SegmentPattern>,
}

impl PathTemplate {
    /// Parses a template from its textual form.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let segments = path_segments(path)
            .into_iter()
            .map(SegmentPattern::parse)
            .collect();
        Self {
            raw: path.to_string(),
            segments,
        }
    }

    /// The textual form this template was parsed from.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Matches an actual path against this template.
    ///
    /// Returns the captured variables on a match, `None` on a mismatch.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if two variable segments in this
    /// template bind the same name.
    pub fn matches(&self, path: &str) -> RouteResult<Option<Args>> {
        let actual = path_segments(path);
        if actual.len() != self.segments.len() {
            return Ok(None);
        }

        let mut args = Args::new();
        for (pattern, segment) in self.segments.iter().zip(actual.iter().copied()) {
            if !pattern.capture(segment, &mut args)? {
                return Ok(None);
            }
        }
        Ok(Some(args))
    }
}
