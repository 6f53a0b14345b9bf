//! Error types for segment parsing
//!
//! Parsing itself never fails: malformed markers are ordinary text. The only
//! fallible step is building a parser from custom marker tokens.

/// Errors raised while configuring a [`SegmentParser`](crate::SegmentParser)
#[derive(Debug, thiserror::Error)]
pub enum SegmentError {
    /// One of the marker tokens is empty
    #[error("invalid marker syntax: {field} must not be empty")]
    InvalidMarker {
        /// Name of the offending token
        field: &'static str,
    },

    /// The assembled marker pattern failed to compile
    #[error("marker pattern failed to compile: {0}")]
    Pattern(#[from] regex::Error),
}

impl SegmentError {
    /// Create an empty-token error
    #[inline]
    #[must_use]
    pub fn invalid_marker(field: &'static str) -> Self {
        Self::InvalidMarker { field }
    }
}
