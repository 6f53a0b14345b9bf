//! Error types for image search
//!
//! These errors never leave [`ImageResolver::resolve`](crate::ImageResolver::resolve):
//! the resolver logs them and treats the tier as having zero candidates.
//! They are public for callers that use an [`ImageSearch`](crate::ImageSearch)
//! client directly.

/// Errors from the image-search collaborator
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// API key or search engine id missing
    #[error("missing search credentials: {0}")]
    MissingCredentials(&'static str),

    /// Transport or decoding failure
    #[error("search request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API answered with a non-success status (quota, bad key, ...)
    #[error("search API returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, truncated
        body: String,
    },

    /// Any other collaborator failure
    #[error("search failed: {0}")]
    Other(String),
}

impl SearchError {
    /// Create status error, truncating long bodies
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        let mut body = body.into();
        if body.len() > 512 {
            let mut cut = 512;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }
        Self::Status { status, body }
    }
}
