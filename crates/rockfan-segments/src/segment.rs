//! Segment data model
//!
//! A story is an ordered list of segments. Order dictates presentation and is
//! never changed after parsing; the only permitted transition is
//! [`Segment::ImageRequest`] to [`Segment::ResolvedImage`].

use serde::{Deserialize, Serialize};

/// One atomic unit of narrative content
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    /// A contiguous block of narrative prose
    Text {
        /// Trimmed prose, may contain inline markdown emphasis
        content: String,
    },

    /// An unresolved instruction to find an image matching `query`
    ImageRequest {
        /// Search keywords captured from the marker
        query: String,
    },

    /// A resolved image
    ResolvedImage {
        /// Image URL (search hit or placeholder)
        url: String,
        /// The query the image was resolved from
        description: String,
    },

    /// A track suggestion for the external media player
    ///
    /// Never produced by the parser; callers append it when they have one.
    Track {
        /// Performing artist
        artist: String,
        /// Track title
        track: String,
        /// Optional cover art URL
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cover_url: Option<String>,
    },
}

impl Segment {
    /// Create text segment
    #[inline]
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    /// Create image request segment
    #[inline]
    #[must_use]
    pub fn image_request(query: impl Into<String>) -> Self {
        Self::ImageRequest {
            query: query.into(),
        }
    }

    /// Create resolved image segment
    #[inline]
    #[must_use]
    pub fn resolved_image(url: impl Into<String>, description: impl Into<String>) -> Self {
        Self::ResolvedImage {
            url: url.into(),
            description: description.into(),
        }
    }

    /// Whether this segment still awaits image resolution
    #[inline]
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::ImageRequest { .. })
    }

    /// Query of a pending image request
    #[inline]
    #[must_use]
    pub fn pending_query(&self) -> Option<&str> {
        match self {
            Self::ImageRequest { query } => Some(query),
            _ => None,
        }
    }

    /// Transition an image request into a resolved image
    ///
    /// Segments other than [`Segment::ImageRequest`] are returned unchanged,
    /// so resolving twice is a no-op.
    #[must_use]
    pub fn resolve(self, url: impl Into<String>) -> Self {
        match self {
            Self::ImageRequest { query } => Self::ResolvedImage {
                url: url.into(),
                description: query,
            },
            other => other,
        }
    }
}
