//! rockfan Segments
//!
//! Turns the free-form text returned by a generative model into an ordered
//! sequence of typed segments: narrative prose and pending image requests.
//!
//! # Marker syntax
//!
//! Image requests are embedded in the text as `[[FOTO: keywords]]`. The
//! keyword is matched case-insensitively and the captured keywords may span
//! line breaks. The literal tokens are configurable through [`MarkerSyntax`].
//!
//! # Example
//!
//! ```rust
//! use rockfan_segments::{parse, Segment};
//!
//! let segments = parse("Intro.\n\n[[FOTO: guitar close up]]\n\nOutro.");
//!
//! assert_eq!(
//!     segments,
//!     vec![
//!         Segment::text("Intro."),
//!         Segment::image_request("guitar close up"),
//!         Segment::text("Outro."),
//!     ]
//! );
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod emphasis;
pub mod error;
pub mod parser;
pub mod segment;

// Re-exports for convenience
pub use emphasis::{spans, Span};
pub use error::SegmentError;
pub use parser::{parse, render, MarkerSyntax, SegmentParser};
pub use segment::Segment;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn parse_then_render_keeps_order() {
        let text = "One.\n[[FOTO: a]]\nTwo.\n[[FOTO: b]]";
        let segments = parse(text);

        assert_eq!(segments.len(), 4);
        assert_eq!(render(&segments), "One.\n\n[[FOTO: a]]\n\nTwo.\n\n[[FOTO: b]]");
    }

    #[test]
    fn text_segments_feed_emphasis_spans() {
        let segments = parse("**Angus Young** toca.\n[[FOTO: angus]]");

        let Segment::Text { content } = &segments[0] else {
            panic!("expected text segment, got {:?}", segments[0]);
        };
        let spans = spans(content);
        assert!(spans[0].bold);
        assert_eq!(spans[0].text, "Angus Young");
    }
}
