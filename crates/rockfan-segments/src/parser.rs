//! Marker-driven segment parser
//!
//! Scans generated text once, left to right, for non-overlapping,
//! non-greedy image markers and splits it into [`Segment`]s:
//!
//! ```text
//! "Intro.\n\n[[FOTO: guitar close up]]\n\nOutro."
//!     → Text("Intro.") · ImageRequest("guitar close up") · Text("Outro.")
//! ```
//!
//! An opening token without its closing token never matches and is kept as
//! ordinary text.

use crate::error::SegmentError;
use crate::segment::Segment;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Parser for the default `[[FOTO: …]]` syntax
static DEFAULT_PARSER: Lazy<SegmentParser> = Lazy::new(SegmentParser::default);

/// Literal tokens delimiting an image marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerSyntax {
    /// Opening token, e.g. `[[`
    pub open: String,
    /// Keyword, matched case-insensitively, e.g. `FOTO`
    pub keyword: String,
    /// Closing token, e.g. `]]`
    pub close: String,
}

impl MarkerSyntax {
    /// Create marker syntax from its three literal tokens
    #[inline]
    #[must_use]
    pub fn new(open: impl Into<String>, keyword: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            keyword: keyword.into(),
            close: close.into(),
        }
    }

    /// Regex matching one marker, capturing its content in group 1
    fn pattern(&self) -> Result<String, SegmentError> {
        for (field, value) in [
            ("open", &self.open),
            ("keyword", &self.keyword),
            ("close", &self.close),
        ] {
            if value.trim().is_empty() {
                return Err(SegmentError::invalid_marker(field));
            }
        }

        Ok(format!(
            r"(?s){}(?i:{}):\s*(.*?){}",
            regex::escape(&self.open),
            regex::escape(&self.keyword),
            regex::escape(&self.close),
        ))
    }

    /// Format `content` as a marker
    #[must_use]
    pub fn wrap(&self, content: &str) -> String {
        format!("{}{}: {}{}", self.open, self.keyword, content, self.close)
    }
}

impl Default for MarkerSyntax {
    fn default() -> Self {
        Self::new("[[", "FOTO", "]]")
    }
}

/// Segment parser bound to one marker syntax
#[derive(Debug, Clone)]
pub struct SegmentParser {
    syntax: MarkerSyntax,
    marker: Regex,
}

impl SegmentParser {
    /// Create parser for custom marker tokens
    ///
    /// # Errors
    /// - `SegmentError::InvalidMarker` if any token is blank
    pub fn new(syntax: MarkerSyntax) -> Result<Self, SegmentError> {
        let marker = Regex::new(&syntax.pattern()?)?;
        Ok(Self { syntax, marker })
    }

    /// Marker syntax this parser recognises
    #[inline]
    #[must_use]
    pub fn syntax(&self) -> &MarkerSyntax {
        &self.syntax
    }

    /// Split `text` into ordered segments
    #[must_use]
    pub fn parse(&self, text: &str) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut last_end = 0;

        for captures in self.marker.captures_iter(text) {
            let (Some(whole), Some(content)) = (captures.get(0), captures.get(1)) else {
                continue;
            };

            push_text(&mut segments, &text[last_end..whole.start()]);
            segments.push(Segment::image_request(clean_query(content.as_str())));

            last_end = whole.end();
        }

        push_text(&mut segments, &text[last_end..]);
        segments
    }

    /// Rebuild marker text from segments
    ///
    /// Resolved images are written back as markers carrying their
    /// description. Track segments have no textual form and are skipped.
    #[must_use]
    pub fn render(&self, segments: &[Segment]) -> String {
        segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Text { content } => Some(content.clone()),
                Segment::ImageRequest { query } => Some(self.syntax.wrap(query)),
                Segment::ResolvedImage { description, .. } => Some(self.syntax.wrap(description)),
                Segment::Track { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Default for SegmentParser {
    fn default() -> Self {
        let syntax = MarkerSyntax::default();
        let marker = Regex::new(r"(?s)\[\[(?i:FOTO):\s*(.*?)\]\]")
            .expect("default marker pattern is valid");
        Self { syntax, marker }
    }
}

/// Parse `text` with the default `[[FOTO: …]]` syntax
#[must_use]
pub fn parse(text: &str) -> Vec<Segment> {
    DEFAULT_PARSER.parse(text)
}

/// Render segments with the default `[[FOTO: …]]` syntax
#[must_use]
pub fn render(segments: &[Segment]) -> String {
    DEFAULT_PARSER.render(segments)
}

fn push_text(segments: &mut Vec<Segment>, raw: &str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        segments.push(Segment::text(trimmed));
    }
}

/// Trim captured keywords and fold line breaks into single spaces
fn clean_query(raw: &str) -> String {
    raw.split(['\r', '\n'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
