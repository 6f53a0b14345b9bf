//! Inline emphasis spans
//!
//! Generated prose uses markdown emphasis (`**Angus Young**`,
//! `*Back in Black*`). Clients without a markdown renderer can style a text
//! segment from the flat span list produced here. Block structure is reduced
//! to line breaks; only bold and italic survive as styling.

use pulldown_cmark::{Event, Parser as MdParser, Tag, TagEnd};
use serde::{Deserialize, Serialize};

/// A run of text sharing one style
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Span text
    pub text: String,
    /// Inside `**strong**` emphasis
    pub bold: bool,
    /// Inside `*regular*` emphasis
    pub italic: bool,
}

impl Span {
    /// Create unstyled span
    #[inline]
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
        }
    }

    fn same_style(&self, bold: bool, italic: bool) -> bool {
        self.bold == bold && self.italic == italic
    }
}

/// Split prose into styled spans
///
/// Adjacent runs with the same style are merged, and paragraphs are
/// separated by a blank line.
#[must_use]
pub fn spans(text: &str) -> Vec<Span> {
    let mut builder = SpanBuilder::default();

    for event in MdParser::new(text) {
        match event {
            Event::Start(Tag::Strong) => builder.strong += 1,
            Event::End(TagEnd::Strong) => builder.strong = builder.strong.saturating_sub(1),
            Event::Start(Tag::Emphasis) => builder.emphasis += 1,
            Event::End(TagEnd::Emphasis) => builder.emphasis = builder.emphasis.saturating_sub(1),
            Event::Text(text) | Event::Code(text) | Event::InlineHtml(text) => builder.push(&text),
            Event::SoftBreak | Event::HardBreak => builder.push("\n"),
            Event::End(TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item) => {
                builder.pending_break = true;
            }
            _ => {}
        }
    }

    builder.spans
}

#[derive(Default)]
struct SpanBuilder {
    spans: Vec<Span>,
    strong: usize,
    emphasis: usize,
    pending_break: bool,
}

impl SpanBuilder {
    fn push(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if std::mem::take(&mut self.pending_break) && !self.spans.is_empty() {
            self.append("\n\n", false, false);
        }
        self.append(text, self.strong > 0, self.emphasis > 0);
    }

    fn append(&mut self, text: &str, bold: bool, italic: bool) {
        match self.spans.last_mut() {
            Some(last) if last.same_style(bold, italic) => last.text.push_str(text),
            _ => self.spans.push(Span {
                text: text.to_string(),
                bold,
                italic,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn span(text: &str, bold: bool, italic: bool) -> Span {
        Span {
            text: text.to_string(),
            bold,
            italic,
        }
    }

    #[test]
    fn bold_and_italic() {
        let result = spans("Con **Angus Young** y *Back in Black*.");

        assert_eq!(
            result,
            vec![
                span("Con ", false, false),
                span("Angus Young", true, false),
                span(" y ", false, false),
                span("Back in Black", false, true),
                span(".", false, false),
            ]
        );
    }

    #[test]
    fn nested_emphasis_sets_both_flags() {
        let result = spans("***Thunderstruck***");
        assert_eq!(result, vec![span("Thunderstruck", true, true)]);
    }

    #[test]
    fn unmatched_delimiters_stay_literal() {
        let result = spans("a **b");
        assert_eq!(result, vec![Span::plain("a **b")]);
    }

    #[test]
    fn paragraphs_are_separated() {
        let result = spans("first\n\nsecond");
        assert_eq!(result, vec![Span::plain("first\n\nsecond")]);
    }

    #[test]
    fn empty_text_has_no_spans() {
        assert!(spans("").is_empty());
    }
}
