//! Property tests for the segment parser

use proptest::prelude::*;
use rockfan_segments::{parse, render, Segment};

/// Prose that cannot form or break a marker
fn prose() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,!\n]{0,60}"
}

/// Marker content without brackets or line breaks
fn keywords() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,30}"
}

proptest! {
    #[test]
    fn prop_markerless_text_is_one_trimmed_segment(text in prose()) {
        let segments = parse(&text);
        let trimmed = text.trim();

        if trimmed.is_empty() {
            prop_assert!(segments.is_empty());
        } else {
            prop_assert_eq!(segments, vec![Segment::text(trimmed)]);
        }
    }

    #[test]
    fn prop_single_marker_layout(
        before in prose(),
        query in keywords(),
        after in prose(),
    ) {
        let text = format!("{before}[[FOTO: {query}]]{after}");
        let segments = parse(&text);

        let mut expected = Vec::new();
        if !before.trim().is_empty() {
            expected.push(Segment::text(before.trim()));
        }
        expected.push(Segment::image_request(query.trim()));
        if !after.trim().is_empty() {
            expected.push(Segment::text(after.trim()));
        }

        prop_assert_eq!(segments, expected);
    }

    #[test]
    fn prop_reparse_of_render_is_stable(
        parts in proptest::collection::vec((prose(), keywords()), 0..6),
        tail in prose(),
    ) {
        let mut text = String::new();
        for (prose, query) in &parts {
            text.push_str(prose);
            text.push_str(&format!("[[foto:{query}]]"));
        }
        text.push_str(&tail);

        let first = parse(&text);
        let second = parse(&render(&first));

        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_parse_is_deterministic(text in ".{0,120}") {
        prop_assert_eq!(parse(&text), parse(&text));
    }
}

#[test]
fn marker_count_matches_image_requests() {
    let text = "[[FOTO: a]] x [[FOTO: b]] y [[FOTO: c]]";
    let pending = parse(text).iter().filter(|s| s.is_pending()).count();
    assert_eq!(pending, 3);
}
