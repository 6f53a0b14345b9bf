//! Story pipeline
//!
//! One request runs:
//!
//! ```text
//! prompt ──► TextGenerator ──► split_title ──► parse ──► resolve images ──► + Track ──► Story
//!                                                          (concurrent)
//! ```
//!
//! Every `ImageRequest` segment is resolved as an independent future and the
//! results are gathered back into their original positions. Resolution never
//! fails, so only generation or preference errors end a request. A finished
//! story ends with a recommended track by its band, using the first image as
//! cover art.

use crate::error::StoryError;
use crate::generator::{story_prompt, TextGenerator};
use crate::launcher::MediaLauncher;
use crate::preferences::{pick_band, PreferencesStore};
use futures::future::join_all;
use rockfan_images::ImageResolver;
use rockfan_segments::{Segment, SegmentParser};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Title used when the generated text has none
pub const DEFAULT_TITLE: &str = "Rock Story";

/// Signature appended to shared stories
pub const SHARE_SIGNATURE: &str = "🎸 _Generado por My Rock Fan App_";

/// Track title recommended at the end of every story
pub const RECOMMENDED_TRACK: &str = "Greatest Hits";

/// One generated story
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    /// Story title
    pub title: String,
    /// Band the story is about
    pub band: String,
    /// Ordered story content
    pub segments: Vec<Segment>,
}

impl Story {
    /// Image URLs in story order
    pub fn image_urls(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::ResolvedImage { url, .. } => Some(url.as_str()),
            _ => None,
        })
    }

    /// `(artist, track)` of the recommended track, if the story has one
    #[must_use]
    pub fn recommended_track(&self) -> Option<(&str, &str)> {
        self.segments.iter().rev().find_map(|segment| match segment {
            Segment::Track { artist, track, .. } => Some((artist.as_str(), track.as_str())),
            _ => None,
        })
    }

    /// Open the recommended track; `false` when there is none
    pub fn play(&self, launcher: &dyn MediaLauncher) -> bool {
        let Some((artist, track)) = self.recommended_track() else {
            return false;
        };
        tracing::info!(artist, track, "opening recommended track");
        launcher.open(artist, track);
        true
    }

    /// Plain-text rendition for sharing: italic title, text paragraphs, signature
    ///
    /// Images are left out.
    #[must_use]
    pub fn share_text(&self) -> String {
        let mut out = format!("*{}*\n\n", self.title);
        for segment in &self.segments {
            if let Segment::Text { content } = segment {
                out.push_str(content.trim());
                out.push_str("\n\n");
            }
        }
        out.push_str(SHARE_SIGNATURE);
        out
    }
}

/// Split generated text into its title and body
///
/// Blank lines are dropped. The title is the first line that does not start
/// with `marker_open`, with `#` removed; that line is removed from the body.
#[must_use]
pub fn split_title(raw: &str, marker_open: &str) -> (String, String) {
    let lines: Vec<&str> = raw.lines().filter(|line| !line.trim().is_empty()).collect();

    let title_index = lines
        .iter()
        .position(|line| !line.trim_start().starts_with(marker_open));

    let title = title_index
        .map(|i| lines[i].replace('#', "").trim().to_string())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

    let body = lines
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != title_index)
        .map(|(_, line)| *line)
        .collect::<Vec<_>>()
        .join("\n");

    (title, body)
}

/// Resolve every pending image concurrently, keeping segment order
///
/// Non-image segments pass through untouched.
pub async fn resolve_all(resolver: &ImageResolver, segments: Vec<Segment>, context: &str) -> Vec<Segment> {
    let pending = segments.iter().filter(|segment| segment.is_pending()).count();
    tracing::debug!(segments = segments.len(), pending, "resolving images");

    join_all(segments.into_iter().map(|segment| async move {
        let Some(query) = segment.pending_query().map(str::to_owned) else {
            return segment;
        };
        let url = resolver.resolve(&query, context).await;
        segment.resolve(url)
    }))
    .await
}

/// Track segment for `band`, with the first resolved image as cover
fn recommended_track(band: &str, segments: &[Segment]) -> Segment {
    let cover_url = segments.iter().find_map(|segment| match segment {
        Segment::ResolvedImage { url, .. } => Some(url.clone()),
        _ => None,
    });
    Segment::Track {
        artist: band.to_string(),
        track: RECOMMENDED_TRACK.to_string(),
        cover_url,
    }
}

/// Generation, parsing and resolution wired together
#[derive(Clone)]
pub struct StoryPipeline {
    generator: Arc<dyn TextGenerator>,
    resolver: Arc<ImageResolver>,
    preferences: Arc<dyn PreferencesStore>,
    parser: SegmentParser,
}

impl std::fmt::Debug for StoryPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoryPipeline")
            .field("resolver", &self.resolver)
            .field("parser", &self.parser)
            .finish_non_exhaustive()
    }
}

impl StoryPipeline {
    /// Create pipeline with the default marker syntax
    #[must_use]
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        resolver: Arc<ImageResolver>,
        preferences: Arc<dyn PreferencesStore>,
    ) -> Self {
        Self {
            generator,
            resolver,
            preferences,
            parser: SegmentParser::default(),
        }
    }

    /// With segment parser
    #[inline]
    #[must_use]
    pub fn with_parser(mut self, parser: SegmentParser) -> Self {
        self.parser = parser;
        self
    }

    /// Preferences store
    #[inline]
    #[must_use]
    pub fn preferences(&self) -> &Arc<dyn PreferencesStore> {
        &self.preferences
    }

    /// Generate a story about `band`
    ///
    /// # Errors
    /// - `StoryError::Generation` if the generative model fails
    pub async fn generate_story(&self, band: &str) -> Result<Story, StoryError> {
        let band = band.trim();
        tracing::info!(band, "generating story");

        let raw = self.generator.generate(&story_prompt(band)).await?;
        let (title, body) = split_title(&raw, &self.parser.syntax().open);
        let segments = self.parser.parse(&body);
        let mut segments = resolve_all(&self.resolver, segments, band).await;
        segments.push(recommended_track(band, &segments));

        tracing::info!(band, %title, segments = segments.len(), "story ready");

        Ok(Story {
            title,
            band: band.to_string(),
            segments,
        })
    }

    /// Generate a story about a random favourite band
    ///
    /// # Errors
    /// - `StoryError::NoBandsSelected` if no favourite bands are stored
    /// - `StoryError::Preferences` if preferences cannot be read
    /// - `StoryError::Generation` if the generative model fails
    pub async fn generate_daily_story(&self) -> Result<Story, StoryError> {
        let bands = self.preferences.selected_bands().await?;
        let band = pick_band(&bands, &mut rand::rng()).ok_or(StoryError::NoBandsSelected)?;
        self.generate_story(&band).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MARKER: &str = "[[";

    #[test]
    fn title_is_first_prose_line() {
        let (title, body) = split_title("# El diablo\n\nIntro.\n[[FOTO: x]]\nOutro.", MARKER);
        assert_eq!(title, "El diablo");
        assert_eq!(body, "Intro.\n[[FOTO: x]]\nOutro.");
    }

    #[test]
    fn leading_image_is_kept_in_body() {
        let (title, body) = split_title("  [[FOTO: header]]\nLa noche\nTexto.", MARKER);
        assert_eq!(title, "La noche");
        assert_eq!(body, "  [[FOTO: header]]\nTexto.");
    }

    #[test]
    fn default_title() {
        assert_eq!(split_title("", MARKER), (DEFAULT_TITLE.to_string(), String::new()));
        assert_eq!(
            split_title("[[FOTO: a]]\n[[FOTO: b]]", MARKER),
            (DEFAULT_TITLE.to_string(), "[[FOTO: a]]\n[[FOTO: b]]".to_string())
        );
        assert_eq!(split_title("###\nBody", MARKER).0, DEFAULT_TITLE);
    }

    #[test]
    fn share_text_skips_images() {
        let story = Story {
            title: "Noche".into(),
            band: "Muse".into(),
            segments: vec![
                Segment::text(" Uno "),
                Segment::resolved_image("https://x.com/a.jpg", "a"),
                Segment::text("Dos"),
            ],
        };

        assert_eq!(story.share_text(), format!("*Noche*\n\nUno\n\nDos\n\n{SHARE_SIGNATURE}"));
        assert_eq!(story.image_urls().collect::<Vec<_>>(), vec!["https://x.com/a.jpg"]);
    }

    #[test]
    fn track_takes_first_image_as_cover() {
        let segments = vec![
            Segment::text("Intro"),
            Segment::resolved_image("https://x.com/1.jpg", "one"),
            Segment::resolved_image("https://x.com/2.jpg", "two"),
        ];

        assert_eq!(
            recommended_track("Rush", &segments),
            Segment::Track {
                artist: "Rush".into(),
                track: RECOMMENDED_TRACK.into(),
                cover_url: Some("https://x.com/1.jpg".into()),
            }
        );
        assert!(matches!(
            recommended_track("Rush", &[Segment::text("Solo texto")]),
            Segment::Track { cover_url: None, .. }
        ));
    }

    #[test]
    fn play_without_track() {
        struct Refuse;
        impl MediaLauncher for Refuse {
            fn open(&self, _: &str, _: &str) {
                panic!("nothing to open");
            }
        }

        let story = Story {
            title: "Noche".into(),
            band: "Muse".into(),
            segments: vec![Segment::text("Uno")],
        };

        assert_eq!(story.recommended_track(), None);
        assert!(!story.play(&Refuse));
    }
}
