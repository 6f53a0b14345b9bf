//! rockfan Core - story pipeline
//!
//! Wires the generative model, the segment parser and the image resolver
//! into one request:
//! - Picks a favourite band from the preferences store
//! - Asks the model for a marked-up story
//! - Extracts the title and parses the body into segments
//! - Resolves every image request concurrently, preserving order
//! - Publishes the outcome as a single observable state
//!
//! # Example
//!
//! ```rust,ignore
//! use rockfan_core::prelude::*;
//! use rockfan_images::{GoogleImageSearch, ImageResolver};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RockfanConfig::load("rockfan.toml".as_ref())?.with_env_overrides();
//!
//! let search = GoogleImageSearch::new(config.search.clone())?;
//! let resolver = ImageResolver::new(Arc::new(search), config.resolver.clone());
//! let pipeline = StoryPipeline::new(
//!     Arc::new(GeminiGenerator::new(config.generator.clone())?),
//!     Arc::new(resolver),
//!     Arc::new(FilePreferences::new(&config.preferences_path)),
//! );
//!
//! let story = pipeline.generate_story("Pink Floyd").await?;
//! println!("{}", story.title);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

// Core modules
pub mod catalog;
pub mod config;
pub mod error;
pub mod generator;
pub mod launcher;
pub mod preferences;
pub mod session;
pub mod story;

// Re-exports for convenience
pub use config::{CacheConfig, GeneratorConfig, RockfanConfig};
pub use error::{ConfigError, GenerationError, PreferencesError, StoryError};
pub use generator::{story_prompt, GeminiGenerator, TextGenerator, STORY_SYSTEM_INSTRUCTION};
pub use launcher::{LoggingLauncher, MediaLauncher, SpotifyLinks};
pub use preferences::{pick_band, FilePreferences, MemoryPreferences, Preferences, PreferencesStore};
pub use session::{StorySession, StoryState};
pub use story::{resolve_all, split_title, Story, StoryPipeline, DEFAULT_TITLE, RECOMMENDED_TRACK, SHARE_SIGNATURE};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with rockfan Core
    pub use crate::{
        FilePreferences, GeminiGenerator, MemoryPreferences, PreferencesStore, RockfanConfig,
        Story, StoryError, StoryPipeline, StorySession, StoryState, TextGenerator,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use async_trait::async_trait;
    use rockfan_images::{ImageResolver, ImageSearch, ResolverConfig, SearchCandidate, SearchError, SearchRequest};
    use rockfan_segments::Segment;
    use std::sync::Arc;

    struct FixedText(&'static str);

    #[async_trait]
    impl TextGenerator for FixedText {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
            Ok(self.0.to_string())
        }
    }

    struct Offline;

    #[async_trait]
    impl ImageSearch for Offline {
        async fn search(&self, _request: &SearchRequest) -> Result<Vec<SearchCandidate>, SearchError> {
            Err(SearchError::Other("offline".to_string()))
        }
    }

    fn pipeline(text: &'static str, bands: &[&str]) -> StoryPipeline {
        StoryPipeline::new(
            Arc::new(FixedText(text)),
            Arc::new(ImageResolver::new(Arc::new(Offline), ResolverConfig::default())),
            Arc::new(MemoryPreferences::with_bands(bands.iter().copied())),
        )
    }

    #[tokio::test]
    async fn offline_story_uses_placeholders() {
        let pipeline = pipeline("Titulo\nIntro.\n[[FOTO: stage]]\nOutro.", &["Muse"]);

        let story = pipeline.generate_daily_story().await.unwrap();

        assert_eq!(story.title, "Titulo");
        assert_eq!(story.band, "Muse");
        assert_eq!(story.segments.len(), 4);
        assert_eq!(story.recommended_track(), Some(("Muse", RECOMMENDED_TRACK)));
        assert!(matches!(
            &story.segments[1],
            Segment::ResolvedImage { url, description }
                if url.starts_with("https://picsum.photos/seed/") && description == "stage"
        ));
    }

    #[tokio::test]
    async fn session_reports_missing_bands() {
        let session = StorySession::new(pipeline("x", &[]));
        let mut rx = session.subscribe();

        let state = session.generate_daily().await;

        assert_eq!(state, StoryState::Error(StoryError::NoBandsSelected.user_message()));
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), state);
    }
}
