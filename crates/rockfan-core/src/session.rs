//! Observable story state
//!
//! A [`StorySession`] owns the single state a presentation layer renders and
//! publishes every transition on a `watch` channel:
//!
//! ```text
//! Idle ──► Loading ──► Success(story)
//!             │
//!             └──────► Error(message)
//! ```

use crate::error::StoryError;
use crate::story::{Story, StoryPipeline};
use tokio::sync::watch;

/// What the presentation layer shows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StoryState {
    /// Nothing requested yet
    #[default]
    Idle,
    /// A request is running
    Loading,
    /// The last request produced a story
    Success(Story),
    /// The last request failed; user-facing message
    Error(String),
}

impl StoryState {
    /// Whether a request is running
    #[inline]
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Story of a successful request
    #[inline]
    #[must_use]
    pub fn story(&self) -> Option<&Story> {
        match self {
            Self::Success(story) => Some(story),
            _ => None,
        }
    }
}

/// Drives a [`StoryPipeline`] and publishes its state
#[derive(Debug)]
pub struct StorySession {
    pipeline: StoryPipeline,
    state: watch::Sender<StoryState>,
}

impl StorySession {
    /// Create idle session
    #[must_use]
    pub fn new(pipeline: StoryPipeline) -> Self {
        let (state, _) = watch::channel(StoryState::Idle);
        Self { pipeline, state }
    }

    /// Subscribe to state changes
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<StoryState> {
        self.state.subscribe()
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> StoryState {
        self.state.borrow().clone()
    }

    /// Generate a story about a random favourite band
    pub async fn generate_daily(&self) -> StoryState {
        self.state.send_replace(StoryState::Loading);
        let result = self.pipeline.generate_daily_story().await;
        self.finish(result)
    }

    /// Generate a story about `band`
    pub async fn generate_for(&self, band: &str) -> StoryState {
        self.state.send_replace(StoryState::Loading);
        let result = self.pipeline.generate_story(band).await;
        self.finish(result)
    }

    fn finish(&self, result: Result<Story, StoryError>) -> StoryState {
        let state = match result {
            Ok(story) => StoryState::Success(story),
            Err(e) => {
                tracing::warn!(error = %e, "story request failed");
                StoryState::Error(e.user_message())
            }
        };
        self.state.send_replace(state.clone());
        state
    }
}
