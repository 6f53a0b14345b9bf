//! Testing utilities for rockfan workspace
//!
//! Shared fakes for the collaborator seams and story fixtures.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use rockfan_core::{GenerationError, MediaLauncher, TextGenerator};
use rockfan_images::{ImageSearch, SearchCandidate, SearchError, SearchRequest};
use std::time::Duration;

/// Story text in the generator's output format
pub fn sample_story_text() -> &'static str {
    "# La noche que el diablo afinó la guitarra\n\
     \n\
     [[FOTO: crossroads night wide shot wallpaper cinematic 4k horizontal]]\n\
     \n\
     Cuentan que esa noche hacía un frío que cortaba la respiración.\n\
     \n\
     [[FOTO: guitar close up 1930s]]\n\
     \n\
     Pero **Robert Johnson** no tenía miedo.\n"
}

/// Image search answering by query substring
///
/// Routes are checked in insertion order; the first route whose needle
/// occurs in the query wins. Unmatched queries get no candidates.
#[derive(Debug, Default)]
pub struct FakeImageSearch {
    routes: Vec<(String, Vec<SearchCandidate>)>,
    fail_on: Vec<String>,
    delay: Option<Duration>,
    queries: Mutex<Vec<String>>,
}

impl FakeImageSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer queries containing `needle` with `candidates`
    pub fn route(mut self, needle: &str, candidates: Vec<SearchCandidate>) -> Self {
        self.routes.push((needle.to_string(), candidates));
        self
    }

    /// Fail queries containing `needle`
    pub fn fail_on(mut self, needle: &str) -> Self {
        self.fail_on.push(needle.to_string());
        self
    }

    /// Sleep before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queries received so far
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl ImageSearch for FakeImageSearch {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchCandidate>, SearchError> {
        self.queries.lock().push(request.query.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_on.iter().any(|needle| request.query.contains(needle.as_str())) {
            return Err(SearchError::status(500, "scripted failure"));
        }

        Ok(self
            .routes
            .iter()
            .find(|(needle, _)| request.query.contains(needle.as_str()))
            .map(|(_, candidates)| candidates.clone())
            .unwrap_or_default())
    }
}

/// Generator returning a fixed outcome
#[derive(Debug)]
pub struct ScriptedGenerator {
    outcome: Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    /// Always answer with `text`
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            outcome: Ok(text.into()),
            prompts: Mutex::default(),
        }
    }

    /// Always fail with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
            prompts: Mutex::default(),
        }
    }

    /// Prompts received so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().push(prompt.to_string());
        self.outcome.clone().map_err(GenerationError::Other)
    }
}

/// Launcher recording what it was asked to open
#[derive(Debug, Default)]
pub struct RecordingLauncher {
    opened: Mutex<Vec<(String, String)>>,
}

impl RecordingLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(artist, track)` pairs opened so far
    pub fn opened(&self) -> Vec<(String, String)> {
        self.opened.lock().clone()
    }
}

impl MediaLauncher for RecordingLauncher {
    fn open(&self, artist: &str, track: &str) {
        self.opened.lock().push((artist.to_string(), track.to_string()));
    }
}

/// Candidate with a title, the usual shape of a search hit
pub fn candidate(link: &str, title: &str) -> SearchCandidate {
    SearchCandidate::new(link).with_title(title)
}
