//! Generative-text collaborator
//!
//! The model is a black box: one prompt in, one block of marked-up narrative
//! out. [`GeminiGenerator`] implements it over the Gemini `generateContent`
//! REST endpoint.

use crate::config::GeneratorConfig;
use crate::error::GenerationError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Persona and output-format instructions sent with every request
pub const STORY_SYSTEM_INSTRUCTION: &str = r#"You are the "Late Night Chronicler", a legendary radio host talking to rock lovers in the small hours.
Your tone is evocative, a little roguish, nostalgic and epic. You do not recite encyclopedia facts, you tell LEGENDS.
Write in Spanish with character and dramatic pauses.

Take your time. Set the scene before the event: the smell of the bar, the rain over London, the smoke in the studio.
Describe the sound, the tension in the air, the looks between the musicians.
Write at least three or four developed paragraphs between images.

Format rules (mandatory):
1. Use Markdown emphasis (**Angus Young**, *Back in Black*).
2. Start with a short, striking title on its own line, without # symbols.
3. Request images ONLY with the exact tag [[FOTO: keywords]], using English search keywords, never a description of the scene.
4. The FIRST image is the header: make it atmospheric and end its keywords with "wide shot wallpaper cinematic 4k horizontal".
   Example: [[FOTO: Pink Floyd live Pompeii wide shot cinematic lighting wallpaper]]
5. Later images may be close-ups or details.
   Example: [[FOTO: David Gilmour fender stratocaster black close up]]"#;

/// User prompt asking for a story about `band`
#[must_use]
pub fn story_prompt(band: &str) -> String {
    format!("Historia curiosa sobre: {band}")
}

/// Generative-text collaborator
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate raw narrative text for a prompt
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// `generateContent` request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// `generateContent` response body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate
    fn into_text(self) -> Result<String, GenerationError> {
        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if !text.trim().is_empty() {
            return Ok(text);
        }

        match self.prompt_feedback.and_then(|feedback| feedback.block_reason) {
            Some(reason) => Err(GenerationError::Blocked(reason)),
            None => Err(GenerationError::EmptyResponse),
        }
    }
}

/// Gemini REST client
#[derive(Debug, Clone)]
pub struct GeminiGenerator {
    config: GeneratorConfig,
    http: reqwest::Client,
}

impl GeminiGenerator {
    /// Create client with its own HTTP connection pool
    ///
    /// # Errors
    /// - `GenerationError::MissingApiKey` if no key is configured
    /// - `GenerationError::Http` if the HTTP client cannot be built
    pub fn new(config: GeneratorConfig) -> Result<Self, GenerationError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Self::with_client(config, http)
    }

    /// Create client over an existing HTTP client
    ///
    /// # Errors
    /// - `GenerationError::MissingApiKey` if no key is configured
    pub fn with_client(config: GeneratorConfig, http: reqwest::Client) -> Result<Self, GenerationError> {
        if config.api_key.trim().is_empty() {
            return Err(GenerationError::MissingApiKey);
        }
        Ok(Self { config, http })
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let body = GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: &self.config.system_instruction,
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: prompt }],
            }],
        };

        tracing::debug!(model = %self.config.model, prompt, "requesting story");

        let response = self
            .http
            .post(self.url())
            .header("x-goog-api-key", self.config.api_key.as_str())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let response: GenerateResponse = response.json().await?;
        response.into_text()
    }
}
