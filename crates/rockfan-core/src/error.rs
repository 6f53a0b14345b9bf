//! Error types for rockfan Core
//!
//! Provides error handling for:
//! - Text generation failures (terminal for a story request)
//! - Preference store reads and writes
//! - Configuration loading
//!
//! Image resolution has no error type here: it always degrades to a
//! placeholder inside `rockfan-images`.

use std::path::PathBuf;

/// Main story error type
#[derive(Debug, thiserror::Error)]
pub enum StoryError {
    /// No favourite bands stored yet
    #[error("no favourite bands selected")]
    NoBandsSelected,

    /// Generative model failed
    #[error("story generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// Preferences could not be read
    #[error("preferences error: {0}")]
    Preferences(#[from] PreferencesError),
}

impl StoryError {
    /// Message suitable for the presentation layer
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NoBandsSelected => "You have not selected any favourite bands yet.".to_string(),
            other => format!("Error: {other}"),
        }
    }
}

/// Generative-text collaborator errors
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// No API key configured
    #[error("missing generator API key")]
    MissingApiKey,

    /// Transport or decoding failure
    #[error("generation request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API answered with a non-success status
    #[error("generation API returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// The prompt was blocked by the model's safety filters
    #[error("prompt blocked: {0}")]
    Blocked(String),

    /// The model answered without any text
    #[error("model returned no text")]
    EmptyResponse,

    /// Any other collaborator failure
    #[error("generation failed: {0}")]
    Other(String),
}

/// Preferences store errors
#[derive(Debug, thiserror::Error)]
pub enum PreferencesError {
    /// IO error on the preferences file
    #[error("io error on {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Stored preferences are not valid JSON
    #[error("corrupt preferences in {path}: {source}")]
    Decode {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// Preferences could not be serialized
    #[error("failed to encode preferences: {0}")]
    Encode(#[from] serde_json::Error),
}

impl PreferencesError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for the expected schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Marker tokens are unusable
    #[error("invalid marker syntax: {0}")]
    Marker(#[from] rockfan_segments::SegmentError),

    /// Semantically invalid value
    #[error("invalid config value: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_bands_message_is_friendly() {
        let message = StoryError::NoBandsSelected.user_message();
        assert!(message.contains("favourite bands"));
    }

    #[test]
    fn generation_message_is_prefixed() {
        let message = StoryError::from(GenerationError::EmptyResponse).user_message();
        assert_eq!(message, "Error: story generation failed: model returned no text");
    }
}
