//! rockfan configuration
//!
//! Loaded from a TOML file whose sections mirror the struct fields; every
//! section is optional. Credentials are normally supplied through the
//! environment, which overrides file values:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `ROCKFAN_GEMINI_API_KEY` | `generator.api_key` |
//! | `ROCKFAN_GEMINI_MODEL` | `generator.model` |
//! | `ROCKFAN_SEARCH_API_KEY` | `search.api_key` |
//! | `ROCKFAN_SEARCH_CX` | `search.search_engine_id` |
//! | `ROCKFAN_PREFERENCES` | `preferences_path` |

use crate::error::ConfigError;
use crate::generator::STORY_SYSTEM_INSTRUCTION;
use rockfan_images::{ResolverConfig, SearchConfig};
use rockfan_segments::{MarkerSyntax, SegmentParser};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default Gemini REST endpoint
pub const DEFAULT_GENERATOR_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default Gemini model
pub const DEFAULT_GENERATOR_MODEL: &str = "gemini-2.5-flash";

/// Generative model configuration
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// REST endpoint, without the model path
    pub endpoint: String,
    /// Model name
    pub model: String,
    /// API key
    pub api_key: String,
    /// System instruction sent with every prompt
    pub system_instruction: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl GeneratorConfig {
    /// With API key
    #[inline]
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// With endpoint
    #[inline]
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// With model
    #[inline]
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_GENERATOR_ENDPOINT.to_string(),
            model: DEFAULT_GENERATOR_MODEL.to_string(),
            api_key: String::new(),
            system_instruction: STORY_SYSTEM_INSTRUCTION.to_string(),
            request_timeout_secs: 60,
        }
    }
}

impl std::fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish_non_exhaustive()
    }
}

/// Resolution cache configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether resolved URLs are cached
    pub enabled: bool,
    /// Maximum cached entries
    pub capacity: u64,
    /// Entry time-to-live in seconds
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: 1_000,
            ttl_secs: 3_600,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RockfanConfig {
    /// Generative model
    pub generator: GeneratorConfig,
    /// Image search client
    pub search: SearchConfig,
    /// Image resolver heuristics
    pub resolver: ResolverConfig,
    /// Resolution cache
    pub cache: CacheConfig,
    /// Image marker tokens
    pub marker: MarkerSyntax,
    /// Preferences file
    pub preferences_path: PathBuf,
}

impl RockfanConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// - `ConfigError::Parse` on malformed TOML or mistyped fields
    /// - `ConfigError::Invalid` on out-of-range values
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// - `ConfigError::Io` if the file cannot be read
    /// - any error of [`RockfanConfig::from_toml_str`]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Apply overrides from the process environment
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    ///
    /// Blank values are ignored.
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(key) = get("ROCKFAN_GEMINI_API_KEY") {
            self.generator.api_key = key;
        }
        if let Some(model) = get("ROCKFAN_GEMINI_MODEL") {
            self.generator.model = model;
        }
        if let Some(key) = get("ROCKFAN_SEARCH_API_KEY") {
            self.search.api_key = key;
        }
        if let Some(cx) = get("ROCKFAN_SEARCH_CX") {
            self.search.search_engine_id = cx;
        }
        if let Some(path) = get("ROCKFAN_PREFERENCES") {
            self.preferences_path = PathBuf::from(path);
        }
        self
    }

    /// Build the segment parser for the configured marker syntax
    ///
    /// # Errors
    /// - `ConfigError::Marker` if a marker token is blank
    pub fn parser(&self) -> Result<SegmentParser, ConfigError> {
        Ok(SegmentParser::new(self.marker.clone())?)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// - `ConfigError::Marker` if a marker token is blank
    /// - `ConfigError::Invalid` describing the first bad value
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.parser()?;
        if !(1..=10).contains(&self.resolver.results_per_query) {
            return Err(ConfigError::Invalid(format!(
                "resolver.results_per_query must be within 1..=10, got {}",
                self.resolver.results_per_query
            )));
        }
        if self.resolver.image_extensions.is_empty() {
            return Err(ConfigError::Invalid(
                "resolver.image_extensions must not be empty".to_string(),
            ));
        }
        if !self.resolver.placeholder_template.contains("{seed}") {
            return Err(ConfigError::Invalid(
                "resolver.placeholder_template must contain {seed}".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for RockfanConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            search: SearchConfig::default(),
            resolver: ResolverConfig::default(),
            cache: CacheConfig::default(),
            marker: MarkerSyntax::default(),
            preferences_path: PathBuf::from(".rockfan/preferences.json"),
        }
    }
}
