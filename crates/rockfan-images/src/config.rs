//! Resolver and search client configuration
//!
//! Both structs deserialize from TOML sections; every field has a default so
//! partial files are accepted.

use serde::{Deserialize, Serialize};

/// Default search endpoint (Google Custom Search JSON API)
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

/// Default placeholder template; `{seed}` is replaced by the query hash
pub const DEFAULT_PLACEHOLDER_TEMPLATE: &str = "https://picsum.photos/seed/{seed}/800/1200";

/// Size hint forwarded to the search API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    /// Icon-sized images
    Icon,
    /// Small images
    Small,
    /// Medium images
    Medium,
    /// Large images
    #[default]
    Large,
    /// Extra large images
    Xlarge,
    /// Double extra large images
    Xxlarge,
    /// Huge images
    Huge,
}

impl ImageSize {
    /// Wire value
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Icon => "icon",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Xlarge => "xlarge",
            Self::Xxlarge => "xxlarge",
            Self::Huge => "huge",
        }
    }
}

/// Safety filter forwarded to the search API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SafeSearch {
    /// Filter explicit results
    #[default]
    Active,
    /// No filtering
    Off,
}

impl SafeSearch {
    /// Wire value
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Off => "off",
        }
    }
}

/// Image resolver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Candidates requested per search call
    pub results_per_query: u8,
    /// Domains excluded from every search with `-site:`
    pub denied_domains: Vec<String>,
    /// Generic terms used by the relaxed fallback search
    pub generic_descriptors: Vec<String>,
    /// Accepted static image extensions (with dot)
    pub image_extensions: Vec<String>,
    /// Links must be strictly shorter than this many characters
    pub max_link_length: usize,
    /// Placeholder URL template containing `{seed}`
    pub placeholder_template: String,
    /// Size hint for every search
    pub image_size: ImageSize,
    /// Safety hint for every search
    pub safe_search: SafeSearch,
}

impl ResolverConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With denied domains
    #[inline]
    #[must_use]
    pub fn with_denied_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.denied_domains = domains.into_iter().map(Into::into).collect();
        self
    }

    /// With placeholder template
    #[inline]
    #[must_use]
    pub fn with_placeholder_template(mut self, template: impl Into<String>) -> Self {
        self.placeholder_template = template.into();
        self
    }

    /// Search-query fragment excluding every denied domain
    #[must_use]
    pub fn denylist_clause(&self) -> String {
        self.denied_domains
            .iter()
            .map(|domain| format!("-site:{domain}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            results_per_query: 10,
            denied_domains: [
                "tiktok.com",
                "instagram.com",
                "facebook.com",
                "pinterest.com",
                "youtube.com",
                "twitter.com",
                "shutterstock.com",
                "gettyimages.com",
                "alamy.com",
                "istockphoto.com",
                "dreamstime.com",
                "amazon.com",
                "ebay.com",
                "etsy.com",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            generic_descriptors: ["wallpaper", "live", "high quality"]
                .into_iter()
                .map(String::from)
                .collect(),
            image_extensions: [".jpg", ".jpeg", ".png", ".webp"]
                .into_iter()
                .map(String::from)
                .collect(),
            max_link_length: 400,
            placeholder_template: DEFAULT_PLACEHOLDER_TEMPLATE.to_string(),
            image_size: ImageSize::default(),
            safe_search: SafeSearch::default(),
        }
    }
}

/// Search client configuration
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// API endpoint
    pub endpoint: String,
    /// API key
    pub api_key: String,
    /// Search engine (scope) identifier
    pub search_engine_id: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl SearchConfig {
    /// Create configuration with credentials and defaults
    #[inline]
    #[must_use]
    pub fn new(api_key: impl Into<String>, search_engine_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            search_engine_id: search_engine_id.into(),
            ..Self::default()
        }
    }

    /// With endpoint
    #[inline]
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Whether both credentials are present
    #[inline]
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.search_engine_id.trim().is_empty()
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            api_key: String::new(),
            search_engine_id: String::new(),
            request_timeout_secs: 15,
        }
    }
}

impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("search_engine_id", &self.search_engine_id)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denylist_clause_prefixes_every_domain() {
        let config = ResolverConfig::new().with_denied_domains(["a.com", "b.org"]);
        assert_eq!(config.denylist_clause(), "-site:a.com -site:b.org");
    }

    #[test]
    fn empty_denylist_is_empty_clause() {
        let config = ResolverConfig::new().with_denied_domains(Vec::<String>::new());
        assert_eq!(config.denylist_clause(), "");
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = SearchConfig::new("secret-key", "cx");
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-key"));
        assert!(config.has_credentials());
        assert!(!SearchConfig::default().has_credentials());
    }
}
