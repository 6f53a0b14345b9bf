//! Image-search collaborator
//!
//! [`ImageSearch`] is the seam between the resolver and the outside world.
//! [`GoogleImageSearch`] talks to the Custom Search JSON API; tests plug in
//! scripted fakes.

use crate::config::{ImageSize, SafeSearch, SearchConfig};
use crate::error::SearchError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One ranked search result
///
/// Transient: exists only while one image request is being resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCandidate {
    /// Direct image link
    pub link: String,
    /// Result title
    #[serde(default)]
    pub title: Option<String>,
    /// Result snippet
    #[serde(default)]
    pub snippet: Option<String>,
}

impl SearchCandidate {
    /// Create candidate with link only
    #[inline]
    #[must_use]
    pub fn new(link: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            title: None,
            snippet: None,
        }
    }

    /// With title
    #[inline]
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// With snippet
    #[inline]
    #[must_use]
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }
}

/// One search call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Full query string, including any `-site:` exclusions
    pub query: String,
    /// Number of ranked candidates wanted
    pub count: u8,
    /// Size hint
    pub image_size: ImageSize,
    /// Safety hint
    pub safe_search: SafeSearch,
}

/// Image-search collaborator
///
/// Implementations return candidates in the engine's own relevance order.
#[async_trait]
pub trait ImageSearch: Send + Sync {
    /// Run one search
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchCandidate>, SearchError>;
}

/// Custom Search JSON API response body
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchCandidate>,
}

/// Google Custom Search image client
///
/// Holds its own HTTP client; construct once and share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct GoogleImageSearch {
    config: SearchConfig,
    http: reqwest::Client,
}

impl GoogleImageSearch {
    /// Create client with its own HTTP connection pool
    ///
    /// # Errors
    /// - `SearchError::MissingCredentials` if key or engine id is blank
    /// - `SearchError::Http` if the HTTP client cannot be built
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Self::with_client(config, http)
    }

    /// Create client over an existing HTTP client
    ///
    /// # Errors
    /// - `SearchError::MissingCredentials` if key or engine id is blank
    pub fn with_client(config: SearchConfig, http: reqwest::Client) -> Result<Self, SearchError> {
        if config.api_key.trim().is_empty() {
            return Err(SearchError::MissingCredentials("api_key"));
        }
        if config.search_engine_id.trim().is_empty() {
            return Err(SearchError::MissingCredentials("search_engine_id"));
        }
        Ok(Self { config, http })
    }

    /// Client configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}

#[async_trait]
impl ImageSearch for GoogleImageSearch {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchCandidate>, SearchError> {
        // The API caps `num` at 10.
        let num = request.count.clamp(1, 10).to_string();

        let response = self
            .http
            .get(&self.config.endpoint)
            .query(&[
                ("key", self.config.api_key.as_str()),
                ("cx", self.config.search_engine_id.as_str()),
                ("q", request.query.as_str()),
                ("searchType", "image"),
                ("num", num.as_str()),
                ("imgSize", request.image_size.as_str()),
                ("safe", request.safe_search.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::status(status.as_u16(), body));
        }

        let body: SearchResponse = response.json().await?;
        tracing::debug!(query = %request.query, results = body.items.len(), "search answered");
        Ok(body.items)
    }
}
