//! Two-tier image resolver
//!
//! ```text
//! query ──► tier 1: "<context> <query> <denylist>"      strict identity gate
//!              │ nothing passed
//!              ▼
//!           tier 2: "<context> <descriptors> <denylist>" relaxed identity gate
//!              │ nothing passed
//!              ▼
//!           placeholder(hash(query))
//! ```
//!
//! Search errors are logged and count as an empty tier; `resolve` always
//! returns a usable URL.

use crate::cache::ResolutionCache;
use crate::config::ResolverConfig;
use crate::placeholder::placeholder_url;
use crate::search::{ImageSearch, SearchRequest};
use crate::validation::{CandidateValidator, ContextTokens, MatchMode};
use std::sync::Arc;

/// Where a resolved URL came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionSource {
    /// Served from the resolution cache
    Cache,
    /// Strict contextual search
    Strict,
    /// Relaxed fallback search
    Relaxed,
    /// Deterministic placeholder
    Placeholder,
}

/// Resolved URL with its provenance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Image URL
    pub url: String,
    /// Which step produced it
    pub source: ResolutionSource,
}

/// Resolves image requests to URLs
pub struct ImageResolver {
    search: Arc<dyn ImageSearch>,
    config: ResolverConfig,
    validator: CandidateValidator,
    cache: Option<ResolutionCache>,
}

impl std::fmt::Debug for ImageResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageResolver")
            .field("config", &self.config)
            .field("cached", &self.cache.is_some())
            .finish_non_exhaustive()
    }
}

impl ImageResolver {
    /// Create resolver over a search collaborator
    #[must_use]
    pub fn new(search: Arc<dyn ImageSearch>, config: ResolverConfig) -> Self {
        let validator = CandidateValidator::new(&config);
        Self {
            search,
            config,
            validator,
            cache: None,
        }
    }

    /// With resolution cache
    #[inline]
    #[must_use]
    pub fn with_cache(mut self, cache: ResolutionCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Resolver configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve `query` to an image URL; never fails
    ///
    /// `context` holds identity keywords (typically the band name) and may
    /// be empty.
    pub async fn resolve(&self, query: &str, context: &str) -> String {
        self.resolve_detailed(query, context).await.url
    }

    /// Resolve and report which step produced the URL
    pub async fn resolve_detailed(&self, query: &str, context: &str) -> Resolution {
        let query = query.trim();
        let context = context.trim();

        if query.is_empty() {
            tracing::debug!("blank image query, using placeholder");
            return self.placeholder(query);
        }

        if let Some(cache) = &self.cache {
            if let Some(url) = cache.get(query, context).await {
                tracing::debug!(query, %url, "image served from cache");
                return Resolution {
                    url,
                    source: ResolutionSource::Cache,
                };
            }
        }

        let tokens = ContextTokens::new(context);

        let strict_query = self.strict_query(query, context);
        if let Some(url) = self.run_tier(&strict_query, &tokens, MatchMode::Strict).await {
            return self.remember(query, context, url, ResolutionSource::Strict).await;
        }

        let relaxed_query = self.relaxed_query(context);
        if let Some(url) = self.run_tier(&relaxed_query, &tokens, MatchMode::Relaxed).await {
            return self.remember(query, context, url, ResolutionSource::Relaxed).await;
        }

        tracing::info!(query, context, "no valid image found, using placeholder");
        self.placeholder(query)
    }

    /// Tier 1 query: context, original query, denylist
    #[must_use]
    pub fn strict_query(&self, query: &str, context: &str) -> String {
        join_terms([
            context.trim(),
            query.trim(),
            self.config.denylist_clause().as_str(),
        ])
    }

    /// Tier 2 query: context, generic descriptors, denylist
    #[must_use]
    pub fn relaxed_query(&self, context: &str) -> String {
        let descriptors = self.config.generic_descriptors.join(" ");
        join_terms([
            context.trim(),
            descriptors.as_str(),
            self.config.denylist_clause().as_str(),
        ])
    }

    async fn run_tier(&self, query: &str, tokens: &ContextTokens, mode: MatchMode) -> Option<String> {
        let request = SearchRequest {
            query: query.to_string(),
            count: self.config.results_per_query,
            image_size: self.config.image_size,
            safe_search: self.config.safe_search,
        };

        tracing::debug!(%mode, query, "searching images");

        let candidates = match self.search.search(&request).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!(%mode, error = %e, "image search failed, treating as no results");
                return None;
            }
        };

        match self.validator.select(&candidates, tokens, mode) {
            Some(candidate) => {
                tracing::debug!(%mode, link = %candidate.link, "image validated");
                Some(candidate.link.clone())
            }
            None => {
                tracing::debug!(%mode, results = candidates.len(), "no candidate passed validation");
                None
            }
        }
    }

    async fn remember(
        &self,
        query: &str,
        context: &str,
        url: String,
        source: ResolutionSource,
    ) -> Resolution {
        if let Some(cache) = &self.cache {
            cache.insert(query, context, url.clone()).await;
        }
        Resolution { url, source }
    }

    fn placeholder(&self, query: &str) -> Resolution {
        Resolution {
            url: placeholder_url(&self.config.placeholder_template, query),
            source: ResolutionSource::Placeholder,
        }
    }
}

fn join_terms<'a>(terms: impl IntoIterator<Item = &'a str>) -> String {
    terms
        .into_iter()
        .filter(|term| !term.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use crate::search::SearchCandidate;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use parking_lot::Mutex;

    /// Answers each call with the next scripted response
    #[derive(Default)]
    struct Scripted {
        responses: Mutex<VecDeque<Result<Vec<SearchCandidate>, SearchError>>>,
        queries: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn new(responses: Vec<Result<Vec<SearchCandidate>, SearchError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                queries: Mutex::default(),
            })
        }

        fn queries(&self) -> Vec<String> {
            self.queries.lock().clone()
        }
    }

    #[async_trait]
    impl ImageSearch for Scripted {
        async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchCandidate>, SearchError> {
            self.queries.lock().push(request.query.clone());
            self.responses
                .lock()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn resolver(search: Arc<Scripted>) -> ImageResolver {
        ImageResolver::new(search, ResolverConfig::new().with_denied_domains(["bad.com"]))
    }

    #[tokio::test]
    async fn context_free_hit() {
        let search = Scripted::new(vec![Ok(vec![SearchCandidate::new("https://x.com/a.jpg")])]);
        let resolver = resolver(search.clone());

        assert_eq!(resolver.resolve("guitar close up", "").await, "https://x.com/a.jpg");
        assert_eq!(search.queries(), vec!["guitar close up -site:bad.com"]);
    }

    #[tokio::test]
    async fn falls_back_to_relaxed_tier() {
        let search = Scripted::new(vec![
            Ok(vec![SearchCandidate::new("https://x.com/a.jpg").with_title("Arde")]),
            Ok(vec![SearchCandidate::new("https://y.com/b.jpg").with_title("Arde")]),
        ]);
        let resolver = resolver(search.clone());

        let resolution = resolver.resolve_detailed("stage", "Arde Bogotá").await;

        assert_eq!(resolution.url, "https://y.com/b.jpg");
        assert_eq!(resolution.source, ResolutionSource::Relaxed);
        assert_eq!(
            search.queries(),
            vec![
                "Arde Bogotá stage -site:bad.com",
                "Arde Bogotá wallpaper live high quality -site:bad.com",
            ]
        );
    }

    #[tokio::test]
    async fn strict_hit_skips_second_tier() {
        let search = Scripted::new(vec![Ok(vec![
            SearchCandidate::new("https://x.com/arde-bogota.jpg"),
        ])]);
        let resolver = resolver(search.clone());

        let resolution = resolver.resolve_detailed("stage", "Arde Bogotá").await;

        assert_eq!(resolution.source, ResolutionSource::Strict);
        assert_eq!(search.queries().len(), 1);
    }

    #[tokio::test]
    async fn errors_degrade_to_placeholder() {
        let search = Scripted::new(vec![
            Err(SearchError::status(429, "quota")),
            Err(SearchError::Other("offline".to_string())),
        ]);
        let resolver = resolver(search.clone());

        let resolution = resolver.resolve_detailed("stage", "Muse").await;

        assert_eq!(resolution.source, ResolutionSource::Placeholder);
        assert_eq!(
            resolution.url,
            placeholder_url(&resolver.config().placeholder_template, "stage")
        );
        assert_eq!(search.queries().len(), 2);
    }

    #[tokio::test]
    async fn blank_query_never_searches() {
        let search = Scripted::new(Vec::new());
        let resolver = resolver(search.clone());

        let resolution = resolver.resolve_detailed("   ", "Muse").await;

        assert_eq!(resolution.source, ResolutionSource::Placeholder);
        assert!(search.queries().is_empty());
    }

    #[tokio::test]
    async fn context_free_miss_runs_generic_search() {
        let search = Scripted::new(vec![Ok(vec![SearchCandidate::new("https://x.com/a.gif")])]);
        let resolver = resolver(search.clone());

        let resolution = resolver.resolve_detailed("stage", "").await;

        assert_eq!(resolution.source, ResolutionSource::Placeholder);
        assert_eq!(
            search.queries(),
            vec!["stage -site:bad.com", "wallpaper live high quality -site:bad.com"]
        );
    }

    #[tokio::test]
    async fn context_free_generic_hit() {
        let search = Scripted::new(vec![
            Ok(Vec::new()),
            Ok(vec![SearchCandidate::new("https://x.com/wall.jpg")]),
        ]);
        let resolver = resolver(search.clone());

        let resolution = resolver.resolve_detailed("guitar close up", "").await;

        assert_eq!(resolution.source, ResolutionSource::Relaxed);
        assert_eq!(resolution.url, "https://x.com/wall.jpg");
    }

    #[tokio::test]
    async fn cache_short_circuits_search() {
        let search = Scripted::new(vec![Ok(vec![SearchCandidate::new("https://x.com/a.jpg")])]);
        let resolver = resolver(search.clone()).with_cache(ResolutionCache::new(10));

        let first = resolver.resolve_detailed("crowd", "").await;
        let second = resolver.resolve_detailed("crowd", "").await;

        assert_eq!(first.source, ResolutionSource::Strict);
        assert_eq!(second.source, ResolutionSource::Cache);
        assert_eq!(second.url, "https://x.com/a.jpg");
        assert_eq!(search.queries().len(), 1);
    }

    #[test]
    fn queries_skip_empty_parts() {
        let resolver = ImageResolver::new(
            Scripted::new(Vec::new()),
            ResolverConfig::new().with_denied_domains(Vec::<String>::new()),
        );

        assert_eq!(resolver.strict_query(" amp ", ""), "amp");
        assert_eq!(resolver.relaxed_query("Muse"), "Muse wallpaper live high quality");
    }
}
