//! Resolution cache using moka
//!
//! Remembers search hits per `(query, context)` so that re-opening the same
//! story does not spend search quota again. Placeholders are never cached;
//! a later call may succeed once the search API recovers.

use moka::future::Cache;
use std::time::Duration;

/// Cache key: trimmed query and context
type ResolutionKey = (String, String);

/// Concurrent cache of resolved image URLs
#[derive(Debug, Clone)]
pub struct ResolutionCache {
    inner: Cache<ResolutionKey, String>,
}

impl ResolutionCache {
    /// Create cache with max capacity
    #[inline]
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::new(max_capacity),
        }
    }

    /// Create cache with time-based expiration
    #[inline]
    #[must_use]
    pub fn with_ttl(max_capacity: u64, ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Cached URL for a query in a context
    pub async fn get(&self, query: &str, context: &str) -> Option<String> {
        self.inner.get(&key(query, context)).await
    }

    /// Remember a resolved URL
    pub async fn insert(&self, query: &str, context: &str, url: String) {
        self.inner.insert(key(query, context), url).await;
    }

    /// Invalidate all entries
    #[inline]
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

impl Default for ResolutionCache {
    /// Cache with 1,000 entries and a one-hour TTL
    fn default() -> Self {
        Self::with_ttl(1_000, Duration::from_secs(3_600))
    }
}

fn key(query: &str, context: &str) -> ResolutionKey {
    (query.trim().to_string(), context.trim().to_string())
}
