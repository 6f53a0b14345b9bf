//! rockfan Images
//!
//! Resolves image requests embedded in generated stories to concrete image
//! URLs through a web image-search API.
//!
//! # Strategy
//!
//! 1. **Strict tier**: search `context + query + denylist`, accept the first
//!    candidate whose link is a clean static image and which mentions every
//!    context keyword.
//! 2. **Relaxed tier**: search `context + generic descriptors + denylist`,
//!    accept the first clean candidate mentioning any context keyword.
//! 3. **Placeholder**: a URL derived from a stable hash of the query.
//!
//! Search failures never propagate; they only move resolution to the next
//! step.
//!
//! # Example
//!
//! ```rust,ignore
//! use rockfan_images::{GoogleImageSearch, ImageResolver, ResolverConfig, SearchConfig};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let search = GoogleImageSearch::new(SearchConfig::new("api-key", "engine-id"))?;
//! let resolver = ImageResolver::new(Arc::new(search), ResolverConfig::default());
//!
//! let url = resolver.resolve("live pompeii wide shot", "Pink Floyd").await;
//! println!("{url}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod cache;
pub mod config;
pub mod error;
pub mod placeholder;
pub mod resolver;
pub mod search;
pub mod validation;

// Re-exports for convenience
pub use cache::ResolutionCache;
pub use config::{ImageSize, ResolverConfig, SafeSearch, SearchConfig};
pub use error::SearchError;
pub use placeholder::{placeholder_seed, placeholder_url};
pub use resolver::{ImageResolver, Resolution, ResolutionSource};
pub use search::{GoogleImageSearch, ImageSearch, SearchCandidate, SearchRequest};
pub use validation::{normalize, CandidateValidator, ContextTokens, MatchMode};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
