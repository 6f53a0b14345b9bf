//! Candidate validation heuristic
//!
//! Every candidate goes through two gates, in search-result order, and the
//! first one passing all active gates wins:
//!
//! 1. **Hygiene** (always): the normalised link ends with a static image
//!    extension, is shorter than the length ceiling and has no query string.
//! 2. **Identity** (only with context keywords): each context token longer
//!    than two characters is looked up as a substring of the normalised
//!    title, snippet and link. Strict mode needs every token, relaxed mode
//!    at least one.
//!
//! Matching is plain substring containment, so `bogota` also matches
//! `bogotana`.

use crate::config::ResolverConfig;
use crate::search::SearchCandidate;

/// Identity-gate strictness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchMode {
    /// Every context token must match
    Strict,
    /// At least one context token must match
    Relaxed,
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Relaxed => write!(f, "relaxed"),
        }
    }
}

/// Lower-case and fold accented Latin letters to ASCII
#[must_use]
pub fn normalize(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(fold_diacritic)
        .collect()
}

fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' | 'å' | 'ã' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        other => other,
    }
}

/// Normalised context tokens used by the identity gate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextTokens {
    tokens: Vec<String>,
}

impl ContextTokens {
    /// Tokenise context keywords, dropping tokens of two characters or less
    #[must_use]
    pub fn new(context: &str) -> Self {
        let tokens = normalize(context)
            .split_whitespace()
            .filter(|token| token.chars().count() > 2)
            .map(str::to_string)
            .collect();
        Self { tokens }
    }

    /// Whether the identity gate has nothing to check
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Tokens in context order
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.tokens
    }
}

/// Applies the hygiene and identity gates
#[derive(Debug, Clone)]
pub struct CandidateValidator {
    extensions: Vec<String>,
    max_link_length: usize,
}

impl CandidateValidator {
    /// Create validator from resolver configuration
    #[must_use]
    pub fn new(config: &ResolverConfig) -> Self {
        Self {
            extensions: config.image_extensions.iter().map(|ext| normalize(ext)).collect(),
            max_link_length: config.max_link_length,
        }
    }

    /// Technical hygiene gate on the link alone
    #[must_use]
    pub fn is_clean_link(&self, link: &str) -> bool {
        let link = normalize(link);

        self.extensions.iter().any(|ext| link.ends_with(ext.as_str()))
            && link.chars().count() < self.max_link_length
            && !link.contains('?')
    }

    /// Identity gate; passes when there are no tokens to check
    #[must_use]
    pub fn matches_identity(
        &self,
        candidate: &SearchCandidate,
        tokens: &ContextTokens,
        mode: MatchMode,
    ) -> bool {
        if tokens.is_empty() {
            return true;
        }

        let title = candidate.title.as_deref().map(normalize).unwrap_or_default();
        let snippet = candidate.snippet.as_deref().map(normalize).unwrap_or_default();
        let link = normalize(&candidate.link);

        let matched = tokens
            .as_slice()
            .iter()
            .filter(|token| {
                title.contains(token.as_str())
                    || snippet.contains(token.as_str())
                    || link.contains(token.as_str())
            })
            .count();

        match mode {
            MatchMode::Strict => matched == tokens.as_slice().len(),
            MatchMode::Relaxed => matched > 0,
        }
    }

    /// Whether a candidate passes every active gate
    #[must_use]
    pub fn accepts(&self, candidate: &SearchCandidate, tokens: &ContextTokens, mode: MatchMode) -> bool {
        self.is_clean_link(&candidate.link) && self.matches_identity(candidate, tokens, mode)
    }

    /// First candidate, in search order, passing every active gate
    #[must_use]
    pub fn select<'a>(
        &self,
        candidates: &'a [SearchCandidate],
        tokens: &ContextTokens,
        mode: MatchMode,
    ) -> Option<&'a SearchCandidate> {
        candidates
            .iter()
            .find(|candidate| self.accepts(candidate, tokens, mode))
    }
}

impl Default for CandidateValidator {
    fn default() -> Self {
        Self::new(&ResolverConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> CandidateValidator {
        CandidateValidator::default()
    }

    #[test]
    fn normalize_folds_accents() {
        assert_eq!(normalize("Arde Bogotá"), "arde bogota");
        assert_eq!(normalize("Héroes del Silencio"), "heroes del silencio");
        assert_eq!(normalize("ESPAÑA"), "espana");
        assert_eq!(normalize("Mötorhead Måneskin"), "motorhead maneskin");
    }

    #[test]
    fn hygiene_accepts_static_images() {
        let v = validator();
        assert!(v.is_clean_link("https://x.com/a.jpg"));
        assert!(v.is_clean_link("https://x.com/a.JPEG"));
        assert!(v.is_clean_link("https://x.com/a.png"));
        assert!(v.is_clean_link("https://x.com/a.webp"));
    }

    #[test]
    fn hygiene_rejects_gif_and_pages() {
        let v = validator();
        assert!(!v.is_clean_link("https://x.com/a.gif"));
        assert!(!v.is_clean_link("https://x.com/page.html"));
        assert!(!v.is_clean_link("https://x.com/a.jpg/view"));
    }

    #[test]
    fn hygiene_rejects_query_strings() {
        assert!(!validator().is_clean_link("https://x.com/img?id=1.jpg"));
    }

    #[test]
    fn hygiene_enforces_length_ceiling() {
        let v = validator();
        let prefix = "https://x.com/";
        let at_limit = format!("{prefix}{}.jpg", "a".repeat(400 - prefix.len() - 4));
        let below = format!("{prefix}{}.jpg", "a".repeat(399 - prefix.len() - 4));

        assert_eq!(at_limit.len(), 400);
        assert!(!v.is_clean_link(&at_limit));
        assert!(v.is_clean_link(&below));
    }

    #[test]
    fn tokens_drop_short_words() {
        let tokens = ContextTokens::new("The Who y El Canto del Loco");
        assert_eq!(tokens.as_slice(), ["the", "who", "canto", "del", "loco"]);
        assert!(ContextTokens::new("U2 ZZ").is_empty());
    }

    #[test]
    fn strict_needs_every_token() {
        let v = validator();
        let tokens = ContextTokens::new("Arde Bogotá");
        let candidate = SearchCandidate::new("https://x.com/a.jpg").with_title("Arde en directo");

        assert!(!v.accepts(&candidate, &tokens, MatchMode::Strict));
        assert!(v.accepts(&candidate, &tokens, MatchMode::Relaxed));
    }

    #[test]
    fn tokens_match_title_snippet_or_link() {
        let v = validator();
        let tokens = ContextTokens::new("Arde Bogotá");

        let split = SearchCandidate::new("https://cdn.com/bogota-tour.jpg").with_snippet("ARDE");
        assert!(v.accepts(&split, &tokens, MatchMode::Strict));
    }

    #[test]
    fn substring_matching_is_loose() {
        let v = validator();
        let tokens = ContextTokens::new("Bogotá");
        let candidate = SearchCandidate::new("https://x.com/a.jpg").with_title("La movida bogotana");

        assert!(v.accepts(&candidate, &tokens, MatchMode::Strict));
    }

    #[test]
    fn empty_context_skips_identity_gate() {
        let v = validator();
        let candidate = SearchCandidate::new("https://x.com/a.jpg");
        let tokens = ContextTokens::new("");

        assert!(v.accepts(&candidate, &tokens, MatchMode::Strict));
        assert!(v.accepts(&candidate, &tokens, MatchMode::Relaxed));
    }

    #[test]
    fn gif_never_selected_even_with_identity_match() {
        let v = validator();
        let tokens = ContextTokens::new("Metallica");
        let candidates = vec![
            SearchCandidate::new("https://x.com/metallica.gif").with_title("Metallica"),
            SearchCandidate::new("https://y.com/metallica.jpg").with_title("Metallica"),
        ];

        let selected = v.select(&candidates, &tokens, MatchMode::Relaxed).unwrap();
        assert_eq!(selected.link, "https://y.com/metallica.jpg");
    }

    #[test]
    fn select_keeps_search_order() {
        let v = validator();
        let candidates = vec![
            SearchCandidate::new("https://a.com/1.png"),
            SearchCandidate::new("https://b.com/2.png"),
        ];

        let selected = v.select(&candidates, &ContextTokens::default(), MatchMode::Strict);
        assert_eq!(selected.unwrap().link, "https://a.com/1.png");
    }
}
