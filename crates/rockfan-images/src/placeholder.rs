//! Deterministic placeholder images

use sha2::{Digest, Sha256};

/// Stable seed for a query: hex of the first 8 bytes of its SHA-256
#[must_use]
pub fn placeholder_seed(query: &str) -> String {
    let digest = Sha256::digest(query.as_bytes());
    hex::encode(&digest[..8])
}

/// Placeholder URL for a query
///
/// `template` must contain `{seed}`; the same query always yields the same
/// URL.
#[must_use]
pub fn placeholder_url(template: &str, query: &str) -> String {
    template.replace("{seed}", &placeholder_seed(query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_PLACEHOLDER_TEMPLATE;

    #[test]
    fn same_query_same_url() {
        let a = placeholder_url(DEFAULT_PLACEHOLDER_TEMPLATE, "guitar close up");
        let b = placeholder_url(DEFAULT_PLACEHOLDER_TEMPLATE, "guitar close up");
        assert_eq!(a, b);
        assert!(a.starts_with("https://picsum.photos/seed/"));
        assert!(a.ends_with("/800/1200"));
    }

    #[test]
    fn different_queries_differ() {
        assert_ne!(placeholder_seed("a"), placeholder_seed("b"));
    }

    #[test]
    fn seed_is_sixteen_hex_chars() {
        let seed = placeholder_seed("");
        assert_eq!(seed.len(), 16);
        assert!(seed.chars().all(|c| c.is_ascii_hexdigit()));
        // SHA-256("") = e3b0c442 98fc1c14 ...
        assert_eq!(seed, "e3b0c44298fc1c14");
    }
}
