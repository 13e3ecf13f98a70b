//! BLAKE3 helpers for cache-key derivation and embedding seeds.

use blake3::Hasher;

/// Builds a deterministic cache key from an operation name, the primary
/// identifier, and the remaining query parameters.
///
/// Parameters are sorted by name before hashing, so two logically identical
/// queries map to the same key regardless of the order their optional
/// parameters were supplied in. The canonical string is hashed with BLAKE3
/// and rendered as hex to keep keys fixed-width and opaque.
pub fn cache_key(operation: &str, identifier: &str, params: &[(String, String)]) -> String {
    let mut sorted: Vec<&(String, String)> = params.iter().collect();
    sorted.sort_by_key(|(name, _)| name.as_str());

    let mut hasher = Hasher::new();
    hasher.update(operation.as_bytes());
    hasher.update(b"|");
    hasher.update(identifier.as_bytes());
    for (name, value) in sorted {
        hasher.update(b"|");
        hasher.update(name.as_bytes());
        hasher.update(b"=");
        hasher.update(value.as_bytes());
    }

    hasher.finalize().to_hex().to_string()
}

/// Computes a 64-bit seed from the input text, truncated from the 256-bit
/// BLAKE3 output.
///
/// Used to seed deterministic pseudo-embeddings; 64 bits is plenty for that
/// purpose since the seed never needs collision resistance.
#[inline]
pub fn hash_to_seed(text: &str) -> u64 {
    let hash = blake3::hash(text.as_bytes());
    let bytes: [u8; 8] = hash.as_bytes()[0..8]
        .try_into()
        .expect("BLAKE3 always produces at least 8 bytes");
    u64::from_le_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_cache_key_determinism() {
        let key1 = cache_key(
            "search",
            "300257",
            &[("top_k".to_string(), "10".to_string()), ("threshold".to_string(), "0.5".to_string())],
        );
        let key2 = cache_key(
            "search",
            "300257",
            &[("top_k".to_string(), "10".to_string()), ("threshold".to_string(), "0.5".to_string())],
        );

        assert_eq!(key1, key2);
    }

    #[test]
    fn test_cache_key_parameter_order_independence() {
        let key1 = cache_key(
            "search",
            "300257",
            &[("top_k".to_string(), "10".to_string()), ("threshold".to_string(), "0.5".to_string())],
        );
        let key2 = cache_key(
            "search",
            "300257",
            &[("threshold".to_string(), "0.5".to_string()), ("top_k".to_string(), "10".to_string())],
        );

        assert_eq!(key1, key2);
    }

    #[test]
    fn test_cache_key_parameter_sensitivity() {
        let base = cache_key("search", "300257", &[("top_k".to_string(), "10".to_string())]);

        let changed_op = cache_key("rank", "300257", &[("top_k".to_string(), "10".to_string())]);
        assert_ne!(base, changed_op);

        let changed_ident = cache_key("search", "600519", &[("top_k".to_string(), "10".to_string())]);
        assert_ne!(base, changed_ident);

        let changed_value = cache_key("search", "300257", &[("top_k".to_string(), "20".to_string())]);
        assert_ne!(base, changed_value);
    }

    #[test]
    fn test_cache_key_separator_prevents_ambiguity() {
        let key1 = cache_key("search", "ab", &[("c".to_string(), "d".to_string())]);
        let key2 = cache_key("search", "abc", &[("".to_string(), "d".to_string())]);
        let key3 = cache_key("searchab", "", &[("c".to_string(), "d".to_string())]);

        assert_ne!(key1, key2);
        assert_ne!(key1, key3);
        assert_ne!(key2, key3);
    }

    #[test]
    fn test_cache_key_is_hex() {
        let key = cache_key("search", "300257", &[]);
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_to_seed_determinism() {
        let seed1 = hash_to_seed("Kweichow Moutai");
        let seed2 = hash_to_seed("Kweichow Moutai");

        assert_eq!(seed1, seed2);
    }

    #[test]
    fn test_hash_to_seed_uniqueness() {
        let inputs = ["300257", "600519", "300257 ", "solar inverters"];
        let seeds: HashSet<u64> = inputs.iter().map(|t| hash_to_seed(t)).collect();

        assert_eq!(seeds.len(), inputs.len());
    }
}
