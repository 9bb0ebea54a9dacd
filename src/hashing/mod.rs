//! BLAKE3 helpers for cache identifiers.
//!
//! Exact-match keys are the literal query text; hashing is only used where a fixed-width
//! identifier is required (semantic entry ids) or where the query must not appear in logs.

use blake3::Hasher;

#[inline]
pub fn hash_query(query: &str) -> [u8; 32] {
    *blake3::hash(query.as_bytes()).as_bytes()
}

/// Derives the semantic entry id for a query within a namespace.
///
/// Two stores of the same query text in the same namespace map to the same id, which
/// gives last-write-wins overwrite semantics. The id is the first 64 bits of a BLAKE3
/// hash; collisions stay negligible for millions of entries (`P ≈ n² / 2^65`).
#[inline]
pub fn entry_id(namespace: &str, query: &str) -> u64 {
    let mut hasher = Hasher::new();
    hasher.update(namespace.as_bytes());
    hasher.update(b"|");
    hasher.update(query.as_bytes());

    let hash = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[0..8]);
    u64::from_le_bytes(bytes)
}

/// Short hex fingerprint of a query, suitable for structured log fields.
#[inline]
pub fn query_fingerprint(query: &str) -> String {
    let hash = hash_query(query);
    hash[..6].iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_hash_query_determinism() {
        let query = "list all users older than 30";

        assert_eq!(hash_query(query), hash_query(query));
        assert_eq!(entry_id("pg", query), entry_id("pg", query));
    }

    #[test]
    fn test_hash_query_is_case_sensitive() {
        assert_ne!(hash_query("select users"), hash_query("Select Users"));
        assert_ne!(hash_query("select users"), hash_query("select users "));
    }

    #[test]
    fn test_entry_id_depends_on_namespace() {
        let query = "count orders per customer";

        assert_ne!(
            entry_id("sqlgen_semantic_postgresql", query),
            entry_id("sqlgen_semantic_mongodb", query)
        );
    }

    #[test]
    fn test_entry_id_separator_prevents_concatenation_collisions() {
        assert_ne!(entry_id("ab", "c"), entry_id("a", "bc"));
    }

    #[test]
    fn test_entry_ids_unique_across_queries() {
        let ids: HashSet<u64> = (0..1000)
            .map(|i| entry_id("ns", &format!("query number {}", i)))
            .collect();

        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_query_fingerprint_shape() {
        let fp = query_fingerprint("show me all products");

        assert_eq!(fp.len(), 12);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
