//! Stable cache-key derivation.
//!
//! Keys are BLAKE3 hashes of the semantically relevant, already-normalized
//! argument (normalized text for embeddings, normalized query for web search
//! results), so identical requests inside a TTL window collapse to one
//! computation.

use blake3::Hasher;

/// Hashes normalized text into a 32-byte embedding-cache key.
#[inline]
pub fn hash_text(text: &str) -> [u8; 32] {
    *blake3::hash(text.as_bytes()).as_bytes()
}

/// Hashes a normalized web query into a 32-byte search-cache key. Namespaced
/// separately from [`hash_text`] so a query string and an identical passage
/// never share a key across caches.
#[inline]
pub fn hash_query(query: &str) -> [u8; 32] {
    let mut hasher = Hasher::new();
    hasher.update(b"query|");
    hasher.update(query.as_bytes());
    *hasher.finalize().as_bytes()
}

/// 64-bit truncation of a BLAKE3 hash, used for compact candidate ids.
///
/// 64 bits keeps the collision probability negligible for realistic corpus
/// sizes, and a collision only merges two candidate ids, never corrupts data.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let bytes: [u8; 8] = hash.as_bytes()[0..8]
        .try_into()
        .expect("BLAKE3 always produces at least 8 bytes");
    u64::from_le_bytes(bytes)
}
