//! Bounded in-memory caches with per-entry time-to-live.
//!
//! Two independent instances back the pipeline: one for embeddings (large,
//! long TTL — expensive to recompute) and one for web search/extraction
//! results (small, short TTL — content drifts and external services throttle).
//! Both key by a BLAKE3 hash of the normalized argument (see
//! [`crate::hashing`]).
//!
//! All synchronization is internal; handles are cheap to clone and safe to
//! share across concurrent requests.


use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;

/// A bounded key/value cache evicting by recency at capacity and expiring
/// entries whose age exceeds the TTL regardless of access recency.
pub struct TtlCache<V: Clone + Send + Sync + 'static> {
    entries: Cache<[u8; 32], V>,
    ttl: Duration,
}

impl<V: Clone + Send + Sync + 'static> TtlCache<V> {
    /// Creates a cache holding at most `capacity` entries, each valid for
    /// `ttl` after insertion.
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
            ttl,
        }
    }

    /// Returns the value for `key` if present and unexpired.
    #[inline]
    pub fn get(&self, key: &[u8; 32]) -> Option<V> {
        self.entries.get(key)
    }

    /// Inserts or replaces the value for `key`, evicting the least-recently
    /// used entry first when at capacity.
    #[inline]
    pub fn set(&self, key: [u8; 32], value: V) {
        self.entries.insert(key, value);
    }

    /// Removes the value for `key`, returning it if present.
    #[inline]
    pub fn remove(&self, key: &[u8; 32]) -> Option<V> {
        self.entries.remove(key)
    }

    /// Configured per-entry time-to-live.
    #[inline]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of live entries. Runs pending maintenance first so that
    /// expired entries are not counted.
    pub fn len(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    /// Returns `true` if the cache holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops all entries.
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }
}

impl<V: Clone + Send + Sync + 'static> std::fmt::Debug for TtlCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("entries", &self.entries.entry_count())
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Shared handle to a [`TtlCache`].
pub struct TtlCacheHandle<V: Clone + Send + Sync + 'static> {
    inner: Arc<TtlCache<V>>,
}

impl<V: Clone + Send + Sync + 'static> Clone for TtlCacheHandle<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V: Clone + Send + Sync + 'static> TtlCacheHandle<V> {
    /// Creates a new shared cache with the given capacity and TTL.
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        Self {
            inner: Arc::new(TtlCache::new(capacity, ttl)),
        }
    }

    /// See [`TtlCache::get`].
    #[inline]
    pub fn get(&self, key: &[u8; 32]) -> Option<V> {
        self.inner.get(key)
    }

    /// See [`TtlCache::set`].
    #[inline]
    pub fn set(&self, key: [u8; 32], value: V) {
        self.inner.set(key, value)
    }

    /// See [`TtlCache::remove`].
    #[inline]
    pub fn remove(&self, key: &[u8; 32]) -> Option<V> {
        self.inner.remove(key)
    }

    /// See [`TtlCache::ttl`].
    #[inline]
    pub fn ttl(&self) -> Duration {
        self.inner.ttl()
    }

    /// See [`TtlCache::len`].
    pub fn len(&self) -> u64 {
        self.inner.len()
    }

    /// See [`TtlCache::is_empty`].
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// See [`TtlCache::clear`].
    pub fn clear(&self) {
        self.inner.clear()
    }

    /// Number of strong references to the underlying cache.
    pub fn strong_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl<V: Clone + Send + Sync + 'static> std::fmt::Debug for TtlCacheHandle<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCacheHandle")
            .field("strong_count", &self.strong_count())
            .finish()
    }
}
