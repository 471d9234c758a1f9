use std::sync::Arc;
use std::time::Duration;

use super::{CachedEmbedder, Embedder, MockEmbedder};
use crate::cache::TtlCacheHandle;

#[tokio::test]
async fn mock_embedder_is_deterministic() {
    let embedder = MockEmbedder::new();
    let a = embedder.embed("ගුරුතුමා පාඩම ඉගැන්නුවා").await.unwrap();
    let b = embedder.embed("ගුරුතුමා පාඩම ඉගැන්නුවා").await.unwrap();
    assert_eq!(a, b);
    assert_eq!(embedder.call_count(), 2);
}

#[tokio::test]
async fn mock_embedder_differs_for_unrelated_text() {
    let embedder = MockEmbedder::new();
    let a = embedder.embed("ගුරුතුමා පාඩම ඉගැන්නුවා").await.unwrap();
    let b = embedder.embed("වෙනස් අදහසක් මෙහි ඇත").await.unwrap();
    assert_ne!(a, b);
}

#[tokio::test]
async fn failing_mock_returns_unavailable() {
    let embedder = MockEmbedder::failing();
    assert!(embedder.embed("ඕනෑම දෙයක්").await.is_err());
}

#[tokio::test]
async fn cached_embedder_hits_cache_on_repeat() {
    let inner = Arc::new(MockEmbedder::new());
    let cache = TtlCacheHandle::new(16, Duration::from_secs(60));
    let cached = CachedEmbedder::new(inner.clone(), cache);

    let first = cached.embed("පාඩම ඉගැන්නුවා").await.unwrap();
    let second = cached.embed("පාඩම ඉගැන්නුවා").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(inner.call_count(), 1);
}

#[tokio::test]
async fn cached_embedder_propagates_failure_without_caching() {
    let inner = Arc::new(MockEmbedder::failing());
    let cache = TtlCacheHandle::new(16, Duration::from_secs(60));
    let cached = CachedEmbedder::new(inner.clone(), cache.clone());

    assert!(cached.embed("පාඩම").await.is_err());
    assert!(cached.embed("පාඩම").await.is_err());
    assert_eq!(inner.call_count(), 2);
    assert!(cache.is_empty());
}
