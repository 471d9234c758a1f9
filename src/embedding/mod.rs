//! The embedding capability: an external model turned into a call contract.
//!
//! The pipeline never sees model internals, only [`Embedder::embed`]. The
//! production implementation is [`RemoteEmbedder`] (an HTTP JSON endpoint);
//! [`CachedEmbedder`] wraps any embedder with the shared embedding cache so
//! repeated normalized inputs inside the TTL window cost one model call.

mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
#[cfg(test)]
mod tests;

pub use error::{EmbeddingError, EmbeddingResult};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbedder;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::TtlCacheHandle;
use crate::hashing::hash_text;

/// Async embedding contract. Implementations must be safe to call
/// concurrently; deterministic output for identical normalized input is
/// assumed by the caches and the corpus index.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embeds normalized text into a dense vector.
    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>>;
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

/// Embedder backed by a remote HTTP endpoint accepting
/// `{"text": ...}` and answering `{"embedding": [...]}`.
pub struct RemoteEmbedder {
    client: reqwest::Client,
    url: String,
}

impl RemoteEmbedder {
    /// Creates a client for `url` with a per-call timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> EmbeddingResult<Self> {
        let url = url.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EmbeddingError::Unavailable {
                url: url.clone(),
                message: e.to_string(),
            })?;

        Ok(Self { client, url })
    }

    /// Configured endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl std::fmt::Debug for RemoteEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteEmbedder")
            .field("url", &self.url)
            .finish()
    }
}

#[async_trait]
impl Embedder for RemoteEmbedder {
    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        let response = self
            .client
            .post(&self.url)
            .json(&EmbedRequest { text })
            .send()
            .await
            .map_err(|e| EmbeddingError::Unavailable {
                url: self.url.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(EmbeddingError::BadStatus {
                status: status.as_u16(),
            });
        }

        let body: EmbedResponse =
            response
                .json()
                .await
                .map_err(|e| EmbeddingError::MalformedResponse {
                    message: e.to_string(),
                })?;

        if body.embedding.is_empty() {
            return Err(EmbeddingError::EmptyVector);
        }

        Ok(body.embedding)
    }
}

/// Wraps an embedder with the shared embedding cache.
///
/// Keys are BLAKE3 hashes of the input text; callers are expected to pass
/// already-normalized text so paraphrase-equivalent whitespace variants
/// collapse to one entry.
pub struct CachedEmbedder {
    inner: Arc<dyn Embedder>,
    cache: TtlCacheHandle<Vec<f32>>,
}

impl CachedEmbedder {
    /// Wraps `inner` with `cache`.
    pub fn new(inner: Arc<dyn Embedder>, cache: TtlCacheHandle<Vec<f32>>) -> Self {
        Self { inner, cache }
    }

    /// The cache backing this embedder.
    pub fn cache(&self) -> &TtlCacheHandle<Vec<f32>> {
        &self.cache
    }
}

impl std::fmt::Debug for CachedEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedEmbedder")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Embedder for CachedEmbedder {
    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        let key = hash_text(text);

        if let Some(vector) = self.cache.get(&key) {
            debug!(text_len = text.len(), "embedding cache hit");
            return Ok(vector);
        }

        let vector = self.inner.embed(text).await?;
        self.cache.set(key, vector.clone());
        Ok(vector)
    }
}
