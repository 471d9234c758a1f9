//! Nearest-neighbor search over a pre-embedded reference corpus.
//!
//! Vectors are L2-normalized at build time, so inner product equals cosine
//! similarity. Retrieval is a brute-force scan: corpus sizes here are
//! thousands of passages, where scanning beats maintaining an approximate
//! structure. Rebuilds produce a complete new state and swap it in under one
//! write lock, so concurrent searches never observe a partially built index.

mod error;

#[cfg(test)]
mod tests;

pub use error::{IndexError, IndexResult};

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use crate::embedding::Embedder;
use crate::text;

/// One indexed passage: id, normalized text for hydration, and its
/// L2-normalized vector. Immutable after build.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    /// Position of the passage in the build input.
    pub id: usize,
    /// Normalized passage text.
    pub text: String,
    /// L2-normalized embedding.
    pub vector: Vec<f32>,
}

/// A scored retrieval hit.
#[derive(Debug, Clone)]
pub struct IndexMatch {
    /// The matched entry.
    pub entry: IndexEntry,
    /// Inner-product (cosine) score against the query.
    pub score: f32,
}

fn l2_normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in vector.iter_mut() {
            *v /= norm;
        }
    }
}

/// In-process nearest-neighbor index over reference passages.
pub struct CorpusIndex {
    embedder: Arc<dyn Embedder>,
    entries: RwLock<Option<Vec<IndexEntry>>>,
}

impl CorpusIndex {
    /// Creates an empty index using `embedder` for both build and search.
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            entries: RwLock::new(None),
        }
    }

    /// Embeds and indexes `passages`, atomically replacing any previous
    /// index. Passages that normalize to nothing are skipped but keep their
    /// input position as id.
    #[instrument(skip(self, passages), fields(passages = passages.len()))]
    pub async fn build(&self, passages: &[String]) -> IndexResult<()> {
        let mut entries = Vec::with_capacity(passages.len());

        for (id, passage) in passages.iter().enumerate() {
            let normalized = text::normalize(passage);
            if normalized.is_empty() {
                debug!(id, "skipping passage that normalized to empty text");
                continue;
            }

            let mut vector = self.embedder.embed(&normalized).await?;
            l2_normalize(&mut vector);
            entries.push(IndexEntry {
                id,
                text: normalized,
                vector,
            });
        }

        info!(entries = entries.len(), "corpus index built");
        *self.entries.write().await = Some(entries);
        Ok(())
    }

    /// Returns the top `k` entries by cosine similarity to `query`, sorted
    /// descending. An empty or absent index yields an empty list; only an
    /// embedder failure is an error.
    #[instrument(skip(self, query), fields(query_len = query.len(), k = k))]
    pub async fn search(&self, query: &str, k: usize) -> IndexResult<Vec<IndexMatch>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let normalized = text::normalize(query);
        if normalized.is_empty() {
            return Ok(Vec::new());
        }

        {
            // Cheap emptiness probe before paying for an embedding.
            let guard = self.entries.read().await;
            match guard.as_ref() {
                None => return Ok(Vec::new()),
                Some(entries) if entries.is_empty() => return Ok(Vec::new()),
                Some(_) => {}
            }
        }

        let mut query_vector = self.embedder.embed(&normalized).await?;
        l2_normalize(&mut query_vector);

        let guard = self.entries.read().await;
        let Some(entries) = guard.as_ref() else {
            return Ok(Vec::new());
        };

        let mut matches: Vec<IndexMatch> = entries
            .iter()
            .map(|entry| {
                let score: f32 = entry
                    .vector
                    .iter()
                    .zip(query_vector.iter())
                    .map(|(a, b)| a * b)
                    .sum();
                IndexMatch {
                    entry: entry.clone(),
                    score,
                }
            })
            .collect();

        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        matches.truncate(k);

        debug!(matches = matches.len(), "corpus search complete");
        Ok(matches)
    }

    /// Number of indexed entries. Zero when no build has completed.
    pub async fn len(&self) -> usize {
        self.entries
            .read()
            .await
            .as_ref()
            .map_or(0, |entries| entries.len())
    }

    /// Returns `true` when no build has completed or the corpus was empty.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl std::fmt::Debug for CorpusIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorpusIndex").finish_non_exhaustive()
    }
}
