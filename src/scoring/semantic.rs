//! Embedding-backed semantic similarity.

use std::sync::Arc;

use tracing::debug;

use super::error::ScoringResult;
use crate::embedding::Embedder;
use crate::text;

/// Cosine similarity between two vectors. Mismatched lengths or zero norms
/// score 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Scores text pairs by embedding both sides and comparing vectors.
///
/// Expensive relative to [`super::StatisticalScorer`]; the fusion policy
/// only invokes it for ambiguous cases. Safe to call concurrently; the
/// embedder (usually cache-wrapped) owns any shared state.
pub struct EmbeddingScorer {
    embedder: Arc<dyn Embedder>,
}

impl EmbeddingScorer {
    /// Creates a scorer delegating vector generation to `embedder`.
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    /// The underlying embedder.
    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }

    /// Cosine-based similarity in [0, 1]. Empty input on either side is the
    /// defined zero case, computed without an embedding call. Negative
    /// cosine means dissimilar and clamps to 0.
    pub async fn score(&self, a: &str, b: &str) -> ScoringResult<f32> {
        let na = text::normalize(a);
        let nb = text::normalize(b);
        if na.is_empty() || nb.is_empty() {
            return Ok(0.0);
        }

        let va = self.embedder.embed(&na).await?;
        let vb = self.embedder.embed(&nb).await?;

        let cos = cosine_similarity(&va, &vb);
        debug!(cosine = cos, "semantic comparison complete");
        Ok(cos.clamp(0.0, 1.0))
    }
}

impl std::fmt::Debug for EmbeddingScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingScorer").finish_non_exhaustive()
    }
}
