use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{Embedder, EmbeddingError, EmbeddingResult};
use crate::hashing::hash_to_u64;
use crate::text;

const MOCK_DIM: usize = 64;

/// Deterministic in-process embedder for tests.
///
/// Produces a hashed bag-of-tokens vector, so texts sharing tokens land close
/// in cosine space while unrelated texts do not. Tracks the number of embed
/// calls, which the fusion cost-boundary tests rely on.
pub struct MockEmbedder {
    calls: AtomicUsize,
    fail: bool,
}

impl MockEmbedder {
    /// Creates a working mock embedder.
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: false,
        }
    }

    /// Creates a mock that fails every call, simulating an unavailable
    /// embedding capability.
    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    /// Number of embed calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MockEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockEmbedder")
            .field("calls", &self.call_count())
            .field("fail", &self.fail)
            .finish()
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, input: &str) -> EmbeddingResult<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail {
            return Err(EmbeddingError::Unavailable {
                url: "mock://embedder".to_string(),
                message: "mock embedder configured to fail".to_string(),
            });
        }

        let mut vector = vec![0.0f32; MOCK_DIM];
        for token in input.split_whitespace() {
            let bucket = (hash_to_u64(token.as_bytes()) as usize) % MOCK_DIM;
            vector[bucket] += 1.0;
        }
        for gram in text::char_ngrams(input, 3) {
            let bucket = (hash_to_u64(gram.as_bytes()) as usize) % MOCK_DIM;
            vector[bucket] += 0.5;
        }

        // All-zero vectors break cosine math downstream; keep a floor bucket.
        if vector.iter().all(|v| *v == 0.0) {
            vector[0] = 1.0;
        }

        Ok(vector)
    }
}
