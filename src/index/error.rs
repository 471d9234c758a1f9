use crate::embedding::EmbeddingError;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the corpus index.
pub enum IndexError {
    /// The embedding capability was unavailable. Callers treat this as
    /// "corpus unavailable" and fall back to web-only retrieval.
    #[error("corpus unavailable, embedding capability failed: {0}")]
    EmbedderUnavailable(#[from] EmbeddingError),
}

/// Convenience result type for index operations.
pub type IndexResult<T> = Result<T, IndexError>;
