use crate::embedding::EmbeddingError;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by similarity scoring.
pub enum ScoringError {
    /// The embedding capability failed while scoring a difficult case.
    #[error("semantic scoring failed: {0}")]
    Embedding(#[from] EmbeddingError),
}

/// Convenience result type for scoring operations.
pub type ScoringResult<T> = Result<T, ScoringError>;
