use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the embedding capability.
pub enum EmbeddingError {
    /// The embedding endpoint could not be reached or timed out.
    #[error("embedding endpoint unavailable at '{url}': {message}")]
    Unavailable {
        /// Endpoint URL.
        url: String,
        /// Error message.
        message: String,
    },

    /// The endpoint answered with a non-success status.
    #[error("embedding endpoint returned status {status}")]
    BadStatus {
        /// HTTP status code.
        status: u16,
    },

    /// The response body could not be decoded into a vector.
    #[error("malformed embedding response: {message}")]
    MalformedResponse {
        /// Error message.
        message: String,
    },

    /// The model returned an empty vector.
    #[error("embedding endpoint returned an empty vector")]
    EmptyVector,
}

/// Convenience result type for embedding operations.
pub type EmbeddingResult<T> = Result<T, EmbeddingError>;
