use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
/// Errors raised while assembling a checker.
pub enum CheckerError {
    /// Configuration validation failed.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// No embedding endpoint configured but the pipeline needs one.
    #[error("no embedding endpoint configured")]
    MissingEmbeddingUrl,

    /// An outbound HTTP client could not be constructed.
    #[error("http client construction failed: {message}")]
    HttpClient {
        /// Underlying client error.
        message: String,
    },
}

/// Convenience result type for checker assembly.
pub type CheckerResult<T> = Result<T, CheckerError>;
