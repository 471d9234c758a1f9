use thiserror::Error;

#[derive(Debug, Error)]
/// Configuration errors. All of these are fatal at construction time.
pub enum ConfigError {
    /// An environment variable held a value that could not be parsed.
    #[error("invalid value for {var}: '{value}'")]
    ParseFailed {
        /// Variable name.
        var: &'static str,
        /// Offending value.
        value: String,
    },

    /// Fusion thresholds must satisfy `0 <= low < high <= 1`.
    #[error("invalid fusion thresholds: low={low}, high={high} (need 0 <= low < high <= 1)")]
    InvalidThresholds {
        /// Lower threshold.
        low: f32,
        /// Upper threshold.
        high: f32,
    },

    /// Statistical weights must sum to 1.0.
    #[error("statistical weights sum to {sum}, expected 1.0")]
    WeightsNotNormalized {
        /// Actual sum.
        sum: f32,
    },

    /// A statistical weight was negative.
    #[error("statistical weight '{name}' is negative: {value}")]
    NegativeWeight {
        /// Weight name.
        name: &'static str,
        /// Offending value.
        value: f32,
    },

    /// Worker count must be at least 1.
    #[error("batch worker count must be at least 1")]
    ZeroWorkers,

    /// Requested web result count is outside the provider's supported range.
    #[error("web result count {value} outside supported range 1..=10")]
    InvalidResultCount {
        /// Offending value.
        value: usize,
    },
}
