//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `HELACHECK_*` environment
//! variables. Thresholds and weights are configuration rather than constants:
//! the historical implementations disagreed on them, so they must stay
//! tunable without a rebuild.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::time::Duration;

/// Weights for the statistical sub-metrics. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatWeights {
    /// Token-set Jaccard weight.
    pub jaccard: f32,
    /// Character bigram weight.
    pub ngram2: f32,
    /// Character trigram weight.
    pub ngram3: f32,
    /// Token-order weight.
    pub word_order: f32,
}

impl Default for StatWeights {
    fn default() -> Self {
        Self {
            jaccard: 0.4,
            ngram2: 0.2,
            ngram3: 0.2,
            word_order: 0.2,
        }
    }
}

impl StatWeights {
    const SUM_TOLERANCE: f32 = 1e-3;

    /// Validates that all weights are non-negative and sum to 1.0.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("jaccard", self.jaccard),
            ("ngram2", self.ngram2),
            ("ngram3", self.ngram3),
            ("word_order", self.word_order),
        ] {
            if value < 0.0 {
                return Err(ConfigError::NegativeWeight { name, value });
            }
        }

        let sum = self.jaccard + self.ngram2 + self.ngram3 + self.word_order;
        if (sum - 1.0).abs() > Self::SUM_TOLERANCE {
            return Err(ConfigError::WeightsNotNormalized { sum });
        }
        Ok(())
    }
}

/// Fusion policy thresholds over the statistical score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionThresholds {
    /// Below this, a pair is an easy negative.
    pub low: f32,
    /// Above this, a pair is an easy positive.
    pub high: f32,
}

impl Default for FusionThresholds {
    fn default() -> Self {
        Self { low: 0.4, high: 0.7 }
    }
}

impl FusionThresholds {
    /// Validates `0 <= low < high <= 1`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.low)
            || !(0.0..=1.0).contains(&self.high)
            || self.low >= self.high
        {
            return Err(ConfigError::InvalidThresholds {
                low: self.low,
                high: self.high,
            });
        }
        Ok(())
    }
}

/// Pipeline configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `HELACHECK_*` overrides on top of
/// defaults, then [`Config::validate`] before constructing components.
#[derive(Debug, Clone)]
pub struct Config {
    /// Fusion policy thresholds.
    pub thresholds: FusionThresholds,

    /// Statistical sub-metric weights.
    pub weights: StatWeights,

    /// Embedding endpoint URL, if a remote embedder is used.
    pub embedding_url: Option<String>,

    /// Per-call embedding timeout. Default: 10 s.
    pub embedding_timeout: Duration,

    /// Embedding cache capacity. Default: `2000`.
    pub embedding_cache_capacity: u64,

    /// Embedding cache TTL. Default: 2 h.
    pub embedding_cache_ttl: Duration,

    /// Web search/extraction cache capacity. Default: `500`.
    pub web_cache_capacity: u64,

    /// Web cache TTL. Default: 24 h.
    pub web_cache_ttl: Duration,

    /// Google Custom Search API key. Absent means web search is disabled,
    /// not an error.
    pub search_api_key: Option<String>,

    /// Google Custom Search engine id.
    pub search_engine_id: Option<String>,

    /// Web results requested per query (1..=10). Default: `5`.
    pub search_results: usize,

    /// Per-call timeout for outbound HTTP, both the search call and page
    /// fetches. Default: 10 s.
    pub fetch_timeout: Duration,

    /// Minimum delay between successive outbound fetches. Default: 500 ms.
    pub min_fetch_interval: Duration,

    /// Concurrent outbound fetch limit. Default: `3`.
    pub fetch_concurrency: usize,

    /// Bounded worker count for batch scoring. Default: `4`.
    pub batch_workers: usize,

    /// Number of corpus matches retrieved per query. Default: `5`.
    pub corpus_top_k: usize,

    /// Minimum fused score for a candidate to count as a match.
    /// Default: `0.5`.
    pub match_threshold: f32,

    /// Overall per-check deadline. Default: 30 s.
    pub check_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thresholds: FusionThresholds::default(),
            weights: StatWeights::default(),
            embedding_url: None,
            embedding_timeout: Duration::from_secs(10),
            embedding_cache_capacity: 2000,
            embedding_cache_ttl: Duration::from_secs(2 * 60 * 60),
            web_cache_capacity: 500,
            web_cache_ttl: Duration::from_secs(24 * 60 * 60),
            search_api_key: None,
            search_engine_id: None,
            search_results: 5,
            fetch_timeout: Duration::from_secs(10),
            min_fetch_interval: Duration::from_millis(500),
            fetch_concurrency: 3,
            batch_workers: 4,
            corpus_top_k: 5,
            match_threshold: 0.5,
            check_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    const ENV_LOW_THRESHOLD: &'static str = "HELACHECK_LOW_THRESHOLD";
    const ENV_HIGH_THRESHOLD: &'static str = "HELACHECK_HIGH_THRESHOLD";
    const ENV_WEIGHT_JACCARD: &'static str = "HELACHECK_WEIGHT_JACCARD";
    const ENV_WEIGHT_NGRAM2: &'static str = "HELACHECK_WEIGHT_NGRAM2";
    const ENV_WEIGHT_NGRAM3: &'static str = "HELACHECK_WEIGHT_NGRAM3";
    const ENV_WEIGHT_WORD_ORDER: &'static str = "HELACHECK_WEIGHT_WORD_ORDER";
    const ENV_EMBEDDING_URL: &'static str = "HELACHECK_EMBEDDING_URL";
    const ENV_EMBEDDING_TIMEOUT_MS: &'static str = "HELACHECK_EMBEDDING_TIMEOUT_MS";
    const ENV_SEARCH_API_KEY: &'static str = "HELACHECK_SEARCH_API_KEY";
    const ENV_SEARCH_ENGINE_ID: &'static str = "HELACHECK_SEARCH_ENGINE_ID";
    const ENV_SEARCH_RESULTS: &'static str = "HELACHECK_SEARCH_RESULTS";
    const ENV_BATCH_WORKERS: &'static str = "HELACHECK_BATCH_WORKERS";
    const ENV_MATCH_THRESHOLD: &'static str = "HELACHECK_MATCH_THRESHOLD";
    const ENV_CHECK_TIMEOUT_MS: &'static str = "HELACHECK_CHECK_TIMEOUT_MS";

    /// Loads configuration from environment variables (falling back to
    /// defaults), then validates.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let config = Self {
            thresholds: FusionThresholds {
                low: Self::parse_f32(Self::ENV_LOW_THRESHOLD, defaults.thresholds.low)?,
                high: Self::parse_f32(Self::ENV_HIGH_THRESHOLD, defaults.thresholds.high)?,
            },
            weights: StatWeights {
                jaccard: Self::parse_f32(Self::ENV_WEIGHT_JACCARD, defaults.weights.jaccard)?,
                ngram2: Self::parse_f32(Self::ENV_WEIGHT_NGRAM2, defaults.weights.ngram2)?,
                ngram3: Self::parse_f32(Self::ENV_WEIGHT_NGRAM3, defaults.weights.ngram3)?,
                word_order: Self::parse_f32(
                    Self::ENV_WEIGHT_WORD_ORDER,
                    defaults.weights.word_order,
                )?,
            },
            embedding_url: Self::parse_optional_string(Self::ENV_EMBEDDING_URL),
            embedding_timeout: Self::parse_millis(
                Self::ENV_EMBEDDING_TIMEOUT_MS,
                defaults.embedding_timeout,
            )?,
            search_api_key: Self::parse_optional_string(Self::ENV_SEARCH_API_KEY),
            search_engine_id: Self::parse_optional_string(Self::ENV_SEARCH_ENGINE_ID),
            search_results: Self::parse_usize(Self::ENV_SEARCH_RESULTS, defaults.search_results)?,
            batch_workers: Self::parse_usize(Self::ENV_BATCH_WORKERS, defaults.batch_workers)?,
            match_threshold: Self::parse_f32(Self::ENV_MATCH_THRESHOLD, defaults.match_threshold)?,
            check_timeout: Self::parse_millis(Self::ENV_CHECK_TIMEOUT_MS, defaults.check_timeout)?,
            ..defaults
        };

        config.validate()?;
        Ok(config)
    }

    /// Validates thresholds, weights, and bounds. Call before constructing
    /// pipeline components; every failure here is fatal.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.thresholds.validate()?;
        self.weights.validate()?;

        if self.batch_workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if !(1..=10).contains(&self.search_results) {
            return Err(ConfigError::InvalidResultCount {
                value: self.search_results,
            });
        }
        Ok(())
    }

    /// Returns `true` when web search credentials are configured.
    pub fn search_configured(&self) -> bool {
        self.search_api_key.is_some() && self.search_engine_id.is_some()
    }

    fn parse_f32(var: &'static str, default: f32) -> Result<f32, ConfigError> {
        match env::var(var) {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::ParseFailed { var, value }),
            Err(_) => Ok(default),
        }
    }

    fn parse_usize(var: &'static str, default: usize) -> Result<usize, ConfigError> {
        match env::var(var) {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::ParseFailed { var, value }),
            Err(_) => Ok(default),
        }
    }

    fn parse_millis(var: &'static str, default: Duration) -> Result<Duration, ConfigError> {
        match env::var(var) {
            Ok(value) => value
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError::ParseFailed { var, value }),
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_string(var: &'static str) -> Option<String> {
        env::var(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}
