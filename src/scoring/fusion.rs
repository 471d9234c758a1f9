//! Tiered score fusion: cheap statistical comparison decides, the expensive
//! semantic comparator runs only inside the ambiguous band.

use tracing::{debug, instrument};

use super::error::ScoringResult;
use super::semantic::EmbeddingScorer;
use super::statistical::StatisticalScorer;
use super::types::{CaseType, SimilarityResult};
use crate::config::{ConfigError, FusionThresholds};

/// The hybrid detector combining both scorers under a tiered decision rule.
///
/// Statistical score below `low` or above `high` settles the comparison on
/// its own; only the band in between pays for an embedding call. This bounds
/// average cost while keeping the ambiguous middle accurate.
pub struct HybridDetector {
    statistical: StatisticalScorer,
    semantic: EmbeddingScorer,
    thresholds: FusionThresholds,
}

impl HybridDetector {
    /// Creates a detector with validated thresholds.
    pub fn new(
        statistical: StatisticalScorer,
        semantic: EmbeddingScorer,
        thresholds: FusionThresholds,
    ) -> Result<Self, ConfigError> {
        thresholds.validate()?;
        Ok(Self {
            statistical,
            semantic,
            thresholds,
        })
    }

    /// The configured thresholds.
    pub fn thresholds(&self) -> FusionThresholds {
        self.thresholds
    }

    /// The statistical scorer.
    pub fn statistical(&self) -> &StatisticalScorer {
        &self.statistical
    }

    /// Compares a text pair, escalating to the semantic scorer only for the
    /// difficult band.
    #[instrument(skip(self, a, b), fields(a_len = a.len(), b_len = b.len()))]
    pub async fn detect(&self, a: &str, b: &str) -> ScoringResult<SimilarityResult> {
        let stat = self.statistical.score(a, b);

        if stat < self.thresholds.low {
            debug!(statistical = stat, "easy negative, skipping semantic");
            return Ok(SimilarityResult::statistical_only(
                stat,
                CaseType::EasyNegative,
            ));
        }

        if stat > self.thresholds.high {
            debug!(statistical = stat, "easy positive, skipping semantic");
            return Ok(SimilarityResult::statistical_only(
                stat,
                CaseType::EasyPositive,
            ));
        }

        let semantic = self.semantic.score(a, b).await?;
        let result = SimilarityResult::hybrid(stat, semantic);
        debug!(
            statistical = stat,
            semantic = semantic,
            fused = result.fused,
            "difficult case fused"
        );
        Ok(result)
    }
}

impl std::fmt::Debug for HybridDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HybridDetector")
            .field("thresholds", &self.thresholds)
            .finish_non_exhaustive()
    }
}
