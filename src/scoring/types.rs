use serde::Serialize;

/// Which fusion branch a comparison took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseType {
    /// Statistical score below the low threshold; semantic comparison
    /// skipped.
    EasyNegative,
    /// Statistical score above the high threshold; semantic comparison
    /// skipped.
    EasyPositive,
    /// Ambiguous band; semantic comparison performed.
    Difficult,
}

/// How the fused score was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Statistical score only.
    StatisticalOnly,
    /// Mean of statistical and semantic scores.
    Hybrid,
}

/// The outcome of comparing one text pair.
///
/// `semantic` is populated exactly when `case_type` is
/// [`CaseType::Difficult`]; use the constructors to keep that invariant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityResult {
    /// Cheap surface-feature score in [0, 1].
    pub statistical: f32,
    /// Embedding-based score in [0, 1], difficult cases only.
    pub semantic: Option<f32>,
    /// Combined score in [0, 1].
    pub fused: f32,
    /// Fusion branch taken.
    pub case_type: CaseType,
    /// Scoring method used.
    pub method: Method,
}

impl SimilarityResult {
    /// A result decided by the statistical score alone.
    pub fn statistical_only(statistical: f32, case_type: CaseType) -> Self {
        debug_assert!(case_type != CaseType::Difficult);
        Self {
            statistical,
            semantic: None,
            fused: statistical,
            case_type,
            method: Method::StatisticalOnly,
        }
    }

    /// A difficult-case result fusing both scores by arithmetic mean.
    pub fn hybrid(statistical: f32, semantic: f32) -> Self {
        Self {
            statistical,
            semantic: Some(semantic),
            fused: (statistical + semantic) / 2.0,
            case_type: CaseType::Difficult,
            method: Method::Hybrid,
        }
    }
}
