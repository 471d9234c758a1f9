//! Similarity scoring: statistical, semantic, and the fusion policy.

mod error;
pub mod fusion;
pub mod semantic;
pub mod statistical;
mod types;


pub use error::{ScoringError, ScoringResult};
pub use fusion::HybridDetector;
pub use semantic::{EmbeddingScorer, cosine_similarity};
pub use statistical::StatisticalScorer;
pub use types::{CaseType, Method, SimilarityResult};
