//! Helacheck library crate: hybrid similarity detection for Sinhala text.
//!
//! # Public API Surface
//!
//! The exports are organized by module:
//!
//! ## Pipeline
//! - [`Checker`], [`CheckReport`], [`Verdict`], [`VerdictLabel`] - The
//!   end-to-end check pipeline and its report types
//! - [`VerdictSink`], [`NoopSink`] - Report persistence
//!
//! ## Scoring
//! - [`HybridDetector`], [`SimilarityResult`], [`CaseType`] - Tiered
//!   statistical/semantic score fusion
//! - [`StatisticalScorer`], [`EmbeddingScorer`] - The two scorers
//!
//! ## Retrieval
//! - [`CorpusIndex`], [`IndexMatch`] - Local nearest-neighbor corpus search
//! - [`WebRetriever`], [`SearchProvider`], [`PageFetcher`] - Web candidate
//!   discovery and extraction
//!
//! ## Infrastructure
//! - [`Config`], [`ConfigError`] - Environment-backed configuration
//! - [`Embedder`], [`RemoteEmbedder`], [`CachedEmbedder`] - Vector
//!   generation
//! - [`TtlCache`], [`TtlCacheHandle`] - Bounded TTL caching
//! - [`BatchScheduler`], [`UnitOutcome`] - Bounded-concurrency batch runs
//! - [`text`] - Sinhala normalization and segmentation primitives
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod batch;
pub mod cache;
pub mod checker;
pub mod config;
pub mod embedding;
pub mod hashing;
pub mod index;
pub mod scoring;
pub mod text;
pub mod web;

pub use batch::{BatchScheduler, UnitOutcome};
pub use cache::{TtlCache, TtlCacheHandle};
#[cfg(any(test, feature = "mock"))]
pub use checker::MemorySink;
pub use checker::{
    Candidate, CandidateMatch, CandidateOrigin, CheckReport, Checker, CheckerError, NoopSink,
    SentenceMatch, SinkError, Verdict, VerdictLabel, VerdictSink,
};
pub use config::{Config, ConfigError, FusionThresholds, StatWeights};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbedder;
pub use embedding::{CachedEmbedder, Embedder, EmbeddingError, RemoteEmbedder};
pub use hashing::{hash_query, hash_text, hash_to_u64};
pub use index::{CorpusIndex, IndexEntry, IndexError, IndexMatch};
pub use scoring::{
    CaseType, EmbeddingScorer, HybridDetector, Method, ScoringError, SimilarityResult,
    StatisticalScorer, cosine_similarity,
};
pub use text::Document;
#[cfg(any(test, feature = "mock"))]
pub use web::{MockPageFetcher, MockSearchProvider};
pub use web::{
    FetchError, GoogleSearchProvider, HttpPageFetcher, PageFetcher, SearchError, SearchHit,
    SearchProvider, WebRetriever, build_query,
};
