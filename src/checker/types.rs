use std::time::Duration;

use serde::Serialize;

use crate::scoring::SimilarityResult;

/// Where a candidate passage came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateOrigin {
    /// Pre-indexed local corpus.
    Corpus,
    /// Live web retrieval.
    Web,
}

/// A retrieved passage compared against the input document. Read-only
/// downstream of the retriever that created it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    /// Normalized passage text.
    pub text: String,
    /// Origin of the passage.
    pub origin: CandidateOrigin,
    /// Corpus id or source URL.
    pub source: String,
    /// Page or passage title, empty when unknown.
    pub title: String,
}

impl Candidate {
    /// A candidate hydrated from the local corpus index.
    pub fn corpus(id: usize, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: CandidateOrigin::Corpus,
            source: format!("corpus:{id}"),
            title: String::new(),
        }
    }

    /// A candidate extracted from a web page.
    pub fn web(url: impl Into<String>, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: CandidateOrigin::Web,
            source: url.into(),
            title: title.into(),
        }
    }
}

/// A scored candidate kept in the final report.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateMatch {
    /// The candidate passage.
    pub candidate: Candidate,
    /// Scoring outcome for (input, candidate).
    pub result: SimilarityResult,
}

/// A sentence-level match between the input and one source sentence.
#[derive(Debug, Clone, Serialize)]
pub struct SentenceMatch {
    /// Input sentence (normalized).
    pub input_sentence: String,
    /// Best-matching source sentence (normalized).
    pub source_sentence: String,
    /// Source URL or corpus id.
    pub source: String,
    /// Scoring outcome for the sentence pair.
    pub result: SimilarityResult,
}

/// Aggregate label over the whole document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictLabel {
    /// No meaningful overlap found.
    Original,
    /// Max fused score at or above 0.5.
    Low,
    /// Max fused score at or above 0.7.
    Moderate,
    /// Max fused score at or above 0.9.
    High,
}

impl VerdictLabel {
    /// Maps a maximum fused score to its verdict label.
    pub fn from_max_score(max: f32) -> Self {
        if max >= 0.9 {
            Self::High
        } else if max >= 0.7 {
            Self::Moderate
        } else if max >= 0.5 {
            Self::Low
        } else {
            Self::Original
        }
    }
}

/// Aggregation over all similarity results for one document.
#[derive(Debug, Clone, Serialize)]
pub struct Verdict {
    /// Highest fused score across kept matches.
    pub max_score: f32,
    /// Mean fused score across kept matches, 0.0 when none.
    pub average_score: f32,
    /// Label derived from `max_score`.
    pub label: VerdictLabel,
}

impl Verdict {
    /// The verdict for a document with no matches at all.
    pub fn original() -> Self {
        Self {
            max_score: 0.0,
            average_score: 0.0,
            label: VerdictLabel::Original,
        }
    }
}

/// The complete outcome of one plagiarism check.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    /// Aggregate verdict.
    pub verdict: Verdict,
    /// Paragraph-level matches, deduplicated per source, sorted by
    /// descending fused score.
    pub matches: Vec<CandidateMatch>,
    /// Sentence-level matches, best per input sentence, sorted by
    /// descending fused score.
    pub sentence_matches: Vec<SentenceMatch>,
    /// Candidate sources the pipeline set out to score.
    pub sources_requested: usize,
    /// Candidate sources actually scored before errors/timeout.
    pub sources_checked: usize,
    /// Scored (paragraph, candidate) pairs.
    pub pairs_compared: usize,
    /// Scored sentence pairs.
    pub sentence_pairs_compared: usize,
    /// `true` when the per-check deadline cut scoring short.
    pub timed_out: bool,
    /// Wall-clock duration of the check.
    #[serde(skip)]
    pub elapsed: Duration,
    /// When the check started.
    pub started_at: chrono::DateTime<chrono::Utc>,
}
