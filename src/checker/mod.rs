//! The end-to-end plagiarism check pipeline.
//!
//! One [`Checker`] owns every stage: candidate retrieval (corpus index and
//! web discovery in parallel), tiered hybrid scoring over a bounded worker
//! pool, sentence-level refinement for matched sources, and report
//! persistence. Retrieval and storage failures degrade the report instead
//! of failing the check; only assembly can error.

mod error;
mod sink;
mod types;

#[cfg(test)]
mod tests;

pub use error::{CheckerError, CheckerResult};
#[cfg(any(test, feature = "mock"))]
pub use sink::MemorySink;
pub use sink::{NoopSink, SinkError, VerdictSink};
pub use types::{
    Candidate, CandidateMatch, CandidateOrigin, CheckReport, SentenceMatch, Verdict, VerdictLabel,
};

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::{Instant, timeout};
use tracing::{debug, info, instrument, warn};

use crate::batch::BatchScheduler;
use crate::cache::TtlCacheHandle;
use crate::config::Config;
use crate::embedding::{CachedEmbedder, Embedder, RemoteEmbedder};
use crate::index::{CorpusIndex, IndexResult};
use crate::scoring::{EmbeddingScorer, HybridDetector, SimilarityResult, StatisticalScorer};
use crate::text::Document;
use crate::web::{
    GoogleSearchProvider, HttpPageFetcher, PageFetcher, SearchProvider, WebRetriever,
};

/// Sentence-level matching runs this far below the document-level match
/// threshold, catching partial reuse the paragraph pass smooths over.
const SENTENCE_THRESHOLD_OFFSET: f32 = 0.1;

/// The assembled similarity check pipeline.
pub struct Checker {
    config: Config,
    detector: Arc<HybridDetector>,
    index: Arc<CorpusIndex>,
    retriever: WebRetriever,
    scheduler: BatchScheduler,
    sink: Arc<dyn VerdictSink>,
}

impl Checker {
    /// Assembles a checker from configuration with production components:
    /// a remote embedder, Google search, and an HTTP fetcher. Reports are
    /// discarded; use [`Checker::from_parts`] to attach a sink.
    pub fn new(config: Config) -> CheckerResult<Self> {
        let url = config
            .embedding_url
            .clone()
            .ok_or(CheckerError::MissingEmbeddingUrl)?;
        let embedder =
            RemoteEmbedder::new(url, config.embedding_timeout).map_err(|e| {
                CheckerError::HttpClient {
                    message: e.to_string(),
                }
            })?;
        let search = GoogleSearchProvider::new(
            config.search_api_key.clone(),
            config.search_engine_id.clone(),
            config.fetch_timeout,
        );
        let fetcher =
            HttpPageFetcher::new(config.fetch_timeout).map_err(|e| CheckerError::HttpClient {
                message: e.to_string(),
            })?;

        Self::from_parts(
            config,
            Arc::new(embedder),
            Arc::new(search),
            Arc::new(fetcher),
            Arc::new(NoopSink),
        )
    }

    /// Assembles a checker from explicit components. The embedder is
    /// wrapped in the shared TTL cache; scorers, index, retriever, and the
    /// worker pool are built from `config`.
    pub fn from_parts(
        config: Config,
        embedder: Arc<dyn Embedder>,
        search: Arc<dyn SearchProvider>,
        fetcher: Arc<dyn PageFetcher>,
        sink: Arc<dyn VerdictSink>,
    ) -> CheckerResult<Self> {
        config.validate()?;

        let embedding_cache =
            TtlCacheHandle::new(config.embedding_cache_capacity, config.embedding_cache_ttl);
        let embedder: Arc<dyn Embedder> = Arc::new(CachedEmbedder::new(embedder, embedding_cache));

        let statistical = StatisticalScorer::new(config.weights)?;
        let semantic = EmbeddingScorer::new(Arc::clone(&embedder));
        let detector = Arc::new(HybridDetector::new(
            statistical,
            semantic,
            config.thresholds,
        )?);

        let index = Arc::new(CorpusIndex::new(Arc::clone(&embedder)));
        let web_cache = TtlCacheHandle::new(config.web_cache_capacity, config.web_cache_ttl);
        let retriever = WebRetriever::new(
            search,
            fetcher,
            web_cache,
            config.min_fetch_interval,
            config.fetch_concurrency,
            config.search_results,
        );
        let scheduler = BatchScheduler::new(config.batch_workers);

        Ok(Self {
            config,
            detector,
            index,
            retriever,
            scheduler,
            sink,
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// (Re)builds the local corpus index from reference passages.
    pub async fn index_corpus(&self, passages: &[String]) -> IndexResult<()> {
        self.index.build(passages).await
    }

    /// Runs the full check for one document and returns the report.
    ///
    /// Never fails: retrieval errors shrink the candidate set, scoring
    /// errors and the per-check deadline are recorded in the report, and a
    /// sink failure is logged while the report is still returned.
    #[instrument(skip(self, raw), fields(raw_len = raw.len()))]
    pub async fn check(&self, raw: &str) -> CheckReport {
        let started_at = Utc::now();
        let started = Instant::now();
        let document = Document::new(raw);

        if document.is_degenerate() {
            debug!("input too short to score meaningfully");
            return self
                .seal(CheckReport {
                    verdict: Verdict::original(),
                    matches: Vec::new(),
                    sentence_matches: Vec::new(),
                    sources_requested: 0,
                    sources_checked: 0,
                    pairs_compared: 0,
                    sentence_pairs_compared: 0,
                    timed_out: false,
                    elapsed: started.elapsed(),
                    started_at,
                })
                .await;
        }

        let (candidates, retrieval_timed_out) = self
            .gather_candidates(&document, self.config.check_timeout)
            .await;
        let sources_requested = distinct_sources(candidates.iter());
        if candidates.is_empty() {
            info!("no candidates to compare against");
            return self
                .seal(CheckReport {
                    verdict: Verdict::original(),
                    matches: Vec::new(),
                    sentence_matches: Vec::new(),
                    sources_requested,
                    sources_checked: 0,
                    pairs_compared: 0,
                    sentence_pairs_compared: 0,
                    timed_out: retrieval_timed_out,
                    elapsed: started.elapsed(),
                    started_at,
                })
                .await;
        }

        let paragraphs = Arc::new(document.paragraphs.clone());
        let units: Vec<_> = candidates
            .iter()
            .map(|candidate| {
                let detector = Arc::clone(&self.detector);
                let paragraphs = Arc::clone(&paragraphs);
                let text = candidate.text.clone();
                move || async move {
                    let mut best: Option<SimilarityResult> = None;
                    let mut pairs = 0usize;
                    for paragraph in paragraphs.iter() {
                        let result = detector.detect(paragraph, &text).await?;
                        pairs += 1;
                        if best.as_ref().is_none_or(|b| result.fused > b.fused) {
                            best = Some(result);
                        }
                    }
                    Ok::<_, crate::scoring::ScoringError>((best, pairs))
                }
            })
            .collect();

        // Scoring only gets what the retrieval phase left of the budget.
        let scoring_budget = self.config.check_timeout.saturating_sub(started.elapsed());
        let outcomes = self.scheduler.run(units, Some(scoring_budget)).await;

        let mut timed_out = retrieval_timed_out;
        let mut checked_sources: HashSet<String> = HashSet::new();
        let mut pairs_compared = 0usize;
        let mut scored: Vec<CandidateMatch> = Vec::new();

        for (candidate, outcome) in candidates.into_iter().zip(outcomes) {
            if outcome.is_timed_out() {
                timed_out = true;
                continue;
            }
            match outcome.ok() {
                Some((best, pairs)) => {
                    checked_sources.insert(candidate.source.clone());
                    pairs_compared += pairs;
                    if let Some(result) = best {
                        scored.push(CandidateMatch { candidate, result });
                    }
                }
                // Failed units were already logged by the scheduler.
                None => {}
            }
        }
        let sources_checked = checked_sources.len();

        let matches = self.keep_matches(scored);

        let remaining = self.config.check_timeout.saturating_sub(started.elapsed());
        let (sentence_matches, sentence_pairs_compared, sentences_cut_short) = self
            .match_sentences(&document, &matches, remaining)
            .await;
        timed_out |= sentences_cut_short;

        let verdict = if matches.is_empty() {
            Verdict::original()
        } else {
            let max = matches
                .iter()
                .map(|m| m.result.fused)
                .fold(f32::MIN, f32::max);
            let sum: f32 = matches.iter().map(|m| m.result.fused).sum();
            Verdict {
                max_score: max,
                average_score: sum / matches.len() as f32,
                label: VerdictLabel::from_max_score(max),
            }
        };

        info!(
            sources_requested,
            sources_checked,
            matches = matches.len(),
            label = ?verdict.label,
            timed_out,
            "check complete"
        );

        self.seal(CheckReport {
            verdict,
            matches,
            sentence_matches,
            sources_requested,
            sources_checked,
            pairs_compared,
            sentence_pairs_compared,
            timed_out,
            elapsed: started.elapsed(),
            started_at,
        })
        .await
    }

    /// Retrieves corpus and web candidates concurrently under the check
    /// deadline. A side that fails or misses the deadline narrows the
    /// candidate set to the other with a warning; the returned flag records
    /// whether anything was cut off by the deadline.
    async fn gather_candidates(
        &self,
        document: &Document,
        budget: Duration,
    ) -> (Vec<Candidate>, bool) {
        let (corpus, web) = tokio::join!(
            timeout(
                budget,
                self.index
                    .search(&document.normalized, self.config.corpus_top_k)
            ),
            timeout(budget, self.retriever.discover(document)),
        );

        let mut candidates = Vec::new();
        let mut timed_out = false;

        match corpus {
            Ok(Ok(matches)) => {
                candidates.extend(
                    matches
                        .into_iter()
                        .map(|m| Candidate::corpus(m.entry.id, m.entry.text)),
                );
            }
            Ok(Err(e)) => warn!(error = %e, "corpus retrieval failed, continuing web-only"),
            Err(_) => {
                warn!("corpus retrieval missed the check deadline");
                timed_out = true;
            }
        }

        match web {
            Ok(Ok(found)) => candidates.extend(found),
            Ok(Err(e)) => warn!(error = %e, "web retrieval failed, continuing corpus-only"),
            Err(_) => {
                warn!("web retrieval missed the check deadline");
                timed_out = true;
            }
        }

        (candidates, timed_out)
    }

    /// Applies the match threshold, keeps the best match per source, and
    /// sorts by descending fused score.
    fn keep_matches(&self, scored: Vec<CandidateMatch>) -> Vec<CandidateMatch> {
        let mut best_per_source: HashMap<String, CandidateMatch> = HashMap::new();

        for m in scored {
            if m.result.fused < self.config.match_threshold {
                continue;
            }
            match best_per_source.get(&m.candidate.source) {
                Some(kept) if kept.result.fused >= m.result.fused => {}
                _ => {
                    best_per_source.insert(m.candidate.source.clone(), m);
                }
            }
        }

        let mut matches: Vec<CandidateMatch> = best_per_source.into_values().collect();
        matches.sort_by(|a, b| {
            b.result
                .fused
                .partial_cmp(&a.result.fused)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        matches
    }

    /// Sentence-level refinement over matched sources: for every input
    /// sentence, keeps the best source sentence at or above the lowered
    /// threshold. Respects what is left of the check deadline.
    async fn match_sentences(
        &self,
        document: &Document,
        matches: &[CandidateMatch],
        remaining: Duration,
    ) -> (Vec<SentenceMatch>, usize, bool) {
        if matches.is_empty() || document.sentences.is_empty() {
            return (Vec::new(), 0, false);
        }

        let threshold =
            (self.config.match_threshold - SENTENCE_THRESHOLD_OFFSET).max(0.0);
        let deadline = Instant::now() + remaining;

        let mut sentence_matches = Vec::new();
        let mut pairs = 0usize;

        'outer: for input_sentence in &document.sentences {
            let mut best: Option<SentenceMatch> = None;

            for m in matches {
                for source_sentence in crate::text::split_sentences(&m.candidate.text) {
                    if Instant::now() >= deadline {
                        warn!(pairs, "deadline elapsed during sentence matching");
                        break 'outer;
                    }

                    let result = match self.detector.detect(input_sentence, &source_sentence).await
                    {
                        Ok(result) => result,
                        Err(e) => {
                            warn!(error = %e, "sentence pair scoring failed, skipping");
                            continue;
                        }
                    };
                    pairs += 1;

                    if result.fused < threshold {
                        continue;
                    }
                    if best
                        .as_ref()
                        .is_none_or(|b| result.fused > b.result.fused)
                    {
                        best = Some(SentenceMatch {
                            input_sentence: input_sentence.clone(),
                            source_sentence,
                            source: m.candidate.source.clone(),
                            result,
                        });
                    }
                }
            }

            if let Some(found) = best {
                sentence_matches.push(found);
            }
        }

        let cut_short = Instant::now() >= deadline;
        sentence_matches.sort_by(|a, b| {
            b.result
                .fused
                .partial_cmp(&a.result.fused)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        (sentence_matches, pairs, cut_short)
    }

    /// Hands the report to the sink. Storage is best-effort.
    async fn seal(&self, report: CheckReport) -> CheckReport {
        if let Err(e) = self.sink.store(&report).await {
            warn!(error = %e, "report sink failed, report still returned");
        }
        report
    }
}

/// Number of distinct sources (URLs / corpus ids) across candidates.
fn distinct_sources<'a>(candidates: impl Iterator<Item = &'a Candidate>) -> usize {
    candidates
        .map(|c| c.source.as_str())
        .collect::<HashSet<_>>()
        .len()
}

impl std::fmt::Debug for Checker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Checker")
            .field("workers", &self.scheduler.workers())
            .field("match_threshold", &self.config.match_threshold)
            .finish_non_exhaustive()
    }
}
