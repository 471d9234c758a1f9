use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::sink::MemorySink;
use super::{
    CandidateOrigin, Checker, CheckerError, CheckReport, SinkError, Verdict, VerdictLabel,
    VerdictSink,
};
use crate::config::Config;
use crate::embedding::MockEmbedder;
use crate::web::{MockPageFetcher, MockSearchProvider, SearchError, SearchHit, SearchProvider};

const PASSAGE_A: &str =
    "ශ්‍රී ලංකාවේ අධ්‍යාපන පද්ධතිය පසුගිය දශක කිහිපය තුළ සැලකිය යුතු ලෙස නවීකරණය වී ඇත";
const PASSAGE_B: &str =
    "කෘෂිකර්මාන්තය රටේ ආර්ථිකයට විශාල දායකත්වයක් සපයන ප්‍රධාන ක්ෂේත්‍රයක් ලෙස සැලකේ";

fn test_config() -> Config {
    Config {
        min_fetch_interval: Duration::from_millis(1),
        ..Config::default()
    }
}

fn checker(search: MockSearchProvider, fetcher: MockPageFetcher, sink: Arc<dyn VerdictSink>) -> Checker {
    Checker::from_parts(
        test_config(),
        Arc::new(MockEmbedder::new()),
        Arc::new(search),
        Arc::new(fetcher),
        sink,
    )
    .unwrap()
}

fn corpus() -> Vec<String> {
    vec![PASSAGE_A.to_string(), PASSAGE_B.to_string()]
}

fn page_with(paragraphs: &[&str]) -> String {
    let body: String = paragraphs.iter().map(|p| format!("<p>{p}</p>")).collect();
    format!("<html><head><title>මූලාශ්‍රය</title></head><body>{body}</body></html>")
}

#[test]
fn verdict_labels_follow_score_bands() {
    assert_eq!(VerdictLabel::from_max_score(0.95), VerdictLabel::High);
    assert_eq!(VerdictLabel::from_max_score(0.9), VerdictLabel::High);
    assert_eq!(VerdictLabel::from_max_score(0.75), VerdictLabel::Moderate);
    assert_eq!(VerdictLabel::from_max_score(0.55), VerdictLabel::Low);
    assert_eq!(VerdictLabel::from_max_score(0.4), VerdictLabel::Original);
    assert_eq!(Verdict::original().label, VerdictLabel::Original);
}

#[test]
fn assembly_requires_embedding_url() {
    let err = Checker::new(test_config()).unwrap_err();
    assert!(matches!(err, CheckerError::MissingEmbeddingUrl));
}

#[tokio::test]
async fn degenerate_input_is_original_without_retrieval() {
    let sink = Arc::new(MemorySink::new());
    let checker = checker(
        MockSearchProvider::failing(),
        MockPageFetcher::empty(),
        Arc::clone(&sink) as Arc<dyn VerdictSink>,
    );

    let report = checker.check("අඩුයි").await;

    assert_eq!(report.verdict.label, VerdictLabel::Original);
    assert_eq!(report.sources_requested, 0);
    assert_eq!(report.pairs_compared, 0);
    assert!(report.matches.is_empty());
    // Even a short-circuited check is persisted.
    assert_eq!(sink.reports().len(), 1);
}

#[tokio::test]
async fn exact_corpus_copy_scores_high() {
    let sink = Arc::new(MemorySink::new());
    let checker = checker(
        MockSearchProvider::empty(),
        MockPageFetcher::empty(),
        Arc::clone(&sink) as Arc<dyn VerdictSink>,
    );
    checker.index_corpus(&corpus()).await.unwrap();

    let report = checker.check(PASSAGE_A).await;

    assert_eq!(report.verdict.label, VerdictLabel::High);
    assert!(report.verdict.max_score > 0.99);
    assert!(!report.matches.is_empty());
    assert_eq!(report.matches[0].candidate.origin, CandidateOrigin::Corpus);
    assert_eq!(report.matches[0].candidate.source, "corpus:0");
    assert!(report.sources_checked > 0);
    assert!(!report.timed_out);
    assert_eq!(sink.reports().len(), 1);
}

#[tokio::test]
async fn unrelated_input_is_original() {
    let checker = checker(
        MockSearchProvider::empty(),
        MockPageFetcher::empty(),
        Arc::new(MemorySink::new()),
    );
    checker.index_corpus(&corpus()).await.unwrap();

    let report = checker
        .check("සෞඛ්‍ය සේවා ක්ෂේත්‍රයේ නව තාක්ෂණික මෙවලම් භාවිතය වේගයෙන් වර්ධනය වෙමින් පවතී")
        .await;

    assert_eq!(report.verdict.label, VerdictLabel::Original);
    assert!(report.matches.is_empty());
    // The corpus was still consulted and scored.
    assert!(report.sources_requested > 0);
    assert!(report.pairs_compared > 0);
}

#[tokio::test]
async fn no_candidates_yields_original_report() {
    let checker = checker(
        MockSearchProvider::empty(),
        MockPageFetcher::empty(),
        Arc::new(MemorySink::new()),
    );

    let report = checker.check(PASSAGE_A).await;

    assert_eq!(report.verdict.label, VerdictLabel::Original);
    assert_eq!(report.sources_requested, 0);
    assert_eq!(report.sources_checked, 0);
}

#[tokio::test]
async fn web_matches_deduplicate_per_source() {
    let search = MockSearchProvider::with_hits(vec![SearchHit {
        url: "https://example.lk/article".to_string(),
        title: "ලිපිය".to_string(),
        snippet: String::new(),
    }]);
    let fetcher = MockPageFetcher::empty()
        .with_page("https://example.lk/article", page_with(&[PASSAGE_A, PASSAGE_B]));
    let checker = checker(search, fetcher, Arc::new(MemorySink::new()));

    let report = checker.check(PASSAGE_A).await;

    // Both page paragraphs were scored, but only the best survives per URL.
    assert_eq!(report.matches.len(), 1);
    assert_eq!(report.matches[0].candidate.origin, CandidateOrigin::Web);
    assert_eq!(report.matches[0].candidate.source, "https://example.lk/article");
    assert!(report.matches[0].result.fused > 0.99);
    assert_eq!(report.verdict.label, VerdictLabel::High);
}

#[tokio::test]
async fn search_failure_degrades_to_corpus_only() {
    let checker = checker(
        MockSearchProvider::failing(),
        MockPageFetcher::empty(),
        Arc::new(MemorySink::new()),
    );
    checker.index_corpus(&corpus()).await.unwrap();

    let report = checker.check(PASSAGE_A).await;

    assert_eq!(report.verdict.label, VerdictLabel::High);
    assert_eq!(report.matches[0].candidate.origin, CandidateOrigin::Corpus);
}

#[tokio::test]
async fn sentence_matches_cover_copied_sentences() {
    let checker = checker(
        MockSearchProvider::empty(),
        MockPageFetcher::empty(),
        Arc::new(MemorySink::new()),
    );
    checker.index_corpus(&corpus()).await.unwrap();

    let report = checker.check(PASSAGE_A).await;

    assert!(report.sentence_pairs_compared > 0);
    assert!(!report.sentence_matches.is_empty());
    assert_eq!(report.sentence_matches[0].source, "corpus:0");
    assert!(report.sentence_matches[0].result.fused > 0.99);
}

struct HangingSearchProvider;

#[async_trait]
impl SearchProvider for HangingSearchProvider {
    async fn search(&self, _query: &str, _n: usize) -> Result<Vec<SearchHit>, SearchError> {
        std::future::pending().await
    }
}

#[tokio::test(start_paused = true)]
async fn hung_search_endpoint_cannot_stall_a_check() {
    let config = Config {
        check_timeout: Duration::from_millis(100),
        ..test_config()
    };
    let checker = Checker::from_parts(
        config,
        Arc::new(MockEmbedder::new()),
        Arc::new(HangingSearchProvider),
        Arc::new(MockPageFetcher::empty()),
        Arc::new(MemorySink::new()),
    )
    .unwrap();
    checker.index_corpus(&corpus()).await.unwrap();

    // The whole check must resolve within the deadline even though the
    // search future never does.
    let report = tokio::time::timeout(Duration::from_secs(3), checker.check(PASSAGE_A))
        .await
        .unwrap();

    assert!(report.timed_out);
    // Corpus retrieval finished before the deadline, so its candidates
    // were still gathered.
    assert_eq!(report.sources_requested, 2);
}

#[tokio::test]
async fn source_counts_are_per_source_not_per_passage() {
    let search = MockSearchProvider::with_hits(vec![SearchHit {
        url: "https://example.lk/article".to_string(),
        title: String::new(),
        snippet: String::new(),
    }]);
    // One URL contributing two passages counts once.
    let fetcher = MockPageFetcher::empty()
        .with_page("https://example.lk/article", page_with(&[PASSAGE_A, PASSAGE_B]));
    let checker = checker(search, fetcher, Arc::new(MemorySink::new()));
    checker.index_corpus(&corpus()).await.unwrap();

    let report = checker.check(PASSAGE_A).await;

    assert_eq!(report.sources_requested, 3);
    assert_eq!(report.sources_checked, 3);
}

struct FailingSink;

#[async_trait]
impl VerdictSink for FailingSink {
    async fn store(&self, _report: &CheckReport) -> Result<(), SinkError> {
        Err(SinkError::StoreFailed {
            message: "disk full".to_string(),
        })
    }
}

#[tokio::test]
async fn sink_failure_does_not_fail_the_check() {
    let checker = checker(
        MockSearchProvider::empty(),
        MockPageFetcher::empty(),
        Arc::new(FailingSink),
    );
    checker.index_corpus(&corpus()).await.unwrap();

    let report = checker.check(PASSAGE_A).await;
    assert_eq!(report.verdict.label, VerdictLabel::High);
}
