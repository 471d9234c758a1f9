use std::sync::Arc;
use std::time::Duration;

use super::extract::{MockPageFetcher, extract_paragraphs, extract_title};
use super::search::{MockSearchProvider, SearchHit};
use super::{WebRetriever, build_query, is_document_url};
use crate::cache::TtlCacheHandle;
use crate::text::Document;

const SINHALA_PARAGRAPH: &str =
    "ශ්‍රී ලංකාවේ අධ්‍යාපන පද්ධතිය පසුගිය දශක කිහිපය තුළ සැලකිය යුතු ලෙස නවීකරණය වී ඇති අතර ගුරුවරුන්ගේ කාර්යභාරය ද වෙනස් වී ඇත";

fn page_html() -> String {
    format!(
        "<html><head><title>පරීක්ෂණ පිටුව</title></head><body>\
         <nav><p>home | about | contact</p></nav>\
         <p>{SINHALA_PARAGRAPH}</p>\
         <p>short</p>\
         <p>{SINHALA_PARAGRAPH}</p>\
         </body></html>"
    )
}

fn retriever(
    search: MockSearchProvider,
    fetcher: MockPageFetcher,
) -> (WebRetriever, TtlCacheHandle<Vec<crate::checker::Candidate>>) {
    let cache = TtlCacheHandle::new(16, Duration::from_secs(60));
    let retriever = WebRetriever::new(
        Arc::new(search),
        Arc::new(fetcher),
        cache.clone(),
        Duration::from_millis(1),
        2,
        5,
    );
    (retriever, cache)
}

#[test]
fn build_query_uses_leading_sentences() {
    let doc = Document::new("ගුරුතුමා පාඩම ඉගැන්නුවා. සිසුවා සටහන් ලිව්වා.");
    let query = build_query(&doc).unwrap();
    assert!(query.contains("ගුරුතුමා"));
    assert!(query.chars().count() <= 150);
}

#[test]
fn build_query_strips_stopwords_when_enough_content_remains() {
    let doc = Document::new("මෙම ගුරුතුමා එම පාඩම ඉගැන්නුවා සහ සිසුවා සටහන් ලිව්වා");
    let query = build_query(&doc).unwrap();
    assert!(!query.split_whitespace().any(|w| w == "මෙම" || w == "සහ"));
}

#[test]
fn build_query_empty_document_is_none() {
    assert!(build_query(&Document::new("")).is_none());
    assert!(build_query(&Document::new("english only 123")).is_none());
}

#[test]
fn extract_keeps_only_sinhala_prose() {
    let paragraphs = extract_paragraphs(&page_html());
    // The nav line and the short line are filtered; the duplicate prose
    // paragraph is deduplicated.
    assert_eq!(paragraphs.len(), 1);
    assert!(paragraphs[0].contains("පද්ධතිය"));
}

#[test]
fn extract_title_reads_title_tag() {
    assert_eq!(
        extract_title(&page_html()),
        Some("පරීක්ෂණ පිටුව".to_string())
    );
    assert_eq!(extract_title("<html><body></body></html>"), None);
}

#[tokio::test]
async fn zero_search_results_is_empty_not_error() {
    // Scenario E.
    let (retriever, _cache) = retriever(MockSearchProvider::empty(), MockPageFetcher::empty());
    let doc = Document::new("ගුරුතුමා පන්තියේ සිසුන්ට පාඩම ඉගැන්නුවා");

    let candidates = retriever.discover(&doc).await.unwrap();
    assert!(candidates.is_empty());
}

#[tokio::test]
async fn discover_extracts_candidates_from_hits() {
    let search = MockSearchProvider::with_hits(vec![SearchHit {
        url: "https://example.lk/a".to_string(),
        title: "ලිපිය".to_string(),
        snippet: String::new(),
    }]);
    let fetcher = MockPageFetcher::empty().with_page("https://example.lk/a", page_html());
    let (retriever, _cache) = retriever(search, fetcher);

    let doc = Document::new("ශ්‍රී ලංකාවේ අධ්‍යාපන පද්ධතිය නවීකරණය වී ඇත");
    let candidates = retriever.discover(&doc).await.unwrap();

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].source, "https://example.lk/a");
    assert_eq!(candidates[0].title, "ලිපිය");
}

#[tokio::test]
async fn failed_fetches_are_skipped_not_fatal() {
    let search = MockSearchProvider::with_hits(vec![
        SearchHit {
            url: "https://example.lk/dead".to_string(),
            title: String::new(),
            snippet: String::new(),
        },
        SearchHit {
            url: "https://example.lk/live".to_string(),
            title: String::new(),
            snippet: String::new(),
        },
    ]);
    let fetcher = MockPageFetcher::empty().with_page("https://example.lk/live", page_html());
    let (retriever, _cache) = retriever(search, fetcher);

    let doc = Document::new("ශ්‍රී ලංකාවේ අධ්‍යාපන පද්ධතිය නවීකරණය වී ඇත");
    let candidates = retriever.discover(&doc).await.unwrap();

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].source, "https://example.lk/live");
    // Missing hit title falls back to the page <title>.
    assert_eq!(candidates[0].title, "පරීක්ෂණ පිටුව");
}

#[test]
fn document_format_urls_are_recognized() {
    assert!(is_document_url("https://example.lk/report.pdf"));
    assert!(is_document_url("https://example.lk/Thesis.PDF?download=1"));
    assert!(is_document_url("https://example.lk/essay.docx#page=2"));
    assert!(!is_document_url("https://example.lk/article"));
    assert!(!is_document_url("https://example.lk/pdf-guide.html"));
}

#[tokio::test]
async fn document_format_hits_are_never_fetched() {
    let search = MockSearchProvider::with_hits(vec![
        SearchHit {
            url: "https://example.lk/report.pdf".to_string(),
            title: String::new(),
            snippet: String::new(),
        },
        SearchHit {
            url: "https://example.lk/article".to_string(),
            title: String::new(),
            snippet: String::new(),
        },
    ]);
    // The pdf URL serves perfectly good prose; it must be skipped on
    // extension alone, not on fetch outcome.
    let fetcher = MockPageFetcher::empty()
        .with_page("https://example.lk/report.pdf", page_html())
        .with_page("https://example.lk/article", page_html());
    let (retriever, _cache) = retriever(search, fetcher);

    let doc = Document::new("ශ්‍රී ලංකාවේ අධ්‍යාපන පද්ධතිය නවීකරණය වී ඇත");
    let candidates = retriever.discover(&doc).await.unwrap();

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].source, "https://example.lk/article");
}

#[tokio::test]
async fn search_failure_propagates() {
    let (retriever, _cache) = retriever(MockSearchProvider::failing(), MockPageFetcher::empty());
    let doc = Document::new("ගුරුතුමා පන්තියේ සිසුන්ට පාඩම ඉගැන්නුවා");
    assert!(retriever.discover(&doc).await.is_err());
}

#[tokio::test]
async fn repeated_discovery_hits_the_cache() {
    let search = MockSearchProvider::with_hits(vec![SearchHit {
        url: "https://example.lk/a".to_string(),
        title: "ලිපිය".to_string(),
        snippet: String::new(),
    }]);
    let fetcher = MockPageFetcher::empty().with_page("https://example.lk/a", page_html());
    let (retriever, cache) = retriever(search, fetcher);

    let doc = Document::new("ශ්‍රී ලංකාවේ අධ්‍යාපන පද්ධතිය නවීකරණය වී ඇත");
    let first = retriever.discover(&doc).await.unwrap();
    assert_eq!(cache.len(), 1);

    let second = retriever.discover(&doc).await.unwrap();
    assert_eq!(first, second);
}
