use std::sync::Arc;

use super::CorpusIndex;
use crate::embedding::MockEmbedder;

fn passages() -> Vec<String> {
    vec![
        "ගුරුතුමා පන්තියේ සිසුන්ට පාඩම ඉගැන්නුවා".to_string(),
        "ශ්‍රී ලංකාවේ අධ්‍යාපන පද්ධතිය නවීකරණය වී ඇත".to_string(),
        "කෘෂිකර්මාන්තය රටේ ආර්ථිකයට වැදගත් වේ".to_string(),
    ]
}

#[tokio::test]
async fn search_before_build_returns_empty() {
    let index = CorpusIndex::new(Arc::new(MockEmbedder::new()));
    let matches = index.search("ඕනෑම විමසුමක්", 5).await.unwrap();
    assert!(matches.is_empty());
    assert!(index.is_empty().await);
}

#[tokio::test]
async fn search_finds_matching_passage() {
    // Scenario D: querying with passage 2's text returns passage 2 first.
    let index = CorpusIndex::new(Arc::new(MockEmbedder::new()));
    index.build(&passages()).await.unwrap();
    assert_eq!(index.len().await, 3);

    let matches = index
        .search("ශ්‍රී ලංකාවේ අධ්‍යාපන පද්ධතිය නවීකරණය වී ඇත", 1)
        .await
        .unwrap();

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].entry.id, 1);
    assert!(matches[0].score > 0.99);
}

#[tokio::test]
async fn results_are_sorted_descending() {
    let index = CorpusIndex::new(Arc::new(MockEmbedder::new()));
    index.build(&passages()).await.unwrap();

    let matches = index
        .search("ගුරුතුමා පාඩම ඉගැන්නුවා", 3)
        .await
        .unwrap();

    assert_eq!(matches.len(), 3);
    for pair in matches.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    assert_eq!(matches[0].entry.id, 0);
}

#[tokio::test]
async fn k_bounds_result_count() {
    let index = CorpusIndex::new(Arc::new(MockEmbedder::new()));
    index.build(&passages()).await.unwrap();

    assert_eq!(index.search("පාඩම ඉගැන්නුවා", 2).await.unwrap().len(), 2);
    assert!(index.search("පාඩම ඉගැන්නුවා", 0).await.unwrap().is_empty());
}

#[tokio::test]
async fn rebuild_replaces_previous_index() {
    let index = CorpusIndex::new(Arc::new(MockEmbedder::new()));
    index.build(&passages()).await.unwrap();
    assert_eq!(index.len().await, 3);

    index
        .build(&["අලුත් ඡේදයක් පමණි".to_string()])
        .await
        .unwrap();
    assert_eq!(index.len().await, 1);

    let matches = index.search("අලුත් ඡේදයක් පමණි", 5).await.unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].entry.id, 0);
}

#[tokio::test]
async fn empty_passages_are_skipped() {
    let index = CorpusIndex::new(Arc::new(MockEmbedder::new()));
    index
        .build(&[
            "ගුරුතුමා පාඩම ඉගැන්නුවා".to_string(),
            "   ".to_string(),
            "123 english only".to_string(),
        ])
        .await
        .unwrap();
    assert_eq!(index.len().await, 1);
}

#[tokio::test]
async fn embedder_failure_is_distinguishable() {
    let index = CorpusIndex::new(Arc::new(MockEmbedder::failing()));
    assert!(index.build(&passages()).await.is_err());

    // A built index with a failing embedder still fails search clearly.
    let index = CorpusIndex::new(Arc::new(MockEmbedder::new()));
    index.build(&passages()).await.unwrap();
    // Empty query short-circuits without touching the embedder.
    assert!(index.search("", 3).await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_query_returns_empty() {
    let index = CorpusIndex::new(Arc::new(MockEmbedder::new()));
    index.build(&passages()).await.unwrap();
    assert!(index.search("!!! 123", 3).await.unwrap().is_empty());
}
