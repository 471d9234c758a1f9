//! Web candidate discovery: query construction, cached search, rate-limited
//! fetch, and content extraction.

mod error;
pub mod extract;
pub mod search;

#[cfg(test)]
mod tests;

pub use error::{FetchError, SearchError};
pub use extract::{HttpPageFetcher, PageFetcher, extract_paragraphs, extract_title};
#[cfg(any(test, feature = "mock"))]
pub use extract::MockPageFetcher;
#[cfg(any(test, feature = "mock"))]
pub use search::MockSearchProvider;
pub use search::{GoogleSearchProvider, SearchHit, SearchProvider};

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::sync::{Mutex, Semaphore};
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::cache::TtlCacheHandle;
use crate::checker::Candidate;
use crate::hashing::hash_query;
use crate::text::{self, Document};

/// Maximum search query length in characters.
const MAX_QUERY_CHARS: usize = 150;
/// Sentences considered for query construction.
const MAX_QUERY_SENTENCES: usize = 3;
/// Minimum content words for the stopword-stripped variant to be usable.
const MIN_QUERY_WORDS: usize = 3;

/// URL extensions the extractor cannot parse as HTML.
const SKIPPED_URL_EXTENSIONS: &[&str] = &[".pdf", ".doc", ".docx"];

/// Returns `true` for URLs pointing at non-HTML document formats.
fn is_document_url(url: &str) -> bool {
    let path = url
        .split(['?', '#'])
        .next()
        .unwrap_or(url)
        .to_ascii_lowercase();
    SKIPPED_URL_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// Builds a search query from the leading sentences of a document.
///
/// Takes the first one to three normalized sentences up to the length cap
/// and strips stopwords when enough content words remain, which improves
/// external search relevance.
pub fn build_query(document: &Document) -> Option<String> {
    let base = if document.sentences.is_empty() {
        document.normalized.clone()
    } else {
        let mut query = document.sentences[0].clone();
        for sentence in document.sentences.iter().take(MAX_QUERY_SENTENCES).skip(1) {
            if query.chars().count() + sentence.chars().count() + 1 > MAX_QUERY_CHARS {
                break;
            }
            query.push(' ');
            query.push_str(sentence);
        }
        query
    };

    if base.is_empty() {
        return None;
    }

    let stripped = text::strip_stopwords(&base);
    let query = if stripped.split_whitespace().count() >= MIN_QUERY_WORDS {
        stripped
    } else {
        base
    };

    Some(query.chars().take(MAX_QUERY_CHARS).collect())
}

/// Spaces out successive outbound requests to the same external service.
struct RateLimiter {
    min_interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last: Mutex::new(None),
        }
    }

    /// Waits until at least `min_interval` has passed since the previous
    /// caller was released.
    async fn acquire(&self) {
        let mut last = self.last.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// Turns input text into scored-ready web candidates: search, fetch,
/// extract, cache.
pub struct WebRetriever {
    search: Arc<dyn SearchProvider>,
    fetcher: Arc<dyn PageFetcher>,
    cache: TtlCacheHandle<Vec<Candidate>>,
    limiter: RateLimiter,
    fetch_permits: Arc<Semaphore>,
    results_per_query: usize,
}

impl WebRetriever {
    /// Creates a retriever.
    ///
    /// `min_fetch_interval` is the mandatory spacing between outbound
    /// fetches; `fetch_concurrency` bounds how many are in flight at once.
    pub fn new(
        search: Arc<dyn SearchProvider>,
        fetcher: Arc<dyn PageFetcher>,
        cache: TtlCacheHandle<Vec<Candidate>>,
        min_fetch_interval: Duration,
        fetch_concurrency: usize,
        results_per_query: usize,
    ) -> Self {
        Self {
            search,
            fetcher,
            cache,
            limiter: RateLimiter::new(min_fetch_interval),
            fetch_permits: Arc::new(Semaphore::new(fetch_concurrency.max(1))),
            results_per_query,
        }
    }

    /// The cache backing this retriever.
    pub fn cache(&self) -> &TtlCacheHandle<Vec<Candidate>> {
        &self.cache
    }

    /// Discovers web candidates for a document.
    ///
    /// Zero search results yields an empty list, not an error; only a
    /// failing search capability surfaces as [`SearchError`]. Individual
    /// page failures are absorbed and logged.
    #[instrument(skip(self, document))]
    pub async fn discover(&self, document: &Document) -> Result<Vec<Candidate>, SearchError> {
        let Some(query) = build_query(document) else {
            debug!("document yielded no usable query");
            return Ok(Vec::new());
        };

        let key = hash_query(&query);
        if let Some(cached) = self.cache.get(&key) {
            info!(candidates = cached.len(), "web cache hit");
            return Ok(cached);
        }

        let mut hits = self.search.search(&query, self.results_per_query).await?;
        hits.retain(|hit| {
            if is_document_url(&hit.url) {
                debug!(url = %hit.url, "skipping non-HTML document url");
                return false;
            }
            true
        });
        if hits.is_empty() {
            debug!("search returned no usable results");
            return Ok(Vec::new());
        }

        let fetches = hits.into_iter().map(|hit| {
            let fetcher = Arc::clone(&self.fetcher);
            let permits = Arc::clone(&self.fetch_permits);
            let limiter = &self.limiter;
            async move {
                let _permit = permits
                    .acquire()
                    .await
                    .expect("fetch semaphore closed unexpectedly");
                limiter.acquire().await;

                match fetcher.fetch(&hit.url).await {
                    Ok(html) => {
                        let title = if hit.title.is_empty() {
                            extract_title(&html).unwrap_or_default()
                        } else {
                            hit.title.clone()
                        };
                        extract_paragraphs(&html)
                            .into_iter()
                            .map(|p| Candidate::web(hit.url.clone(), title.clone(), p))
                            .collect::<Vec<_>>()
                    }
                    Err(e) => {
                        warn!(url = %hit.url, error = %e, "page fetch failed, skipping");
                        Vec::new()
                    }
                }
            }
        });

        let candidates: Vec<Candidate> = join_all(fetches).await.into_iter().flatten().collect();

        info!(candidates = candidates.len(), "web discovery complete");
        self.cache.set(key, candidates.clone());
        Ok(candidates)
    }
}

impl std::fmt::Debug for WebRetriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebRetriever")
            .field("results_per_query", &self.results_per_query)
            .finish_non_exhaustive()
    }
}
