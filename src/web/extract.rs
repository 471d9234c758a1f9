//! Page fetching and main-content extraction.
//!
//! Extraction keeps only `<p>` blocks that look like real Sinhala prose:
//! minimum length and a minimum share of Sinhala codepoints. Navigation,
//! boilerplate, and script-heavy noise fail those filters.

use async_trait::async_trait;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::debug;

use super::error::FetchError;
use crate::text;

/// Raw paragraph length floor before normalization.
const MIN_PARAGRAPH_CHARS: usize = 50;
/// Normalized paragraph length floor.
const MIN_NORMALIZED_CHARS: usize = 30;
/// Minimum share of Sinhala codepoints for a paragraph to count as prose.
const MIN_SINHALA_RATIO: f32 = 0.3;
/// Cap on kept paragraphs per page.
const MAX_PARAGRAPHS_PER_PAGE: usize = 20;

/// Async page fetch contract: URL in, HTML body out. Must enforce a finite
/// timeout.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the page body.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// reqwest-backed fetcher with a per-request timeout.
pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    /// Creates a fetcher with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (compatible; HelacheckBot/0.1)")
            .build()
            .map_err(|e| FetchError::RequestFailed {
                url: String::new(),
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

impl std::fmt::Debug for HttpPageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPageFetcher").finish_non_exhaustive()
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response =
            self.client
                .get(url)
                .send()
                .await
                .map_err(|e| FetchError::RequestFailed {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| FetchError::RequestFailed {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

/// Extracts normalized Sinhala prose paragraphs from an HTML body.
///
/// Deduplicates while preserving document order and caps the result at
/// [`MAX_PARAGRAPHS_PER_PAGE`].
pub fn extract_paragraphs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("p").expect("static selector");

    let mut seen = std::collections::HashSet::new();
    let mut paragraphs = Vec::new();

    for element in document.select(&selector) {
        let raw: String = element.text().collect::<Vec<_>>().join(" ");
        let raw = raw.trim();

        if raw.chars().count() < MIN_PARAGRAPH_CHARS {
            continue;
        }
        if text::sinhala_ratio(raw) < MIN_SINHALA_RATIO {
            continue;
        }

        let normalized = text::normalize(raw);
        if normalized.chars().count() < MIN_NORMALIZED_CHARS {
            continue;
        }

        if seen.insert(normalized.clone()) {
            paragraphs.push(normalized);
            if paragraphs.len() >= MAX_PARAGRAPHS_PER_PAGE {
                break;
            }
        }
    }

    debug!(paragraphs = paragraphs.len(), "page extraction complete");
    paragraphs
}

/// In-process fetcher for tests: serves bodies from a URL map.
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Default)]
pub struct MockPageFetcher {
    pages: std::collections::HashMap<String, String>,
}

#[cfg(any(test, feature = "mock"))]
impl MockPageFetcher {
    /// A fetcher serving no pages (every fetch fails).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Adds a page body for `url`.
    pub fn with_page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.insert(url.into(), body.into());
        self
    }
}

#[cfg(any(test, feature = "mock"))]
#[async_trait]
impl PageFetcher for MockPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::RequestFailed {
                url: url.to_string(),
                message: "mock fetcher has no body for this url".to_string(),
            })
    }
}

/// Extracts the page title, if any.
pub fn extract_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("title").expect("static selector");
    document
        .select(&selector)
        .next()
        .map(|t| t.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
}
