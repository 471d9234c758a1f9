//! The external web search capability.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

use super::error::SearchError;

/// One ranked search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Result URL.
    pub url: String,
    /// Result title.
    pub title: String,
    /// Result snippet.
    pub snippet: String,
}

/// Async web search contract. Zero results is a normal outcome; missing
/// credentials are a configuration state, not an error.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Searches for up to `n` results.
    async fn search(&self, query: &str, n: usize) -> Result<Vec<SearchHit>, SearchError>;
}

const GOOGLE_SEARCH_URL: &str = "https://www.googleapis.com/customsearch/v1";
const MAX_PROVIDER_RESULTS: usize = 10;

#[derive(Deserialize)]
struct GoogleResponse {
    #[serde(default)]
    items: Vec<GoogleItem>,
}

#[derive(Deserialize)]
struct GoogleItem {
    link: Option<String>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
}

/// Google Custom Search JSON API provider, restricted to Sinhala results.
pub struct GoogleSearchProvider {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
    api_key: Option<String>,
    engine_id: Option<String>,
}

impl GoogleSearchProvider {
    /// Creates a provider with a per-call timeout. Either credential may be
    /// absent; searches then resolve to empty result sets with a warning.
    pub fn new(api_key: Option<String>, engine_id: Option<String>, timeout: Duration) -> Self {
        Self::with_base_url(api_key, engine_id, GOOGLE_SEARCH_URL, timeout)
    }

    /// Creates a provider against a non-default endpoint (used by tests).
    pub fn with_base_url(
        api_key: Option<String>,
        engine_id: Option<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        if api_key.is_none() || engine_id.is_none() {
            warn!("web search credentials not configured, discovery will return no results");
        }
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            timeout,
            api_key,
            engine_id,
        }
    }

    /// Returns `true` when both credentials are present.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.engine_id.is_some()
    }
}

impl std::fmt::Debug for GoogleSearchProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleSearchProvider")
            .field("base_url", &self.base_url)
            .field("configured", &self.is_configured())
            .finish()
    }
}

#[async_trait]
impl SearchProvider for GoogleSearchProvider {
    async fn search(&self, query: &str, n: usize) -> Result<Vec<SearchHit>, SearchError> {
        let (Some(api_key), Some(engine_id)) = (&self.api_key, &self.engine_id) else {
            return Ok(Vec::new());
        };

        let n = n.clamp(1, MAX_PROVIDER_RESULTS);
        let response = self
            .client
            .get(&self.base_url)
            .timeout(self.timeout)
            .query(&[
                ("key", api_key.as_str()),
                ("cx", engine_id.as_str()),
                ("q", query),
                ("num", &n.to_string()),
                ("lr", "lang_si"),
                ("safe", "active"),
            ])
            .send()
            .await
            .map_err(|e| SearchError::RequestFailed {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::BadStatus {
                status: status.as_u16(),
            });
        }

        let body: GoogleResponse =
            response
                .json()
                .await
                .map_err(|e| SearchError::MalformedResponse {
                    message: e.to_string(),
                })?;

        let hits: Vec<SearchHit> = body
            .items
            .into_iter()
            .filter_map(|item| {
                item.link.map(|url| SearchHit {
                    url,
                    title: item.title,
                    snippet: item.snippet,
                })
            })
            .collect();

        info!(hits = hits.len(), "web search complete");
        Ok(hits)
    }
}

/// In-process search provider for tests: serves a fixed hit list.
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Default)]
pub struct MockSearchProvider {
    hits: Vec<SearchHit>,
    fail: bool,
}

#[cfg(any(test, feature = "mock"))]
impl MockSearchProvider {
    /// A provider returning no hits.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A provider returning the given hits.
    pub fn with_hits(hits: Vec<SearchHit>) -> Self {
        Self { hits, fail: false }
    }

    /// A provider failing every call.
    pub fn failing() -> Self {
        Self {
            hits: Vec::new(),
            fail: true,
        }
    }
}

#[cfg(any(test, feature = "mock"))]
#[async_trait]
impl SearchProvider for MockSearchProvider {
    async fn search(&self, _query: &str, n: usize) -> Result<Vec<SearchHit>, SearchError> {
        if self.fail {
            return Err(SearchError::RequestFailed {
                message: "mock search configured to fail".to_string(),
            });
        }
        Ok(self.hits.iter().take(n).cloned().collect())
    }
}
