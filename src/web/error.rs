use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the web search capability.
pub enum SearchError {
    /// The search endpoint could not be reached or timed out.
    #[error("search request failed: {message}")]
    RequestFailed {
        /// Error message.
        message: String,
    },

    /// The search endpoint answered with a non-success status.
    #[error("search endpoint returned status {status}")]
    BadStatus {
        /// HTTP status code.
        status: u16,
    },

    /// The response body could not be decoded.
    #[error("malformed search response: {message}")]
    MalformedResponse {
        /// Error message.
        message: String,
    },
}

#[derive(Debug, Error)]
/// Errors returned when fetching a candidate page.
pub enum FetchError {
    /// The page could not be fetched within the timeout.
    #[error("failed to fetch '{url}': {message}")]
    RequestFailed {
        /// Page URL.
        url: String,
        /// Error message.
        message: String,
    },

    /// The server answered with a non-success status.
    #[error("'{url}' returned status {status}")]
    BadStatus {
        /// Page URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },
}
