use thiserror::Error;

use crate::core::models::Exchange;

/// The primary error type for all fallible operations in this crate.
#[derive(Debug, Error)]
pub enum FeedError {
    /// An error occurred during an HTTP request (connect, read, or request timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server returned an unexpected or unsuccessful HTTP status code.
    #[error("Unexpected response status: {status} at {url}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The URL that returned the error.
        url: String,
    },

    /// A provided URL could not be parsed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The response body was not in the shape the source is known to produce.
    #[error("Unexpected response shape: {0}")]
    Protocol(String),

    /// A single row could not be normalized (bad date, missing ticker, short row).
    #[error("Row parse error: {0}")]
    Parse(String),

    /// The headless browser failed to launch, navigate, or interact with the page.
    #[error("Browser automation error: {0}")]
    Automation(String),

    /// A bounded wait (request, page load, selector, DOM settle) was exceeded.
    #[error("Timed out: {0}")]
    Timeout(String),

    /// The client configuration is invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// One of the sources failed after exhausting its retries; the run is aborted.
    #[error("Crawling {exchange} failed: {source}")]
    Source {
        /// The exchange whose adapter failed.
        exchange: Exchange,
        /// The final error reported by the adapter.
        source: Box<FeedError>,
    },
}

impl From<chromiumoxide::error::CdpError> for FeedError {
    fn from(e: chromiumoxide::error::CdpError) -> Self {
        FeedError::Automation(e.to_string())
    }
}

impl FeedError {
    /// Returns `true` for timeout failures, including reqwest's own request timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            FeedError::Timeout(_) => true,
            FeedError::Http(e) => e.is_timeout(),
            _ => false,
        }
    }
}
