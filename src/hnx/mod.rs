//! HNX adapter: a JavaScript-rendered table paginated by clicking "next".
//!
//! The crawl drives a browser page through the table, one page at a time:
//! extract the rows, inspect the next-page control, click, wait for the DOM to
//! settle, repeat. It stops when the control is absent or disabled, or at the
//! page ceiling. The whole walk is retried from the start on failure.

mod browser;
mod chromium;
mod crawl;
mod extract;
mod shared;

pub use browser::{Browser, BrowserContext, BrowserLauncher, BrowserPage, ControlState};
pub use chromium::ChromiumLauncher;
pub use extract::extract_rows;
pub use shared::SharedBrowser;

use crate::core::{
    FeedClient, FeedError, RawRow, RestrictedSecurity,
    models::Exchange,
    normalize::{HNX_COLUMNS, normalize_rows},
};

/// Crawls the HNX restricted list through the client's shared browser.
#[derive(Debug, Clone)]
pub struct HnxSource {
    client: FeedClient,
}

impl HnxSource {
    /// Creates a source bound to `client`'s settings and browser handle.
    pub fn new(client: &FeedClient) -> Self {
        Self {
            client: client.clone(),
        }
    }

    /// Walks every page of the table and returns the raw rows in page-then-row order.
    ///
    /// # Errors
    ///
    /// Returns a `FeedError` if the browser cannot be launched, or navigation or
    /// interaction still fails after all retries.
    #[tracing::instrument(skip(self), err)]
    pub async fn crawl_rows(&self) -> Result<Vec<RawRow>, FeedError> {
        crawl::crawl(&self.client).await
    }

    /// Walks every page and normalizes the rows, dropping the ones that fail.
    ///
    /// # Errors
    ///
    /// See [`HnxSource::crawl_rows`].
    pub async fn crawl(&self) -> Result<Vec<RestrictedSecurity>, FeedError> {
        let rows = self.crawl_rows().await?;
        let records = normalize_rows(&rows, &HNX_COLUMNS, Exchange::ExchangeB);
        tracing::info!(rows = rows.len(), records = records.len(), "hnx crawl finished");
        Ok(records)
    }
}
