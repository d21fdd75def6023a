//! HOSE adapter: page-indexed jqGrid JSON endpoint.
//!
//! The endpoint never reports how many pages exist, so pages are requested in
//! order until one comes back empty (or the page ceiling is reached).

mod api;
mod wire;

use crate::core::{
    FeedClient, FeedError, RawRow, RestrictedSecurity,
    models::Exchange,
    normalize::{HSX_COLUMNS, normalize_rows},
};

/// Fetches the HOSE restricted list.
#[derive(Debug, Clone)]
pub struct HsxSource {
    client: FeedClient,
}

impl HsxSource {
    /// Creates a source bound to `client`'s settings.
    pub fn new(client: &FeedClient) -> Self {
        Self {
            client: client.clone(),
        }
    }

    /// Fetches one page (1-based) under the retry policy.
    ///
    /// A body that is not JSON, or that lacks the `rows` array, yields an empty page.
    ///
    /// # Errors
    ///
    /// Returns a `FeedError` if the request still fails after all retries, or the
    /// server answers with a non-retryable status.
    #[tracing::instrument(skip(self), err)]
    pub async fn fetch_page(&self, page: u32) -> Result<Vec<RawRow>, FeedError> {
        api::fetch_page(&self.client, page).await
    }

    /// Fetches pages `1, 2, ...` until an empty page, returning all rows in page order.
    ///
    /// # Errors
    ///
    /// Returns the first page error that survives the retry policy.
    #[tracing::instrument(skip(self), err)]
    pub async fn fetch_all(&self) -> Result<Vec<RawRow>, FeedError> {
        api::fetch_all(&self.client).await
    }

    /// Fetches every page and normalizes the rows, dropping the ones that fail.
    ///
    /// # Errors
    ///
    /// See [`HsxSource::fetch_all`].
    pub async fn fetch_records(&self) -> Result<Vec<RestrictedSecurity>, FeedError> {
        let rows = self.fetch_all().await?;
        let records = normalize_rows(&rows, &HSX_COLUMNS, Exchange::ExchangeA);
        tracing::info!(rows = rows.len(), records = records.len(), "hsx crawl finished");
        Ok(records)
    }
}
