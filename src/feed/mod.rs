//! One end-to-end aggregation run over both exchanges.

use std::collections::HashSet;

use crate::core::{CrawlResult, Exchange, FeedClient, FeedError, RestrictedSecurity};
use crate::hnx::HnxSource;
use crate::hsx::HsxSource;

/// Runs both adapters and merges their records into one [`CrawlResult`].
///
/// HOSE records come first, HNX records second. A failure in either source
/// aborts the run; no partial result is returned.
#[derive(Debug, Clone)]
pub struct Aggregator {
    hsx: HsxSource,
    hnx: HnxSource,
    concurrent: bool,
}

impl Aggregator {
    /// Creates an aggregator using `client`'s settings.
    pub fn new(client: &FeedClient) -> Self {
        Self {
            hsx: HsxSource::new(client),
            hnx: HnxSource::new(client),
            concurrent: client.config().concurrent_sources,
        }
    }

    /// Crawls both exchanges and returns the merged feed.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Source`] wrapping the first unrecovered adapter error.
    #[tracing::instrument(skip(self), err)]
    pub async fn run(&self) -> Result<CrawlResult, FeedError> {
        let hsx = async {
            self.hsx.fetch_records().await.map_err(|e| FeedError::Source {
                exchange: Exchange::ExchangeA,
                source: Box::new(e),
            })
        };
        let hnx = async {
            self.hnx.crawl().await.map_err(|e| FeedError::Source {
                exchange: Exchange::ExchangeB,
                source: Box::new(e),
            })
        };

        let (hsx_records, hnx_records) = if self.concurrent {
            tokio::try_join!(hsx, hnx)?
        } else {
            let a = hsx.await?;
            (a, hnx.await?)
        };

        let result = CrawlResult::new(merge(hsx_records, hnx_records));
        tracing::info!(total = result.metadata.total, "aggregation finished");
        Ok(result)
    }
}

/// Concatenates `first` then `second`, keeping the first record seen for each `(exchange, ticker)`.
pub fn merge(
    first: Vec<RestrictedSecurity>,
    second: Vec<RestrictedSecurity>,
) -> Vec<RestrictedSecurity> {
    let mut seen = HashSet::new();
    first
        .into_iter()
        .chain(second)
        .filter(|rec| seen.insert((rec.exchange, rec.ticker.clone())))
        .collect()
}

impl FeedClient {
    /// Crawls both exchanges and returns the merged, normalized feed.
    ///
    /// # Errors
    ///
    /// See [`Aggregator::run`].
    pub async fn run_aggregation(&self) -> Result<CrawlResult, FeedError> {
        Aggregator::new(self).run().await
    }
}
