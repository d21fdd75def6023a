//! vn-restricted-rs: one normalized feed of trading-restricted and delisted securities.
//!
//! Two sources are crawled and reconciled into [`RestrictedSecurity`] records:
//! - HOSE, a page-indexed JSON endpoint ([`HsxSource`]).
//! - HNX, a JavaScript-rendered table paginated by clicking "next" ([`HnxSource`]),
//!   driven through a headless browser that is shared across runs.
//!
//! [`FeedClient::run_aggregation`] runs both and returns a [`CrawlResult`] that
//! serializes to `{"data": [...], "metadata": {"total": .., "generated_at": ..}}`.
//!
//! ```no_run
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = vn_restricted_rs::FeedClient::builder().build()?;
//! let result = client.run_aggregation().await?;
//! println!("{}", serde_json::to_string_pretty(&result)?);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod feed;
pub mod hnx;
pub mod hsx;

pub use crate::core::{
    Backoff, CrawlMetadata, CrawlResult, Exchange, FeedClient, FeedClientBuilder, FeedConfig,
    FeedError, RawRow, RestrictedSecurity, RetryConfig,
};
pub use feed::Aggregator;
pub use hnx::{ChromiumLauncher, HnxSource, SharedBrowser};
pub use hsx::HsxSource;

/// Installs a `fmt` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Intended for demos and tests; libraries embedding this crate should install their own.
#[cfg(feature = "tracing-subscriber")]
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
