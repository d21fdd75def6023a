//! Public client surface + builder.
//! Internals are split into `retry` (policy + runner) and `constants` (UA + defaults).

pub(crate) mod constants;
pub mod retry;

pub use retry::{Backoff, RetryConfig};

use crate::core::FeedError;
use crate::hnx::SharedBrowser;
use constants::{
    DEFAULT_HNX_URL, DEFAULT_HSX_URL, HNX_NEXT_SELECTOR, HNX_ROW_SELECTOR, HNX_TABLE_SELECTOR,
    HSX_PAGE_SIZE, HTTP_TIMEOUT, MAX_PAGES, PAGE_LOAD_TIMEOUT, SELECTOR_TIMEOUT, USER_AGENT,
};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Resolved, immutable settings for one client. Built by [`FeedClientBuilder`].
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// HOSE JSON endpoint.
    pub hsx_url: Url,
    /// HNX page rendered in the browser.
    pub hnx_url: Url,
    pub user_agent: String,
    /// Per-request HTTP timeout.
    pub http_timeout: Duration,
    pub connect_timeout: Option<Duration>,
    /// Browser navigation wait.
    pub page_load_timeout: Duration,
    /// Browser selector and DOM-settle waits.
    pub selector_timeout: Duration,
    /// Rows requested per HOSE page.
    pub hsx_page_size: u32,
    /// Page ceiling shared by both adapters.
    pub max_pages: u32,
    pub hnx_table_selector: String,
    pub hnx_row_selector: String,
    pub hnx_next_selector: String,
    pub retry: RetryConfig,
    /// Run both sources as joined tasks instead of one after the other.
    pub concurrent_sources: bool,
}

/// Entry point of the crate: holds the HTTP client, the settings, and the shared browser handle.
///
/// Cloning is cheap; clones share the HTTP connection pool and the browser handle.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: Client,
    config: Arc<FeedConfig>,
    browser: Arc<SharedBrowser>,
}

impl Default for FeedClient {
    fn default() -> Self {
        Self::builder().build().expect("default client")
    }
}

impl FeedClient {
    /// Create a new builder.
    pub fn builder() -> FeedClientBuilder {
        FeedClientBuilder::default()
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) fn browser(&self) -> &Arc<SharedBrowser> {
        &self.browser
    }
}

/* ----------------------- Builder ----------------------- */

#[derive(Default)]
pub struct FeedClientBuilder {
    user_agent: Option<String>,
    hsx_url: Option<Url>,
    hnx_url: Option<Url>,

    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    page_load_timeout: Option<Duration>,
    selector_timeout: Option<Duration>,

    hsx_page_size: Option<u32>,
    max_pages: Option<u32>,
    hnx_table_selector: Option<String>,
    hnx_row_selector: Option<String>,
    hnx_next_selector: Option<String>,

    retry: Option<RetryConfig>,
    concurrent_sources: bool,
    browser: Option<Arc<SharedBrowser>>,
}

impl FeedClientBuilder {
    /// Override the User-Agent.
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Override the HOSE JSON endpoint.
    #[must_use]
    pub fn hsx_url(mut self, url: Url) -> Self {
        self.hsx_url = Some(url);
        self
    }

    /// Override the HNX page URL.
    #[must_use]
    pub fn hnx_url(mut self, url: Url) -> Self {
        self.hnx_url = Some(url);
        self
    }

    /// Set the per-request HTTP timeout. Default: 20s.
    #[must_use]
    pub fn timeout(mut self, dur: Duration) -> Self {
        self.timeout = Some(dur);
        self
    }

    /// Set a connect timeout. Default: none.
    #[must_use]
    pub fn connect_timeout(mut self, dur: Duration) -> Self {
        self.connect_timeout = Some(dur);
        self
    }

    /// Set the browser navigation timeout. Default: 10s.
    #[must_use]
    pub fn page_load_timeout(mut self, dur: Duration) -> Self {
        self.page_load_timeout = Some(dur);
        self
    }

    /// Set the browser selector/DOM-settle timeout. Default: 10s.
    #[must_use]
    pub fn selector_timeout(mut self, dur: Duration) -> Self {
        self.selector_timeout = Some(dur);
        self
    }

    /// Rows requested per HOSE page. Default: 30.
    #[must_use]
    pub fn hsx_page_size(mut self, rows: u32) -> Self {
        self.hsx_page_size = Some(rows);
        self
    }

    /// Page ceiling for both adapters. Default: 50.
    #[must_use]
    pub fn max_pages(mut self, pages: u32) -> Self {
        self.max_pages = Some(pages);
        self
    }

    /// CSS selector of the HNX data table.
    #[must_use]
    pub fn hnx_table_selector(mut self, sel: impl Into<String>) -> Self {
        self.hnx_table_selector = Some(sel.into());
        self
    }

    /// CSS selector of the HNX data rows.
    #[must_use]
    pub fn hnx_row_selector(mut self, sel: impl Into<String>) -> Self {
        self.hnx_row_selector = Some(sel.into());
        self
    }

    /// CSS selector of the HNX "next page" control.
    #[must_use]
    pub fn hnx_next_selector(mut self, sel: impl Into<String>) -> Self {
        self.hnx_next_selector = Some(sel.into());
        self
    }

    /// Replace the retry policy used by both adapters.
    #[must_use]
    pub fn retry_config(mut self, cfg: RetryConfig) -> Self {
        self.retry = Some(cfg);
        self
    }

    /// Crawl both exchanges concurrently. Output order is unchanged.
    #[must_use]
    pub const fn concurrent_sources(mut self, yes: bool) -> Self {
        self.concurrent_sources = yes;
        self
    }

    /// Use a specific browser handle instead of the process-wide Chromium one.
    #[must_use]
    pub fn shared_browser(mut self, browser: Arc<SharedBrowser>) -> Self {
        self.browser = Some(browser);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns an error if a default URL fails to parse, a limit is zero, a selector is
    /// not valid CSS, or the HTTP client cannot be built.
    pub fn build(self) -> Result<FeedClient, FeedError> {
        let hsx_url = match self.hsx_url {
            Some(u) => u,
            None => Url::parse(DEFAULT_HSX_URL)?,
        };
        let hnx_url = match self.hnx_url {
            Some(u) => u,
            None => Url::parse(DEFAULT_HNX_URL)?,
        };

        let config = FeedConfig {
            hsx_url,
            hnx_url,
            user_agent: self.user_agent.unwrap_or_else(|| USER_AGENT.to_string()),
            http_timeout: self.timeout.unwrap_or(HTTP_TIMEOUT),
            connect_timeout: self.connect_timeout,
            page_load_timeout: self.page_load_timeout.unwrap_or(PAGE_LOAD_TIMEOUT),
            selector_timeout: self.selector_timeout.unwrap_or(SELECTOR_TIMEOUT),
            hsx_page_size: self.hsx_page_size.unwrap_or(HSX_PAGE_SIZE),
            max_pages: self.max_pages.unwrap_or(MAX_PAGES),
            hnx_table_selector: self
                .hnx_table_selector
                .unwrap_or_else(|| HNX_TABLE_SELECTOR.to_string()),
            hnx_row_selector: self
                .hnx_row_selector
                .unwrap_or_else(|| HNX_ROW_SELECTOR.to_string()),
            hnx_next_selector: self
                .hnx_next_selector
                .unwrap_or_else(|| HNX_NEXT_SELECTOR.to_string()),
            retry: self.retry.unwrap_or_default(),
            concurrent_sources: self.concurrent_sources,
        };

        if config.hsx_page_size == 0 || config.max_pages == 0 {
            return Err(FeedError::Config(
                "page size and page ceiling must be positive".into(),
            ));
        }
        for sel in [&config.hnx_table_selector, &config.hnx_row_selector, &config.hnx_next_selector] {
            scraper::Selector::parse(sel)
                .map_err(|e| FeedError::Config(format!("invalid selector `{sel}`: {e}")))?;
        }

        let mut httpb = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .cookie_store(true)
            .timeout(config.http_timeout);
        if let Some(ct) = config.connect_timeout {
            httpb = httpb.connect_timeout(ct);
        }
        let http = httpb.build()?;

        Ok(FeedClient {
            http,
            config: Arc::new(config),
            browser: self.browser.unwrap_or_else(SharedBrowser::global),
        })
    }
}
