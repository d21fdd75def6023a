#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use httpmock::MockServer;
use serde_json::json;
use url::Url;
use vn_restricted_rs::hnx::{Browser, BrowserContext, BrowserLauncher, BrowserPage, ControlState};
use vn_restricted_rs::{Backoff, FeedClient, FeedClientBuilder, FeedError, RetryConfig, SharedBrowser};

pub const HSX_PATH: &str = "/Modules/Listed/Web/NonMarginList";

pub fn live_enabled() -> bool {
    std::env::var("FEED_LIVE").ok().as_deref() == Some("1")
}

/// Default policy shape with a 1ms fixed backoff, for fast tests.
pub fn fast_retry() -> RetryConfig {
    RetryConfig {
        backoff: Backoff::Fixed(Duration::from_millis(1)),
        ..RetryConfig::default()
    }
}

pub fn hsx_url(server: &MockServer) -> Url {
    Url::parse(&server.url(HSX_PATH)).unwrap()
}

/// A builder pointed at the mock server and a fake browser site.
pub fn builder(server: &MockServer, site: &Arc<FakeSite>) -> FeedClientBuilder {
    FeedClient::builder()
        .hsx_url(hsx_url(server))
        .hnx_url(Url::parse("https://hnx.test/restricted.html").unwrap())
        .retry_config(fast_retry())
        .shared_browser(Arc::new(SharedBrowser::new(Arc::new(FakeLauncher::new(site)))))
}

/* ---------------- HOSE bodies ---------------- */

/// A jqGrid page whose rows carry the given cells.
pub fn hsx_page(rows: &[Vec<&str>]) -> String {
    let rows: Vec<_> = rows
        .iter()
        .enumerate()
        .map(|(i, cells)| json!({ "id": i + 1, "cell": cells }))
        .collect();
    json!({ "page": 1, "total": 1, "records": rows.len(), "rows": rows }).to_string()
}

pub fn hsx_empty_page() -> String {
    hsx_page(&[])
}

/// A well-formed 8-cell HOSE row.
pub fn hsx_row<'a>(ticker: &'a str, name: &'a str, date: &'a str, reason: &'a str) -> Vec<&'a str> {
    vec!["1", ticker, "STK", "VN000000", name, date, reason, "x"]
}

/* ---------------- HNX markup ---------------- */

/// A rendered HNX page holding the given `[no, ticker, name, date, reason]` rows.
pub fn hnx_html(rows: &[[&str; 5]]) -> String {
    let body: String = rows
        .iter()
        .map(|cells| {
            let tds: String = cells.iter().map(|c| format!("<td>{c}</td>")).collect();
            format!("<tr>{tds}</tr>")
        })
        .collect();
    format!(
        "<html><body><table id=\"_tableDatas\"><thead><tr><th>STT</th><th>Mã CK</th>\
         <th>Tên</th><th>Ngày</th><th>Lý do</th></tr></thead><tbody>{body}</tbody></table>\
         <ul class=\"pagination\"><li><a id=\"next\">›</a></li></ul></body></html>"
    )
}

/* ---------------- Fake browser ---------------- */

/// A scripted HNX site: a list of pages, each with its markup and next-control state.
#[derive(Default)]
pub struct FakeSite {
    pub pages: Vec<(String, ControlState)>,
    pub table_missing: bool,
    /// How long each navigation takes.
    pub goto_delay: Duration,
    /// Number of upcoming clicks that fail with an automation error.
    pub failing_clicks: AtomicUsize,
    /// Number of upcoming launches that fail.
    pub failing_launches: AtomicUsize,
    pub launches: AtomicUsize,
    pub contexts_opened: AtomicUsize,
    pub contexts_closed: AtomicUsize,
    pub navigations: AtomicUsize,
    pub clicks: AtomicUsize,
    pub visited: Mutex<Vec<usize>>,
    /// Table markup handed to each settle wait, in call order.
    pub settle_snapshots: Mutex<Vec<String>>,
    last_browser: Mutex<Option<Arc<AtomicBool>>>,
}

impl FakeSite {
    pub fn new(pages: Vec<(String, ControlState)>) -> Arc<Self> {
        Arc::new(Self {
            pages,
            ..Self::default()
        })
    }

    pub fn with_goto_delay(pages: Vec<(String, ControlState)>, goto_delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            pages,
            goto_delay,
            ..Self::default()
        })
    }

    pub fn without_table() -> Arc<Self> {
        Arc::new(Self {
            table_missing: true,
            ..Self::default()
        })
    }

    /// Simulates the browser process dying.
    pub fn disconnect(&self) {
        if let Some(flag) = self.last_browser.lock().unwrap().as_ref() {
            flag.store(false, Ordering::SeqCst);
        }
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

fn take_one(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

pub struct FakeLauncher {
    site: Arc<FakeSite>,
}

impl FakeLauncher {
    pub fn new(site: &Arc<FakeSite>) -> Self {
        Self {
            site: Arc::clone(site),
        }
    }
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    async fn launch(&self) -> Result<Arc<dyn Browser>, FeedError> {
        // give concurrent callers a chance to race
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.site.launches.fetch_add(1, Ordering::SeqCst);
        if take_one(&self.site.failing_launches) {
            return Err(FeedError::Automation("chromium exited".into()));
        }
        let connected = Arc::new(AtomicBool::new(true));
        *self.site.last_browser.lock().unwrap() = Some(Arc::clone(&connected));
        Ok(Arc::new(FakeBrowser {
            site: Arc::clone(&self.site),
            connected,
        }))
    }
}

struct FakeBrowser {
    site: Arc<FakeSite>,
    connected: Arc<AtomicBool>,
}

#[async_trait]
impl Browser for FakeBrowser {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn new_context(&self) -> Result<Box<dyn BrowserContext>, FeedError> {
        self.site.contexts_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeContext {
            site: Arc::clone(&self.site),
        }))
    }
}

struct FakeContext {
    site: Arc<FakeSite>,
}

#[async_trait]
impl BrowserContext for FakeContext {
    async fn new_page(&mut self) -> Result<Box<dyn BrowserPage>, FeedError> {
        Ok(Box::new(FakePage {
            site: Arc::clone(&self.site),
            idx: 0,
        }))
    }

    async fn close(self: Box<Self>) -> Result<(), FeedError> {
        self.site.contexts_closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct FakePage {
    site: Arc<FakeSite>,
    idx: usize,
}

impl FakePage {
    fn current(&self) -> Result<&(String, ControlState), FeedError> {
        self.site
            .pages
            .get(self.idx)
            .ok_or_else(|| FeedError::Automation("page out of range".into()))
    }
}

#[async_trait]
impl BrowserPage for FakePage {
    async fn goto(&mut self, _url: &str, _timeout: Duration) -> Result<(), FeedError> {
        self.site.navigations.fetch_add(1, Ordering::SeqCst);
        if !self.site.goto_delay.is_zero() {
            tokio::time::sleep(self.site.goto_delay).await;
        }
        self.idx = 0;
        Ok(())
    }

    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> Result<(), FeedError> {
        if self.site.table_missing {
            return Err(FeedError::Timeout(format!("`{selector}` after {timeout:?}")));
        }
        Ok(())
    }

    async fn content(&mut self) -> Result<String, FeedError> {
        self.site.visited.lock().unwrap().push(self.idx);
        Ok(self.current()?.0.clone())
    }

    async fn control_state(&mut self, _selector: &str) -> Result<ControlState, FeedError> {
        Ok(self.current()?.1)
    }

    async fn inner_html(&mut self, _selector: &str) -> Result<String, FeedError> {
        Ok(self.current()?.0.clone())
    }

    async fn click(&mut self, _selector: &str) -> Result<(), FeedError> {
        self.site.clicks.fetch_add(1, Ordering::SeqCst);
        if take_one(&self.site.failing_clicks) {
            return Err(FeedError::Automation("element detached".into()));
        }
        self.idx += 1;
        Ok(())
    }

    async fn wait_for_settle(
        &mut self,
        selector: &str,
        previous: &str,
        timeout: Duration,
    ) -> Result<(), FeedError> {
        self.site
            .settle_snapshots
            .lock()
            .unwrap()
            .push(previous.to_string());
        if self.current()?.0 == previous {
            return Err(FeedError::Timeout(format!("`{selector}` unchanged after {timeout:?}")));
        }
        Ok(())
    }
}
