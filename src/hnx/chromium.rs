//! Headless Chromium implementation of the browser traits, via chromiumoxide.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::BrowserConfig;
use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
use chromiumoxide::cdp::browser_protocol::target::{
    CreateBrowserContextParams, CreateTargetParams, DisposeBrowserContextParams,
};
use chromiumoxide::page::Page;
use futures::StreamExt;
use serde::de::DeserializeOwned;

use super::browser::{Browser, BrowserContext, BrowserLauncher, BrowserPage, ControlState};
use crate::core::FeedError;
use crate::core::client::constants::CHROMIUM_ARGS;

const POLL_INTERVAL: Duration = Duration::from_millis(150);

/// Launches headless Chromium.
///
/// Without an explicit executable, chromiumoxide looks at `$CHROME` and the usual install paths.
#[derive(Debug, Clone)]
pub struct ChromiumLauncher {
    executable: Option<PathBuf>,
    args: Vec<String>,
}

impl Default for ChromiumLauncher {
    fn default() -> Self {
        Self {
            executable: None,
            args: CHROMIUM_ARGS.iter().map(|a| (*a).to_string()).collect(),
        }
    }
}

impl ChromiumLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific Chromium/Chrome binary.
    #[must_use]
    pub fn executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable = Some(path.into());
        self
    }

    /// Append a command-line flag.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(&self) -> Result<Arc<dyn Browser>, FeedError> {
        let mut builder = BrowserConfig::builder();
        if let Some(path) = &self.executable {
            builder = builder.chrome_executable(path);
        }
        for arg in &self.args {
            builder = builder.arg(arg.as_str());
        }
        let config = builder.build().map_err(FeedError::Automation)?;

        let (browser, mut handler) = chromiumoxide::Browser::launch(config).await?;

        let connected = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&connected);
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!(error = %e, "chromium handler error");
                }
            }
            flag.store(false, Ordering::Release);
            tracing::info!("chromium connection closed");
        });

        Ok(Arc::new(ChromiumBrowser {
            browser: Arc::new(browser),
            connected,
        }))
    }
}

struct ChromiumBrowser {
    browser: Arc<chromiumoxide::Browser>,
    connected: Arc<AtomicBool>,
}

#[async_trait]
impl Browser for ChromiumBrowser {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    async fn new_context(&self) -> Result<Box<dyn BrowserContext>, FeedError> {
        let created = self
            .browser
            .execute(CreateBrowserContextParams::default())
            .await?;
        Ok(Box::new(ChromiumContext {
            browser: Arc::clone(&self.browser),
            id: created.result.browser_context_id.clone(),
        }))
    }
}

struct ChromiumContext {
    browser: Arc<chromiumoxide::Browser>,
    id: BrowserContextId,
}

#[async_trait]
impl BrowserContext for ChromiumContext {
    async fn new_page(&mut self) -> Result<Box<dyn BrowserPage>, FeedError> {
        let params = CreateTargetParams::builder()
            .url("about:blank")
            .browser_context_id(self.id.clone())
            .build()
            .map_err(FeedError::Automation)?;
        let page = self.browser.new_page(params).await?;
        Ok(Box::new(ChromiumPage { page }))
    }

    async fn close(self: Box<Self>) -> Result<(), FeedError> {
        self.browser
            .execute(DisposeBrowserContextParams::new(self.id.clone()))
            .await?;
        Ok(())
    }
}

struct ChromiumPage {
    page: Page,
}

impl ChromiumPage {
    async fn eval<T: DeserializeOwned>(&self, script: &str) -> Result<T, FeedError> {
        self.page
            .evaluate(script)
            .await?
            .into_value()
            .map_err(|e| FeedError::Automation(format!("unexpected script result: {e}")))
    }
}

fn js_string(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

#[async_trait]
impl BrowserPage for ChromiumPage {
    async fn goto(&mut self, url: &str, timeout: Duration) -> Result<(), FeedError> {
        match tokio::time::timeout(timeout, self.page.goto(url)).await {
            Ok(res) => {
                res?;
                Ok(())
            }
            Err(_) => Err(FeedError::Timeout(format!(
                "loading {url} took longer than {timeout:?}"
            ))),
        }
    }

    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> Result<(), FeedError> {
        let script = format!("document.querySelector({}) !== null", js_string(selector));
        let wait = async {
            loop {
                if self.eval::<bool>(&script).await? {
                    return Ok::<(), FeedError>(());
                }
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        };
        tokio::time::timeout(timeout, wait).await.map_err(|_| {
            FeedError::Timeout(format!("`{selector}` did not appear within {timeout:?}"))
        })?
    }

    async fn content(&mut self) -> Result<String, FeedError> {
        Ok(self.page.content().await?)
    }

    async fn control_state(&mut self, selector: &str) -> Result<ControlState, FeedError> {
        let script = format!(
            r#"(() => {{
                const el = document.querySelector({sel});
                if (!el) return "absent";
                const off = el.disabled === true
                    || el.getAttribute("aria-disabled") === "true"
                    || el.classList.contains("disabled")
                    || (el.parentElement !== null && el.parentElement.classList.contains("disabled"));
                return off ? "disabled" : "enabled";
            }})()"#,
            sel = js_string(selector)
        );
        match self.eval::<String>(&script).await?.as_str() {
            "absent" => Ok(ControlState::Absent),
            "disabled" => Ok(ControlState::Disabled),
            "enabled" => Ok(ControlState::Enabled),
            other => Err(FeedError::Automation(format!("unknown control state `{other}`"))),
        }
    }

    async fn inner_html(&mut self, selector: &str) -> Result<String, FeedError> {
        let script = format!(
            "(() => {{ const el = document.querySelector({sel}); return el ? el.innerHTML : \"\"; }})()",
            sel = js_string(selector)
        );
        self.eval(&script).await
    }

    async fn click(&mut self, selector: &str) -> Result<(), FeedError> {
        self.page.find_element(selector).await?.click().await?;
        Ok(())
    }

    async fn wait_for_settle(
        &mut self,
        selector: &str,
        previous: &str,
        timeout: Duration,
    ) -> Result<(), FeedError> {
        let script = format!(
            r#"(() => {{
                if (document.readyState !== "complete") return [false, ""];
                const el = document.querySelector({sel});
                return [el !== null, el ? el.innerHTML : ""];
            }})()"#,
            sel = js_string(selector)
        );
        let wait = async {
            let mut last: Option<String> = None;
            loop {
                tokio::time::sleep(POLL_INTERVAL).await;
                let (present, table) = self.eval::<(bool, String)>(&script).await?;
                // still the pre-click table, or mid-replacement
                if !present || table == previous {
                    last = None;
                    continue;
                }
                if last.as_deref() == Some(table.as_str()) {
                    return Ok::<(), FeedError>(());
                }
                last = Some(table);
            }
        };
        tokio::time::timeout(timeout, wait).await.map_err(|_| {
            FeedError::Timeout(format!("`{selector}` did not change within {timeout:?}"))
        })?
    }
}
