use crate::core::{FeedClient, FeedConfig, FeedError, RawRow, client::retry::retry};
use crate::hnx::browser::{BrowserContext, ControlState};
use crate::hnx::extract::extract_rows;

pub(super) async fn crawl(client: &FeedClient) -> Result<Vec<RawRow>, FeedError> {
    retry(&client.config().retry, "hnx_crawl", |attempt| crawl_once(client, attempt)).await
}

async fn crawl_once(client: &FeedClient, attempt: u32) -> Result<Vec<RawRow>, FeedError> {
    let browser = client.browser().acquire().await?;
    let mut guard = ContextGuard::new(browser.new_context().await?);

    let result = match guard.context.as_deref_mut() {
        Some(context) => walk(context, client.config()).await,
        None => Err(FeedError::Automation("browsing context already closed".into())),
    };

    if let Err(e) = guard.close().await {
        tracing::warn!(attempt, error = %e, "failed to close browsing context");
    }
    result
}

/// Owns a browsing context for one crawl attempt.
///
/// If the crawl future is dropped before [`ContextGuard::close`] runs (for example when a
/// joined sibling task fails), the context is closed on a spawned task instead.
struct ContextGuard {
    context: Option<Box<dyn BrowserContext>>,
}

impl ContextGuard {
    fn new(context: Box<dyn BrowserContext>) -> Self {
        Self {
            context: Some(context),
        }
    }

    async fn close(mut self) -> Result<(), FeedError> {
        match self.context.take() {
            Some(context) => context.close().await,
            None => Ok(()),
        }
    }
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        let Some(context) = self.context.take() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = context.close().await {
                        tracing::warn!(error = %e, "failed to close abandoned browsing context");
                    }
                });
            }
            Err(_) => tracing::warn!("no runtime to close abandoned browsing context"),
        }
    }
}

async fn walk(context: &mut dyn BrowserContext, cfg: &FeedConfig) -> Result<Vec<RawRow>, FeedError> {
    let mut page = context.new_page().await?;
    page.goto(cfg.hnx_url.as_str(), cfg.page_load_timeout).await?;

    match page
        .wait_for_selector(&cfg.hnx_table_selector, cfg.selector_timeout)
        .await
    {
        Err(e) if e.is_timeout() => {
            tracing::info!(error = %e, "hnx table never rendered, no data");
            return Ok(Vec::new());
        }
        other => other?,
    }

    let mut rows = Vec::new();
    for n in 1..=cfg.max_pages {
        let html = page.content().await?;
        let page_rows = extract_rows(&html, &cfg.hnx_row_selector)?;
        tracing::debug!(page = n, rows = page_rows.len(), "hnx page extracted");
        rows.extend(page_rows);

        match page.control_state(&cfg.hnx_next_selector).await? {
            ControlState::Absent | ControlState::Disabled => break,
            ControlState::Enabled if n == cfg.max_pages => {
                tracing::warn!(max_pages = cfg.max_pages, "hnx page ceiling reached");
                break;
            }
            ControlState::Enabled => {}
        }

        let before = page.inner_html(&cfg.hnx_table_selector).await?;
        page.click(&cfg.hnx_next_selector).await?;
        page.wait_for_settle(&cfg.hnx_table_selector, &before, cfg.selector_timeout)
            .await?;
    }
    Ok(rows)
}
