//! Browser control surface used by the HNX crawl.
//!
//! The crawl only talks to these traits, so tests can drive it with a scripted
//! fake while production uses headless Chromium ([`super::ChromiumLauncher`]).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::core::FeedError;

/// State of a clickable control on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    /// No element matches the selector.
    Absent,
    /// The element exists but is disabled (attribute, `aria-disabled`, or a `disabled` class).
    Disabled,
    /// The element exists and can be clicked.
    Enabled,
}

/// Starts browser processes.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    /// Launch a fresh browser process.
    async fn launch(&self) -> Result<Arc<dyn Browser>, FeedError>;
}

/// A running browser process.
#[async_trait]
pub trait Browser: Send + Sync {
    /// Whether the connection to the process is still alive.
    fn is_connected(&self) -> bool;
    /// Open a new isolated browsing context (no shared cookies or storage).
    async fn new_context(&self) -> Result<Box<dyn BrowserContext>, FeedError>;
}

/// An isolated browsing context, owned by exactly one crawl.
#[async_trait]
pub trait BrowserContext: Send {
    /// Open a blank page inside this context.
    async fn new_page(&mut self) -> Result<Box<dyn BrowserPage>, FeedError>;
    /// Close the context and every page in it. The browser process stays up.
    async fn close(self: Box<Self>) -> Result<(), FeedError>;
}

/// A single page (tab).
#[async_trait]
pub trait BrowserPage: Send {
    /// Navigate and wait for the document load event.
    async fn goto(&mut self, url: &str, timeout: Duration) -> Result<(), FeedError>;
    /// Wait until `selector` matches an element, or fail with [`FeedError::Timeout`].
    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> Result<(), FeedError>;
    /// The current rendered HTML.
    async fn content(&mut self) -> Result<String, FeedError>;
    /// Locate `selector` and report whether it can be clicked.
    async fn control_state(&mut self, selector: &str) -> Result<ControlState, FeedError>;
    /// Inner markup of the first element matching `selector`, or an empty string if none does.
    async fn inner_html(&mut self, selector: &str) -> Result<String, FeedError>;
    /// Click the first element matching `selector`.
    async fn click(&mut self, selector: &str) -> Result<(), FeedError>;
    /// Wait until `selector`'s markup differs from `previous` and then stops changing.
    async fn wait_for_settle(
        &mut self,
        selector: &str,
        previous: &str,
        timeout: Duration,
    ) -> Result<(), FeedError>;
}
