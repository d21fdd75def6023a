use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use tokio::sync::Mutex;

use super::browser::{Browser, BrowserLauncher};
use super::chromium::ChromiumLauncher;
use crate::core::FeedError;

static GLOBAL: OnceLock<Arc<SharedBrowser>> = OnceLock::new();

/// A lazily launched browser process reused across crawls.
///
/// [`SharedBrowser::acquire`] holds a lock across the liveness check and the
/// launch, so concurrent callers that find no live browser launch it once.
pub struct SharedBrowser {
    launcher: Arc<dyn BrowserLauncher>,
    current: Mutex<Option<Arc<dyn Browser>>>,
    launches: AtomicUsize,
}

impl fmt::Debug for SharedBrowser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedBrowser")
            .field("launches", &self.launch_count())
            .finish_non_exhaustive()
    }
}

impl SharedBrowser {
    /// Wraps a launcher. Nothing is started until the first [`acquire`](Self::acquire).
    pub fn new(launcher: Arc<dyn BrowserLauncher>) -> Self {
        Self {
            launcher,
            current: Mutex::new(None),
            launches: AtomicUsize::new(0),
        }
    }

    /// The process-wide handle backed by a default [`ChromiumLauncher`].
    pub fn global() -> Arc<SharedBrowser> {
        GLOBAL
            .get_or_init(|| Arc::new(SharedBrowser::new(Arc::new(ChromiumLauncher::default()))))
            .clone()
    }

    /// Returns the live browser, launching a new one if there is none or the old one disconnected.
    ///
    /// # Errors
    ///
    /// Returns the launcher's error if a launch was needed and failed.
    pub async fn acquire(&self) -> Result<Arc<dyn Browser>, FeedError> {
        let mut guard = self.current.lock().await;
        if let Some(browser) = guard.as_ref() {
            if browser.is_connected() {
                return Ok(Arc::clone(browser));
            }
            tracing::info!("browser connection lost, relaunching");
        }

        let browser = self.launcher.launch().await?;
        self.launches.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(launches = self.launch_count(), "browser launched");
        *guard = Some(Arc::clone(&browser));
        Ok(browser)
    }

    /// How many processes this handle has launched so far.
    pub fn launch_count(&self) -> usize {
        self.launches.load(Ordering::Relaxed)
    }
}
