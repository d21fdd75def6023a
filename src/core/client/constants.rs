//! Centralized constants for default endpoints, UA, and crawl limits.

use std::time::Duration;

/// Default desktop UA to avoid trivial bot blocking.
pub(crate) const USER_AGENT: &str = concat!(
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) ",
    "AppleWebKit/537.36 (KHTML, like Gecko) ",
    "Chrome/91.0.4472.124 Safari/537.36"
);

/// HOSE non-margin/restricted list (jqGrid JSON).
pub(crate) const DEFAULT_HSX_URL: &str = "https://www.hsx.vn/Modules/Listed/Web/NonMarginList";

/// HNX restricted list page (JavaScript-rendered, click-paginated).
pub(crate) const DEFAULT_HNX_URL: &str =
    "https://hnx.vn/vi-vn/co-phieu-etfs/chung-khoan-ny-khong-ky-quy.html";

/// Per-request HTTP timeout.
pub(crate) const HTTP_TIMEOUT: Duration = Duration::from_secs(20);

/// Page-load wait in the browser.
pub(crate) const PAGE_LOAD_TIMEOUT: Duration = Duration::from_secs(10);

/// Selector and DOM-settle waits in the browser.
pub(crate) const SELECTOR_TIMEOUT: Duration = Duration::from_secs(10);

/// Rows requested per HOSE page.
pub(crate) const HSX_PAGE_SIZE: u32 = 30;

/// Page ceiling for both adapters.
pub(crate) const MAX_PAGES: u32 = 50;

/// Rows of the HNX data table.
pub(crate) const HNX_ROW_SELECTOR: &str = "table#_tableDatas tbody tr";

/// The HNX data table itself.
pub(crate) const HNX_TABLE_SELECTOR: &str = "table#_tableDatas";

/// The "next page" control inside the HNX pager.
pub(crate) const HNX_NEXT_SELECTOR: &str = "#next";

/// Chromium flags used for the headless browser.
pub(crate) const CHROMIUM_ARGS: &[&str] = &["--no-sandbox", "--disable-dev-shm-usage"];
