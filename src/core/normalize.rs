//! Row normalization shared by both adapters.
//!
//! Each source addresses its columns by position. The positions live in a
//! [`ColumnMap`] per source so that a schema change on either exchange is a
//! one-line table edit rather than a change to the mapping logic.

use chrono::NaiveDate;
use scraper::{Html, Node};

use crate::core::{
    FeedError,
    models::{Exchange, RawRow, RestrictedSecurity},
};

/// Date format used by both exchanges (`dd/mm/yyyy`).
pub const SOURCE_DATE_FORMAT: &str = "%d/%m/%Y";

/// How the reason cell is encoded by a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReasonFormat {
    /// An HTML fragment; reduced to its visible text.
    Html,
    /// Already plain text, possibly prefixed by a `"- "` bullet marker.
    BulletedText,
}

/// Column positions of the canonical fields within a source row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub ticker: usize,
    pub name: usize,
    pub date: usize,
    pub reason: usize,
    /// Rows with fewer cells are dropped.
    pub min_cells: usize,
    pub reason_format: ReasonFormat,
}

/// HOSE jqGrid rows: `[id, ticker, _, _, name, date, reason_html, ...]`.
pub const HSX_COLUMNS: ColumnMap = ColumnMap {
    ticker: 1,
    name: 4,
    date: 5,
    reason: 6,
    min_cells: 7,
    reason_format: ReasonFormat::Html,
};

/// HNX table rows: `[no, ticker, name, date, reason, ...]`.
pub const HNX_COLUMNS: ColumnMap = ColumnMap {
    ticker: 1,
    name: 2,
    date: 3,
    reason: 4,
    min_cells: 5,
    reason_format: ReasonFormat::BulletedText,
};

/// Parses a `dd/mm/yyyy` date.
///
/// # Errors
///
/// Returns [`FeedError::Parse`] if the text is not a valid calendar date in that format.
pub fn parse_dmy_date(text: &str) -> Result<NaiveDate, FeedError> {
    let trimmed = text.trim();
    NaiveDate::parse_from_str(trimmed, SOURCE_DATE_FORMAT)
        .map_err(|e| FeedError::Parse(format!("invalid date `{trimmed}`: {e}")))
}

/// Reduces an HTML fragment to its visible text.
///
/// Nested markup is flattened, `script`/`style` bodies are dropped, and runs of
/// whitespace collapse to a single space.
pub fn html_to_text(fragment: &str) -> String {
    let doc = Html::parse_fragment(fragment);
    let mut out = String::with_capacity(fragment.len());

    for node in doc.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node
            .parent()
            .and_then(|p| p.value().as_element().map(|e| e.name()))
            .is_some_and(|name| name.eq_ignore_ascii_case("script") || name.eq_ignore_ascii_case("style"));
        if !hidden {
            out.push_str(text);
        }
    }

    collapse_whitespace(&out)
}

/// Collapses whitespace runs (including non-breaking spaces) and trims.
pub fn collapse_whitespace(s: &str) -> String {
    s.split(|c: char| c.is_whitespace() || c == '\u{a0}')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Removes a leading `"- "` bullet marker.
pub fn strip_marker(s: &str) -> &str {
    let trimmed = s.trim_start();
    trimmed.strip_prefix("- ").unwrap_or(trimmed)
}

/// Maps one raw row to a canonical record.
///
/// # Errors
///
/// Returns [`FeedError::Parse`] if the row is shorter than `map.min_cells`, the
/// ticker is empty, or the date is malformed.
pub fn normalize_row(
    row: &RawRow,
    map: &ColumnMap,
    exchange: Exchange,
) -> Result<RestrictedSecurity, FeedError> {
    if row.len() < map.min_cells {
        return Err(FeedError::Parse(format!(
            "row has {} cells, expected at least {}",
            row.len(),
            map.min_cells
        )));
    }
    let cell = |idx: usize| row.cell(idx).unwrap_or_default();

    let ticker = cell(map.ticker).trim().to_string();
    if ticker.is_empty() {
        return Err(FeedError::Parse("empty ticker".into()));
    }

    let reason = match map.reason_format {
        ReasonFormat::Html => html_to_text(cell(map.reason)),
        ReasonFormat::BulletedText => strip_marker(&collapse_whitespace(cell(map.reason))).to_string(),
    };

    Ok(RestrictedSecurity {
        date: parse_dmy_date(cell(map.date))?,
        name: cell(map.name).trim().to_string(),
        reason,
        exchange,
        ticker,
    })
}

/// Normalizes every row, dropping (and logging) the ones that fail.
pub fn normalize_rows(rows: &[RawRow], map: &ColumnMap, exchange: Exchange) -> Vec<RestrictedSecurity> {
    rows.iter()
        .filter_map(|row| match normalize_row(row, map, exchange) {
            Ok(rec) => Some(rec),
            Err(e) => {
                tracing::debug!(%exchange, error = %e, "dropping row");
                None
            }
        })
        .collect()
}
