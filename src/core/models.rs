use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/* ----- EXCHANGE ----- */

/// The exchange a record was crawled from. Fixed per adapter, never inferred from row content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Exchange {
    /// Ho Chi Minh City Stock Exchange (HOSE), served by the paginated JSON API.
    ExchangeA,
    /// Hanoi Stock Exchange (HNX), served by the browser-rendered table.
    ExchangeB,
}

impl Exchange {
    /// The wire label used in the serialized feed.
    pub const fn as_str(self) -> &'static str {
        match self {
            Exchange::ExchangeA => "EXCHANGE_A",
            Exchange::ExchangeB => "EXCHANGE_B",
        }
    }

    /// The exchange's trading venue code.
    pub const fn venue(self) -> &'static str {
        match self {
            Exchange::ExchangeA => "HOSE",
            Exchange::ExchangeB => "HNX",
        }
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.venue())
    }
}

/* ----- RECORDS ----- */

/// One trading-restricted or delisted security, normalized across both exchanges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestrictedSecurity {
    /// Ticker symbol, trimmed and never empty.
    pub ticker: String,
    /// Issuer name, trimmed.
    pub name: String,
    /// Effective date of the restriction. Serializes as `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Plain-text reason, with any markup removed.
    pub reason: String,
    /// Source exchange.
    pub exchange: Exchange,
}

/// A source row before normalization: the cell texts in source column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    /// Cell texts, indexed from 0.
    pub cells: Vec<String>,
}

impl RawRow {
    /// Builds a row from anything that yields cell texts.
    pub fn new<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: cells.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The cell at `idx`, if the row is that wide.
    pub fn cell(&self, idx: usize) -> Option<&str> {
        self.cells.get(idx).map(String::as_str)
    }
}

/* ----- AGGREGATION RESULT ----- */

/// Metadata describing one aggregation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlMetadata {
    /// Number of records in `data`.
    pub total: usize,
    /// When the aggregation completed (UTC).
    pub generated_at: DateTime<Utc>,
}

/// The output of one aggregation run. Serializes to `{"data": [...], "metadata": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlResult {
    pub data: Vec<RestrictedSecurity>,
    pub metadata: CrawlMetadata,
}

impl CrawlResult {
    /// Wraps `data`, stamping the count and the current time.
    pub fn new(data: Vec<RestrictedSecurity>) -> Self {
        let metadata = CrawlMetadata {
            total: data.len(),
            generated_at: Utc::now(),
        };
        Self { data, metadata }
    }
}
