//! Core components of the `vn-restricted-rs` crate.
//!
//! This module contains the foundational building blocks of the library, including:
//! - The main [`FeedClient`], its builder, and the resolved [`FeedConfig`].
//! - The retry policy shared by both adapters.
//! - The primary [`FeedError`] type.
//! - The canonical record model and the row normalizer.

/// The main client (`FeedClient`), builder, configuration, and retry policy.
pub mod client;
/// The primary error type (`FeedError`) for the crate.
pub mod error;
/// Canonical records and the aggregation result.
pub mod models;
/// Position-based row mapping, date reparsing, and markup stripping.
pub mod normalize;

pub(crate) mod net;

// convenient re-exports so most code can just `use crate::core::FeedClient`
pub use client::{Backoff, FeedClient, FeedClientBuilder, FeedConfig, RetryConfig};
pub use error::FeedError;
pub use models::{CrawlMetadata, CrawlResult, Exchange, RawRow, RestrictedSecurity};
