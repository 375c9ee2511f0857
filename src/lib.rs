//! # Order Comment Exporter Library
//!
//! Pulls orders and their audit-event timelines from a Shopify-style admin
//! REST API, keeps the events that match a date window and an author/message
//! pattern, and produces a four-column table ready for spreadsheet export.
//!
//! ## Features
//!
//! - **Cursor Pagination**: Follows `Link: <...>; rel="next"` cursors until the
//!   order collection is exhausted, with a page cap as a safety bound
//! - **Fault Isolation**: A failing per-order events call yields zero events for
//!   that order and never aborts the run
//! - **Rate Governor**: Fixed pause between per-order calls, doubled once after
//!   a throttled (429) response
//! - **Progress Accounting**: Completion fraction reported after every order
//! - **CSV Export**: `Order Number`, `Order Date`, `Comment`, `Comment Date`
//!
//! ## Quick Start
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use order_comment_exporter::config::ShopConfig;
//! use order_comment_exporter::downloader::ExportExecutor;
//! use order_comment_exporter::fetcher::shop_orders::ShopFetcher;
//! use order_comment_exporter::DateWindow;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ShopConfig::new("https://example.myshopify.com", "2024-01", "shpat_xxx");
//! let fetcher = ShopFetcher::from_config(&config)?;
//!
//! let window = DateWindow::new(
//!     NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
//! )?;
//!
//! let report = ExportExecutor::new(fetcher, &config).run(window).await;
//! println!("{} matching comments", report.rows.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`config`] - Explicit shop configuration (endpoint, token, tunables)
//! - [`fetcher`] - HTTP transport seam, order pagination and event fetching
//! - [`filter`] - Date-window and author/message predicates
//! - [`downloader`] - Run orchestration, rate governor and progress
//! - [`output`] - CSV writer for match rows
//! - [`cli`] - Command-line front end

#![warn(missing_docs)]
#![warn(clippy::all)]

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// CLI command implementations
pub mod cli;

/// Shop configuration
pub mod config;

/// Export orchestration
pub mod downloader;

/// Remote API fetchers
pub mod fetcher;

/// Match predicates
pub mod filter;

/// Observability metrics
pub mod metrics;

/// Match row writers
pub mod output;

pub use filter::{DateWindow, MatchCriteria};

/// Platform-assigned order identifier.
///
/// The API returns numeric ids, but the value is opaque to this crate and is
/// only ever interpolated back into URLs, so it is held as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Wrap a raw identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier as it appears in request paths
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for OrderId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for OrderId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(u64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => OrderId::from(n),
            RawId::Text(s) => OrderId(s),
        })
    }
}

/// Order snapshot as returned by the list-orders endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Opaque identifier
    pub id: OrderId,
    /// Human-readable order number (e.g. "#1001")
    pub name: String,
    /// Creation timestamp exactly as sent by the API
    pub created_at: String,
}

impl Order {
    /// Parse the creation timestamp.
    ///
    /// A trailing `Z` is normalized to an explicit `+00:00` offset before
    /// parsing, so the result always carries a concrete offset.
    pub fn created_at(&self) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
        parse_timestamp(&self.created_at)
    }

    /// Calendar date (UTC) the order was created on
    pub fn created_date_utc(&self) -> Result<NaiveDate, chrono::ParseError> {
        Ok(self.created_at()?.with_timezone(&Utc).date_naive())
    }
}

/// Audit event attached to an order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Free-text message
    #[serde(default)]
    pub message: Option<String>,
    /// Author label, absent for system-generated events
    #[serde(default)]
    pub author: Option<String>,
    /// Creation timestamp as sent by the API
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Event {
    /// Message text, empty when absent
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }

    /// Author label, empty when absent
    pub fn author(&self) -> &str {
        self.author.as_deref().unwrap_or_default()
    }

    /// Creation timestamp, empty when absent
    pub fn created_at(&self) -> &str {
        self.created_at.as_deref().unwrap_or_default()
    }
}

/// One (order, event) pair that passed both predicates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Order display name
    pub order_number: String,
    /// Order creation timestamp (raw)
    pub order_created_at: String,
    /// Event message (raw)
    pub comment: String,
    /// Event creation timestamp (raw)
    pub comment_created_at: String,
}

impl MatchRecord {
    /// Build a row from an order and one of its events
    pub fn new(order: &Order, event: &Event) -> Self {
        Self {
            order_number: order.name.clone(),
            order_created_at: order.created_at.clone(),
            comment: event.message().to_string(),
            comment_created_at: event.created_at().to_string(),
        }
    }
}

/// Parse an ISO-8601 timestamp, accepting a literal `Z` UTC designator
pub fn parse_timestamp(input: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    let input = input.trim();
    match input.strip_suffix('Z').or_else(|| input.strip_suffix('z')) {
        Some(stripped) => DateTime::parse_from_rfc3339(&format!("{stripped}+00:00")),
        None => DateTime::parse_from_rfc3339(input),
    }
}
