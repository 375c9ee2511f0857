//! Export orchestration, pacing and progress
//!
//! # Overview
//!
//! An export run proceeds strictly sequentially:
//!
//! 1. **Collection**: every order page is fetched via [`crate::fetcher`]
//! 2. **Window filter**: orders outside the [`DateWindow`](crate::DateWindow)
//!    are skipped before any events call
//! 3. **Detail fetch**: one events call per remaining order
//! 4. **Pacing**: [`rate_limit::RateGovernor`] pauses after each events call
//! 5. **Matching**: [`MatchCriteria`](crate::MatchCriteria) turns events into rows
//! 6. **Progress**: [`progress::ProgressObserver`] receives a completion
//!    fraction after each order
//!
//! # Quick Start
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use order_comment_exporter::config::ShopConfig;
//! use order_comment_exporter::downloader::ExportExecutor;
//! use order_comment_exporter::fetcher::ShopFetcher;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ShopConfig::new("https://example.myshopify.com", "2024-01", "shpat_xxx");
//! let executor = ExportExecutor::new(ShopFetcher::from_config(&config)?, &config);
//!
//! let report = executor
//!     .run_dates(
//!         NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
//!         NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! Only validation fails a run. Network and API failures degrade:
//! - Collection failures keep the orders fetched so far
//! - Events failures count as "no events" for that order

pub mod config;
pub mod executor;
pub mod progress;
pub mod rate_limit;

pub use executor::{ExportExecutor, ExportReport};
pub use progress::{ExportProgress, LogProgress, NoProgress, ProgressObserver};
pub use rate_limit::RateGovernor;

use crate::filter::InvalidDateWindow;

/// Export errors
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Start date after end date
    #[error("validation error: {0}")]
    InvalidDateWindow(#[from] InvalidDateWindow),
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;
