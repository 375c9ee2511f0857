//! Export executor
//!
//! Drives one export run end to end:
//!
//! 1. Fetch the full order collection (partial on collection failure)
//! 2. For each order, in server order:
//!    - skip it unless its UTC creation date is inside the window
//!    - fetch its events (failures become an empty list)
//!    - pause via the [`RateGovernor`]
//!    - append matching rows
//!    - report progress
//!
//! Everything runs sequentially on the calling task; there is at most one
//! request in flight.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::ShopConfig;
use crate::downloader::progress::{ExportProgress, NoProgress, ProgressObserver};
use crate::downloader::rate_limit::RateGovernor;
use crate::downloader::ExportResult;
use crate::fetcher::shop_http::ReqwestTransport;
use crate::fetcher::{FetcherError, HttpTransport, ShopFetcher};
use crate::filter::{DateWindow, MatchCriteria};
use crate::metrics::ExportMetrics;
use crate::MatchRecord;
use chrono::NaiveDate;

/// Outcome of an export run
#[derive(Debug, Default)]
pub struct ExportReport {
    /// Matching rows in order-then-event encounter order
    pub rows: Vec<MatchRecord>,
    /// Orders returned by the collection fetch
    pub orders_scanned: usize,
    /// Orders whose creation date fell inside the window
    pub orders_in_window: usize,
    /// Per-order events calls that failed and were treated as empty
    pub event_fetch_failures: usize,
    /// Set when the order collection could only be fetched partially
    pub collection_failure: Option<FetcherError>,
}

impl ExportReport {
    /// Explicit "no matches" signal
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Executes export runs against one shop
pub struct ExportExecutor<T = ReqwestTransport> {
    fetcher: ShopFetcher<T>,
    criteria: MatchCriteria,
    governor: RateGovernor,
    observer: Arc<dyn ProgressObserver>,
}

impl<T: HttpTransport> ExportExecutor<T> {
    /// Create an executor with default criteria and the configured delay
    pub fn new(fetcher: ShopFetcher<T>, config: &ShopConfig) -> Self {
        Self {
            fetcher,
            criteria: MatchCriteria::default(),
            governor: RateGovernor::fixed(config.detail_delay),
            observer: Arc::new(NoProgress),
        }
    }

    /// Override the match criteria
    pub fn with_criteria(mut self, criteria: MatchCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    /// Override the rate governor
    pub fn with_governor(mut self, governor: RateGovernor) -> Self {
        self.governor = governor;
        self
    }

    /// Attach a progress observer
    pub fn with_progress(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Underlying fetcher
    pub fn fetcher(&self) -> &ShopFetcher<T> {
        &self.fetcher
    }

    /// Validate the dates, then run.
    ///
    /// # Errors
    /// Returns [`ExportError::InvalidDateWindow`](super::ExportError::InvalidDateWindow)
    /// when `start > end`; no request is made in that case.
    pub async fn run_dates(&self, start: NaiveDate, end: NaiveDate) -> ExportResult<ExportReport> {
        let window = DateWindow::new(start, end)?;
        Ok(self.run(window).await)
    }

    /// Run an export over a validated window
    pub async fn run(&self, window: DateWindow) -> ExportReport {
        let metrics = ExportMetrics::start();
        let mut governor = self.governor.clone();

        info!(
            start = %window.start(),
            end = %window.end(),
            "Starting export run"
        );

        let collection = self.fetcher.fetch_all_orders().await;
        if let Some(err) = &collection.failure {
            warn!(
                "Order collection incomplete after {} pages ({} orders): {}",
                collection.pages_fetched,
                collection.orders.len(),
                err
            );
        }

        let total = collection.orders.len();
        let mut report = ExportReport {
            orders_scanned: total,
            collection_failure: collection.failure,
            ..ExportReport::default()
        };

        for (index, order) in collection.orders.iter().enumerate() {
            metrics.record_order_scanned();

            if window.contains_order(order) {
                report.orders_in_window += 1;

                let outcome = self.fetcher.fetch_events_outcome(&order.id).await;
                match &outcome.failure {
                    Some(err) => {
                        report.event_fetch_failures += 1;
                        metrics.record_event_failure(err);
                        if err.is_throttled() {
                            governor.note_throttled();
                        } else {
                            governor.note_success();
                        }
                    }
                    None => governor.note_success(),
                }

                governor.pause().await;

                let rows = self.criteria.matches_for(order, &outcome.events);
                if !rows.is_empty() {
                    debug!("Order {}: {} matching events", order.name, rows.len());
                    metrics.record_matches(rows.len());
                }
                report.rows.extend(rows);
            } else {
                debug!("Order {} outside window, events not fetched", order.name);
            }

            self.observer.on_progress(ExportProgress {
                completed: index + 1,
                total,
            });
        }

        info!(
            orders_scanned = report.orders_scanned,
            orders_in_window = report.orders_in_window,
            event_fetch_failures = report.event_fetch_failures,
            matches = report.rows.len(),
            duration_secs = metrics.elapsed_secs(),
            "Export run finished"
        );

        report
    }
}
