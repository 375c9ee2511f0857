//! Observability metrics for export runs
//!
//! Counters and gauges are emitted through the `metrics` facade. Without an
//! installed recorder they are no-ops; [`init_metrics`] installs a Prometheus
//! exporter with a scrape endpoint.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit};
use metrics_exporter_prometheus::PrometheusBuilder;
use once_cell::sync::OnceCell;
use std::net::SocketAddr;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::fetcher::FetcherError;

static METRICS_INITIALIZED: OnceCell<()> = OnceCell::new();

/// Metrics setup errors
#[derive(Debug, thiserror::Error)]
#[error("failed to install Prometheus exporter: {0}")]
pub struct MetricsError(String);

/// Install the Prometheus exporter on `addr`.
///
/// Idempotent: later calls are ignored once an exporter is installed.
pub fn init_metrics(addr: SocketAddr) -> Result<(), MetricsError> {
    if METRICS_INITIALIZED.get().is_some() {
        debug!("Metrics already initialized, skipping");
        return Ok(());
    }

    info!("Initializing metrics system on {}", addr);

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| MetricsError(e.to_string()))?;

    describe_counter!(
        "http_requests_total",
        Unit::Count,
        "Total number of HTTP requests made to the shop API"
    );
    describe_histogram!(
        "http_request_duration_seconds",
        Unit::Seconds,
        "HTTP request duration in seconds"
    );
    describe_gauge!(
        "api_call_limit_used",
        Unit::Count,
        "Requests currently held in the shop API bucket"
    );
    describe_gauge!(
        "api_call_limit_remaining",
        Unit::Count,
        "Free slots in the shop API bucket"
    );
    describe_counter!(
        "orders_scanned_total",
        Unit::Count,
        "Orders examined by export runs"
    );
    describe_counter!(
        "event_fetch_failures_total",
        Unit::Count,
        "Per-order events calls that failed and were treated as empty"
    );
    describe_counter!(
        "matches_total",
        Unit::Count,
        "Match rows produced by export runs"
    );

    let _ = METRICS_INITIALIZED.set(());
    info!("Metrics system initialized successfully on {}", addr);
    Ok(())
}

/// Timing and status for one HTTP request
pub struct HttpRequestMetrics {
    endpoint: String,
    start_time: Instant,
}

impl HttpRequestMetrics {
    /// Start recording a request against an endpoint label
    pub fn start(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            start_time: Instant::now(),
        }
    }

    /// Record a completed request
    pub fn record_complete(&self, status_code: u16) {
        let duration = self.start_time.elapsed();

        counter!(
            "http_requests_total",
            "endpoint" => self.endpoint.clone(),
            "status" => status_code.to_string(),
        )
        .increment(1);

        histogram!(
            "http_request_duration_seconds",
            "endpoint" => self.endpoint.clone(),
        )
        .record(duration.as_secs_f64());

        if status_code == 429 {
            warn!(
                endpoint = %self.endpoint,
                duration_ms = duration.as_millis() as u64,
                "Rate limit error (429) recorded"
            );
        }

        debug!(
            endpoint = %self.endpoint,
            status = status_code,
            duration_ms = duration.as_millis() as u64,
            "HTTP request completed"
        );
    }

    /// Record a request that failed without a status code
    pub fn record_network_error(&self) {
        let duration = self.start_time.elapsed();

        counter!(
            "http_requests_total",
            "endpoint" => self.endpoint.clone(),
            "status" => "network_error",
        )
        .increment(1);

        histogram!(
            "http_request_duration_seconds",
            "endpoint" => self.endpoint.clone(),
        )
        .record(duration.as_secs_f64());
    }
}

/// Record bucket usage from the call-limit header
pub fn record_call_limit(used: u32, limit: u32) {
    let remaining = limit.saturating_sub(used);

    gauge!("api_call_limit_used").set(used as f64);
    gauge!("api_call_limit_remaining").set(remaining as f64);

    let usage_percent = (used as f64 / limit as f64) * 100.0;
    if usage_percent >= 80.0 {
        warn!(
            used = used,
            limit = limit,
            usage_percent = usage_percent,
            "API call limit usage exceeds 80% threshold"
        );
    }
}

/// Per-run export counters
pub struct ExportMetrics {
    start_time: Instant,
}

impl ExportMetrics {
    /// Start tracking a run
    pub fn start() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    /// One order examined
    pub fn record_order_scanned(&self) {
        counter!("orders_scanned_total").increment(1);
    }

    /// One events call degraded to empty
    pub fn record_event_failure(&self, error: &FetcherError) {
        let kind = match error {
            FetcherError::HttpStatus { .. } => "http_status",
            FetcherError::RateLimitExceeded => "rate_limited",
            FetcherError::Timeout(_) => "timeout",
            FetcherError::NetworkError(_) => "network",
            FetcherError::ParseError(_) => "parse",
            FetcherError::PaginationError(_) | FetcherError::ClientSetup(_) => "other",
        };
        counter!("event_fetch_failures_total", "kind" => kind).increment(1);
    }

    /// Rows produced for one order
    pub fn record_matches(&self, count: usize) {
        counter!("matches_total").increment(count as u64);
    }

    /// Time since the run started
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }
}
