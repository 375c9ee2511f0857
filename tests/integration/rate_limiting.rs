//! Integration tests for detail-fetch pacing

use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use order_comment_exporter::downloader::{ExportExecutor, RateGovernor};
use order_comment_exporter::fetcher::{HttpResponse, ShopFetcher};
use order_comment_exporter::DateWindow;

use crate::support::stub_transport::{events_url, orders_body, test_config, StubTransport};

fn march() -> DateWindow {
    DateWindow::new(
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
    )
    .unwrap()
}

fn three_orders() -> StubTransport {
    StubTransport::new().route(
        test_config().orders_url(),
        HttpResponse::ok(orders_body(&[
            (1, "#1001", "2024-03-02T10:00:00Z"),
            (2, "#1002", "2024-03-03T10:00:00Z"),
            (3, "#1003", "2024-03-04T10:00:00Z"),
        ])),
    )
}

fn executor(transport: StubTransport, delay: Duration) -> ExportExecutor<StubTransport> {
    let config = test_config();
    ExportExecutor::new(ShopFetcher::with_transport(transport, &config), &config)
        .with_governor(RateGovernor::fixed(delay))
}

#[tokio::test(start_paused = true)]
async fn test_fixed_pause_after_each_event_fetch() {
    let start = Instant::now();
    let report = executor(three_orders(), Duration::from_millis(500))
        .run(march())
        .await;

    assert_eq!(report.orders_in_window, 3);
    assert!(start.elapsed() >= Duration::from_millis(1500));
    assert!(start.elapsed() < Duration::from_millis(2000));
}

#[tokio::test(start_paused = true)]
async fn test_no_pause_for_out_of_window_orders() {
    let transport = StubTransport::new().route(
        test_config().orders_url(),
        HttpResponse::ok(orders_body(&[
            (1, "#1001", "2023-03-02T10:00:00Z"),
            (2, "#1002", "2023-03-03T10:00:00Z"),
        ])),
    );

    let start = Instant::now();
    executor(transport, Duration::from_millis(500))
        .run(march())
        .await;

    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_throttled_response_doubles_next_pause() {
    let transport =
        three_orders().route(events_url(1), HttpResponse::with_status(429, "Exceeded 2 calls per second"));

    let start = Instant::now();
    let report = executor(transport, Duration::from_millis(500))
        .run(march())
        .await;

    // 1000ms after the 429, then back to 500ms for the two 404s
    assert_eq!(report.event_fetch_failures, 3);
    assert!(start.elapsed() >= Duration::from_millis(2000));
    assert!(start.elapsed() < Duration::from_millis(2500));
}

#[tokio::test(start_paused = true)]
async fn test_disabled_governor_never_sleeps() {
    let start = Instant::now();
    executor(three_orders(), Duration::ZERO).run(march()).await;
    assert_eq!(start.elapsed(), Duration::ZERO);
}
