//! Unit tests for the per-order events fetch

use order_comment_exporter::fetcher::{FetcherError, HttpResponse, ShopFetcher};
use order_comment_exporter::OrderId;

use crate::support::stub_transport::{events_body, events_url, test_config, StubTransport};

fn fetcher(transport: StubTransport) -> ShopFetcher<StubTransport> {
    ShopFetcher::with_transport(transport, &test_config())
}

#[tokio::test]
async fn test_events_requested_from_order_path() {
    let fetcher = fetcher(StubTransport::new().route(
        events_url(450789469),
        HttpResponse::ok(events_body(&[("Chiara Azzaretto", "ca", "2024-03-05T11:00:00Z")])),
    ));

    let events = fetcher.fetch_events(&OrderId::from(450789469)).await;

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].author(), "Chiara Azzaretto");
    assert_eq!(
        fetcher.transport().calls(),
        ["https://shop.test/admin/api/2024-01/orders/450789469/events.json"]
    );
}

#[tokio::test]
async fn test_non_success_status_yields_empty_events() {
    let fetcher = fetcher(
        StubTransport::new().route(events_url(1), HttpResponse::with_status(403, "forbidden")),
    );

    let outcome = fetcher.fetch_events_outcome(&OrderId::from(1)).await;

    assert!(outcome.events.is_empty());
    assert!(matches!(
        outcome.failure,
        Some(FetcherError::HttpStatus { status: 403, .. })
    ));
}

#[tokio::test]
async fn test_timeout_yields_empty_events() {
    let fetcher = fetcher(StubTransport::new().fail(
        events_url(1),
        FetcherError::Timeout("request exceeded 10s".to_string()),
    ));

    assert!(fetcher.fetch_events(&OrderId::from(1)).await.is_empty());
}

#[tokio::test]
async fn test_malformed_body_yields_empty_events() {
    let fetcher =
        fetcher(StubTransport::new().route(events_url(1), HttpResponse::ok("{\"events\": [")));

    let outcome = fetcher.fetch_events_outcome(&OrderId::from(1)).await;

    assert!(outcome.events.is_empty());
    assert!(matches!(outcome.failure, Some(FetcherError::ParseError(_))));
}

#[tokio::test]
async fn test_missing_events_key_is_empty_list() {
    let fetcher = fetcher(StubTransport::new().route(events_url(1), HttpResponse::ok("{}")));

    let outcome = fetcher.fetch_events_outcome(&OrderId::from(1)).await;

    assert!(outcome.events.is_empty());
    assert!(outcome.failure.is_none());
}

#[tokio::test]
async fn test_events_without_author_are_kept() {
    let fetcher = fetcher(StubTransport::new().route(
        events_url(1),
        HttpResponse::ok(
            r#"{"events": [{"id": 1, "message": "Order was placed", "created_at": "2024-03-05T10:00:00Z", "author": null}]}"#,
        ),
    ));

    let events = fetcher.fetch_events(&OrderId::from(1)).await;

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].author(), "");
}
