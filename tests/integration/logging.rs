//! Integration tests for logging and tracing setup

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[test]
fn test_tracing_subscriber_initialization() {
    // Another test may have installed a global subscriber already
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("order_comment_exporter=debug")),
        )
        .with_test_writer()
        .try_init();

    info!("This is an info message");
    warn!("This is a warning message");
    error!("This is an error message");
}

#[test]
fn test_tracing_json_format() {
    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::new("order_comment_exporter=info"))
        .with_test_writer()
        .try_init();

    info!(order = "#1001", matches = 2, "Structured fields");
}

#[test]
fn test_env_filter_directives_parse() {
    for directive in [
        "info",
        "order_comment_exporter=debug",
        "warn,order_comment_exporter::fetcher=trace",
    ] {
        assert!(EnvFilter::try_new(directive).is_ok(), "{directive}");
    }
}

#[test]
fn test_export_span() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("order_comment_exporter=debug"))
        .with_test_writer()
        .try_init();

    let span = tracing::info_span!("export_run", start = "2024-03-01", end = "2024-03-31");
    let _enter = span.enter();
    info!("Inside span");
}
