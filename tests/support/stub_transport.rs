//! Scripted HTTP transport for tests
//!
//! Maps absolute URLs to canned responses and records every request. URLs
//! without a route answer 404.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use order_comment_exporter::config::ShopConfig;
use order_comment_exporter::fetcher::{FetcherError, FetcherResult, HttpResponse, HttpTransport};
use order_comment_exporter::OrderId;

pub const SHOP_URL: &str = "https://shop.test";
pub const API_VERSION: &str = "2024-01";

/// Configuration pointing at the stub shop, with pacing disabled
pub fn test_config() -> ShopConfig {
    ShopConfig::new(SHOP_URL, API_VERSION, "shpat_test").with_detail_delay(Duration::ZERO)
}

/// Events URL for an order id under [`test_config`]
pub fn events_url(id: u64) -> String {
    test_config().events_url(&OrderId::from(id))
}

/// `orders` response body; each tuple is `(id, name, created_at)`
pub fn orders_body(orders: &[(u64, &str, &str)]) -> String {
    let orders: Vec<serde_json::Value> = orders
        .iter()
        .map(|(id, name, created_at)| {
            serde_json::json!({
                "id": id,
                "name": name,
                "created_at": created_at,
                "financial_status": "paid",
            })
        })
        .collect();
    serde_json::json!({ "orders": orders }).to_string()
}

/// `events` response body; each tuple is `(author, message, created_at)`
pub fn events_body(events: &[(&str, &str, &str)]) -> String {
    let events: Vec<serde_json::Value> = events
        .iter()
        .enumerate()
        .map(|(i, (author, message, created_at))| {
            serde_json::json!({
                "id": i + 1,
                "author": author,
                "message": message,
                "created_at": created_at,
                "verb": "comment",
            })
        })
        .collect();
    serde_json::json!({ "events": events }).to_string()
}

/// `Link` header pointing at `url` as the next page
pub fn next_link(url: &str) -> String {
    format!("<{url}>; rel=\"next\"")
}

#[derive(Default)]
pub struct StubTransport {
    routes: HashMap<String, FetcherResult<HttpResponse>>,
    calls: Mutex<Vec<String>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `url` with `response`
    pub fn route(mut self, url: impl Into<String>, response: HttpResponse) -> Self {
        self.routes.insert(url.into(), Ok(response));
        self
    }

    /// Answer `url` with a transport-level error
    pub fn fail(mut self, url: impl Into<String>, err: FetcherError) -> Self {
        self.routes.insert(url.into(), Err(err));
        self
    }

    /// Every requested URL, in request order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Number of per-order events requests
    pub fn events_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|url| url.ends_with("/events.json"))
            .count()
    }
}

#[async_trait]
impl HttpTransport for StubTransport {
    async fn get(&self, url: &str) -> FetcherResult<HttpResponse> {
        self.calls.lock().unwrap().push(url.to_string());
        match self.routes.get(url) {
            Some(result) => result.clone(),
            None => Ok(HttpResponse::with_status(404, r#"{"errors":"Not Found"}"#)),
        }
    }
}
