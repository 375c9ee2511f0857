//! Shop API response parser
//!
//! Stateless helpers turning list-endpoint JSON bodies into typed values.
//! Both endpoints wrap their payload in a single named array
//! (`{"orders": [...]}` / `{"events": [...]}`); a missing key is an empty list.

use serde::Deserialize;

use crate::fetcher::{FetcherError, FetcherResult};
use crate::{Event, Order};

#[derive(Deserialize)]
struct OrdersEnvelope {
    #[serde(default)]
    orders: Vec<Order>,
}

#[derive(Deserialize)]
struct EventsEnvelope {
    #[serde(default)]
    events: Vec<Event>,
}

/// Stateless parser for shop API responses
pub struct ShopParser;

impl ShopParser {
    /// Parse a list-orders body
    ///
    /// # Errors
    /// Returns FetcherError::ParseError if the body is not valid JSON or an
    /// order lacks `id`, `name` or `created_at`
    pub fn parse_orders(body: &str) -> FetcherResult<Vec<Order>> {
        serde_json::from_str::<OrdersEnvelope>(body)
            .map(|envelope| envelope.orders)
            .map_err(|e| FetcherError::ParseError(format!("Failed to parse orders: {e}")))
    }

    /// Parse a list-order-events body
    ///
    /// # Errors
    /// Returns FetcherError::ParseError if the body is not valid JSON
    pub fn parse_events(body: &str) -> FetcherResult<Vec<Event>> {
        serde_json::from_str::<EventsEnvelope>(body)
            .map(|envelope| envelope.events)
            .map_err(|e| FetcherError::ParseError(format!("Failed to parse events: {e}")))
    }
}
