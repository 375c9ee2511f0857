//! Shop orders and order-events fetcher
//!
//! Two-level fetch over the admin API:
//! - [`ShopFetcher::fetch_all_orders`] walks the paginated orders collection
//! - [`ShopFetcher::fetch_events`] loads one order's event timeline, turning
//!   every failure into an empty list so one bad order never aborts a run

use tracing::{debug, warn};

use crate::config::ShopConfig;
use crate::fetcher::pagination::{OrderCollection, PaginationHelper};
use crate::fetcher::shop_http::ReqwestTransport;
use crate::fetcher::shop_parser::ShopParser;
use crate::fetcher::{FetcherError, FetcherResult, HttpTransport};
use crate::{Event, OrderId};

/// Result of a per-order events call, keeping the failure for accounting
#[derive(Debug, Default)]
pub struct EventOutcome {
    /// Events, empty when the call failed
    pub events: Vec<Event>,
    /// Why the call failed, if it did
    pub failure: Option<FetcherError>,
}

impl EventOutcome {
    fn failed(err: FetcherError) -> Self {
        Self {
            events: Vec::new(),
            failure: Some(err),
        }
    }
}

/// Fetcher for orders and their events
pub struct ShopFetcher<T = ReqwestTransport> {
    transport: T,
    config: ShopConfig,
}

impl ShopFetcher<ReqwestTransport> {
    /// Create a fetcher backed by the reqwest transport
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built from the configuration
    pub fn from_config(config: &ShopConfig) -> FetcherResult<Self> {
        Ok(Self::with_transport(ReqwestTransport::new(config)?, config))
    }
}

impl<T: HttpTransport> ShopFetcher<T> {
    /// Create a fetcher over an arbitrary transport
    pub fn with_transport(transport: T, config: &ShopConfig) -> Self {
        Self {
            transport,
            config: config.clone(),
        }
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch every order, following pagination cursors
    ///
    /// Never fails outright: a failing page stops the walk and the orders
    /// gathered so far are returned with [`OrderCollection::failure`] set.
    pub async fn fetch_all_orders(&self) -> OrderCollection {
        PaginationHelper::paginate_orders(
            &self.transport,
            &self.config.orders_url(),
            self.config.max_pages,
        )
        .await
    }

    /// Fetch one order's events; failures yield an empty list
    pub async fn fetch_events(&self, order_id: &OrderId) -> Vec<Event> {
        self.fetch_events_outcome(order_id).await.events
    }

    /// Fetch one order's events, reporting why the list is empty on failure
    pub async fn fetch_events_outcome(&self, order_id: &OrderId) -> EventOutcome {
        let url = self.config.events_url(order_id);

        let response = match self.transport.get(&url).await {
            Ok(response) => response,
            Err(err) => {
                warn!("Events fetch failed for order {}: {}", order_id, err);
                return EventOutcome::failed(err);
            }
        };

        if let Err(err) = response.error_for_status() {
            warn!("Events fetch failed for order {}: {}", order_id, err);
            return EventOutcome::failed(err);
        }

        match ShopParser::parse_events(&response.body) {
            Ok(events) => {
                debug!("Fetched {} events for order {}", events.len(), order_id);
                EventOutcome {
                    events,
                    failure: None,
                }
            }
            Err(err) => {
                warn!("Events fetch failed for order {}: {}", order_id, err);
                EventOutcome::failed(err)
            }
        }
    }
}
