//! Cursor pagination over the list-orders endpoint
//!
//! Follows the `rel="next"` URL from each response's `Link` header until the
//! server stops advertising one. Failures never discard what was already
//! collected: the loop stops and the partial set is returned together with
//! the error.
//!
//! Includes safety mechanisms:
//! - Maximum page count to bound a misbehaving cursor chain
//! - Repeated-cursor detection

use std::collections::HashSet;
use tracing::{debug, error};

use crate::fetcher::link_header::next_link;
use crate::fetcher::shop_parser::ShopParser;
use crate::fetcher::{FetcherError, HttpTransport};
use crate::Order;

/// Opaque "continue fetching here" pointer issued by the server
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageCursor(String);

impl PageCursor {
    /// Wrap a URL
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Cursor from a raw `Link` header, None once the collection is exhausted
    pub fn from_link_header(header: Option<&str>) -> Option<Self> {
        header.and_then(next_link).map(Self)
    }

    /// URL to request next
    pub fn url(&self) -> &str {
        &self.0
    }
}

/// Orders gathered by a collection fetch
#[derive(Debug, Default)]
pub struct OrderCollection {
    /// Orders in server order
    pub orders: Vec<Order>,
    /// Pages successfully fetched
    pub pages_fetched: usize,
    /// Set when the fetch stopped early; `orders` then holds the partial set
    pub failure: Option<FetcherError>,
}

impl OrderCollection {
    /// Whether every page was fetched
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

struct OrderPage {
    orders: Vec<Order>,
    next: Option<PageCursor>,
}

/// Pagination helper for the list-orders endpoint
pub struct PaginationHelper;

impl PaginationHelper {
    /// Fetch every order page starting from `first_url`
    ///
    /// # Arguments
    /// * `transport` - HTTP transport
    /// * `first_url` - URL of the first page (carries `status` and `limit`)
    /// * `max_pages` - Safety bound; exceeding it is a collection failure
    ///
    /// # Returns
    /// All orders across all pages, plus the failure that stopped the loop
    /// early if any
    pub async fn paginate_orders<T>(
        transport: &T,
        first_url: &str,
        max_pages: usize,
    ) -> OrderCollection
    where
        T: HttpTransport + ?Sized,
    {
        let mut collection = OrderCollection::default();
        let mut visited: HashSet<String> = HashSet::new();
        let mut next = Some(PageCursor::new(first_url));

        while let Some(cursor) = next.take() {
            if collection.pages_fetched >= max_pages {
                let err = FetcherError::PaginationError(format!(
                    "Max pages ({max_pages}) exceeded - possible cursor loop. Orders collected: {}",
                    collection.orders.len()
                ));
                error!("Order collection stopped: {}", err);
                collection.failure = Some(err);
                break;
            }

            if !visited.insert(cursor.url().to_string()) {
                let err = FetcherError::PaginationError(format!(
                    "Cursor revisited: {}",
                    cursor.url()
                ));
                error!("Order collection stopped: {}", err);
                collection.failure = Some(err);
                break;
            }

            debug!("Fetching orders page {}", collection.pages_fetched + 1);

            let page = match Self::fetch_page(transport, &cursor).await {
                Ok(page) => page,
                Err(err) => {
                    error!(
                        "Order collection stopped at page {}: {}",
                        collection.pages_fetched + 1,
                        err
                    );
                    collection.failure = Some(err);
                    break;
                }
            };

            debug!(
                "Received {} orders in page {}",
                page.orders.len(),
                collection.pages_fetched + 1
            );

            collection.orders.extend(page.orders);
            collection.pages_fetched += 1;
            next = page.next;
        }

        debug!(
            "Pagination completed after {} pages. Total orders: {}",
            collection.pages_fetched,
            collection.orders.len()
        );

        collection
    }

    async fn fetch_page<T>(
        transport: &T,
        cursor: &PageCursor,
    ) -> Result<OrderPage, FetcherError>
    where
        T: HttpTransport + ?Sized,
    {
        let response = transport.get(cursor.url()).await?;
        response.error_for_status()?;

        let orders = ShopParser::parse_orders(&response.body)?;
        let next = PageCursor::from_link_header(response.link.as_deref());
        Ok(OrderPage { orders, next })
    }
}
