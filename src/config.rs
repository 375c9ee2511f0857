//! Shop API configuration
//!
//! All endpoint, credential and pacing settings live in a single [`ShopConfig`]
//! value that is built once at startup and passed by reference into the
//! fetcher and executor. Nothing here is read from global state.
//!
//! # Endpoints
//!
//! - **List orders**: `{shop_url}/admin/api/{api_version}/orders.json?status=any&limit={page_size}`
//! - **List order events**: `{shop_url}/admin/api/{api_version}/orders/{id}/events.json`

use std::fmt;
use std::time::Duration;

/// Largest page size accepted by the list-orders endpoint
pub const MAX_PAGE_SIZE: u32 = 250;

/// Default per-call request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Default pause between per-order event fetches.
/// Matches the leak rate of the REST bucket (2 requests/second).
pub const DEFAULT_DETAIL_DELAY: Duration = Duration::from_millis(500);

/// Upper bound on followed cursors before the collection fetch gives up
pub const DEFAULT_MAX_PAGES: usize = 10_000;

/// Header carrying the access token
pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Header reporting bucket usage as `used/limit`
pub const CALL_LIMIT_HEADER: &str = "X-Shopify-Shop-Api-Call-Limit";

/// Configuration errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required setting is empty
    #[error("missing required setting: {0}")]
    Missing(&'static str),

    /// Shop URL is not an http(s) URL
    #[error("invalid shop URL '{0}': expected http:// or https://")]
    InvalidShopUrl(String),

    /// Page size out of range
    #[error("page size {0} out of range (1..={MAX_PAGE_SIZE})")]
    InvalidPageSize(u32),

    /// Zero timeout
    #[error("request timeout must be greater than zero")]
    InvalidTimeout,

    /// Zero page cap
    #[error("max pages must be at least 1")]
    InvalidMaxPages,
}

/// Remote shop configuration
#[derive(Clone)]
pub struct ShopConfig {
    /// Shop base URL without trailing slash (e.g. <https://example.myshopify.com>)
    pub shop_url: String,

    /// Admin API version segment (e.g. "2024-01")
    pub api_version: String,

    /// Static admin access token
    pub access_token: String,

    /// Orders requested per page
    pub page_size: u32,

    /// Per-call timeout; exceeding it counts as a network failure
    pub request_timeout: Duration,

    /// Pause after every per-order event fetch
    pub detail_delay: Duration,

    /// Safety bound on followed pagination cursors
    pub max_pages: usize,
}

impl ShopConfig {
    /// Create a configuration with default tunables
    pub fn new(
        shop_url: impl Into<String>,
        api_version: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        let shop_url: String = shop_url.into();
        Self {
            shop_url: shop_url.trim().trim_end_matches('/').to_string(),
            api_version: api_version.into().trim().to_string(),
            access_token: access_token.into().trim().to_string(),
            page_size: MAX_PAGE_SIZE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            detail_delay: DEFAULT_DETAIL_DELAY,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Set the page size
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the per-call timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the pause between event fetches
    pub fn with_detail_delay(mut self, delay: Duration) -> Self {
        self.detail_delay = delay;
        self
    }

    /// Set the pagination safety bound
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Check that the configuration can be used to reach the API
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shop_url.is_empty() {
            return Err(ConfigError::Missing("shop URL"));
        }
        if !(self.shop_url.starts_with("https://") || self.shop_url.starts_with("http://")) {
            return Err(ConfigError::InvalidShopUrl(self.shop_url.clone()));
        }
        if self.api_version.is_empty() {
            return Err(ConfigError::Missing("API version"));
        }
        if self.access_token.is_empty() {
            return Err(ConfigError::Missing("access token"));
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidPageSize(self.page_size));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }
        if self.max_pages == 0 {
            return Err(ConfigError::InvalidMaxPages);
        }
        Ok(())
    }

    fn api_base(&self) -> String {
        format!("{}/admin/api/{}", self.shop_url, self.api_version)
    }

    /// URL of the first list-orders page
    pub fn orders_url(&self) -> String {
        format!(
            "{}/orders.json?status=any&limit={}",
            self.api_base(),
            self.page_size
        )
    }

    /// URL of the events collection for one order
    pub fn events_url(&self, order_id: &crate::OrderId) -> String {
        format!("{}/orders/{}/events.json", self.api_base(), order_id)
    }
}

// Keep the token out of logs.
impl fmt::Debug for ShopConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShopConfig")
            .field("shop_url", &self.shop_url)
            .field("api_version", &self.api_version)
            .field("access_token", &"<redacted>")
            .field("page_size", &self.page_size)
            .field("request_timeout", &self.request_timeout)
            .field("detail_delay", &self.detail_delay)
            .field("max_pages", &self.max_pages)
            .finish()
    }
}
