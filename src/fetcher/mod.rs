//! Remote API fetchers
//!
//! The fetch layer is split at an [`HttpTransport`] seam: everything above it
//! (pagination, event isolation, parsing) is transport-agnostic, and the
//! production [`shop_http::ReqwestTransport`] is the only code that talks to
//! the network.

use async_trait::async_trait;

pub mod link_header;
pub mod pagination;
pub mod shop_http;
pub mod shop_orders;
pub mod shop_parser;

pub use pagination::{OrderCollection, PageCursor};
pub use shop_orders::{EventOutcome, ShopFetcher};

/// Fetcher errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetcherError {
    /// Non-success HTTP status
    #[error("HTTP error {status}: {body}")]
    HttpStatus {
        /// Status code
        status: u16,
        /// Truncated response body
        body: String,
    },

    /// Remote throttling (HTTP 429)
    #[error("rate limit exceeded")]
    RateLimitExceeded,

    /// Request did not complete within the configured timeout
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Connection-level failure
    #[error("network error: {0}")]
    NetworkError(String),

    /// Response parse error
    #[error("parse error: {0}")]
    ParseError(String),

    /// Pagination cursor chain did not terminate as expected
    #[error("pagination error: {0}")]
    PaginationError(String),

    /// Transport could not be constructed
    #[error("client setup error: {0}")]
    ClientSetup(String),
}

impl FetcherError {
    /// Build the error matching a non-success status
    pub fn from_status(status: u16, body: &str) -> Self {
        if status == 429 {
            return Self::RateLimitExceeded;
        }
        Self::HttpStatus {
            status,
            body: truncate_body(body),
        }
    }

    /// Whether the remote side asked us to slow down
    pub fn is_throttled(&self) -> bool {
        matches!(self, Self::RateLimitExceeded)
    }
}

/// Result type for fetcher operations
pub type FetcherResult<T> = Result<T, FetcherError>;

const MAX_ERROR_BODY_CHARS: usize = 200;

fn truncate_body(body: &str) -> String {
    let body = body.trim();
    if body.chars().count() <= MAX_ERROR_BODY_CHARS {
        return body.to_string();
    }
    let truncated: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    format!("{truncated}...")
}

/// Raw response handed back by a transport.
///
/// Non-success statuses are returned as values, not errors; callers decide
/// how to degrade. `Err` from a transport always means the request itself
/// failed (connect, timeout, body read).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw `Link` header, if any
    pub link: Option<String>,
    /// Raw call-limit header (`used/limit`), if any
    pub call_limit: Option<String>,
    /// Response body
    pub body: String,
}

impl HttpResponse {
    /// Successful response with a body and no pagination metadata
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            link: None,
            call_limit: None,
            body: body.into(),
        }
    }

    /// Response with an arbitrary status
    pub fn with_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            link: None,
            call_limit: None,
            body: body.into(),
        }
    }

    /// Attach a `Link` header
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Convert a non-success status into the matching error
    pub fn error_for_status(&self) -> FetcherResult<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(FetcherError::from_status(self.status, &self.body))
        }
    }
}

/// Minimal GET transport used by the fetchers
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issue a GET to an absolute URL
    async fn get(&self, url: &str) -> FetcherResult<HttpResponse>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for std::sync::Arc<T> {
    async fn get(&self, url: &str) -> FetcherResult<HttpResponse> {
        (**self).get(url).await
    }
}
