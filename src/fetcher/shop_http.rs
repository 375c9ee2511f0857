//! Shop admin API HTTP transport
//!
//! Provides the production [`HttpTransport`] with:
//! - Static access-token and JSON content-type headers on every request
//! - A fixed per-call timeout (timeouts surface as [`FetcherError::Timeout`])
//! - Call-limit header parsing for observability
//!
//! Every call is a single attempt.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, LINK};
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::{ShopConfig, ACCESS_TOKEN_HEADER, CALL_LIMIT_HEADER};
use crate::fetcher::{FetcherError, FetcherResult, HttpResponse, HttpTransport};
use crate::metrics::HttpRequestMetrics;

/// reqwest-backed transport for the shop admin API
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport carrying the configured token and timeout
    ///
    /// # Errors
    /// Returns [`FetcherError::ClientSetup`] if the token is not a valid header
    /// value or the client cannot be built
    pub fn new(config: &ShopConfig) -> FetcherResult<Self> {
        let mut headers = HeaderMap::new();
        let mut token = HeaderValue::from_str(&config.access_token)
            .map_err(|e| FetcherError::ClientSetup(format!("Invalid access token: {e}")))?;
        token.set_sensitive(true);
        headers.insert(ACCESS_TOKEN_HEADER, token);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| FetcherError::ClientSetup(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> FetcherResult<HttpResponse> {
        debug!("Making GET request to: {}", url);
        let metrics = HttpRequestMetrics::start(endpoint_label(url));

        let response = match self.client.get(url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                metrics.record_network_error();
                return Err(classify_reqwest_error(e));
            }
        };

        let status = response.status().as_u16();
        metrics.record_complete(status);

        let headers = response.headers();
        let link = header_string(headers, LINK.as_str());
        let call_limit = header_string(headers, CALL_LIMIT_HEADER);
        if let Some((used, limit)) = call_limit.as_deref().and_then(parse_call_limit) {
            crate::metrics::record_call_limit(used, limit);
        }

        let body = response.text().await.map_err(classify_reqwest_error)?;

        Ok(HttpResponse {
            status,
            link,
            call_limit,
            body,
        })
    }
}

fn classify_reqwest_error(e: reqwest::Error) -> FetcherError {
    if e.is_timeout() {
        FetcherError::Timeout(e.to_string())
    } else {
        FetcherError::NetworkError(e.to_string())
    }
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Strip query string and host so metrics labels stay low-cardinality.
/// Numeric path segments (order ids) collapse to `:id`.
fn endpoint_label(url: &str) -> String {
    let path = url.split('?').next().unwrap_or(url);
    let path = path
        .find("/admin/")
        .map(|idx| &path[idx..])
        .unwrap_or(path);
    path.split('/')
        .map(|seg| {
            if !seg.is_empty() && seg.chars().all(|c| c.is_ascii_digit()) {
                ":id"
            } else {
                seg
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Parse the call-limit header (`"32/40"`)
///
/// # Returns
/// Some((used, limit)) if the header is well formed, None otherwise
pub fn parse_call_limit(value: &str) -> Option<(u32, u32)> {
    let (used, limit) = value.trim().split_once('/')?;
    match (used.trim().parse::<u32>(), limit.trim().parse::<u32>()) {
        (Ok(used), Ok(limit)) if limit > 0 => Some((used, limit)),
        _ => {
            warn!("Failed to parse call limit header '{}'", value);
            None
        }
    }
}
