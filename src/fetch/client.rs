//! HTTP client wrapper for fetching the target endpoint.
//!
//! One [`HttpClient`] is built per run and reused for every iteration so the
//! connection pool and keep-alive connections carry across requests.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap};
use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument};
use url::Url;

use super::classify::{ContentCategory, declared_category};
use super::constants::REQUEST_TIMEOUT_SECS;
use super::error::FetchError;
use crate::user_agent::{BROWSER_USER_AGENT, default_fetch_headers};

/// Maximum number of redirects followed per request.
const MAX_REDIRECTS: usize = 10;

/// Charset assumed for text bodies whose `Content-Type` names none.
const FALLBACK_CHARSET: &str = "utf-8";

/// HTTP session used for the requests of one run.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

/// What came back from one GET.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// HTTP status of the final response after redirects.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Full response body. Empty unless the status was 200. Bodies declared
    /// as text are transcoded to UTF-8 from their `charset` parameter.
    pub body: Vec<u8>,
}

impl FetchResponse {
    /// Whether this response should be classified and saved.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }
}

impl HttpClient {
    /// Creates a client with the default 30 second timeout.
    ///
    /// # Errors
    ///
    /// Returns the builder error if the TLS backend or system configuration
    /// cannot be initialized.
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    /// Creates a client with an explicit whole-request timeout.
    ///
    /// # Errors
    ///
    /// Returns the builder error if the client cannot be constructed.
    pub fn with_timeout(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(default_fetch_headers())
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .build()?;
        Ok(Self { client })
    }

    /// Issues one GET to `url`.
    ///
    /// The body is read only for 200 responses; other statuses are returned
    /// as-is for the caller to count. A body whose `Content-Type` declares
    /// text is decoded by its charset (UTF-8 when none is given) and stored
    /// as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] sorted by cause: timeout, connection failure,
    /// other network error, or an unexpected (request-building) failure.
    #[instrument(level = "debug", skip(self), fields(url = %url))]
    pub async fn fetch(&self, url: &Url) -> Result<FetchResponse, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url.as_str(), e))?;

        let status = response.status();
        let headers = response.headers().clone();
        debug!(status = status.as_u16(), "response received");

        let body = if status != StatusCode::OK {
            Vec::new()
        } else if declares_text(&headers) {
            response
                .text_with_charset(FALLBACK_CHARSET)
                .await
                .map_err(|e| FetchError::from_reqwest(url.as_str(), e))?
                .into_bytes()
        } else {
            let bytes = response
                .bytes()
                .await
                .map_err(|e| FetchError::from_reqwest(url.as_str(), e))?;
            Vec::from(bytes)
        };

        Ok(FetchResponse {
            status,
            headers,
            body,
        })
    }
}

fn declares_text(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(declared_category)
        .is_some_and(ContentCategory::is_text)
}
