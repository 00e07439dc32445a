use bytes::Bytes;
use reqwest::{Client, ClientBuilder};
use std::{sync::Arc, time::Duration};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use url::Url;

use crate::upstream::UpstreamError;

/// Maximum number of body bytes kept in [`UpstreamError::HttpError`].
const MAX_ERROR_BODY: usize = 256;

/// Configuration for HTTP client concurrency.
///
/// One client is shared by every instance poller, so the semaphore bounds the
/// total number of in-flight upstream requests across the process.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Maximum number of concurrent HTTP requests allowed
    pub concurrent_limit: usize,
    /// Permit acquisition timeout in milliseconds
    pub permit_timeout_ms: u64,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self { concurrent_limit: 64, permit_timeout_ms: 5_000 }
    }
}

/// HTTP client with semaphore-based concurrency control.
///
/// Performs single bounded GET requests. There is no internal retry: a failed
/// request fails the pull cycle and the caller decides when to try again.
pub struct HttpClient {
    client: Client,
    concurrent_limit: Arc<Semaphore>,
    config: HttpClientConfig,
}

/// RAII guard ensuring semaphore permits are always released.
///
/// Uses [`OwnedSemaphorePermit`] which owns an `Arc` to the semaphore,
/// making it safe to hold across async boundaries.
struct PermitGuard {
    _permit: OwnedSemaphorePermit,
    semaphore: Arc<Semaphore>,
}

impl PermitGuard {
    fn new(permit: OwnedSemaphorePermit, semaphore: Arc<Semaphore>) -> Self {
        Self { _permit: permit, semaphore }
    }

    fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }
}

impl Drop for PermitGuard {
    fn drop(&mut self) {
        tracing::trace!(
            available_permits = self.semaphore.available_permits(),
            "permit guard dropped"
        );
    }
}

impl HttpClient {
    /// Creates a new HTTP client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client fails to build.
    pub fn new() -> Result<Self, UpstreamError> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Sanitizes network errors so upstream addresses do not leak into the
    /// recorded error string.
    fn sanitize_network_error(error: &reqwest::Error) -> String {
        if error.is_connect() {
            "connection refused or unreachable".to_string()
        } else if error.is_timeout() {
            "connection timed out".to_string()
        } else if error.is_request() {
            "request failed".to_string()
        } else if error.is_body() {
            "response body error".to_string()
        } else if error.is_redirect() {
            "too many redirects".to_string()
        } else {
            "network error".to_string()
        }
    }

    /// Creates a new HTTP client with the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client fails to build.
    pub fn with_config(config: HttpClientConfig) -> Result<Self, UpstreamError> {
        let client = ClientBuilder::new()
            .pool_idle_timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .use_rustls_tls()
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(concat!("alertdeck/", env!("CARGO_PKG_VERSION")))
            .tcp_keepalive(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                tracing::error!(error = %e, "failed to build http client");
                UpstreamError::ConnectionFailed(format!("HTTP client build failed: {e}"))
            })?;

        Ok(Self {
            client,
            concurrent_limit: Arc::new(Semaphore::new(config.concurrent_limit)),
            config,
        })
    }

    /// Sends a single HTTP GET request bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// - [`UpstreamError::Timeout`] if permit acquisition or the request times out
    /// - [`UpstreamError::ConcurrencyLimit`] if the semaphore is closed
    /// - [`UpstreamError::HttpError`] for non-success HTTP status codes
    /// - [`UpstreamError::ConnectionFailed`] for network-related failures
    pub async fn get(&self, url: &Url, timeout: Duration) -> Result<Bytes, UpstreamError> {
        let permit = tokio::time::timeout(
            Duration::from_millis(self.config.permit_timeout_ms),
            Arc::clone(&self.concurrent_limit).acquire_owned(),
        )
        .await
        .map_err(|_| {
            tracing::warn!(
                url = %url,
                available_permits = self.concurrent_limit.available_permits(),
                "http client semaphore acquisition timeout"
            );
            UpstreamError::Timeout
        })?
        .map_err(|_| {
            tracing::warn!(
                url = %url,
                available_permits = self.concurrent_limit.available_permits(),
                "http client concurrency limit reached"
            );
            UpstreamError::ConcurrencyLimit(url.to_string())
        })?;

        let permit_guard = PermitGuard::new(permit, self.concurrent_limit.clone());

        tracing::trace!(
            url = %url,
            available_permits = permit_guard.available_permits(),
            "http request started"
        );

        let response = self.client.get(url.clone()).timeout(timeout).send().await.map_err(|e| {
            tracing::trace!(
                available_permits = permit_guard.available_permits(),
                "http request error"
            );
            if e.is_timeout() {
                UpstreamError::Timeout
            } else {
                UpstreamError::ConnectionFailed(Self::sanitize_network_error(&e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let raw_text = response.text().await.unwrap_or_default();
            let sanitized_text = truncate_body(raw_text);
            tracing::trace!(
                status = status.as_u16(),
                available_permits = permit_guard.available_permits(),
                "http request failed"
            );
            return Err(UpstreamError::HttpError(status.as_u16(), sanitized_text));
        }

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                UpstreamError::Timeout
            } else {
                UpstreamError::Network(e)
            }
        })?;
        tracing::trace!(
            bytes = body.len(),
            available_permits = permit_guard.available_permits(),
            "http request completed"
        );
        Ok(body)
    }

    #[cfg(test)]
    #[must_use]
    pub fn available_permits(&self) -> usize {
        self.concurrent_limit.available_permits()
    }
}

fn truncate_body(mut text: String) -> String {
    if text.len() <= MAX_ERROR_BODY {
        return text;
    }
    let mut cut = MAX_ERROR_BODY;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    text.truncate(cut);
    text.push_str("... (truncated)");
    text
}
