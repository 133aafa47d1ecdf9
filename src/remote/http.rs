//! HTTP transport with retry and typed errors.
//!
//! [`HttpClient`] wraps a shared [`reqwest::Client`] and gives the rest of
//! the remote layer two operations: [`HttpClient::fetch_json`] and
//! [`HttpClient::fetch_text`]. Connection failures and retryable statuses
//! (5xx, 429) are retried with capped exponential backoff before the error
//! is surfaced; definitive statuses (4xx) fail fast as
//! [`CatalogError::HttpStatus`] so callers can distinguish "absent" from
//! "unreachable".
//!
//! Authentication uses GitLab's `PRIVATE-TOKEN` header when the caller
//! supplies a token for the instance; tokens never appear in URLs.

use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, warn};

use crate::constants::{
    HTTP_REQUEST_TIMEOUT, HTTP_RETRY_ATTEMPTS, MAX_BACKOFF_DELAY_MS, STARTING_BACKOFF_DELAY_MS,
};
use crate::core::{CatalogError, Result};

/// Shared HTTP client for all remote fetches.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a client with the default request timeout.
    #[must_use]
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(HTTP_REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self { client }
    }

    /// Fetches a URL and decodes the JSON response body.
    ///
    /// # Errors
    ///
    /// [`CatalogError::HttpStatus`] for non-2xx responses,
    /// [`CatalogError::Transport`] for connection-level failures that
    /// survive the retry budget, [`CatalogError::JsonError`] for undecodable
    /// bodies.
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        url: &str,
        token: Option<&str>,
    ) -> Result<T> {
        let response = self.execute(url, token).await?;
        let body = response.text().await.map_err(|e| CatalogError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetches a URL and returns the raw response body as text.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`HttpClient::fetch_json`], minus JSON decoding.
    pub async fn fetch_text(&self, url: &str, token: Option<&str>) -> Result<String> {
        let response = self.execute(url, token).await?;
        response.text().await.map_err(|e| CatalogError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    /// Sends a GET with retry on transient failures, returning a success
    /// response or a typed error.
    async fn execute(&self, url: &str, token: Option<&str>) -> Result<reqwest::Response> {
        let strategy = ExponentialBackoff::from_millis(STARTING_BACKOFF_DELAY_MS)
            .max_delay(Duration::from_millis(MAX_BACKOFF_DELAY_MS))
            .map(jitter)
            .take(HTTP_RETRY_ATTEMPTS.saturating_sub(1));

        debug!(url, "GET");

        let response = Retry::spawn(strategy, || async {
            let mut request = self.client.get(url);
            if let Some(token) = token {
                request = request.header("PRIVATE-TOKEN", token);
            }
            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    // Retry server-side hiccups and throttling; definitive
                    // statuses fall through to the check below.
                    if status.is_server_error() || status.as_u16() == 429 {
                        warn!(url, status = status.as_u16(), "retryable response");
                        Err(CatalogError::HttpStatus {
                            status: status.as_u16(),
                            url: url.to_string(),
                        })
                    } else {
                        Ok(response)
                    }
                }
                Err(e) => {
                    warn!(url, error = %e, "transport failure");
                    Err(CatalogError::Transport {
                        url: url.to_string(),
                        reason: e.to_string(),
                    })
                }
            }
        })
        .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }
}
