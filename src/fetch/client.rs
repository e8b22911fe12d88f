//! HTTP client construction and retrying page fetches.
//!
//! One `reqwest::Client` is built from the [`FetchConfig`] and shared by the
//! page fetcher and the PDF downloader, taking advantage of connection
//! pooling. Retries happen in an explicit bounded loop: only 5xx responses
//! are retried, immediately, up to the configured budget — politeness spacing
//! is the rate limiter's job, applied upstream by the orchestrator.

use std::time::Duration;

use reqwest::{Client, Proxy};
use tracing::{debug, instrument, warn};

use super::error::{FetchError, is_transient_status};
use crate::config::FetchConfig;

/// Default HTTP connect timeout (30 seconds).
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes, PDFs can be large).
const READ_TIMEOUT_SECS: u64 = 300;

/// Builds the shared HTTP client: timeouts, gzip, agent identity, and the
/// optional proxy from the configuration.
///
/// # Errors
///
/// Returns [`FetchError::ClientBuild`] if the proxy URL is invalid or the
/// client cannot be constructed.
pub fn build_http_client(config: &FetchConfig) -> Result<Client, FetchError> {
    let mut builder = Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(READ_TIMEOUT_SECS))
        .gzip(true)
        .user_agent(config.user_agent.clone());

    if let Some(proxy_url) = &config.proxy {
        let proxy = Proxy::all(proxy_url).map_err(FetchError::ClientBuild)?;
        builder = builder.proxy(proxy);
    }

    builder.build().map_err(FetchError::ClientBuild)
}

/// Fetches page text over HTTP with a bounded retry budget for 5xx responses.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    retries: u32,
}

impl PageFetcher {
    /// Creates a fetcher around a shared client with the given retry budget.
    #[must_use]
    pub fn new(client: Client, retries: u32) -> Self {
        Self { client, retries }
    }

    /// Returns the configured retry budget.
    #[must_use]
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Issues a GET and returns the response body as text.
    ///
    /// Classification per attempt:
    /// - status < 400: success, body text returned;
    /// - 5xx with budget remaining: retried immediately;
    /// - any other status >= 400: fail, no retry;
    /// - transport error (timeout, connect, TLS): fail, no retry.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] per the classification above.
    #[instrument(skip(self), fields(retries = self.retries))]
    pub async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            debug!(attempt, "fetching page");

            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| FetchError::transport(url, e))?;

            let status = response.status().as_u16();
            if status < 400 {
                return response.text().await.map_err(|e| FetchError::transport(url, e));
            }

            if is_transient_status(status) && attempt <= self.retries {
                warn!(status, attempt, "server error, retrying");
                continue;
            }

            return Err(FetchError::http_status(url, status));
        }
    }

    /// Issues a GET and returns the response body as bytes, with the same
    /// retry classification as [`get_text`](Self::get_text).
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] per the retry classification.
    #[instrument(skip(self), fields(retries = self.retries))]
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            debug!(attempt, "fetching binary");

            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| FetchError::transport(url, e))?;

            let status = response.status().as_u16();
            if status < 400 {
                let body = response
                    .bytes()
                    .await
                    .map_err(|e| FetchError::transport(url, e))?;
                return Ok(body.to_vec());
            }

            if is_transient_status(status) && attempt <= self.retries {
                warn!(status, attempt, "server error, retrying");
                continue;
            }

            return Err(FetchError::http_status(url, status));
        }
    }
}
