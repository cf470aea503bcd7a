//! HTTP fetching with a typed failure taxonomy.
//!
//! The [`Fetcher`] trait is the harvester's only view of the network; the
//! pool and orchestrator are generic over it, which keeps them testable with
//! scripted in-memory fetchers. [`HttpFetcher`] is the production
//! implementation on top of `reqwest`.
//!
//! Retry policy lives here, at the transport boundary, not in the fetch
//! pool: only transient failures (timeouts, connection errors) are retried,
//! with a short linear backoff. HTTP error statuses are returned as-is.

use async_trait::async_trait;
use papertrawl_core::HttpSection;
use std::time::Duration;
use thiserror::Error;

/// Base delay in milliseconds between retry attempts.
const RETRY_DELAY_MS: u64 = 500;

/// Typed fetch failures.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request exceeded the configured timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The server answered with a non-success status.
    #[error("HTTP status {status} from {url}")]
    HttpStatus {
        /// Requested URL
        url: String,
        /// Response status code
        status: u16,
    },

    /// Connection, DNS, or protocol-level failure.
    #[error("network error: {0}")]
    Network(String),
}

impl FetchError {
    /// Whether retrying the same request can plausibly succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Network(_))
    }
}

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// A source of page bodies.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the body at `url`.
    async fn fetch(&self, url: &str) -> FetchResult<String>;
}

/// `reqwest`-backed fetcher with a browser-like User-Agent, a per-request
/// timeout, and bounded retry for transient failures.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    max_attempts: u32,
}

impl HttpFetcher {
    /// Build a fetcher from the HTTP configuration section.
    ///
    /// # Errors
    /// Returns error if the underlying HTTP client cannot be constructed.
    pub fn new(config: &HttpSection) -> FetchResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FetchError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            max_attempts: config.max_attempts.max(1),
        })
    }

    async fn fetch_once(&self, url: &str) -> FetchResult<String> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(url.to_string())
            } else {
                FetchError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(url.to_string())
            } else {
                FetchError::Network(e.to_string())
            }
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<String> {
        let mut attempt = 1;
        loop {
            match self.fetch_once(url).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    if !e.is_transient() || attempt >= self.max_attempts {
                        return Err(e);
                    }

                    let delay = Duration::from_millis(RETRY_DELAY_MS * u64::from(attempt));
                    tracing::warn!(
                        url,
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "fetch failed, retrying in {:?}",
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
