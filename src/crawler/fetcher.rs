//! Fetch capability and its HTTP implementation
//!
//! The scheduler only sees the `Fetcher` trait: give it a URL, get back the
//! full body or a definite failure. `HttpFetcher` is the reqwest-backed
//! implementation used by the binary; tests plug in their own doubles.

use crate::config::UserAgentConfig;
use crate::CrawlError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single fetch
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Connection, DNS, TLS, or timeout failure
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status
    #[error("HTTP status {0}")]
    Status(u16),

    /// The response body could not be read
    #[error("body read error: {0}")]
    Body(String),
}

impl FetchError {
    /// Maps the failure onto the crawl error taxonomy
    ///
    /// Transport and status failures are `BadRequest`; body failures are `BadBody`.
    pub fn into_crawl_error(self, url: &str) -> CrawlError {
        match self {
            Self::Body(message) => CrawlError::BadBody {
                url: url.to_string(),
                message,
            },
            other => CrawlError::BadRequest {
                url: url.to_string(),
                message: other.to_string(),
            },
        }
    }
}

/// Capability to fetch the full body of a URL
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Deadline for a whole request, body included
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10).min(timeout))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetcher backed by a reqwest `Client`
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the client from the user agent config and fetch deadline
    pub fn from_config(
        config: &UserAgentConfig,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config, timeout)?))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            // Classify error
            if e.is_timeout() {
                FetchError::Transport("Request timeout".to_string())
            } else if e.is_connect() {
                FetchError::Transport(format!("Connection failed: {}", e))
            } else {
                FetchError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;

        Ok(body.to_vec())
    }
}
