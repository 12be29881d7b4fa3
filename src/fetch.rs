//! Network fetcher
//!
//! A single timed HTTP GET that hands back the raw response body. Decoding and
//! decompression are left to the caller so every provider client goes through
//! the same narrow seam, which tests replace with a scripted implementation.

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT_ENCODING;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while fetching a resource
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request did not complete within its timeout
    #[error("Request to {url} timed out after {}s", .timeout.as_secs())]
    Timeout { url: String, timeout: Duration },

    /// The request failed before a response was received
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("Request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Fetches a resource by URL with a timeout
#[async_trait]
pub trait Fetcher: Send + Sync + Debug {
    /// Issues a GET for `url`, failing if it takes longer than `timeout`.
    ///
    /// When `compressed` is set the request asks for gzip transfer encoding and
    /// the body is returned exactly as received.
    async fn fetch(&self, url: &str, timeout: Duration, compressed: bool)
        -> Result<Vec<u8>, FetchError>;
}

/// Fetcher backed by a shared reqwest client
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a new HttpFetcher with default settings
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(
        &self,
        url: &str,
        timeout: Duration,
        compressed: bool,
    ) -> Result<Vec<u8>, FetchError> {
        let mut request = self.client.get(url).timeout(timeout);
        if compressed {
            request = request.header(ACCEPT_ENCODING, "gzip");
        }

        let classify = |source: reqwest::Error| {
            if source.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                    timeout,
                }
            } else {
                FetchError::Transport {
                    url: url.to_string(),
                    source,
                }
            }
        };

        let response = request.send().await.map_err(classify)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(classify)?;
        debug!(url, bytes = body.len(), "fetched");
        Ok(body.to_vec())
    }
}
