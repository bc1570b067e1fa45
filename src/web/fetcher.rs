//! Page fetchers
//!
//! The outbound collaborator of the page cache.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{CacheError, Result};

// == Fetcher ==
/// Fetches the content behind a URL.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Returns the content at `url`; network or protocol errors are
    /// [`CacheError::Fetch`].
    async fn fetch(&self, url: &str) -> Result<String>;
}

// == HTTP Fetcher ==
/// Plain HTTP GET through reqwest, no custom headers.
///
/// The body text is returned whatever the status code; only transport and
/// body decoding failures are errors.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Builds a fetcher whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CacheError::Internal(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await.map_err(fetch_error)?;
        debug!(url, status = %response.status(), "Fetched page");
        response.text().await.map_err(fetch_error)
    }
}

fn fetch_error(error: reqwest::Error) -> CacheError {
    CacheError::Fetch(error.to_string())
}
