// Rust guideline compliant 2026-10-12

//! HTTP adapter for the `PageFetcher` port of the site auditor.
//!
//! Follows redirects (reqwest default) and reports the final status. Only a
//! missing response is an error; 4xx/5xx pages are returned as-is.

use std::time::Duration;

use site_audit::{FetchError, FetchedPage, PageFetcher, Url};

/// Per-request timeout; a hanging link must not stall the whole audit.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// `PageFetcher` adapter backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` when the TLS backend cannot be initialized.
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let transport = |e: reqwest::Error| FetchError::Transport { reason: e.to_string() };
        let response = self.client.get(url.as_str()).send().await.map_err(transport)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport)?;
        tracing::debug!(%url, status, "http_fetcher.fetched");
        Ok(FetchedPage { status, body })
    }
}
