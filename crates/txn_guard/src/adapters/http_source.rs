// Rust guideline compliant 2026-10-12

//! HTTP adapter for the `TransactionSource` port.
//!
//! Issues one GET to a fixed URL and decodes the body as a JSON array of
//! transaction records. Any non-2xx status is `SourceError::Unavailable`.

use std::time::Duration;

use domain::{RawTransaction, SourceError, TransactionSource};

/// Per-request timeout; a hanging endpoint must not stall the batch.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// `TransactionSource` adapter backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    client: reqwest::Client,
}

impl HttpSource {
    /// Create a source that fetches `url` with the default request timeout.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` when the TLS backend cannot be initialized.
    pub fn new(url: &str) -> Result<Self, reqwest::Error> {
        Self::with_timeout(url, REQUEST_TIMEOUT)
    }

    /// Create a source that fetches `url`, giving up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` when the TLS backend cannot be initialized.
    pub fn with_timeout(url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { url: url.to_owned(), client })
    }
}

impl TransactionSource for HttpSource {
    async fn fetch(&self) -> Result<Vec<RawTransaction>, SourceError> {
        tracing::debug!(url = %self.url, "http_source.fetch");
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| SourceError::Unavailable { reason: e.to_string() })?;
        response
            .json::<Vec<RawTransaction>>()
            .await
            .map_err(|e| SourceError::Malformed { reason: e.to_string() })
    }

    fn name(&self) -> &str {
        &self.url
    }
}
