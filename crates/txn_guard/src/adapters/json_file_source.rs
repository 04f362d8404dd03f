// Rust guideline compliant 2026-10-12

//! File adapter for the `TransactionSource` port.
//!
//! Reads a file holding a JSON array of transaction records.

use std::path::PathBuf;

use domain::{RawTransaction, SourceError, TransactionSource};

/// `TransactionSource` adapter reading a JSON file with `tokio::fs`.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
    name: String,
}

impl JsonFileSource {
    /// Create a source that reads `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }
}

/// Decode a JSON array of transaction records.
///
/// # Errors
///
/// Returns `SourceError::Malformed` when `text` is not such an array.
pub fn parse_batch(text: &str) -> Result<Vec<RawTransaction>, SourceError> {
    serde_json::from_str(text).map_err(|e| SourceError::Malformed { reason: e.to_string() })
}

impl TransactionSource for JsonFileSource {
    async fn fetch(&self) -> Result<Vec<RawTransaction>, SourceError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| SourceError::Unavailable { reason: format!("{}: {e}", self.name) })?;
        parse_batch(&text)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
