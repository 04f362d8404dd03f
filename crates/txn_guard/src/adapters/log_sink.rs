// Rust guideline compliant 2026-10-12

//! Log adapter for the `FlagSink` port.
//!
//! Emits one `tracing::warn!` event per flag and always returns `Ok(())`.

use domain::{FlagSink, FlaggedTransaction, SinkError};

/// `FlagSink` adapter that logs each flag as a structured warning.
#[derive(Debug)]
pub struct LogSink;

impl LogSink {
    /// Create a new log sink.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl FlagSink for LogSink {
    async fn report(&self, flag: &FlaggedTransaction) -> Result<(), SinkError> {
        let tx = &flag.transaction;
        tracing::warn!(
            position = flag.position,
            account = %tx.account_id,
            amount = %tx.amount,
            timestamp = %tx.timestamp,
            code = flag.reason.code(),
            reason = %flag.reason,
            "log_sink.flag"
        );
        Ok(())
    }
}
