// Rust guideline compliant 2026-10-12

//! Timestamp normalization: [`RawTransaction`] to typed [`Transaction`].

use chrono::NaiveDateTime;
use domain::{RawTransaction, TIMESTAMP_FORMAT, Transaction};
use rust_decimal::Decimal;

/// A record that could not be normalized.
///
/// Every variant carries the zero-based position of the record in its batch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    /// A required field is absent (or `null`).
    #[error("record {position}: missing field `{field}`")]
    MissingField {
        /// Position in the batch.
        position: usize,
        /// Name of the absent field.
        field: &'static str,
    },
    /// The timestamp does not match `YYYY-MM-DD HH:MM:SS`.
    #[error("record {position}: malformed timestamp {value:?}: {reason}")]
    MalformedTimestamp {
        /// Position in the batch.
        position: usize,
        /// The offending value.
        value: String,
        /// Parser diagnostic.
        reason: String,
    },
    /// The record has a key the transaction shape does not define.
    #[error("record {position}: unknown field `{field}`")]
    UnknownField {
        /// Position in the batch.
        position: usize,
        /// The unexpected key.
        field: String,
    },
    /// The amount is below zero.
    #[error("record {position}: negative amount {amount}")]
    NegativeAmount {
        /// Position in the batch.
        position: usize,
        /// The offending amount.
        amount: Decimal,
    },
}

impl RecordError {
    /// Position of the rejected record in its batch.
    #[must_use]
    pub fn position(&self) -> usize {
        match self {
            Self::MissingField { position, .. }
            | Self::MalformedTimestamp { position, .. }
            | Self::UnknownField { position, .. }
            | Self::NegativeAmount { position, .. } => *position,
        }
    }
}

/// Parse a `YYYY-MM-DD HH:MM:SS` string.
///
/// # Errors
///
/// Returns [`RecordError::MalformedTimestamp`] tagged with `position`.
pub fn parse_timestamp(position: usize, value: &str) -> Result<NaiveDateTime, RecordError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|e| {
        RecordError::MalformedTimestamp {
            position,
            value: value.to_owned(),
            reason: e.to_string(),
        }
    })
}

/// Normalize one record. Checks run in a fixed order: unknown keys, missing
/// fields (`account_id`, `amount`, `timestamp`), sign of the amount, then the
/// timestamp format.
///
/// # Errors
///
/// Returns the first [`RecordError`] the record triggers.
pub fn normalize_record(position: usize, raw: &RawTransaction) -> Result<Transaction, RecordError> {
    if let Some(field) = raw.extra.keys().next() {
        return Err(RecordError::UnknownField { position, field: field.clone() });
    }
    let account_id = raw
        .account_id
        .clone()
        .ok_or(RecordError::MissingField { position, field: "account_id" })?;
    let amount = raw.amount.ok_or(RecordError::MissingField { position, field: "amount" })?;
    let timestamp = raw
        .timestamp
        .as_deref()
        .ok_or(RecordError::MissingField { position, field: "timestamp" })?;

    if amount < Decimal::ZERO {
        return Err(RecordError::NegativeAmount { position, amount });
    }

    Ok(Transaction {
        account_id,
        amount,
        timestamp: parse_timestamp(position, timestamp)?,
    })
}

/// Normalize a whole batch, failing on the first bad record.
///
/// The input is only read; callers keep their records untouched.
///
/// # Errors
///
/// Returns the [`RecordError`] of the first record that fails.
pub fn normalize(batch: &[RawTransaction]) -> Result<Vec<Transaction>, RecordError> {
    batch
        .iter()
        .enumerate()
        .map(|(position, raw)| normalize_record(position, raw))
        .collect()
}

/// Normalize a whole batch, setting bad records aside.
///
/// Returns the good records paired with their original positions, and one
/// error per rejected record, both in input order.
#[must_use]
pub fn normalize_lenient(batch: &[RawTransaction]) -> (Vec<(usize, Transaction)>, Vec<RecordError>) {
    let mut accepted = Vec::with_capacity(batch.len());
    let mut rejected = Vec::new();
    for (position, raw) in batch.iter().enumerate() {
        match normalize_record(position, raw) {
            Ok(tx) => accepted.push((position, tx)),
            Err(e) => rejected.push(e),
        }
    }
    (accepted, rejected)
}
