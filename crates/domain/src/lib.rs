// Rust guideline compliant 2026-10-12

//! Shared domain types for the transaction-flagging workspace.
//!
//! Defines the record shapes (`RawTransaction`, `Transaction`), the flag
//! output (`FlagReason`, `FlaggedTransaction`), and the hexagonal port traits
//! `TransactionSource` and `FlagSink`. Every other crate depends on this one;
//! nothing here performs I/O.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDateTime, TimeDelta};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// `strftime` format every incoming `timestamp` string must follow.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Opaque account identifier. Upstream feeds send either a string or an integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AccountId {
    /// Integer identifier, e.g. `42`.
    Number(i64),
    /// Textual identifier, e.g. `"A1"`.
    Text(String),
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for AccountId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<i64> for AccountId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

/// A transaction record exactly as received from an ingestion adapter.
///
/// All known fields are optional so that an absent field can be reported with
/// the record position instead of failing the whole deserialization. Keys
/// other than the three known ones land in `extra` and are rejected later, at
/// normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    /// Account the transaction belongs to.
    #[serde(default)]
    pub account_id: Option<AccountId>,
    /// Amount, as a JSON number or a decimal string.
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// Point in time, formatted as [`TIMESTAMP_FORMAT`].
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Any key not listed above.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl RawTransaction {
    /// Build a record with all three fields present and no extra keys.
    #[must_use]
    pub fn new(account_id: impl Into<AccountId>, amount: Decimal, timestamp: &str) -> Self {
        Self {
            account_id: Some(account_id.into()),
            amount: Some(amount),
            timestamp: Some(timestamp.to_owned()),
            extra: BTreeMap::new(),
        }
    }
}

/// A normalized transaction: typed fields, parsed timestamp.
///
/// Produced by the engine from a [`RawTransaction`]; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Account the transaction belongs to.
    pub account_id: AccountId,
    /// Non-negative amount.
    pub amount: Decimal,
    /// Instant of the transaction (no time zone; feeds use a single local clock).
    pub timestamp: NaiveDateTime,
}

// ---------------------------------------------------------------------------
// Flags
// ---------------------------------------------------------------------------

/// Why a transaction was flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagReason {
    /// `amount > threshold`.
    AmountExceeded {
        /// Threshold in force when the flag was raised.
        threshold: Decimal,
    },
    /// More than `limit` transactions for the account inside the trailing `window`.
    FrequencyExceeded {
        /// Maximum number of transactions tolerated inside the window.
        limit: usize,
        /// Length of the trailing window.
        window: TimeDelta,
    },
}

impl FlagReason {
    /// Stable machine-readable code for this reason.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::AmountExceeded { .. } => "AMOUNT_EXCEEDED",
            Self::FrequencyExceeded { .. } => "FREQUENCY_EXCEEDED",
        }
    }
}

impl fmt::Display for FlagReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AmountExceeded { threshold } => {
                write!(f, "Amount exceeds threshold of {threshold}")
            }
            Self::FrequencyExceeded { limit, window } => {
                let seconds = window.num_seconds();
                if seconds % 60 == 0 {
                    write!(f, "More than {limit} transactions within {} minutes", seconds / 60)
                } else {
                    write!(f, "More than {limit} transactions within {seconds} seconds")
                }
            }
        }
    }
}

/// One flag raised against one transaction.
///
/// A transaction that trips both rules appears in two separate entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlaggedTransaction {
    /// Zero-based position of the record in the input batch.
    pub position: usize,
    /// Copy of the normalized transaction.
    pub transaction: Transaction,
    /// Rule that fired.
    pub reason: FlagReason,
}

// ---------------------------------------------------------------------------
// Port errors
// ---------------------------------------------------------------------------

/// Errors from the `TransactionSource` hexagonal port.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SourceError {
    /// The upstream could not be reached or refused the request.
    #[error("source unavailable: {reason}")]
    Unavailable {
        /// Human-readable description.
        reason: String,
    },
    /// The upstream answered, but the payload is not a list of transaction records.
    #[error("malformed payload: {reason}")]
    Malformed {
        /// Human-readable description.
        reason: String,
    },
}

/// Errors from the `FlagSink` hexagonal port.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SinkError {
    /// The flag could not be delivered.
    #[error("delivery failed: {reason}")]
    DeliveryFailed {
        /// Human-readable description.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// Hexagonal port: supplies one finite batch of raw transaction records.
///
/// The engine never knows where records come from; HTTP, file and synthetic
/// adapters live in the binary crate.
#[expect(
    async_fn_in_trait,
    reason = "no dyn dispatch needed; internal workspace only"
)]
pub trait TransactionSource {
    /// Fetch the whole batch.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Unavailable` on transport failure, or
    /// `SourceError::Malformed` when the payload cannot be decoded.
    async fn fetch(&self) -> Result<Vec<RawTransaction>, SourceError>;

    /// Short description used in log events (e.g. a URL or a file path).
    fn name(&self) -> &str;
}

/// Hexagonal port: receives every flag produced for a batch, in order.
#[expect(
    async_fn_in_trait,
    reason = "no dyn dispatch needed; internal workspace only"
)]
pub trait FlagSink {
    /// Deliver one flag.
    ///
    /// # Errors
    ///
    /// Returns `SinkError::DeliveryFailed` when the flag cannot be delivered.
    async fn report(&self, flag: &FlaggedTransaction) -> Result<(), SinkError>;
}
