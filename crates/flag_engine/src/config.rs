// Rust guideline compliant 2026-10-12

//! Engine configuration and its validating builder.

use chrono::TimeDelta;
use rust_decimal::Decimal;

use crate::EngineError;

/// Default amount above which a transaction is flagged (10 000).
pub const DEFAULT_AMOUNT_THRESHOLD: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Default trailing window length, in minutes.
pub const DEFAULT_WINDOW_MINUTES: i64 = 60;

/// Default maximum number of transactions per account inside the window.
pub const DEFAULT_FREQUENCY_LIMIT: usize = 5;

/// What the engine does with a record that fails normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InvalidRecordPolicy {
    /// Abort the whole batch on the first bad record; no flags are returned.
    #[default]
    Abort,
    /// Leave bad records out of the batch and report them alongside the flags.
    Skip,
}

/// Validated configuration for a [`FlagEngine`](crate::FlagEngine).
///
/// Construct via [`EngineConfig::builder`], or take [`EngineConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Strictly positive amount threshold.
    pub amount_threshold: Decimal,
    /// Strictly positive trailing window.
    pub time_window: TimeDelta,
    /// Maximum transactions tolerated inside the window (`>= 1`).
    pub frequency_limit: usize,
    /// Handling of records that fail normalization.
    pub invalid_records: InvalidRecordPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            amount_threshold: DEFAULT_AMOUNT_THRESHOLD,
            time_window: TimeDelta::minutes(DEFAULT_WINDOW_MINUTES),
            frequency_limit: DEFAULT_FREQUENCY_LIMIT,
            invalid_records: InvalidRecordPolicy::Abort,
        }
    }
}

/// Builder for [`EngineConfig`].
///
/// Obtain via [`EngineConfig::builder`]; finalize with [`build`](Self::build).
#[derive(Debug)]
pub struct EngineConfigBuilder {
    amount_threshold: Decimal,
    time_window: TimeDelta,
    frequency_limit: usize,
    invalid_records: InvalidRecordPolicy,
}

impl EngineConfig {
    /// Create a builder preloaded with the defaults: threshold 10 000,
    /// 60-minute window, limit 5, abort on invalid records.
    #[must_use]
    pub fn builder() -> EngineConfigBuilder {
        let defaults = Self::default();
        EngineConfigBuilder {
            amount_threshold: defaults.amount_threshold,
            time_window: defaults.time_window,
            frequency_limit: defaults.frequency_limit,
            invalid_records: defaults.invalid_records,
        }
    }
}

impl EngineConfigBuilder {
    /// Override the amount threshold.
    #[must_use]
    pub fn amount_threshold(mut self, amount_threshold: Decimal) -> Self {
        self.amount_threshold = amount_threshold;
        self
    }

    /// Override the trailing window.
    #[must_use]
    pub fn time_window(mut self, time_window: TimeDelta) -> Self {
        self.time_window = time_window;
        self
    }

    /// Override the per-window transaction limit.
    #[must_use]
    pub fn frequency_limit(mut self, frequency_limit: usize) -> Self {
        self.frequency_limit = frequency_limit;
        self
    }

    /// Choose how records that fail normalization are handled.
    #[must_use]
    pub fn invalid_records(mut self, policy: InvalidRecordPolicy) -> Self {
        self.invalid_records = policy;
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfiguration`] when the threshold or the
    /// window is not strictly positive, or when the limit is zero.
    #[must_use = "the Result must be checked; use ? or unwrap"]
    pub fn build(self) -> Result<EngineConfig, EngineError> {
        if self.amount_threshold <= Decimal::ZERO {
            return Err(EngineError::InvalidConfiguration {
                reason: format!("amount_threshold must be > 0, got {}", self.amount_threshold),
            });
        }
        if self.time_window <= TimeDelta::zero() {
            return Err(EngineError::InvalidConfiguration {
                reason: format!("time_window must be > 0, got {}", self.time_window),
            });
        }
        if self.frequency_limit == 0 {
            return Err(EngineError::InvalidConfiguration {
                reason: "frequency_limit must be >= 1".to_owned(),
            });
        }
        Ok(EngineConfig {
            amount_threshold: self.amount_threshold,
            time_window: self.time_window,
            frequency_limit: self.frequency_limit,
            invalid_records: self.invalid_records,
        })
    }
}
