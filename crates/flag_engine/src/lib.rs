// Rust guideline compliant 2026-10-12

//! Rule-based transaction flagging.
//!
//! [`FlagEngine`] normalizes a batch of [`RawTransaction`]s, then walks it once
//! in input order applying the amount rule and the frequency rule to every
//! transaction. It performs no I/O and keeps no state between calls: the
//! [`AccountActivityIndex`] is created and dropped inside each evaluation.
//!
//! Entry points: [`FlagEngine::evaluate`], [`FlagEngine::evaluate_transactions`],
//! and the one-shot [`evaluate`]. Configuration via [`EngineConfig::builder`].

mod config;
mod normalize;
mod rules;

pub use config::{
    DEFAULT_AMOUNT_THRESHOLD, DEFAULT_FREQUENCY_LIMIT, DEFAULT_WINDOW_MINUTES, EngineConfig,
    EngineConfigBuilder, InvalidRecordPolicy,
};
pub use normalize::{RecordError, normalize, normalize_lenient, normalize_record, parse_timestamp};
pub use rules::{AccountActivityIndex, AmountRule, FrequencyRule};

use chrono::TimeDelta;
use domain::{FlaggedTransaction, RawTransaction, Transaction};
use rust_decimal::Decimal;

// ---------------------------------------------------------------------------
// EngineError
// ---------------------------------------------------------------------------

/// Errors returned by the engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// The supplied configuration is invalid.
    #[error("invalid engine configuration: {reason}")]
    InvalidConfiguration {
        /// Human-readable description of the problem.
        reason: String,
    },
    /// A record failed normalization and the batch was aborted.
    #[error("batch aborted: {0}")]
    Record(#[from] RecordError),
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Result of evaluating one batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    /// Flags in input order; amount flag before frequency flag for a record.
    pub flags: Vec<FlaggedTransaction>,
    /// Number of records the rules were applied to.
    pub evaluated: usize,
    /// Records left out under [`InvalidRecordPolicy::Skip`]. Always empty
    /// under [`InvalidRecordPolicy::Abort`].
    pub rejected: Vec<RecordError>,
}

// ---------------------------------------------------------------------------
// FlagEngine
// ---------------------------------------------------------------------------

/// Applies the amount and frequency rules to batches of transactions.
#[derive(Debug, Clone)]
pub struct FlagEngine {
    config: EngineConfig,
    amount_rule: AmountRule,
    frequency_rule: FrequencyRule,
}

impl FlagEngine {
    /// Create an engine from a validated `config`.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            amount_rule: AmountRule::new(config.amount_threshold),
            frequency_rule: FrequencyRule::new(config.frequency_limit, config.time_window),
            config,
        }
    }

    /// Normalize `batch` and flag it.
    ///
    /// Under [`InvalidRecordPolicy::Abort`] the first bad record aborts the
    /// batch and no partial flags are returned. Under
    /// [`InvalidRecordPolicy::Skip`] bad records are reported in
    /// [`Evaluation::rejected`] and play no part in any account's window.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Record`] under `Abort` when a record fails
    /// normalization.
    pub fn evaluate(&self, batch: &[RawTransaction]) -> Result<Evaluation, EngineError> {
        tracing::debug!(batch_size = batch.len(), policy = ?self.config.invalid_records, "flag_engine.evaluate");
        let (accepted, rejected) = match self.config.invalid_records {
            InvalidRecordPolicy::Abort => {
                let normalized = normalize(batch)?;
                (normalized.into_iter().enumerate().collect::<Vec<_>>(), Vec::new())
            }
            InvalidRecordPolicy::Skip => normalize_lenient(batch),
        };
        for e in &rejected {
            tracing::warn!(position = e.position(), error = %e, "flag_engine.record.skipped");
        }

        let flags = self.scan(accepted.iter().map(|(position, tx)| (*position, tx)));
        tracing::info!(
            evaluated = accepted.len(),
            rejected = rejected.len(),
            flags = flags.len(),
            "flag_engine.evaluate.done"
        );
        Ok(Evaluation { flags, evaluated: accepted.len(), rejected })
    }

    /// Flag already-normalized transactions. Positions are slice indices.
    #[must_use]
    pub fn evaluate_transactions(&self, transactions: &[Transaction]) -> Vec<FlaggedTransaction> {
        self.scan(transactions.iter().enumerate())
    }

    /// Single causal pass: amount rule then frequency rule, per transaction.
    fn scan<'a, I>(&self, transactions: I) -> Vec<FlaggedTransaction>
    where
        I: IntoIterator<Item = (usize, &'a Transaction)>,
    {
        let mut index = AccountActivityIndex::default();
        let mut flags = Vec::new();
        for (position, tx) in transactions {
            let amount = self.amount_rule.check(tx);
            let frequency = self.frequency_rule.check(&mut index, tx);
            for reason in amount.into_iter().chain(frequency) {
                tracing::debug!(position, account = %tx.account_id, code = reason.code(), "flag_engine.flag");
                flags.push(FlaggedTransaction { position, transaction: tx.clone(), reason });
            }
        }
        tracing::debug!(accounts = index.accounts(), "flag_engine.scan.done");
        flags
    }
}

/// One-shot evaluation with explicit parameters and fail-fast normalization.
///
/// # Errors
///
/// Returns [`EngineError::InvalidConfiguration`] for a non-positive threshold
/// or window or a zero limit, and [`EngineError::Record`] for the first
/// record that fails normalization.
pub fn evaluate(
    batch: &[RawTransaction],
    amount_threshold: Decimal,
    time_window: TimeDelta,
    frequency_limit: usize,
) -> Result<Vec<FlaggedTransaction>, EngineError> {
    let config = EngineConfig::builder()
        .amount_threshold(amount_threshold)
        .time_window(time_window)
        .frequency_limit(frequency_limit)
        .build()?;
    Ok(FlagEngine::new(config).evaluate(batch)?.flags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{AccountId, FlagReason};
    use rust_decimal_macros::dec;

    fn stamp(minute: u32) -> String {
        format!("2024-01-01 {:02}:{:02}:00", minute / 60, minute % 60)
    }

    fn raw(account: &str, amount: Decimal, minute: u32) -> RawTransaction {
        RawTransaction::new(account, amount, &stamp(minute))
    }

    fn default_engine() -> FlagEngine {
        FlagEngine::new(EngineConfig::default())
    }

    fn codes(flags: &[FlaggedTransaction]) -> Vec<(usize, &'static str)> {
        flags.iter().map(|f| (f.position, f.reason.code())).collect()
    }

    // ------------------------------------------------------------------
    // Empty and quiet batches
    // ------------------------------------------------------------------

    #[test]
    fn empty_batch_returns_empty() {
        let evaluation = default_engine().evaluate(&[]).unwrap();
        assert!(evaluation.flags.is_empty());
        assert_eq!(evaluation.evaluated, 0);
    }

    #[test]
    fn quiet_batch_returns_empty() {
        let batch = vec![raw("A1", dec!(5), 0), raw("A2", dec!(9999.99), 1)];
        assert!(default_engine().evaluate(&batch).unwrap().flags.is_empty());
    }

    // ------------------------------------------------------------------
    // Amount boundary
    // ------------------------------------------------------------------

    #[test]
    fn amount_at_threshold_is_not_flagged_one_cent_above_is() {
        let batch = vec![raw("A1", dec!(10000), 0), raw("A2", dec!(10000.01), 0)];
        let flags = default_engine().evaluate(&batch).unwrap().flags;
        assert_eq!(codes(&flags), vec![(1, "AMOUNT_EXCEEDED")]);
        assert_eq!(flags[0].reason, FlagReason::AmountExceeded { threshold: dec!(10000) });
        assert_eq!(flags[0].transaction.amount, dec!(10000.01));
    }

    // ------------------------------------------------------------------
    // Frequency boundary
    // ------------------------------------------------------------------

    #[test]
    fn limit_inside_window_is_quiet_one_more_is_flagged() {
        let five: Vec<_> = (0..5).map(|i| raw("A1", dec!(1), i * 10)).collect();
        assert!(default_engine().evaluate(&five).unwrap().flags.is_empty());

        let mut six = five;
        six.push(raw("A1", dec!(1), 50));
        let flags = default_engine().evaluate(&six).unwrap().flags;
        assert_eq!(codes(&flags), vec![(5, "FREQUENCY_EXCEEDED")]);
        assert_eq!(
            flags[0].reason,
            FlagReason::FrequencyExceeded { limit: 5, window: TimeDelta::minutes(60) }
        );
    }

    #[test]
    fn minutes_zero_to_fifty_flags_the_sixth() {
        let batch: Vec<_> = [0, 10, 20, 30, 40, 50].iter().map(|m| raw("A1", dec!(1), *m)).collect();
        let flags = evaluate(&batch, dec!(10000), TimeDelta::minutes(60), 5).unwrap();
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].position, 5);
        assert_eq!(flags[0].transaction.timestamp.to_string(), "2024-01-01 00:50:00");
    }

    #[test]
    fn transaction_exactly_one_window_back_is_excluded() {
        // Sixth transaction at minute 60: minute 0 sits exactly on `t - window`.
        let batch: Vec<_> = [0, 10, 20, 30, 40, 60].iter().map(|m| raw("A1", dec!(1), *m)).collect();
        assert!(default_engine().evaluate(&batch).unwrap().flags.is_empty());
    }

    #[test]
    fn every_transaction_over_the_limit_is_flagged_again() {
        let batch: Vec<_> = (0..8).map(|i| raw("A1", dec!(1), i)).collect();
        let flags = default_engine().evaluate(&batch).unwrap().flags;
        assert_eq!(flags.iter().map(|f| f.position).collect::<Vec<_>>(), vec![5, 6, 7]);
    }

    #[test]
    fn window_is_per_account() {
        let mut batch: Vec<_> = (0..5).map(|i| raw("A1", dec!(1), i)).collect();
        batch.extend((0..5).map(|i| raw("A2", dec!(1), i)));
        assert!(default_engine().evaluate(&batch).unwrap().flags.is_empty());
    }

    // ------------------------------------------------------------------
    // Rule ordering
    // ------------------------------------------------------------------

    #[test]
    fn both_rules_fire_as_two_entries_amount_first() {
        let mut batch: Vec<_> = (0..5).map(|i| raw("A1", dec!(1), i)).collect();
        batch.push(raw("A1", dec!(50000), 5));
        let flags = default_engine().evaluate(&batch).unwrap().flags;
        assert_eq!(codes(&flags), vec![(5, "AMOUNT_EXCEEDED"), (5, "FREQUENCY_EXCEEDED")]);
    }

    #[test]
    fn earlier_flag_does_not_drop_a_transaction() {
        let batch = vec![raw("A1", dec!(20000), 0), raw("A1", dec!(20000), 1)];
        let flags = default_engine().evaluate(&batch).unwrap().flags;
        assert_eq!(codes(&flags), vec![(0, "AMOUNT_EXCEEDED"), (1, "AMOUNT_EXCEEDED")]);
    }

    // ------------------------------------------------------------------
    // Determinism and ordering
    // ------------------------------------------------------------------

    #[test]
    fn evaluating_twice_is_identical() {
        let batch: Vec<_> = (0..20)
            .map(|i| raw(if i % 3 == 0 { "A1" } else { "A2" }, Decimal::from(i * 1000), i))
            .collect();
        let engine = default_engine();
        assert_eq!(engine.evaluate(&batch).unwrap(), engine.evaluate(&batch).unwrap());
    }

    #[test]
    fn swapping_different_accounts_keeps_their_flags() {
        let config = EngineConfig::builder().frequency_limit(1).build().unwrap();
        let engine = FlagEngine::new(config);
        let batch = vec![raw("A1", dec!(1), 0), raw("A1", dec!(1), 1), raw("B1", dec!(20000), 2)];
        let swapped = vec![raw("A1", dec!(1), 0), raw("B1", dec!(20000), 2), raw("A1", dec!(1), 1)];

        let summary = |flags: Vec<FlaggedTransaction>| {
            let mut v: Vec<_> = flags
                .into_iter()
                .map(|f| (f.transaction.account_id, f.transaction.timestamp, f.reason.code()))
                .collect();
            v.sort();
            v
        };
        assert_eq!(
            summary(engine.evaluate(&batch).unwrap().flags),
            summary(engine.evaluate(&swapped).unwrap().flags)
        );
    }

    #[test]
    fn reordering_same_account_moves_the_flag() {
        let config = EngineConfig::builder()
            .frequency_limit(1)
            .time_window(TimeDelta::minutes(10))
            .build()
            .unwrap();
        let engine = FlagEngine::new(config);

        // In time order, minute 5 sees minute 0 inside its window.
        let in_order = vec![raw("A1", dec!(1), 0), raw("A1", dec!(1), 5), raw("A1", dec!(1), 30)];
        let flags = engine.evaluate(&in_order).unwrap().flags;
        assert_eq!(codes(&flags), vec![(1, "FREQUENCY_EXCEEDED")]);
        assert_eq!(flags[0].transaction.timestamp.to_string(), "2024-01-01 00:05:00");

        // Minute 30 seen first lies inside the window of both later records.
        let reordered = vec![raw("A1", dec!(1), 30), raw("A1", dec!(1), 0), raw("A1", dec!(1), 5)];
        let flags = engine.evaluate(&reordered).unwrap().flags;
        assert_eq!(codes(&flags), vec![(1, "FREQUENCY_EXCEEDED"), (2, "FREQUENCY_EXCEEDED")]);
        assert_eq!(flags[0].transaction.timestamp.to_string(), "2024-01-01 00:00:00");
    }

    // ------------------------------------------------------------------
    // Invalid records
    // ------------------------------------------------------------------

    #[test]
    fn malformed_timestamp_aborts_whole_batch() {
        let mut batch = vec![raw("A1", dec!(50000), 0)];
        batch.push(RawTransaction::new("A1", dec!(1), "01/01/2024 10:00"));
        let err = default_engine().evaluate(&batch).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Record(RecordError::MalformedTimestamp { position: 1, .. })
        ));
    }

    #[test]
    fn missing_field_aborts_whole_batch() {
        let mut record = raw("A1", dec!(1), 0);
        record.amount = None;
        let err = default_engine().evaluate(&[record]).unwrap_err();
        assert_eq!(err, EngineError::Record(RecordError::MissingField { position: 0, field: "amount" }));
    }

    #[test]
    fn skip_policy_collects_errors_and_keeps_positions() {
        let config = EngineConfig::builder().invalid_records(InvalidRecordPolicy::Skip).build().unwrap();
        let batch = vec![
            RawTransaction::new("A1", dec!(1), "garbage"),
            raw("A1", dec!(20000), 1),
        ];
        let evaluation = FlagEngine::new(config).evaluate(&batch).unwrap();
        assert_eq!(evaluation.evaluated, 1);
        assert_eq!(evaluation.rejected.len(), 1);
        assert_eq!(evaluation.rejected[0].position(), 0);
        assert_eq!(codes(&evaluation.flags), vec![(1, "AMOUNT_EXCEEDED")]);
    }

    #[test]
    fn skipped_records_do_not_count_towards_frequency() {
        let config = EngineConfig::builder()
            .frequency_limit(1)
            .invalid_records(InvalidRecordPolicy::Skip)
            .build()
            .unwrap();
        let mut bad = raw("A1", dec!(1), 0);
        bad.extra.insert("note".to_owned(), serde_json::json!(null));
        let batch = vec![bad, raw("A1", dec!(1), 1)];
        let evaluation = FlagEngine::new(config).evaluate(&batch).unwrap();
        assert!(evaluation.flags.is_empty());
    }

    // ------------------------------------------------------------------
    // One-shot entry point and pre-normalized input
    // ------------------------------------------------------------------

    #[test]
    fn one_shot_rejects_invalid_configuration() {
        let err = evaluate(&[], dec!(0), TimeDelta::minutes(60), 5).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfiguration { .. }));
        let err = evaluate(&[], dec!(1), TimeDelta::minutes(60), 0).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfiguration { .. }));
    }

    #[test]
    fn evaluate_transactions_matches_evaluate() {
        let batch: Vec<_> = (0..7).map(|i| raw("A1", Decimal::from(i * 3000), i)).collect();
        let engine = default_engine();
        let normalized = normalize(&batch).unwrap();
        assert_eq!(engine.evaluate_transactions(&normalized), engine.evaluate(&batch).unwrap().flags);
        assert_eq!(normalized[0].account_id, AccountId::from("A1"));
    }
}
