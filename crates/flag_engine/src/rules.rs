// Rust guideline compliant 2026-10-12

//! The two flagging rules and the per-call account activity index.

use std::collections::HashMap;

use chrono::{NaiveDateTime, TimeDelta};
use domain::{AccountId, FlagReason, Transaction};
use rust_decimal::Decimal;

// ---------------------------------------------------------------------------
// AmountRule
// ---------------------------------------------------------------------------

/// Flags any transaction whose amount is strictly above the threshold.
#[derive(Debug, Clone, Copy)]
pub struct AmountRule {
    threshold: Decimal,
}

impl AmountRule {
    /// Create the rule for `threshold`.
    #[must_use]
    pub fn new(threshold: Decimal) -> Self {
        Self { threshold }
    }

    /// `Some(AmountExceeded)` iff `tx.amount > threshold`.
    #[must_use]
    pub fn check(&self, tx: &Transaction) -> Option<FlagReason> {
        (tx.amount > self.threshold).then_some(FlagReason::AmountExceeded { threshold: self.threshold })
    }
}

// ---------------------------------------------------------------------------
// AccountActivityIndex
// ---------------------------------------------------------------------------

/// Timestamps seen so far in the current batch, per account.
///
/// Each account's history is kept sorted so the window count is two binary
/// searches. Feeds that arrive in time order only ever append; out-of-order
/// records are inserted at their sorted slot, which keeps the count identical
/// to a full rescan of everything seen before. Lives for one evaluation call.
#[derive(Debug, Default)]
pub struct AccountActivityIndex {
    by_account: HashMap<AccountId, Vec<NaiveDateTime>>,
}

impl AccountActivityIndex {
    /// Record `at` for `account`, then count the account's timestamps that are
    /// strictly later than `at - window` (the new one included).
    pub fn record_and_count(&mut self, account: &AccountId, at: NaiveDateTime, window: TimeDelta) -> usize {
        let history = self.by_account.entry(account.clone()).or_default();
        let slot = history.partition_point(|seen| *seen <= at);
        history.insert(slot, at);

        let Some(cutoff) = at.checked_sub_signed(window) else {
            // Window reaches past the representable range: everything is inside.
            return history.len();
        };
        let first_inside = history.partition_point(|seen| *seen <= cutoff);
        history.len() - first_inside
    }

    /// Number of accounts seen so far.
    #[must_use]
    pub fn accounts(&self) -> usize {
        self.by_account.len()
    }
}

// ---------------------------------------------------------------------------
// FrequencyRule
// ---------------------------------------------------------------------------

/// Flags a transaction when its account has more than `limit` transactions in
/// the trailing `window` ending at the transaction's own timestamp.
#[derive(Debug, Clone, Copy)]
pub struct FrequencyRule {
    limit: usize,
    window: TimeDelta,
}

impl FrequencyRule {
    /// Create the rule for `limit` transactions per `window`.
    #[must_use]
    pub fn new(limit: usize, window: TimeDelta) -> Self {
        Self { limit, window }
    }

    /// Record `tx` in `index` and return `Some(FrequencyExceeded)` when the
    /// resulting window count is above the limit.
    pub fn check(&self, index: &mut AccountActivityIndex, tx: &Transaction) -> Option<FlagReason> {
        let count = index.record_and_count(&tx.account_id, tx.timestamp, self.window);
        tracing::trace!(account = %tx.account_id, count, "frequency_rule.window_count");
        (count > self.limit).then_some(FlagReason::FrequencyExceeded {
            limit: self.limit,
            window: self.window,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn at(minute: i64) -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2024-01-01 00:00:00", domain::TIMESTAMP_FORMAT).unwrap()
            + TimeDelta::minutes(minute)
    }

    fn tx(account: &str, amount: Decimal, minute: i64) -> Transaction {
        Transaction { account_id: AccountId::from(account), amount, timestamp: at(minute) }
    }

    // ------------------------------------------------------------------
    // AmountRule
    // ------------------------------------------------------------------

    #[test]
    fn amount_equal_to_threshold_is_not_flagged() {
        let rule = AmountRule::new(dec!(10000));
        assert_eq!(rule.check(&tx("A1", dec!(10000), 0)), None);
    }

    #[test]
    fn amount_one_cent_above_threshold_is_flagged() {
        let rule = AmountRule::new(dec!(10000));
        assert_eq!(
            rule.check(&tx("A1", dec!(10000.01), 0)),
            Some(FlagReason::AmountExceeded { threshold: dec!(10000) })
        );
    }

    // ------------------------------------------------------------------
    // AccountActivityIndex
    // ------------------------------------------------------------------

    #[test]
    fn index_counts_strictly_inside_window() {
        let mut index = AccountActivityIndex::default();
        let a1 = AccountId::from("A1");
        let window = TimeDelta::minutes(60);
        assert_eq!(index.record_and_count(&a1, at(0), window), 1);
        assert_eq!(index.record_and_count(&a1, at(30), window), 2);
        // minute 0 is exactly one window before minute 60: excluded.
        assert_eq!(index.record_and_count(&a1, at(60), window), 2);
        // cutoff 1: minutes 30, 60 and 61 are inside.
        assert_eq!(index.record_and_count(&a1, at(61), window), 3);
        // cutoff 31: minute 30 drops out.
        assert_eq!(index.record_and_count(&a1, at(91), window), 3);
    }

    #[test]
    fn index_keeps_accounts_apart() {
        let mut index = AccountActivityIndex::default();
        let window = TimeDelta::minutes(60);
        assert_eq!(index.record_and_count(&AccountId::from("A1"), at(0), window), 1);
        assert_eq!(index.record_and_count(&AccountId::Number(1), at(0), window), 1);
        assert_eq!(index.record_and_count(&AccountId::from("A1"), at(1), window), 2);
        assert_eq!(index.accounts(), 2);
    }

    #[test]
    fn index_counts_earlier_seen_later_timestamps() {
        // A record seen earlier but stamped later than the current one still
        // lies strictly after `t - window` and is counted.
        let mut index = AccountActivityIndex::default();
        let a1 = AccountId::from("A1");
        let window = TimeDelta::minutes(10);
        assert_eq!(index.record_and_count(&a1, at(100), window), 1);
        assert_eq!(index.record_and_count(&a1, at(50), window), 2);
        assert_eq!(index.record_and_count(&a1, at(45), window), 3);
        assert_eq!(index.record_and_count(&a1, at(35), window), 4);
        // minute 35 is exactly ten before 45: excluded.
        assert_eq!(index.record_and_count(&a1, at(45), window), 4);
    }

    // ------------------------------------------------------------------
    // FrequencyRule
    // ------------------------------------------------------------------

    #[test]
    fn frequency_limit_is_exclusive() {
        let rule = FrequencyRule::new(2, TimeDelta::minutes(60));
        let mut index = AccountActivityIndex::default();
        assert_eq!(rule.check(&mut index, &tx("A1", dec!(1), 0)), None);
        assert_eq!(rule.check(&mut index, &tx("A1", dec!(1), 1)), None);
        assert_eq!(
            rule.check(&mut index, &tx("A1", dec!(1), 2)),
            Some(FlagReason::FrequencyExceeded { limit: 2, window: TimeDelta::minutes(60) })
        );
    }
}
