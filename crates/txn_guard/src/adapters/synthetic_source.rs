// Rust guideline compliant 2026-10-12

//! Synthetic adapter for the `TransactionSource` port.
//!
//! Generates one finite batch of plausible records for demos: a small pool of
//! accounts, amounts in `[0.01, 15_000.00]`, and timestamps advancing by
//! 0 to 15 minutes from a start instant. Supports seeded randomness for
//! reproducible runs.

use std::cell::RefCell;

use chrono::{NaiveDateTime, TimeDelta};
use domain::{RawTransaction, SourceError, TIMESTAMP_FORMAT, TransactionSource};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rust_decimal::Decimal;

/// Account pool. Small on purpose, so the frequency rule gets exercised.
const ACCOUNTS: &[&str] = &["ACC-1001", "ACC-1002", "ACC-1003", "ACC-1004"];

/// `TransactionSource` adapter producing random but well-formed records.
#[derive(Debug)]
pub struct SyntheticSource {
    size: usize,
    start: NaiveDateTime,
    /// Interior mutability required because `fetch` takes `&self`.
    rng: RefCell<StdRng>,
}

impl SyntheticSource {
    /// Create a source yielding `size` records starting at `start`.
    ///
    /// `seed = Some(s)` produces deterministic batches; `None` seeds from the OS.
    #[must_use]
    pub fn new(size: usize, start: NaiveDateTime, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self { size, start, rng: RefCell::new(rng) }
    }

    /// Generate one batch.
    #[must_use]
    pub fn generate_batch(&self) -> Vec<RawTransaction> {
        let mut rng = self.rng.borrow_mut();
        let mut at = self.start;
        let mut batch = Vec::with_capacity(self.size);
        for _ in 0..self.size {
            // Index is always in bounds: derived from len().
            let account = ACCOUNTS[rng.random_range(0..ACCOUNTS.len())];
            // Integer cents keep the amount exact.
            let amount = Decimal::new(rng.random_range(1_i64..=1_500_000), 2);
            at += TimeDelta::minutes(rng.random_range(0..=15));
            batch.push(RawTransaction::new(account, amount, &at.format(TIMESTAMP_FORMAT).to_string()));
        }
        batch
    }
}

impl TransactionSource for SyntheticSource {
    async fn fetch(&self) -> Result<Vec<RawTransaction>, SourceError> {
        let batch = self.generate_batch();
        tracing::debug!(size = batch.len(), "synthetic_source.batch.generated");
        Ok(batch)
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}
