// Rust guideline compliant 2026-10-12

//! Console adapter for the `FlagSink` port.
//!
//! Prints one numbered block per flag: account, amount, timestamp, reason.

use std::cell::{Cell, RefCell};
use std::io::{self, Write};

use domain::{FlagSink, FlaggedTransaction, SinkError};

/// `FlagSink` adapter that writes a human-readable block per flag.
///
/// Generic over the writer so tests can capture output; use
/// [`ConsoleSink::stdout`] in binaries.
#[derive(Debug)]
pub struct ConsoleSink<W: Write> {
    /// Interior mutability required because `report` takes `&self`.
    out: RefCell<W>,
    printed: Cell<usize>,
}

impl ConsoleSink<io::Stdout> {
    /// Sink writing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleSink<W> {
    /// Sink writing to `out`.
    #[must_use]
    pub fn new(out: W) -> Self {
        Self { out: RefCell::new(out), printed: Cell::new(0) }
    }

    /// Number of flags printed so far.
    #[must_use]
    pub fn printed(&self) -> usize {
        self.printed.get()
    }
}

impl<W: Write> FlagSink for ConsoleSink<W> {
    async fn report(&self, flag: &FlaggedTransaction) -> Result<(), SinkError> {
        let index = self.printed.get() + 1;
        let tx = &flag.transaction;
        let mut out = self.out.borrow_mut();
        writeln!(
            out,
            "\nSuspicious Transaction {index}:\nAccount ID: {}\nAmount: {}\nTimestamp: {}\nReason: {}",
            tx.account_id, tx.amount, tx.timestamp, flag.reason
        )
        .and_then(|()| out.flush())
        .map_err(|e| SinkError::DeliveryFailed { reason: e.to_string() })?;
        self.printed.set(index);
        Ok(())
    }
}
