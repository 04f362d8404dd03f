// Rust guideline compliant 2026-10-12

//! Screener component -- pulls one batch from a `TransactionSource`, flags it
//! with the engine, and hands every flag to a `FlagSink`.
//!
//! Entry points: [`Screener::screen_once`], [`Screener::screen_batch`].
//! Configuration via [`ScreenerConfig::builder`].

use chrono::TimeDelta;
use domain::{FlagSink, RawTransaction, SinkError, SourceError, TransactionSource};
use flag_engine::{EngineConfig, EngineError, Evaluation, FlagEngine, InvalidRecordPolicy};
use rust_decimal::Decimal;

// ---------------------------------------------------------------------------
// ScreenerError
// ---------------------------------------------------------------------------

/// Errors that can occur while screening a batch.
#[derive(Debug, thiserror::Error)]
pub enum ScreenerError {
    /// The supplied configuration is invalid.
    #[error("invalid screener configuration: {reason}")]
    InvalidConfig {
        /// Human-readable description of the problem.
        reason: String,
    },
    /// The source could not deliver the batch.
    #[error("source error: {0}")]
    Source(SourceError),
    /// The engine aborted the batch.
    #[error("engine error: {0}")]
    Engine(EngineError),
    /// A flag could not be delivered and `fail_on_sink_error` is set.
    #[error("sink error: {0}")]
    Sink(SinkError),
}

// ---------------------------------------------------------------------------
// ScreenerConfig + builder
// ---------------------------------------------------------------------------

/// Runtime configuration for a [`Screener`].
///
/// Construct via [`ScreenerConfig::builder`].
#[derive(Debug, Clone)]
pub struct ScreenerConfig {
    /// Validated engine parameters.
    pub engine: EngineConfig,
    /// Stop at the first sink failure instead of collecting failures.
    pub fail_on_sink_error: bool,
}

/// Builder for [`ScreenerConfig`].
///
/// Obtain via [`ScreenerConfig::builder`]; finalize with [`build`](Self::build).
#[derive(Debug)]
pub struct ScreenerConfigBuilder {
    engine: flag_engine::EngineConfigBuilder,
    fail_on_sink_error: bool,
}

impl ScreenerConfig {
    /// Create a builder with the engine defaults and best-effort delivery.
    #[must_use]
    pub fn builder() -> ScreenerConfigBuilder {
        ScreenerConfigBuilder {
            engine: EngineConfig::builder(),
            fail_on_sink_error: false,
        }
    }
}

impl ScreenerConfigBuilder {
    /// Override the amount threshold.
    #[must_use]
    pub fn amount_threshold(mut self, amount_threshold: Decimal) -> Self {
        self.engine = self.engine.amount_threshold(amount_threshold);
        self
    }

    /// Override the trailing window.
    #[must_use]
    pub fn time_window(mut self, time_window: TimeDelta) -> Self {
        self.engine = self.engine.time_window(time_window);
        self
    }

    /// Override the per-window transaction limit.
    #[must_use]
    pub fn frequency_limit(mut self, frequency_limit: usize) -> Self {
        self.engine = self.engine.frequency_limit(frequency_limit);
        self
    }

    /// Skip invalid records instead of aborting the batch.
    #[must_use]
    pub fn skip_invalid(mut self, skip: bool) -> Self {
        let policy = if skip { InvalidRecordPolicy::Skip } else { InvalidRecordPolicy::Abort };
        self.engine = self.engine.invalid_records(policy);
        self
    }

    /// Stop at the first sink failure.
    #[must_use]
    pub fn fail_on_sink_error(mut self, fail: bool) -> Self {
        self.fail_on_sink_error = fail;
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenerError::InvalidConfig`] when the engine parameters are
    /// rejected.
    #[must_use = "the Result must be checked; use ? or unwrap"]
    pub fn build(self) -> Result<ScreenerConfig, ScreenerError> {
        let engine = self.engine.build().map_err(|e| ScreenerError::InvalidConfig {
            reason: e.to_string(),
        })?;
        Ok(ScreenerConfig { engine, fail_on_sink_error: self.fail_on_sink_error })
    }
}

// ---------------------------------------------------------------------------
// ScreeningReport
// ---------------------------------------------------------------------------

/// Outcome of screening one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreeningReport {
    /// Name of the source the batch came from.
    pub source: String,
    /// Number of raw records received.
    pub fetched: usize,
    /// Engine output: flags and any skipped records.
    pub evaluation: Evaluation,
    /// Number of flags the sink accepted.
    pub delivered: usize,
    /// Sink failures, in flag order.
    pub sink_errors: Vec<SinkError>,
}

// ---------------------------------------------------------------------------
// Screener
// ---------------------------------------------------------------------------

/// Fetches, flags, and reports one batch at a time.
///
/// Generic over the source and sink ports for static dispatch. Holds no
/// adapter references -- they are injected per call.
#[derive(Debug)]
pub struct Screener {
    config: ScreenerConfig,
    engine: FlagEngine,
}

impl Screener {
    /// Create a new screener from `config`.
    #[must_use]
    pub fn new(config: ScreenerConfig) -> Self {
        let engine = FlagEngine::new(config.engine.clone());
        Self { config, engine }
    }

    /// Fetch one batch from `source` and screen it.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenerError::Source`] when the fetch fails, plus every error
    /// [`screen_batch`](Self::screen_batch) can return.
    pub async fn screen_once<S, K>(&self, source: &S, sink: &K) -> Result<ScreeningReport, ScreenerError>
    where
        S: TransactionSource,
        K: FlagSink,
    {
        let batch = source.fetch().await.map_err(ScreenerError::Source)?;
        tracing::info!(source = source.name(), size = batch.len(), "screener.batch.fetched");
        self.screen_batch(source.name(), &batch, sink).await
    }

    /// Flag `batch` and deliver every flag to `sink`, in order.
    ///
    /// Same as [`evaluate`](Self::evaluate) followed by
    /// [`deliver`](Self::deliver).
    ///
    /// # Errors
    ///
    /// Returns [`ScreenerError::Engine`] when the engine aborts the batch, or
    /// [`ScreenerError::Sink`] on the first sink failure when
    /// `fail_on_sink_error` is set.
    pub async fn screen_batch<K: FlagSink>(
        &self,
        source: &str,
        batch: &[RawTransaction],
        sink: &K,
    ) -> Result<ScreeningReport, ScreenerError> {
        let evaluation = self.evaluate(batch)?;
        self.deliver(source, batch.len(), evaluation, sink).await
    }

    /// Flag `batch` without delivering anything.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenerError::Engine`] when the engine aborts the batch.
    pub fn evaluate(&self, batch: &[RawTransaction]) -> Result<Evaluation, ScreenerError> {
        self.engine.evaluate(batch).map_err(ScreenerError::Engine)
    }

    /// Deliver every flag of `evaluation` to `sink`, in order.
    ///
    /// Delivery is best effort: failures are collected in the report unless
    /// `fail_on_sink_error` is set. `fetched` is the raw batch size.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenerError::Sink`] on the first sink failure when
    /// `fail_on_sink_error` is set.
    pub async fn deliver<K: FlagSink>(
        &self,
        source: &str,
        fetched: usize,
        evaluation: Evaluation,
        sink: &K,
    ) -> Result<ScreeningReport, ScreenerError> {
        let mut delivered = 0usize;
        let mut sink_errors: Vec<SinkError> = vec![];
        for flag in &evaluation.flags {
            match sink.report(flag).await {
                Ok(()) => delivered += 1,
                Err(e) if self.config.fail_on_sink_error => return Err(ScreenerError::Sink(e)),
                Err(e) => {
                    tracing::warn!(position = flag.position, error = %e, "screener.sink.failed");
                    sink_errors.push(e);
                }
            }
        }

        tracing::info!(
            source,
            flags = evaluation.flags.len(),
            delivered,
            failed = sink_errors.len(),
            "screener.batch.screened"
        );
        Ok(ScreeningReport {
            source: source.to_owned(),
            fetched,
            evaluation,
            delivered,
            sink_errors,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
