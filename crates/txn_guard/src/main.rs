// Rust guideline compliant 2026-10-12

//! Transaction flagging entry point.
//!
//! Wires a `TransactionSource` adapter (HTTP, JSON file, or synthetic) and a
//! `FlagSink` adapter (console or log) to the `Screener`, screens one batch,
//! and prints the fetched and flagged counts ahead of the flags themselves.
//!
//! # Usage
//!
//! ```text
//! # Fetch from an endpoint, print flags to the console
//! flag_transactions --url https://api.example.com/transactions
//!
//! # Read a file, tighter rules, skip bad records, log flags instead
//! RUST_LOG=info flag_transactions --file batch.json \
//!     --amount-threshold 5000 --window-minutes 30 --frequency-limit 3 \
//!     --skip-invalid --sink log
//!
//! # Reproducible synthetic demo batch
//! flag_transactions --synthetic 200 --seed 7
//! ```

mod adapters;

use std::path::PathBuf;

use adapters::console_sink::ConsoleSink;
use adapters::http_source::HttpSource;
use adapters::json_file_source::JsonFileSource;
use adapters::log_sink::LogSink;
use adapters::synthetic_source::SyntheticSource;
use anyhow::Context as _;
use chrono::{TimeDelta, Timelike as _};
use clap::{Args, Parser, ValueEnum};
use domain::TransactionSource;
use flag_engine::{DEFAULT_AMOUNT_THRESHOLD, DEFAULT_FREQUENCY_LIMIT, DEFAULT_WINDOW_MINUTES};
use rust_decimal::Decimal;
use screener::{Screener, ScreenerConfig, ScreeningReport};

/// Flag suspicious transactions by amount and per-account frequency.
#[derive(Debug, Parser)]
#[command(name = "flag_transactions", version)]
struct Cli {
    #[command(flatten)]
    input: Input,

    /// Flag any transaction strictly above this amount.
    #[arg(long, default_value_t = DEFAULT_AMOUNT_THRESHOLD)]
    amount_threshold: Decimal,

    /// Length of the trailing window, in minutes.
    #[arg(long, default_value_t = DEFAULT_WINDOW_MINUTES)]
    window_minutes: i64,

    /// Flag once an account has more than this many transactions in the window.
    #[arg(long, default_value_t = DEFAULT_FREQUENCY_LIMIT)]
    frequency_limit: usize,

    /// Skip records that fail validation instead of aborting the batch.
    #[arg(long)]
    skip_invalid: bool,

    /// Where flags are reported.
    #[arg(long, value_enum, default_value_t = SinkKind::Console)]
    sink: SinkKind,

    /// RNG seed for --synthetic.
    #[arg(long)]
    seed: Option<u64>,
}

/// Exactly one input must be given.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
struct Input {
    /// Endpoint returning a JSON array of transactions.
    #[arg(long)]
    url: Option<String>,

    /// File holding a JSON array of transactions.
    #[arg(long)]
    file: Option<PathBuf>,

    /// Generate N synthetic transactions.
    #[arg(long, value_name = "N")]
    synthetic: Option<usize>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SinkKind {
    /// Numbered blocks on stdout.
    Console,
    /// One structured warning per flag.
    Log,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize the tracing subscriber before any async work.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let time_window = TimeDelta::try_minutes(cli.window_minutes)
        .context("window_minutes is out of range")?;
    let config = ScreenerConfig::builder()
        .amount_threshold(cli.amount_threshold)
        .time_window(time_window)
        .frequency_limit(cli.frequency_limit)
        .skip_invalid(cli.skip_invalid)
        .build()
        .context("failed to build screener config")?;
    let screener = Screener::new(config);

    let pipeline = async {
        if let Some(url) = &cli.input.url {
            let source = HttpSource::new(url).context("failed to build HTTP client")?;
            screen(&screener, &source, cli.sink).await
        } else if let Some(path) = &cli.input.file {
            screen(&screener, &JsonFileSource::new(path), cli.sink).await
        } else {
            let size = cli.input.synthetic.unwrap_or_default();
            // Whole seconds: the records carry second precision anyway.
            let now = chrono::Local::now().naive_local();
            let start = now.with_nanosecond(0).unwrap_or(now);
            screen(&screener, &SyntheticSource::new(size, start, cli.seed), cli.sink).await
        }
    };

    // Race the screening against CTRL+C; nothing to clean up on interrupt.
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("main.shutdown: ctrl_c received");
        }
        report = pipeline => {
            if let Some(report) = report? {
                print_delivery_problems(&report);
            }
        }
    }
    Ok(())
}

/// Fetch one batch from `source`, print the counts, then report every flag
/// through the chosen sink. Returns `None` when the source had nothing.
async fn screen<S: TransactionSource>(
    screener: &Screener,
    source: &S,
    sink: SinkKind,
) -> anyhow::Result<Option<ScreeningReport>> {
    println!("Fetching transactions from {}...", source.name());
    let batch = source
        .fetch()
        .await
        .with_context(|| format!("failed to fetch transactions from {}", source.name()))?;
    println!("{}", fetched_line(batch.len()));
    if batch.is_empty() {
        return Ok(None);
    }

    let evaluation = screener.evaluate(&batch).context("failed to screen transactions")?;
    for rejected in &evaluation.rejected {
        println!("Skipped invalid record: {rejected}");
    }
    println!("{}", detection_line(evaluation.flags.len()));

    let result = match sink {
        SinkKind::Console => {
            let console = ConsoleSink::stdout();
            let result = screener.deliver(source.name(), batch.len(), evaluation, &console).await;
            tracing::debug!(printed = console.printed(), "main.console.done");
            result
        }
        SinkKind::Log => screener.deliver(source.name(), batch.len(), evaluation, &LogSink::new()).await,
    };
    result.map(Some).context("failed to report flags")
}

fn fetched_line(count: usize) -> String {
    if count == 0 {
        "No transactions fetched. Exiting.".to_owned()
    } else {
        format!("Fetched {count} transactions. Analyzing for fraud...")
    }
}

fn detection_line(flags: usize) -> String {
    if flags == 0 {
        "No suspicious transactions detected.".to_owned()
    } else {
        format!("Suspicious transactions detected: {flags}")
    }
}

fn print_delivery_problems(report: &ScreeningReport) {
    if !report.sink_errors.is_empty() {
        println!();
        println!("Flags not delivered: {}", report.sink_errors.len());
    }
}
