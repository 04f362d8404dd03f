// Rust guideline compliant 2026-10-12

//! PII masking entry point.
//!
//! Reads a JSON array of records, masks the chosen fields, and prints each
//! original record next to its masked copy (or the masked array alone with
//! `--json`).
//!
//! # Usage
//!
//! ```text
//! mask_records customers.json
//! mask_records customers.json --fields name,email,phone,ssn --json > masked.json
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use masking::{Record, mask_records};

/// Mask personally identifiable fields in tabular JSON records.
#[derive(Debug, Parser)]
#[command(name = "mask_records", version)]
struct Cli {
    /// File holding a JSON array of objects.
    input: PathBuf,

    /// Fields to mask. `name`, `email` and `phone` get dedicated strategies;
    /// any other field is masked character by character.
    #[arg(long, value_delimiter = ',', default_value = "name,email,phone")]
    fields: Vec<String>,

    /// Print the masked records as one JSON array instead of side-by-side pairs.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let text = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let records: Vec<Record> = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a JSON array of objects", cli.input.display()))?;

    let fields: Vec<&str> = cli.fields.iter().map(String::as_str).collect();
    let masked = mask_records(&records, &fields).context("masking failed")?;
    tracing::info!(records = masked.len(), "mask_records.done");

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&masked).context("failed to encode output")?);
        return Ok(());
    }
    for (original, masked) in records.iter().zip(&masked) {
        println!("Original: {}", serde_json::Value::Object(original.clone()));
        println!("Masked:   {}", serde_json::Value::Object(masked.clone()));
        println!();
    }
    Ok(())
}
