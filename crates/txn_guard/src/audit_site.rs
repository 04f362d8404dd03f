// Rust guideline compliant 2026-10-12

//! Website audit entry point.
//!
//! Fetches a page, then prints its HTTP status, meta tags, broken links, and
//! text-to-HTML ratio.
//!
//! # Usage
//!
//! ```text
//! audit_site https://example.com/
//! audit_site https://example.com/ --max-links 20
//! RUST_LOG=debug audit_site https://example.com/ --no-links
//! ```

// Loaded directly so the fetcher only enters this binary's module tree.
#[path = "adapters/http_fetcher.rs"]
mod http_fetcher;

use anyhow::Context as _;
use clap::Parser;
use http_fetcher::HttpFetcher;
use site_audit::{AuditConfig, AuditReport, SiteAuditor, Url};

/// Audit one web page: status, meta tags, broken links, text ratio.
#[derive(Debug, Parser)]
#[command(name = "audit_site", version)]
struct Cli {
    /// Page to audit.
    url: Url,

    /// Do not fetch outbound links.
    #[arg(long)]
    no_links: bool,

    /// Fetch at most this many outbound links.
    #[arg(long)]
    max_links: Option<usize>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize the tracing subscriber before any async work.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut builder = AuditConfig::builder().check_links(!cli.no_links);
    if let Some(n) = cli.max_links {
        builder = builder.max_links(n);
    }
    let auditor = SiteAuditor::new(builder.build().context("failed to build audit config")?);
    let fetcher = HttpFetcher::new().context("failed to build HTTP client")?;

    println!("Starting Website Audit...");
    let report = tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("main.shutdown: ctrl_c received");
            return Ok(());
        }
        report = auditor.audit(&cli.url, &fetcher) => {
            report.with_context(|| format!("failed to audit {}", cli.url))?
        }
    };

    print_report(&report);
    Ok(())
}

fn print_report(report: &AuditReport) {
    println!("HTTP Status: {}", report.status);

    println!("Meta Tags Found:");
    for (name, content) in &report.meta_tags {
        println!("  {name}: {content}");
    }

    if report.links_checked == 0 && report.links_found > 0 {
        println!("Links found: {} (not checked)", report.links_found);
    } else if report.broken_links.is_empty() {
        println!("No Broken Links Found.");
    } else {
        println!("Broken Links Found: {}", report.broken_links.len());
        for link in &report.broken_links {
            println!("  {}: {}", link.url, link.problem);
        }
    }

    println!("Text-to-HTML Ratio: {:.2}%", report.text_to_html_ratio);
}
