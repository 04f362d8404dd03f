// Rust guideline compliant 2026-10-12

//! Adapters (secondary ports) for the `flag_transactions` binary.
//!
//! Each sub-module implements one hexagonal port trait defined in the
//! `domain` crate. The page fetcher used by `audit_site` is loaded by that
//! binary directly.

pub mod console_sink;
pub mod http_source;
pub mod json_file_source;
pub mod log_sink;
pub mod synthetic_source;
