//! faultline - log classification and causal-chain root-cause analysis
//!
//! The library turns raw log lines into severity-scored classifications,
//! drops successful operations, groups the remaining errors into causal
//! chains and returns a ranked [`AnalysisResult`](crate::core::models::AnalysisResult).
//!
//! ```no_run
//! use faultline::config::AnalysisConfig;
//! use faultline::engine::Analyzer;
//! use faultline::adapters::text::TimestampParser;
//!
//! # fn main() -> anyhow::Result<()> {
//! let analyzer = Analyzer::from_config(AnalysisConfig::default())?;
//! let lines = TimestampParser::default().read_str("bmc", "2024-03-01 12:00:00 fan 2 failed");
//! let result = analyzer.analyze(&lines)?;
//! println!("{} error(s)", result.errors.len());
//! # Ok(())
//! # }
//! ```

// Deny all clippy warnings in this crate
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_import_braces,
    unused_qualifications
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cargo_common_metadata
)]

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod adapters;
pub mod config;
pub mod core;
pub mod engine;
pub mod output;
