//! Sensitivity sweep binary.
//!
//! Reads a JSON temperature sweep and prints the per-nucleotide
//! [`SensitivityReport`](rna_hyperstats::SensitivityReport) as JSON on stdout.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `RNA_SWEEP_FILE`: sweep file (overridden by the first argument)
//! - `RNA_START_TEMP`: first temperature (default: 37)
//! - `RNA_END_TEMP`: last temperature, inclusive (default: 37)
//! - `RUST_LOG`: Log level filter (default: info)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: json)
//!
//! ## Usage
//!
//! ```bash
//! RNA_START_TEMP=30 RNA_END_TEMP=60 cargo run --bin rna_sensitivity -- sweep.json
//! ```

use std::path::PathBuf;
use std::time::Instant;

use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rna_hyperstats::{AnalysisConfig, TemperatureFoldingStats, RNA_HYPERSTATS_SCHEMA_VERSION};

/// Initialize the tracing subscriber with JSON or pretty format.
///
/// Logs go to stderr so stdout carries only the report.
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rna_sensitivity=info,rna_hyperstats=info".into());

    if log_format == "pretty" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let mut config = AnalysisConfig::from_env()?;
    if let Some(path) = std::env::args().nth(1) {
        config.sweep_file = Some(PathBuf::from(path));
    }

    info!(
        schema_version = RNA_HYPERSTATS_SCHEMA_VERSION,
        sweep_file = ?config.sweep_file,
        start_temp = config.start_temp,
        end_temp = config.end_temp,
        "starting sensitivity sweep"
    );

    let started = Instant::now();
    let provider = config.load_sweep()?;
    info!(
        temperatures = provider.temperatures().len(),
        revisions = provider.num_revisions(),
        "loaded sweep"
    );

    let stats = TemperatureFoldingStats::new(provider);
    let report = stats.sensitivity_report(config.start_temp, config.end_temp)?;

    info!(
        sensitive_nodes = report.counts.len(),
        report_hash = %report.report_hash,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "sweep finished"
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
