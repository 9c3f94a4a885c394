//! CLI entry point for the bus-route auditor.
//!
//! Reads one JSON array of stop records from stdin (or a file argument),
//! validates it, and prints the categorized report to stdout.

use std::ffi::OsStr;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use bus_route_auditor::run_audit;
use clap::Parser;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bus_route_auditor")]
#[command(about = "Validates and summarizes a bus-route stop dataset", long_about = None)]
struct Cli {
    /// Path to a JSON dataset file; reads stdin when omitted
    #[arg(value_name = "FILE")]
    input: Option<String>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + optional JSON log file
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("warn".parse().unwrap()));

    let (json_layer, _file_guard) = match std::env::var("LOG_FILE_PATH") {
        Ok(log_file_path) => {
            let log_dir = Path::new(&log_file_path)
                .parent()
                .unwrap_or(Path::new("logs"));
            let log_file_name = Path::new(&log_file_path)
                .file_name()
                .unwrap_or(OsStr::new("bus_route_auditor.log"));

            let file_appender = tracing_appender::rolling::never(log_dir, log_file_name);
            let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

            let layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_writer(non_blocking_file)
                .with_filter(
                    EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()),
                );
            (Some(layer), Some(file_guard))
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let input = match cli.input {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read dataset from {path}"))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read dataset from stdin")?;
            buf
        }
    };

    let stdout = std::io::stdout();
    run_audit(&input, &mut stdout.lock())
}
