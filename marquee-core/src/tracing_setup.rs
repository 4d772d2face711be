//! Dual-sink tracing: a quiet console plus a full-detail run log on disk.
//!
//! The console layer honors the level chosen on the command line, or
//! `RUST_LOG` when the environment sets one. The file layer always captures
//! TRACE so a failed run can be diagnosed afterwards without re-running it.

use std::fs::{File, create_dir_all};
use std::path::Path;

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::MarqueeError;

/// File name of the per-run debug log, overwritten on every start.
const RUN_LOG_FILE: &str = "marquee-last-run.log";

/// Installs the global subscriber with console and file output.
///
/// `logs_dir` defaults to `./logs` and is created when missing.
///
/// # Errors
///
/// - `MarqueeError::Io` - If the logs directory or the run log cannot be created
/// - `MarqueeError::Configuration` - If a global subscriber is already installed
pub fn init_tracing(console_level: Level, logs_dir: Option<&Path>) -> crate::Result<()> {
    let logs_path = logs_dir.unwrap_or_else(|| Path::new("logs"));
    create_dir_all(logs_path)?;
    let run_log_path = logs_path.join(RUN_LOG_FILE);
    let run_log = File::create(&run_log_path)?;

    // RUST_LOG wins over the CLI flag when both are present.
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(console_level.to_string()));
    let console_layer = fmt::layer().with_target(false).with_filter(console_filter);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false) // Plain text in the log file
        .with_writer(run_log)
        .with_filter(EnvFilter::new("trace"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| MarqueeError::Configuration {
            reason: format!("Tracing already initialized: {e}"),
        })?;

    tracing::info!(
        "Tracing ready: console={}, run_log={}",
        console_level,
        run_log_path.display()
    );

    Ok(())
}

/// Log level as selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliLogLevel {
    /// Only error messages
    Error,
    /// Warnings and errors
    Warn,
    /// General progress information
    Info,
    /// Detailed diagnostics
    Debug,
    /// Everything, including per-request tracing
    Trace,
}

impl CliLogLevel {
    /// Converts to the `tracing` level driving the console filter.
    pub fn as_tracing_level(self) -> Level {
        match self {
            CliLogLevel::Error => Level::ERROR,
            CliLogLevel::Warn => Level::WARN,
            CliLogLevel::Info => Level::INFO,
            CliLogLevel::Debug => Level::DEBUG,
            CliLogLevel::Trace => Level::TRACE,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            CliLogLevel::Error => "error",
            CliLogLevel::Warn => "warn",
            CliLogLevel::Info => "info",
            CliLogLevel::Debug => "debug",
            CliLogLevel::Trace => "trace",
        }
    }
}

impl std::str::FromStr for CliLogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(CliLogLevel::Error),
            "warn" => Ok(CliLogLevel::Warn),
            "info" => Ok(CliLogLevel::Info),
            "debug" => Ok(CliLogLevel::Debug),
            "trace" => Ok(CliLogLevel::Trace),
            _ => Err(format!("Invalid log level: {s}")),
        }
    }
}

impl std::fmt::Display for CliLogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
