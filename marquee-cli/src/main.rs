//! Terminal companion to the Marquee search engine.
//!
//! Runs one-shot movie searches and trending queries against either the
//! real services or the built-in development backends.

mod commands;

use std::path::Path;

use clap::Parser;
use marquee_core::RuntimeMode;
use marquee_core::tracing_setup::{CliLogLevel, init_tracing};

#[derive(Parser)]
#[command(name = "marquee")]
#[command(about = "A movie discovery tool")]
struct Cli {
    /// Backend selection: real services or built-in development data
    #[arg(long, default_value_t = RuntimeMode::Development)]
    mode: RuntimeMode,

    /// Console log level (full debug log always goes to logs/)
    #[arg(long, value_enum, default_value_t = CliLogLevel::Warn)]
    log_level: CliLogLevel,

    #[command(subcommand)]
    command: commands::Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e.user_message());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> marquee_core::Result<()> {
    init_tracing(cli.log_level.as_tracing_level(), Some(Path::new("logs")))?;
    commands::handle_command(cli.mode, cli.command).await
}
