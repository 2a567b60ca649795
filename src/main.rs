//! ClipSplit CLI
//!
//! Cuts one video into many clips from a list of time ranges.
//!
//! # Usage
//!
//! ```bash
//! clipsplit split --input talk.mp4 --ranges 0:10-0:45 --ranges 12:00-12:30
//! clipsplit split --input talk.mp4 --ranges-file ranges.txt --out-dir clips --json
//! clipsplit check-ranges --ranges-file ranges.txt
//! clipsplit tools
//! ```
//!
//! Exit status is 0 when every clip was written, 1 when any clip failed and
//! 2 when the request itself was rejected.

use clap::Parser;
use std::process::ExitCode;
use tracing::debug;

use clipsplit::adapters::init_logging;
use clipsplit::cli::commands::{self, CommandStatus};
use clipsplit::cli::Cli;

/// Main entry point for the ClipSplit CLI application
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(CommandStatus::Success) => ExitCode::SUCCESS,
        Ok(CommandStatus::ClipsFailed) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<CommandStatus> {
    let config = commands::resolve_settings(&cli)?;
    let settings = &config.settings;
    init_logging(&settings.log_level, settings.log_format()?)?;
    config.log_sources();
    debug!("Resolved settings: {:?}", settings);

    commands::execute(cli.command, settings).await
}
