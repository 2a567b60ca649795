//! CLI module for ClipSplit
//!
//! This module handles command-line argument parsing and command execution.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod args;
pub mod commands;

/// ClipSplit - cut one video into many clips
///
/// Ranges are given one per line as START-END, where each time is seconds,
/// MM:SS or HH:MM:SS (fractional seconds allowed).
#[derive(Parser, Debug)]
#[command(name = "clipsplit")]
#[command(about = "Split one video into clips from a list of time ranges")]
#[command(version)]
pub struct Cli {
    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log line format (pretty or json)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Config file (default: ./clipsplit.toml when present)
    #[arg(long, global = true, env = "CLIPSPLIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Cut every range out of the input video
    Split(args::SplitArgs),
    /// Parse ranges and report them without touching any video
    CheckRanges(args::CheckRangesArgs),
    /// Show which extraction strategy is available
    Tools(args::ToolsArgs),
}
