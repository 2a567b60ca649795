//! Command-line argument definitions

use clap::Args;
use std::path::PathBuf;

/// Where the range text comes from
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct RangeInput {
    /// Range line (START-END); repeat for more ranges
    #[arg(short, long = "ranges", value_name = "RANGE")]
    pub ranges: Vec<String>,

    /// File with one range per line ("-" reads stdin)
    #[arg(long, value_name = "PATH")]
    pub ranges_file: Option<PathBuf>,
}

/// Arguments for the split command
#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    #[command(flatten)]
    pub ranges: RangeInput,

    /// Output directory (default: a new clipsplit_* temp directory)
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Source duration in seconds, used when probing cannot tell
    #[arg(long, value_name = "SECS")]
    pub duration_hint: Option<f64>,

    /// Extraction strategy (auto, precise, frames)
    #[arg(long)]
    pub strategy: Option<String>,

    /// Stream handling for the precise strategy (copy, reencode)
    #[arg(long)]
    pub codec_mode: Option<String>,

    /// Clip file name prefix
    #[arg(long)]
    pub prefix: Option<String>,

    /// Print a JSON report instead of the clip list
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the check-ranges command
#[derive(Args, Debug)]
pub struct CheckRangesArgs {
    #[command(flatten)]
    pub ranges: RangeInput,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the tools command
#[derive(Args, Debug)]
pub struct ToolsArgs {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
