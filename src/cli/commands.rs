//! Command implementations

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::adapters::{check_tool, LoadedConfig, PathToolLocator, Settings, TomlConfigAdapter};
use crate::app::build_clip_extractor;
use crate::cli::args::{CheckRangesArgs, RangeInput, SplitArgs, ToolsArgs};
use crate::cli::{Cli, Commands};
use crate::domain::model::{ClipResult, ClipStatus, ExtractionRequest, StrategyKind, TimeRange};
use crate::domain::rules::RangeParser;
use crate::utils::Utils;

/// How a command finished when it did not hit a request-level error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    /// At least one clip failed
    ClipsFailed,
}

/// Load settings in precedence order: defaults, file, environment, flags
pub fn resolve_settings(cli: &Cli) -> Result<LoadedConfig> {
    let mut loaded = TomlConfigAdapter::load(cli.config.as_deref())?;
    let settings = &mut loaded.settings;

    if let Some(level) = &cli.log_level {
        settings.log_level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        settings.log_format = format.clone();
    }
    if let Commands::Split(args) = &cli.command {
        if let Some(strategy) = &args.strategy {
            settings.strategy = strategy.clone();
        }
        if let Some(codec_mode) = &args.codec_mode {
            settings.codec_mode = codec_mode.clone();
        }
        if let Some(prefix) = &args.prefix {
            settings.clip_prefix = prefix.clone();
        }
    }

    settings.validate()?;
    Ok(loaded)
}

/// Run the parsed command
pub async fn execute(command: Commands, settings: &Settings) -> Result<CommandStatus> {
    match command {
        Commands::Split(args) => split(args, settings).await,
        Commands::CheckRanges(args) => check_ranges(args),
        Commands::Tools(args) => tools(args, settings),
    }
}

fn read_range_text(input: &RangeInput) -> Result<String> {
    match &input.ranges_file {
        Some(path) if path.as_os_str() == "-" => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read ranges from stdin")?;
            Ok(text)
        }
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read ranges file {}", path.display())),
        None => Ok(input.ranges.join("\n")),
    }
}

fn parse_ranges(input: &RangeInput) -> Result<Vec<TimeRange>> {
    let text = read_range_text(input)?;
    Ok(RangeParser::parse(&text)?)
}

#[derive(Serialize)]
struct SplitReport<'a> {
    source: &'a Path,
    output_dir: &'a Path,
    strategy: StrategyKind,
    succeeded: usize,
    failed: usize,
    clips: &'a [ClipResult],
}

/// One listing line per clip, as printed by `split`
pub fn format_result_line(result: &ClipResult) -> String {
    match &result.status {
        ClipStatus::Success { output_path } => {
            let name = output_path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| output_path.display().to_string());
            match std::fs::metadata(output_path) {
                Ok(meta) => format!(
                    "{}. {} ({})",
                    result.index,
                    name,
                    Utils::format_size_kb(meta.len())
                ),
                Err(_) => format!("{}. {}", result.index, name),
            }
        }
        ClipStatus::Failed { reason } => format!("{}. FAILED: {}", result.index, reason),
    }
}

/// Execute the split command
pub async fn split(args: SplitArgs, settings: &Settings) -> Result<CommandStatus> {
    let ranges = parse_ranges(&args.ranges)?;
    info!("Parsed {} range(s)", ranges.len());

    // A generated directory is removed again unless extraction starts
    let temp_dir = match &args.out_dir {
        Some(_) => None,
        None => Some(
            tempfile::Builder::new()
                .prefix("clipsplit_")
                .tempdir()
                .context("Failed to create temporary output directory")?,
        ),
    };
    let output_dir: PathBuf = match (&args.out_dir, &temp_dir) {
        (Some(dir), _) => dir.clone(),
        (None, Some(temp)) => temp.path().to_path_buf(),
        (None, None) => bail!("No output directory available"),
    };

    let mut request = ExtractionRequest::new(&args.input, ranges, &output_dir);
    if let Some(hint) = args.duration_hint {
        if !hint.is_finite() || hint <= 0.0 {
            bail!("Duration hint must be a positive number of seconds, got {}", hint);
        }
        request = request.with_duration_hint(hint);
    }

    let extractor = build_clip_extractor(settings)?;
    let mut run = extractor.extract(request).await?;
    if let Some(temp) = temp_dir {
        let _ = temp.keep();
    }

    let strategy = run.strategy();
    if strategy == StrategyKind::Frames {
        warn!("Using frame-based extraction: clips will have no audio");
    }

    let mut results = Vec::with_capacity(run.remaining());
    while let Some(result) = run.next().await {
        if !args.json {
            println!("{}", format_result_line(&result));
        }
        results.push(result);
    }

    let succeeded = results.iter().filter(|r| r.is_success()).count();
    let failed = results.len() - succeeded;

    if args.json {
        let report = SplitReport {
            source: &args.input,
            output_dir: &output_dir,
            strategy,
            succeeded,
            failed,
            clips: &results,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} of {} clip(s) written to {}",
            succeeded,
            results.len(),
            output_dir.display()
        );
    }

    Ok(if failed == 0 {
        CommandStatus::Success
    } else {
        CommandStatus::ClipsFailed
    })
}

#[derive(Serialize)]
struct CheckedRange {
    index: usize,
    start: f64,
    end: f64,
    duration: f64,
}

/// Execute the check-ranges command
pub fn check_ranges(args: CheckRangesArgs) -> Result<CommandStatus> {
    let ranges = parse_ranges(&args.ranges)?;

    if args.json {
        let checked: Vec<CheckedRange> = ranges
            .iter()
            .enumerate()
            .map(|(i, range)| CheckedRange {
                index: i + 1,
                start: range.start(),
                end: range.end(),
                duration: range.duration(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&checked)?);
    } else {
        for (i, range) in ranges.iter().enumerate() {
            println!(
                "{}. {} ({})",
                i + 1,
                range,
                Utils::format_seconds(range.duration())
            );
        }
    }
    Ok(CommandStatus::Success)
}

#[derive(Serialize)]
struct ToolsReport {
    tool: String,
    path: Option<PathBuf>,
    version: Option<String>,
    strategy: Option<StrategyKind>,
    audio_preserved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Execute the tools command
pub fn tools(args: ToolsArgs, settings: &Settings) -> Result<CommandStatus> {
    let locator = PathToolLocator::new().with_configured_path(settings.cutter_path.clone());
    let tool = check_tool(&locator, &settings.cutter_binary);
    let selection = build_clip_extractor(settings)?.select_strategy();

    let (strategy, error) = match selection {
        Ok((kind, _)) => (Some(kind), None),
        Err(e) => (None, Some(e.to_string())),
    };
    let report = ToolsReport {
        tool: tool.name.clone(),
        path: tool.path.clone(),
        version: tool.version.clone(),
        strategy,
        audio_preserved: strategy == Some(StrategyKind::Precise),
        error,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        match &report.path {
            Some(path) => println!("{}: {}", report.tool, path.display()),
            None => println!("{}: not found", report.tool),
        }
        if let Some(version) = &report.version {
            println!("version: {}", version);
        }
        match (report.strategy, &report.error) {
            (Some(StrategyKind::Precise), _) => println!("strategy: precise (audio preserved)"),
            (Some(StrategyKind::Frames), _) => println!("strategy: frames (video only)"),
            (None, Some(error)) => println!("strategy: unavailable ({})", error),
            (None, None) => println!("strategy: unavailable"),
        }
    }

    if let Some(error) = report.error {
        bail!(error);
    }
    Ok(CommandStatus::Success)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(status: ClipStatus) -> ClipResult {
        let range = TimeRange::new(0.0, 5.0).unwrap();
        ClipResult {
            index: 3,
            range,
            effective_range: Some(range),
            status,
            audio_preserved: true,
            strategy: StrategyKind::Precise,
            frames_written: None,
        }
    }

    #[test]
    fn test_format_success_line_with_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip_03.mp4");
        std::fs::write(&path, vec![0u8; 2048]).unwrap();

        let line = format_result_line(&result(ClipStatus::Success { output_path: path }));
        assert_eq!(line, "3. clip_03.mp4 (2.0 KB)");
    }

    #[test]
    fn test_format_failed_line() {
        let line = format_result_line(&result(ClipStatus::Failed {
            reason: "Timed out".to_string(),
        }));
        assert_eq!(line, "3. FAILED: Timed out");
    }

    #[test]
    fn test_range_text_from_flags_and_file() {
        let input = RangeInput {
            ranges: vec!["0-5".to_string(), "10-20".to_string()],
            ranges_file: None,
        };
        assert_eq!(read_range_text(&input).unwrap(), "0-5\n10-20");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ranges.txt");
        std::fs::write(&path, "0:10-0:20\n\n1:00-1:05\n").unwrap();
        let input = RangeInput {
            ranges: Vec::new(),
            ranges_file: Some(path),
        };
        assert_eq!(parse_ranges(&input).unwrap().len(), 2);
    }
}
