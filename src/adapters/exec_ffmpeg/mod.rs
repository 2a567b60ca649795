//! FFmpeg execution adapter
//!
//! Cuts each range by running the ffmpeg command-line tool, stream-copying
//! by default so the original audio track survives untouched.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Default wall-clock limit for one cut
pub const DEFAULT_CUT_TIMEOUT: Duration = Duration::from_secs(600);

/// Number of trailing stderr lines kept in a failure reason
const STDERR_TAIL_LINES: usize = 5;

/// Subprocess-based extractor (precise cut)
pub struct SubprocessExtractor {
    binary: PathBuf,
    source: PathBuf,
    codec_mode: CodecMode,
    timeout: Duration,
    audio_preserved: bool,
}

impl SubprocessExtractor {
    /// Create an extractor cutting `source` with the binary at `binary`
    pub fn new(binary: impl Into<PathBuf>, source: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            source: source.into(),
            codec_mode: CodecMode::Copy,
            timeout: DEFAULT_CUT_TIMEOUT,
            audio_preserved: true,
        }
    }

    pub fn with_codec_mode(mut self, codec_mode: CodecMode) -> Self {
        self.codec_mode = codec_mode;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Record whether the source carries audio for reporting
    pub fn with_source_audio(mut self, has_audio: bool) -> Self {
        self.audio_preserved = has_audio;
        self
    }

    /// Command-line arguments for one cut
    pub fn build_args(&self, job: &ClipJob) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-hide_banner", "-nostdin", "-loglevel", "error", "-y"]
            .into_iter()
            .map(OsString::from)
            .collect();

        // Input seeking: fast, and exact when re-encoding
        args.push("-ss".into());
        args.push(seconds_arg(job.range.start()).into());
        args.push("-i".into());
        args.push(self.source.clone().into_os_string());
        args.push("-t".into());
        args.push(seconds_arg(job.range.duration()).into());

        for map in ["-map", "0:v?", "-map", "0:a?"] {
            args.push(map.into());
        }

        match self.codec_mode {
            CodecMode::Copy => {
                args.push("-c".into());
                args.push("copy".into());
            }
            CodecMode::Reencode => {
                for arg in ["-c:v", "libx264", "-c:a", "aac"] {
                    args.push(arg.into());
                }
            }
        }

        args.push("-avoid_negative_ts".into());
        args.push("make_zero".into());
        args.push(job.output_path.clone().into_os_string());
        args
    }

    /// Run the binary and wait, bounded by the configured timeout
    async fn run(&self, args: Vec<OsString>) -> Result<(), DomainError> {
        debug!("Running {} {:?}", self.binary.display(), args);

        let child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                DomainError::ProcessingError(format!(
                    "Failed to start {}: {}",
                    self.binary.display(),
                    e
                ))
            })?;

        // Dropping the wait future on timeout kills the child
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|e| {
                DomainError::ProcessingError(format!("Failed to wait for cutter: {}", e))
            })?,
            Err(_) => return Err(DomainError::Timeout(self.timeout.as_secs())),
        };

        if !output.status.success() {
            return Err(DomainError::ProcessFailed {
                status: output.status.to_string(),
                stderr: stderr_tail(&output.stderr),
            });
        }
        Ok(())
    }
}

/// Last few non-empty lines of captured stderr
fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if lines.is_empty() {
        return "no error output".to_string();
    }
    let skip = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[skip..].join("; ")
}

#[async_trait]
impl ExtractPort for SubprocessExtractor {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Precise
    }

    fn output_extension(&self, source: &Path) -> String {
        source
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty())
            .map(|ext| ext.to_lowercase())
            .unwrap_or_else(|| "mp4".to_string())
    }

    async fn extract_clip(&mut self, job: &ClipJob) -> Result<ClipOutcome, DomainError> {
        // `-t 0` would make the cutter write an empty clip and exit cleanly
        if seconds_arg(job.range.duration()) == "0" {
            return Err(DomainError::OutOfBounds(format!(
                "range {} is shorter than one microsecond",
                job.range
            )));
        }

        let args = self.build_args(job);
        self.run(args).await?;

        if !job.output_path.is_file() {
            return Err(DomainError::ProcessingError(format!(
                "Cutter reported success but wrote no file at {}",
                job.output_path.display()
            )));
        }

        Ok(ClipOutcome {
            audio_preserved: self.audio_preserved,
            frames_written: None,
        })
    }
}

/// Seconds at microsecond precision, without trailing zeros
fn seconds_arg(seconds: f64) -> String {
    let text = format!("{:.6}", seconds);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
