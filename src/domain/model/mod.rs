// Domain models - Core types and data structures

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::domain::errors::DomainError;

/// A requested `[start, end)` interval in seconds. `end > start` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeRange {
    start: f64,
    end: f64,
}

impl TimeRange {
    /// Create a range, rejecting negative, non-finite or empty intervals
    pub fn new(start: f64, end: f64) -> Result<Self, DomainError> {
        if !start.is_finite() || !end.is_finite() {
            return Err(DomainError::BadArgs("Time must be a finite number".to_string()));
        }
        if start < 0.0 || end < 0.0 {
            return Err(DomainError::BadArgs("Time cannot be negative".to_string()));
        }
        if end <= start {
            return Err(DomainError::BadArgs(format!(
                "End ({}) must be greater than start ({})",
                format_hms(end),
                format_hms(start)
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Fit the range inside a source of `duration` seconds.
    ///
    /// The end is pulled back to `duration`; the range is rejected when
    /// nothing of positive length remains.
    pub fn clamp_to(&self, duration: f64) -> Result<TimeRange, DomainError> {
        if self.start >= duration {
            return Err(DomainError::OutOfBounds(format!(
                "start {} is at or beyond source duration {}",
                format_hms(self.start),
                format_hms(duration)
            )));
        }
        Ok(Self {
            start: self.start,
            end: self.end.min(duration),
        })
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", format_hms(self.start), format_hms(self.end))
    }
}

/// Format seconds as HH:MM:SS with milliseconds when fractional
pub fn format_hms(seconds: f64) -> String {
    let total_ms = (seconds * 1000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;

    if millis == 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, millis)
    }
}

/// Half-open frame interval `[start_frame, end_frame)` for a range at a given rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameWindow {
    pub start_frame: i64,
    pub end_frame: i64,
}

impl FrameWindow {
    /// `frame = round(time * fps)` on both bounds
    pub fn from_range(range: &TimeRange, fps: f64) -> Self {
        Self {
            start_frame: (range.start() * fps).round() as i64,
            end_frame: (range.end() * fps).round() as i64,
        }
    }

    pub fn frame_count(&self) -> u64 {
        (self.end_frame - self.start_frame).max(0) as u64
    }

    pub fn is_empty(&self) -> bool {
        self.frame_count() == 0
    }
}

/// What the probe learned about a source file
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceInfo {
    pub duration: Option<f64>,
    pub has_audio: bool,
}

/// Extraction strategy actually used for a call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Cut by the external binary; keeps audio
    Precise,
    /// Decode and rewrite frames; video only
    Frames,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Precise => write!(f, "precise"),
            StrategyKind::Frames => write!(f, "frames"),
        }
    }
}

/// Requested strategy; `Auto` picks by binary availability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyPreference {
    #[default]
    Auto,
    Precise,
    Frames,
}

impl FromStr for StrategyPreference {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(StrategyPreference::Auto),
            "precise" => Ok(StrategyPreference::Precise),
            "frames" => Ok(StrategyPreference::Frames),
            other => Err(DomainError::BadArgs(format!(
                "Invalid strategy: {}. Valid strategies: auto, precise, frames",
                other
            ))),
        }
    }
}

/// How the external cutter writes the streams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodecMode {
    /// Stream copy, no re-encoding
    #[default]
    Copy,
    Reencode,
}

impl FromStr for CodecMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "copy" => Ok(CodecMode::Copy),
            "reencode" => Ok(CodecMode::Reencode),
            other => Err(DomainError::BadArgs(format!(
                "Invalid codec mode: {}. Valid modes: copy, reencode",
                other
            ))),
        }
    }
}

/// A source file plus the ranges to cut from it
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    pub source_path: PathBuf,
    pub ranges: Vec<TimeRange>,
    pub output_dir: PathBuf,
    /// Caller's idea of the source length, used when probing fails
    pub duration_hint: Option<f64>,
}

impl ExtractionRequest {
    pub fn new(
        source_path: impl Into<PathBuf>,
        ranges: Vec<TimeRange>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            ranges,
            output_dir: output_dir.into(),
            duration_hint: None,
        }
    }

    pub fn with_duration_hint(mut self, seconds: f64) -> Self {
        self.duration_hint = Some(seconds);
        self
    }
}

/// One unit of work handed to an extraction strategy
#[derive(Debug, Clone)]
pub struct ClipJob {
    /// 1-based position of the range in the request
    pub index: usize,
    /// Range after clamping to the source duration
    pub range: TimeRange,
    pub output_path: PathBuf,
}

/// What a strategy reports for a finished clip
#[derive(Debug, Clone, PartialEq)]
pub struct ClipOutcome {
    pub audio_preserved: bool,
    pub frames_written: Option<u64>,
}

/// Terminal state of one clip
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ClipStatus {
    Success { output_path: PathBuf },
    Failed { reason: String },
}

/// Result for one requested range, in request order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClipResult {
    pub index: usize,
    pub range: TimeRange,
    pub effective_range: Option<TimeRange>,
    #[serde(flatten)]
    pub status: ClipStatus,
    pub audio_preserved: bool,
    pub strategy: StrategyKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frames_written: Option<u64>,
}

impl ClipResult {
    pub fn is_success(&self) -> bool {
        matches!(self.status, ClipStatus::Success { .. })
    }

    pub fn output_path(&self) -> Option<&Path> {
        match &self.status {
            ClipStatus::Success { output_path } => Some(output_path),
            ClipStatus::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            ClipStatus::Success { .. } => None,
            ClipStatus::Failed { reason } => Some(reason),
        }
    }
}

#[cfg(test)]
mod tests;
