// Domain errors - Error types for the domain layer

use std::fmt;
use thiserror::Error;

/// Domain-specific error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Invalid arguments provided
    #[error("Bad arguments: {0}")]
    BadArgs(String),

    /// Time-range text could not be parsed
    #[error("Invalid time ranges:\n{0}")]
    InvalidRanges(RangeParseErrors),

    /// Source file missing or unreadable
    #[error("Source file not found: {0}")]
    SourceNotFound(String),

    /// Output location unusable
    #[error("Output directory unusable: {0}")]
    OutputUnavailable(String),

    /// Range lies outside the source
    #[error("Range out of bounds: {0}")]
    OutOfBounds(String),

    /// Cutting binary exited with a failure status
    #[error("Cutter exited with {status}: {stderr}")]
    ProcessFailed { status: String, stderr: String },

    /// Cutting binary did not finish in time
    #[error("Cutter timed out after {0}s")]
    Timeout(u64),

    /// Required tool not on PATH
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Media probing failed
    #[error("Probe failed: {0}")]
    ProbeFail(String),

    /// Decode or encode error
    #[error("Processing error: {0}")]
    ProcessingError(String),
}

/// One problem found on one line of time-range text
#[derive(Debug, Clone, PartialEq)]
pub struct LineError {
    /// 1-based line number in the original text
    pub line: usize,
    /// Line as the user typed it, trimmed
    pub text: String,
    pub reason: String,
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: \"{}\": {}", self.line, self.text, self.reason)
    }
}

/// Every line-level problem found in one request
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RangeParseErrors {
    pub errors: Vec<LineError>,
}

impl RangeParseErrors {
    pub fn push(&mut self, line: usize, text: &str, reason: impl Into<String>) {
        self.errors.push(LineError {
            line,
            text: text.to_string(),
            reason: reason.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Line numbers that failed, in input order
    pub fn lines(&self) -> Vec<usize> {
        self.errors.iter().map(|e| e.line).collect()
    }
}

impl fmt::Display for RangeParseErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for RangeParseErrors {}

impl From<RangeParseErrors> for DomainError {
    fn from(errors: RangeParseErrors) -> Self {
        DomainError::InvalidRanges(errors)
    }
}
