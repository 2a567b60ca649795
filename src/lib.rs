//! ClipSplit library
//!
//! Turns a block of human-entered time ranges into validated intervals and
//! cuts one clip per interval out of a single source video, using the
//! ffmpeg binary when it is on PATH and a frame-based libav path otherwise.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use app::{ClipExtractor, ClipRun};
pub use domain::errors::{DomainError, LineError, RangeParseErrors};
pub use domain::model::{ClipResult, ClipStatus, ExtractionRequest, StrategyKind, TimeRange};
pub use domain::rules::RangeParser;
pub use error::{ClipSplitError, ClipSplitResult};
