// Ports - Interface definitions (contracts)

use crate::domain::errors::*;
use crate::domain::model::*;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Port for one clip-extraction strategy.
///
/// An extractor is created once per extraction call and handed one job per
/// range, in order. Implementations may keep state across jobs (an open
/// decoder, for example).
#[async_trait]
pub trait ExtractPort: Send {
    /// Strategy this extractor implements
    fn kind(&self) -> StrategyKind;

    /// Extension for output files written from `source`
    fn output_extension(&self, source: &Path) -> String;

    /// Write `job.range` of the source to `job.output_path`
    async fn extract_clip(&mut self, job: &ClipJob) -> Result<ClipOutcome, DomainError>;
}

/// Port for media file probing
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Probe duration, frame rate and audio presence
    async fn probe_source(&self, file_path: &Path) -> Result<SourceInfo, DomainError>;
}

/// Port for locating external command-line tools
pub trait ToolPort: Send + Sync {
    /// Resolve a tool to an executable path, if one is available
    fn locate(&self, name: &str) -> Option<PathBuf>;
}

/// What the orchestrator decided for one extraction call
#[derive(Debug, Clone)]
pub struct ExtractorPlan {
    pub kind: StrategyKind,
    /// Resolved cutting binary, set for the precise strategy
    pub cutter: Option<PathBuf>,
    pub source_path: PathBuf,
    pub source: SourceInfo,
}

/// Port for building the extractor that implements a plan
pub trait ExtractorFactoryPort: Send + Sync {
    fn create(&self, plan: &ExtractorPlan) -> Result<Box<dyn ExtractPort>, DomainError>;
}
