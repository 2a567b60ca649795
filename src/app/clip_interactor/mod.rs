// Clip interactor - Orchestrates the multi-range extraction use case

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Output file name for the clip at 1-based `index`
pub fn clip_file_name(prefix: &str, index: usize, extension: &str) -> String {
    format!("{}_{:02}.{}", prefix, index, extension)
}

/// Interactor for the extraction use case
pub struct ClipExtractor {
    probe_port: Arc<dyn ProbePort>,
    tool_port: Arc<dyn ToolPort>,
    factory: Arc<dyn ExtractorFactoryPort>,
    cutter_binary: String,
    preference: StrategyPreference,
    clip_prefix: String,
}

impl ClipExtractor {
    /// Create new clip extractor with injected ports
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        tool_port: Arc<dyn ToolPort>,
        factory: Arc<dyn ExtractorFactoryPort>,
    ) -> Self {
        Self {
            probe_port,
            tool_port,
            factory,
            cutter_binary: "ffmpeg".to_string(),
            preference: StrategyPreference::Auto,
            clip_prefix: "clip".to_string(),
        }
    }

    pub fn with_cutter_binary(mut self, name: impl Into<String>) -> Self {
        self.cutter_binary = name.into();
        self
    }

    pub fn with_preference(mut self, preference: StrategyPreference) -> Self {
        self.preference = preference;
        self
    }

    pub fn with_clip_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.clip_prefix = prefix.into();
        self
    }

    /// Decide the strategy for one call. Returns the cutter path for the
    /// precise strategy.
    pub fn select_strategy(&self) -> Result<(StrategyKind, Option<PathBuf>), DomainError> {
        if self.preference == StrategyPreference::Frames {
            return Ok((StrategyKind::Frames, None));
        }

        match (self.tool_port.locate(&self.cutter_binary), self.preference) {
            (Some(path), _) => Ok((StrategyKind::Precise, Some(path))),
            (None, StrategyPreference::Precise) => Err(DomainError::ToolNotFound(format!(
                "{} is required for precise cutting but was not found on PATH",
                self.cutter_binary
            ))),
            (None, _) => {
                warn!(
                    "{} not found on PATH, falling back to frame-based extraction (video only)",
                    self.cutter_binary
                );
                Ok((StrategyKind::Frames, None))
            }
        }
    }

    /// Validate the request, pick a strategy and return a lazy run over its
    /// ranges. Nothing is written until the run is polled.
    pub async fn extract(&self, request: ExtractionRequest) -> Result<ClipRun, DomainError> {
        if !request.source_path.is_file() {
            return Err(DomainError::SourceNotFound(format!(
                "Input file does not exist: {}",
                request.source_path.display()
            )));
        }

        tokio::fs::create_dir_all(&request.output_dir)
            .await
            .map_err(|e| {
                DomainError::OutputUnavailable(format!(
                    "Cannot create output directory {}: {}",
                    request.output_dir.display(),
                    e
                ))
            })?;

        let (kind, cutter) = self.select_strategy()?;
        let source = self.source_info(&request).await;
        info!(
            "Extracting {} range(s) from {} using {} strategy",
            request.ranges.len(),
            request.source_path.display(),
            kind
        );

        let plan = ExtractorPlan {
            kind,
            cutter,
            source_path: request.source_path.clone(),
            source: source.clone(),
        };
        let extractor = self.factory.create(&plan)?;

        Ok(ClipRun::new(
            extractor,
            request,
            source.duration,
            self.clip_prefix.clone(),
        ))
    }

    /// Probe results, with the caller's duration hint standing in when
    /// probing fails or reports no duration
    async fn source_info(&self, request: &ExtractionRequest) -> SourceInfo {
        let mut source = match self.probe_port.probe_source(&request.source_path).await {
            Ok(source) => source,
            Err(e) => {
                warn!("Could not probe {}: {}", request.source_path.display(), e);
                SourceInfo {
                    has_audio: true,
                    ..SourceInfo::default()
                }
            }
        };

        if source.duration.is_none() {
            source.duration = request.duration_hint;
        }
        if source.duration.is_none() {
            warn!("Source duration unknown, ranges will not be clamped");
        }
        source
    }
}

/// Lazily produced results of one extraction call, in input order
pub struct ClipRun {
    extractor: Box<dyn ExtractPort>,
    pending: std::iter::Enumerate<std::vec::IntoIter<TimeRange>>,
    output_dir: PathBuf,
    prefix: String,
    extension: String,
    duration: Option<f64>,
}

impl ClipRun {
    fn new(
        extractor: Box<dyn ExtractPort>,
        request: ExtractionRequest,
        duration: Option<f64>,
        prefix: String,
    ) -> Self {
        let extension = extractor.output_extension(&request.source_path);
        Self {
            extractor,
            pending: request.ranges.into_iter().enumerate(),
            output_dir: request.output_dir,
            prefix,
            extension,
            duration,
        }
    }

    pub fn strategy(&self) -> StrategyKind {
        self.extractor.kind()
    }

    /// Number of ranges not yet processed
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Process the next range; `None` once every range has a result
    pub async fn next(&mut self) -> Option<ClipResult> {
        let (position, range) = self.pending.next()?;
        Some(self.process(position + 1, range).await)
    }

    /// Drive the run to completion
    pub async fn collect_all(mut self) -> Vec<ClipResult> {
        let mut results = Vec::with_capacity(self.remaining());
        while let Some(result) = self.next().await {
            results.push(result);
        }
        results
    }

    async fn process(&mut self, index: usize, range: TimeRange) -> ClipResult {
        let strategy = self.extractor.kind();
        let failed = |effective_range: Option<TimeRange>, reason: String| ClipResult {
            index,
            range,
            effective_range,
            status: ClipStatus::Failed { reason },
            audio_preserved: false,
            strategy,
            frames_written: None,
        };

        let effective = match self.duration {
            Some(duration) => match range.clamp_to(duration) {
                Ok(effective) => effective,
                Err(e) => {
                    warn!("Clip {} ({}) skipped: {}", index, range, e);
                    return failed(None, e.to_string());
                }
            },
            None => range,
        };
        if effective != range {
            debug!("Clip {} clamped from {} to {}", index, range, effective);
        }

        let output_path = self
            .output_dir
            .join(clip_file_name(&self.prefix, index, &self.extension));
        // A stale file from an earlier run must not pass for this one
        if let Err(e) = tokio::fs::remove_file(&output_path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                return failed(
                    Some(effective),
                    format!("Cannot replace {}: {}", output_path.display(), e),
                );
            }
        }

        let job = ClipJob {
            index,
            range: effective,
            output_path,
        };

        match self.extractor.extract_clip(&job).await {
            Ok(outcome) => {
                info!("Clip {} ({}) written to {}", index, effective, job.output_path.display());
                ClipResult {
                    index,
                    range,
                    effective_range: Some(effective),
                    status: ClipStatus::Success {
                        output_path: job.output_path,
                    },
                    audio_preserved: outcome.audio_preserved,
                    strategy,
                    frames_written: outcome.frames_written,
                }
            }
            Err(e) => {
                warn!("Clip {} ({}) failed: {}", index, effective, e);
                failed(Some(effective), e.to_string())
            }
        }
    }
}
