// Probe LibAV adapter - Media file analysis using libav

use async_trait::async_trait;
use std::path::Path;
use tracing::debug;

use ffmpeg_next as ffmpeg;
use ffmpeg::media::Type;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// LibAV-based media probing adapter
pub struct ProbeLibavAdapter;

impl ProbeLibavAdapter {
    /// Create new LibAV probing adapter
    pub fn new() -> Result<Self, DomainError> {
        ffmpeg::init().map_err(|e| DomainError::ProbeFail(format!("FFmpeg initialization failed: {}", e)))?;
        Ok(Self)
    }

    fn probe(file_path: &Path) -> Result<SourceInfo, DomainError> {
        if !file_path.is_file() {
            return Err(DomainError::ProbeFail(format!(
                "File does not exist: {}",
                file_path.display()
            )));
        }

        let input = ffmpeg::format::input(&file_path)
            .map_err(|e| DomainError::ProbeFail(format!("Failed to open input: {}", e)))?;

        let container_duration = input.duration();
        let duration = if container_duration > 0 {
            Some(container_duration as f64 / ffmpeg::ffi::AV_TIME_BASE as f64)
        } else {
            // Fall back to the video stream's own duration
            input
                .streams()
                .best(Type::Video)
                .filter(|stream| stream.duration() > 0)
                .map(|stream| stream.duration() as f64 * f64::from(stream.time_base()))
        };

        let info = SourceInfo {
            duration,
            has_audio: input.streams().best(Type::Audio).is_some(),
        };

        debug!("Probed {}: {:?}", file_path.display(), info);
        Ok(info)
    }
}

#[async_trait]
impl ProbePort for ProbeLibavAdapter {
    async fn probe_source(&self, file_path: &Path) -> Result<SourceInfo, DomainError> {
        Self::probe(file_path)
    }
}
