use std::sync::Arc;

use crate::adapters::{
    FrameExtractor, PathToolLocator, ProbeLibavAdapter, Settings, SubprocessExtractor,
};
use crate::app::clip_interactor::ClipExtractor;
use crate::domain::errors::DomainError;
use crate::domain::model::{CodecMode, StrategyKind};
use crate::error::ClipSplitResult;
use crate::ports::{ExtractPort, ExtractorFactoryPort, ExtractorPlan, ProbePort, ToolPort};

/// Builds the real extractors from resolved settings
pub struct DefaultExtractorFactory {
    codec_mode: CodecMode,
    cut_timeout: std::time::Duration,
    frame_bit_rate: usize,
}

impl DefaultExtractorFactory {
    pub fn from_settings(settings: &Settings) -> ClipSplitResult<Self> {
        Ok(Self {
            codec_mode: settings.codec_mode()?,
            cut_timeout: settings.cut_timeout(),
            frame_bit_rate: settings.frame_bit_rate,
        })
    }
}

impl ExtractorFactoryPort for DefaultExtractorFactory {
    fn create(&self, plan: &ExtractorPlan) -> Result<Box<dyn ExtractPort>, DomainError> {
        match (plan.kind, &plan.cutter) {
            (StrategyKind::Precise, Some(cutter)) => Ok(Box::new(
                SubprocessExtractor::new(cutter, &plan.source_path)
                    .with_codec_mode(self.codec_mode)
                    .with_timeout(self.cut_timeout)
                    .with_source_audio(plan.source.has_audio),
            )),
            (StrategyKind::Precise, None) => Err(DomainError::ToolNotFound(
                "precise strategy selected without a cutter binary".to_string(),
            )),
            (StrategyKind::Frames, _) => Ok(Box::new(
                FrameExtractor::new(&plan.source_path)?.with_bit_rate(self.frame_bit_rate),
            )),
        }
    }
}

/// Wire the production adapters into a [`ClipExtractor`]
pub fn build_clip_extractor(settings: &Settings) -> ClipSplitResult<ClipExtractor> {
    let probe_port = Arc::new(ProbeLibavAdapter::new()?);
    let tool_port =
        Arc::new(PathToolLocator::new().with_configured_path(settings.cutter_path.clone()));
    let factory = Arc::new(DefaultExtractorFactory::from_settings(settings)?);

    Ok(ClipExtractor::new(
        probe_port as Arc<dyn ProbePort>,
        tool_port as Arc<dyn ToolPort>,
        factory as Arc<dyn ExtractorFactoryPort>,
    )
    .with_cutter_binary(settings.cutter_binary.clone())
    .with_preference(settings.strategy()?)
    .with_clip_prefix(settings.clip_prefix.clone()))
}
