// Application layer - Use case interactors

pub mod clip_interactor;
pub mod container;

// Re-export interactors
pub use clip_interactor::{clip_file_name, ClipExtractor, ClipRun};
pub use container::{build_clip_extractor, DefaultExtractorFactory};
