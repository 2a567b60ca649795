// Adapters - External system implementations

pub mod env_tools;
pub mod exec_ffmpeg;
pub mod exec_libav;
pub mod probe_libav;
pub mod toml_config;
pub mod tracing_log;

// Re-export adapters
pub use env_tools::{check_tool, PathToolLocator, ToolInfo};
pub use exec_ffmpeg::SubprocessExtractor;
pub use exec_libav::FrameExtractor;
pub use probe_libav::ProbeLibavAdapter;
pub use toml_config::{LoadedConfig, Settings, TomlConfigAdapter};
pub use tracing_log::{init_logging, LogFormat};
