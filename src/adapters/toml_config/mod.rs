// TOML config adapter - Configuration management using TOML files

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::adapters::tracing_log::LogFormat;
use crate::domain::model::{CodecMode, StrategyPreference};
use crate::error::{ClipSplitError, ClipSplitResult};

/// File looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "clipsplit.toml";

/// Resolved settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Name of the cutting binary looked up on PATH
    pub cutter_binary: String,
    /// Explicit cutter location, checked before PATH
    pub cutter_path: Option<PathBuf>,
    /// auto, precise or frames
    pub strategy: String,
    /// copy or reencode
    pub codec_mode: String,
    pub cut_timeout_secs: u64,
    pub clip_prefix: String,
    pub frame_bit_rate: usize,
    pub log_level: String,
    /// pretty or json
    pub log_format: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cutter_binary: "ffmpeg".to_string(),
            cutter_path: None,
            strategy: "auto".to_string(),
            codec_mode: "copy".to_string(),
            cut_timeout_secs: 600,
            clip_prefix: "clip".to_string(),
            frame_bit_rate: crate::adapters::exec_libav::DEFAULT_FRAME_BIT_RATE,
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

fn invalid(key: &str, message: impl Into<String>) -> ClipSplitError {
    ClipSplitError::InvalidSetting {
        key: key.to_string(),
        message: message.into(),
    }
}

impl Settings {
    pub fn strategy(&self) -> ClipSplitResult<StrategyPreference> {
        self.strategy
            .parse()
            .map_err(|e: crate::DomainError| invalid("strategy", e.to_string()))
    }

    pub fn codec_mode(&self) -> ClipSplitResult<CodecMode> {
        self.codec_mode
            .parse()
            .map_err(|e: crate::DomainError| invalid("codec_mode", e.to_string()))
    }

    pub fn cut_timeout(&self) -> Duration {
        Duration::from_secs(self.cut_timeout_secs)
    }

    /// Check every value; the first problem found is returned
    pub fn validate(&self) -> ClipSplitResult<()> {
        self.strategy()?;
        self.codec_mode()?;

        if self.cutter_binary.trim().is_empty() {
            return Err(invalid("cutter_binary", "cannot be empty"));
        }
        if self.cut_timeout_secs == 0 {
            return Err(invalid("cut_timeout_secs", "must be at least 1"));
        }
        if self.frame_bit_rate == 0 {
            return Err(invalid("frame_bit_rate", "must be positive"));
        }
        if self.clip_prefix.is_empty()
            || self.clip_prefix.contains(['/', '\\'])
            || self.clip_prefix.starts_with('.')
        {
            return Err(invalid("clip_prefix", "must be a plain file name prefix"));
        }
        self.log_level
            .parse::<tracing::Level>()
            .map_err(|_| invalid("log_level", "expected trace, debug, info, warn or error"))?;
        self.log_format()?;
        Ok(())
    }

    pub fn log_format(&self) -> ClipSplitResult<LogFormat> {
        self.log_format.parse()
    }
}

/// Settings plus where they came from. Loading happens before logging is
/// installed, so the sources are reported afterwards through `log_sources`.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub settings: Settings,
    pub file: Option<PathBuf>,
    /// `(variable, value)` pairs that were applied
    pub env_overrides: Vec<(String, String)>,
}

impl LoadedConfig {
    pub fn log_sources(&self) {
        if let Some(file) = &self.file {
            info!("Loaded configuration from: {}", file.display());
        }
        for (key, value) in &self.env_overrides {
            info!("Found environment override: {} = {}", key, value);
        }
        if !self.env_overrides.is_empty() {
            info!("Applied {} environment variable overrides", self.env_overrides.len());
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    clipsplit: Settings,
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Load defaults, then the config file, then `CLIPSPLIT_*` environment overrides
    pub fn load(explicit: Option<&Path>) -> ClipSplitResult<LoadedConfig> {
        let file = Self::config_path(explicit);
        let mut settings = match &file {
            Some(path) => Self::load_file(path)?,
            None => Settings::default(),
        };

        let env_overrides = Self::apply_env(&mut settings, |key| std::env::var(key).ok())?;
        Ok(LoadedConfig {
            settings,
            file,
            env_overrides,
        })
    }

    fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        let default = PathBuf::from(DEFAULT_CONFIG_FILE);
        default.is_file().then_some(default)
    }

    /// Read and parse one config file
    pub fn load_file(path: &Path) -> ClipSplitResult<Settings> {
        let content = std::fs::read_to_string(path).map_err(|source| ClipSplitError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content).map_err(|e| match e {
            ClipSplitError::ConfigParse { message, .. } => ClipSplitError::ConfigParse {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    /// Parse TOML text with a `[clipsplit]` section
    pub fn parse(content: &str) -> ClipSplitResult<Settings> {
        let file: ConfigFile = toml::from_str(content).map_err(|e| ClipSplitError::ConfigParse {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Ok(file.clipsplit)
    }

    /// Apply environment overrides through `lookup`, returning the pairs used
    pub fn apply_env<F>(
        settings: &mut Settings,
        lookup: F,
    ) -> ClipSplitResult<Vec<(String, String)>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut applied = Vec::new();
        let mut take = |key: &str| {
            let value = lookup(key);
            if let Some(value) = &value {
                applied.push((key.to_string(), value.clone()));
            }
            value
        };

        if let Some(value) = take("CLIPSPLIT_CUTTER_BINARY") {
            settings.cutter_binary = value;
        }
        if let Some(value) = take("CLIPSPLIT_CUTTER_PATH") {
            settings.cutter_path = Some(PathBuf::from(value));
        }
        if let Some(value) = take("CLIPSPLIT_STRATEGY") {
            settings.strategy = value;
        }
        if let Some(value) = take("CLIPSPLIT_CODEC_MODE") {
            settings.codec_mode = value;
        }
        if let Some(value) = take("CLIPSPLIT_CUT_TIMEOUT_SECS") {
            settings.cut_timeout_secs = value
                .trim()
                .parse()
                .map_err(|e| invalid("CLIPSPLIT_CUT_TIMEOUT_SECS", format!("{}", e)))?;
        }
        if let Some(value) = take("CLIPSPLIT_CLIP_PREFIX") {
            settings.clip_prefix = value;
        }
        if let Some(value) = take("CLIPSPLIT_FRAME_BIT_RATE") {
            settings.frame_bit_rate = value
                .trim()
                .parse()
                .map_err(|e| invalid("CLIPSPLIT_FRAME_BIT_RATE", format!("{}", e)))?;
        }
        if let Some(value) = take("CLIPSPLIT_LOG_LEVEL") {
            settings.log_level = value;
        }
        if let Some(value) = take("CLIPSPLIT_LOG_FORMAT") {
            settings.log_format = value;
        }

        Ok(applied)
    }
}
