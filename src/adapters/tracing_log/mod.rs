// Tracing log adapter - Structured logging using tracing crate

use std::str::FromStr;
use tracing_subscriber::EnvFilter;

use crate::error::{ClipSplitError, ClipSplitResult};

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ClipSplitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ClipSplitError::InvalidSetting {
                key: "log_format".to_string(),
                message: format!("unknown format '{}', expected pretty or json", other),
            }),
        }
    }
}

/// Filter used when `RUST_LOG` is unset: `level` for this crate, warn elsewhere
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,clipsplit={}", level)))
}

/// Install the global subscriber. Log lines go to stderr so stdout stays
/// free for clip listings and JSON reports.
pub fn init_logging(level: &str, format: LogFormat) -> ClipSplitResult<()> {
    level
        .parse::<tracing::Level>()
        .map_err(|_| ClipSplitError::InvalidSetting {
            key: "log_level".to_string(),
            message: format!("unknown level '{}'", level),
        })?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_filter(&level.to_lowercase()))
        .with_writer(std::io::stderr);

    let result = match format {
        LogFormat::Pretty => builder.with_target(false).try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    result.map_err(|e| ClipSplitError::LoggingInit {
        message: e.to_string(),
    })
}
