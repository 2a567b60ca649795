//! Error handling module for ClipSplit

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Application-level error type
#[derive(Error, Debug)]
pub enum ClipSplitError {
    /// Config file could not be read
    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML or has unknown keys
    #[error("Invalid config file {path}: {message}")]
    ConfigParse { path: String, message: String },

    /// A setting has an unusable value
    #[error("Invalid value for {key}: {message}")]
    InvalidSetting { key: String, message: String },

    /// Logging could not be initialised
    #[error("Failed to initialise logging: {message}")]
    LoggingInit { message: String },

    /// Domain error
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Result type alias for ClipSplit operations
pub type ClipSplitResult<T> = std::result::Result<T, ClipSplitError>;
