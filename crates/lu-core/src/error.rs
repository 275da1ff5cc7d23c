//! Error types for lu-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using lu-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for lu-hut
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration value or format
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// The config file is not valid YAML or does not match the schema
    #[error("Failed to parse {}: {source}", path.display())]
    YamlParse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Neither $HOME nor the platform lookup produced a home directory
    #[error("Could not determine home directory")]
    NoHomeDir,
}

impl Error {
    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
