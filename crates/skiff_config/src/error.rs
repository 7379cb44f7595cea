//! Error types for skiff_config

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read a config file
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be converted to settings values
    #[error("Invalid config value: {0}")]
    Convert(#[from] serde_json::Error),

    /// Config root is not a table/object
    #[error("Config root must be a table, got {0}")]
    NotATable(String),
}

/// Result type for config operations
pub type Result<T> = std::result::Result<T, ConfigError>;
