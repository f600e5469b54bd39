//! Error types for compose-sync-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required setting was absent from both the environment and the config file.
    #[error("{key} environment variable is required")]
    Missing { key: &'static str },

    /// A setting was present but could not be interpreted.
    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },

    /// The config file could not be read.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid YAML for [`crate::ConfigFile`].
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
