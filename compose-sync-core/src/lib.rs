//! compose-sync core library: domain types, configuration, errors.
//!
//! - [`types`]: newtypes, remote project records, the change-set
//! - [`config`]: environment / YAML configuration loading
//! - [`error`]: [`ConfigError`]

pub mod config;
pub mod error;
pub mod types;

pub use config::{Config, ConfigFile, GitAuth};
pub use error::ConfigError;
pub use types::{
    is_manifest_filename, ChangeSet, ProjectName, RemoteProject, RemoteProjectId, Revision,
    ENV_FILENAME, MANIFEST_FILENAMES,
};
