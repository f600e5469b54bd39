//! Error types for compose-sync-git.

use thiserror::Error;

/// All errors that can arise from git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// The git binary could not be started.
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// git ran and exited unsuccessfully.
    #[error("`{command}` failed ({status}): {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },

    /// git succeeded but printed something we could not interpret.
    #[error("unexpected output from `{command}`: {output:?}")]
    Parse { command: String, output: String },
}
