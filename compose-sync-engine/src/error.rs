//! Error types for compose-sync-engine.
//!
//! Only pass-level failures surface here. Per-project failures are recorded
//! in the run report instead.

use compose_sync_detector::ScanError;
use compose_sync_git::GitError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Fetching, resetting or inspecting the checkout failed.
    #[error("git synchronization failed: {0}")]
    Git(#[from] GitError),

    /// The projects root could not be listed.
    #[error("disk scan failed: {0}")]
    Scan(#[from] ScanError),
}
