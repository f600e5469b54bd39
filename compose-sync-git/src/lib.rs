//! # compose-sync-git
//!
//! Git state synchronization and change-set detection.
//!
//! [`GitSynchronizer::synchronize`] forces the checkout onto the tracked
//! remote branch (remote always wins) and reports the before/after
//! revisions; [`detect_changes`] maps the diff between them to project names.
//! All git access goes through the [`GitBackend`] trait; [`CommandGit`] is the
//! subprocess implementation.

pub mod auth;
pub mod backend;
pub mod changeset;
pub mod error;
pub mod synchronizer;

pub use auth::GitInvocation;
pub use backend::{CommandGit, GitBackend};
pub use changeset::{detect_changes, project_for_path};
pub use error::GitError;
pub use synchronizer::{BranchState, GitSynchronizer, RepoStatus, SyncOutcome};
