//! Git state synchronization.
//!
//! The tracked remote branch is authoritative. Local commits and uncommitted
//! edits are discarded whenever they stand between the checkout and the
//! remote tip.
//!
//! | state       | ahead | behind | action                                          | changed |
//! |-------------|-------|--------|-------------------------------------------------|---------|
//! | diverged    | >0    | >0     | fetch branch, reset to remote, clean            | yes     |
//! | ahead-only  | >0    | 0      | fetch branch, reset to remote                   | no      |
//! | behind-only | 0     | >0     | (dirty: reset HEAD + clean), fetch, reset       | yes     |
//! | in-sync     | 0     | 0      | none                                            | no      |
//!
//! Fetch and reset failures are fatal. Clean failures only warn.

use compose_sync_core::Revision;

use crate::backend::GitBackend;
use crate::error::GitError;

/// Divergence counts and working tree state relative to the tracked branch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepoStatus {
    pub ahead: usize,
    pub behind: usize,
    pub dirty: bool,
}

/// Classification of [`RepoStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchState {
    Diverged,
    AheadOnly,
    BehindOnly,
    InSync,
}

impl BranchState {
    pub fn classify(status: &RepoStatus) -> Self {
        match (status.ahead > 0, status.behind > 0) {
            (true, true) => BranchState::Diverged,
            (true, false) => BranchState::AheadOnly,
            (false, true) => BranchState::BehindOnly,
            (false, false) => BranchState::InSync,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BranchState::Diverged => "diverged",
            BranchState::AheadOnly => "ahead",
            BranchState::BehindOnly => "behind",
            BranchState::InSync => "in-sync",
        }
    }
}

/// Result of one synchronization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub branch: String,
    /// Status observed after the initial fetch, before any transition.
    pub status: RepoStatus,
    pub state: BranchState,
    /// `HEAD` before anything ran.
    pub before: Revision,
    /// `HEAD` after all transitions.
    pub after: Revision,
    /// Whether the remote brought new content into the checkout.
    pub changed: bool,
}

/// Forces a checkout to match its tracked remote branch.
pub struct GitSynchronizer<'a, G: GitBackend> {
    git: &'a G,
    remote: String,
    clean_excludes: Vec<String>,
}

impl<'a, G: GitBackend> GitSynchronizer<'a, G> {
    pub fn new(git: &'a G, remote: impl Into<String>, clean_excludes: Vec<String>) -> Self {
        Self {
            git,
            remote: remote.into(),
            clean_excludes,
        }
    }

    /// Fetch and report branch and status without touching the checkout.
    pub fn inspect(&self) -> Result<(String, RepoStatus), GitError> {
        self.git.fetch(&self.remote, None)?;
        let branch = self.git.current_branch()?;
        let status = self.status(&branch)?;
        Ok((branch, status))
    }

    /// Bring the checkout to the remote tip and report what moved.
    pub fn synchronize(&self) -> Result<SyncOutcome, GitError> {
        let before = self.git.rev_parse("HEAD")?;

        tracing::info!(remote = %self.remote, "fetching from remote");
        let (branch, status) = self.inspect()?;
        let state = BranchState::classify(&status);
        tracing::info!(
            %branch,
            ahead = status.ahead,
            behind = status.behind,
            dirty = status.dirty,
            state = state.as_str(),
            "checked git status"
        );

        let upstream = format!("{}/{}", self.remote, branch);
        let changed = match state {
            BranchState::Diverged => {
                tracing::warn!(
                    ahead = status.ahead,
                    behind = status.behind,
                    "local has diverged, discarding local commits (remote is source of truth)"
                );
                self.git.fetch(&self.remote, Some(&branch))?;
                self.git.reset_hard(&upstream)?;
                self.clean_untracked();
                tracing::info!("force-synced to remote");
                true
            }
            BranchState::AheadOnly => {
                tracing::warn!(
                    ahead = status.ahead,
                    "local is ahead of remote, discarding local commits (remote is source of truth)"
                );
                self.git.fetch(&self.remote, Some(&branch))?;
                self.git.reset_hard(&upstream)?;
                tracing::info!("reset to remote");
                false
            }
            BranchState::BehindOnly => {
                tracing::info!(behind = status.behind, "local is behind remote, pulling");
                if status.dirty {
                    tracing::warn!(
                        "local changes detected, discarding (remote is source of truth)"
                    );
                    self.git.reset_hard("HEAD")?;
                    self.clean_untracked();
                }
                self.git.fetch(&self.remote, Some(&branch))?;
                self.git.reset_hard(&upstream)?;
                tracing::info!("synced to remote (force reset)");
                true
            }
            BranchState::InSync => false,
        };

        let after = self.git.rev_parse("HEAD")?;
        Ok(SyncOutcome {
            branch,
            status,
            state,
            before,
            after,
            changed,
        })
    }

    fn status(&self, branch: &str) -> Result<RepoStatus, GitError> {
        let upstream = format!("{}/{}", self.remote, branch);
        let (ahead, behind) = self.git.ahead_behind(&upstream)?;
        let dirty = self.git.is_dirty()?;
        Ok(RepoStatus {
            ahead,
            behind,
            dirty,
        })
    }

    fn clean_untracked(&self) {
        if let Err(err) = self.git.clean(&self.clean_excludes) {
            tracing::warn!(error = %err, "failed to clean untracked files");
        }
    }
}
