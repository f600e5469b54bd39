//! Per-project outcomes and the run report.

use chrono::{DateTime, Utc};
use compose_sync_core::{ChangeSet, ProjectName, RemoteProjectId, Revision};
use compose_sync_git::BranchState;

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// How a freshly created project was brought up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    /// Start failed and the single redeploy fallback succeeded.
    RedeployedAfterStartFailure,
    /// Start and the redeploy fallback both failed.
    Failed,
}

/// The step at which a project gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    ReadManifest,
    Create,
    Redeploy,
}

impl FailureStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureStage::ReadManifest => "read-manifest",
            FailureStage::Create => "create",
            FailureStage::Redeploy => "redeploy",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectOutcome {
    Created {
        id: RemoteProjectId,
        start: StartOutcome,
    },
    /// Creation was suppressed because the exact-name lookup found entries.
    Adopted { ids: Vec<RemoteProjectId> },
    /// Redeployed; `updated` is false when the best-effort update failed.
    Synced { id: RemoteProjectId, updated: bool },
    Unchanged,
    WouldCreate,
    WouldSync { id: RemoteProjectId },
    Failed { stage: FailureStage, error: String },
}

impl ProjectOutcome {
    /// Whether the project counts as failed for the pass.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            ProjectOutcome::Failed { .. }
                | ProjectOutcome::Created {
                    start: StartOutcome::Failed,
                    ..
                }
        )
    }

    /// Whether a remote mutation was attempted (or would be, in dry-run).
    pub fn is_attempt(&self) -> bool {
        !matches!(
            self,
            ProjectOutcome::Unchanged | ProjectOutcome::Adopted { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectReport {
    pub name: ProjectName,
    pub outcome: ProjectOutcome,
}

// ---------------------------------------------------------------------------
// Run report
// ---------------------------------------------------------------------------

/// Tallies over a run's project outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunCounts {
    pub created: usize,
    pub adopted: usize,
    pub synced: usize,
    pub unchanged: usize,
    /// Dry-run only: creates and syncs that would have been issued.
    pub planned: usize,
    pub failed: usize,
}

impl RunCounts {
    pub fn attempted(&self) -> usize {
        self.created + self.synced + self.planned + self.failed
    }
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub dry_run: bool,
    pub branch: String,
    pub state: BranchState,
    pub before: Revision,
    pub after: Revision,
    pub changes: ChangeSet,
    pub duplicates: Vec<(ProjectName, Vec<RemoteProjectId>)>,
    pub projects: Vec<ProjectReport>,
}

impl RunReport {
    pub fn counts(&self) -> RunCounts {
        let mut counts = RunCounts::default();
        for report in &self.projects {
            match &report.outcome {
                outcome if outcome.is_failure() => counts.failed += 1,
                ProjectOutcome::Created { .. } => counts.created += 1,
                ProjectOutcome::Adopted { .. } => counts.adopted += 1,
                ProjectOutcome::Synced { .. } => counts.synced += 1,
                ProjectOutcome::Unchanged => counts.unchanged += 1,
                ProjectOutcome::WouldCreate | ProjectOutcome::WouldSync { .. } => {
                    counts.planned += 1
                }
                ProjectOutcome::Failed { .. } => counts.failed += 1,
            }
        }
        counts
    }

    /// True when at least one project was attempted and every attempt failed.
    pub fn all_failed(&self) -> bool {
        let counts = self.counts();
        counts.attempted() > 0 && counts.failed == counts.attempted()
    }

    /// Nothing to create or sync and nothing failed.
    pub fn is_noop(&self) -> bool {
        self.projects.iter().all(|p| !p.outcome.is_attempt())
    }

    pub(crate) fn log_summary(&self) {
        if self.is_noop() {
            tracing::info!("all projects are in sync");
            return;
        }
        let counts = self.counts();
        let elapsed = self.finished_at - self.started_at;
        tracing::info!(
            created = counts.created,
            adopted = counts.adopted,
            synced = counts.synced,
            unchanged = counts.unchanged,
            planned = counts.planned,
            failed = counts.failed,
            elapsed_ms = elapsed.num_milliseconds(),
            dry_run = self.dry_run,
            "reconciliation pass complete"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(outcomes: Vec<ProjectOutcome>) -> RunReport {
        let now = Utc::now();
        RunReport {
            started_at: now,
            finished_at: now,
            dry_run: false,
            branch: "main".to_string(),
            state: BranchState::InSync,
            before: Revision::from("a"),
            after: Revision::from("a"),
            changes: ChangeSet::new(),
            duplicates: Vec::new(),
            projects: outcomes
                .into_iter()
                .enumerate()
                .map(|(i, outcome)| ProjectReport {
                    name: ProjectName::from(format!("p{i}")),
                    outcome,
                })
                .collect(),
        }
    }

    fn failed(stage: FailureStage) -> ProjectOutcome {
        ProjectOutcome::Failed {
            stage,
            error: "boom".to_string(),
        }
    }

    #[test]
    fn counts_failed_start_as_failure() {
        let r = report(vec![
            ProjectOutcome::Created {
                id: RemoteProjectId::from("1"),
                start: StartOutcome::Failed,
            },
            ProjectOutcome::Created {
                id: RemoteProjectId::from("2"),
                start: StartOutcome::RedeployedAfterStartFailure,
            },
            ProjectOutcome::Unchanged,
        ]);
        let counts = r.counts();
        assert_eq!(counts.failed, 1);
        assert_eq!(counts.created, 1);
        assert_eq!(counts.unchanged, 1);
        assert!(!r.all_failed());
    }

    #[test]
    fn all_failed_requires_an_attempt() {
        assert!(!report(vec![ProjectOutcome::Unchanged]).all_failed());
        assert!(!report(vec![]).all_failed());
        assert!(
            report(vec![failed(FailureStage::Create), failed(FailureStage::Redeploy)]).all_failed()
        );
        assert!(
            report(vec![failed(FailureStage::ReadManifest), ProjectOutcome::Unchanged])
                .all_failed()
        );
    }

    #[test]
    fn noop_ignores_adoption() {
        let r = report(vec![
            ProjectOutcome::Unchanged,
            ProjectOutcome::Adopted {
                ids: vec![RemoteProjectId::from("1")],
            },
        ]);
        assert!(r.is_noop());
        assert!(!report(vec![ProjectOutcome::WouldCreate]).is_noop());
    }
}
