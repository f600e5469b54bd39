//! The reconciliation pass and its read-only counterpart.
//!
//! A pass runs synchronize, detect, scan, list, classify and converge in
//! that order. Git and disk-root failures abort the pass. A failed remote
//! listing degrades to an empty inventory, so every disk project becomes a
//! create candidate guarded by the exact-name lookup.

use std::path::Path;

use chrono::Utc;
use compose_sync_core::{ChangeSet, ProjectName, RemoteProject, RemoteProjectId};
use compose_sync_detector::scan_projects;
use compose_sync_git::{detect_changes, BranchState, GitBackend, GitSynchronizer};
use compose_sync_remote::RemoteInventory;
use serde::Serialize;

use crate::error::EngineError;
use crate::index::RemoteIndex;
use crate::plan::{classify, plan, Action};
use crate::reconcile::Reconciler;
use crate::report::RunReport;

/// Knobs for a single pass.
#[derive(Debug, Clone)]
pub struct PassOptions {
    /// Name of the git remote whose branch is authoritative.
    pub remote_name: String,
    /// Patterns preserved when untracked files are cleaned.
    pub clean_excludes: Vec<String>,
    /// Report remote mutations instead of issuing them.
    pub dry_run: bool,
}

/// Run one reconciliation pass over the checkout at `root`.
pub fn run_pass<G, R>(
    root: &Path,
    git: &G,
    remote: &R,
    options: &PassOptions,
) -> Result<RunReport, EngineError>
where
    G: GitBackend,
    R: RemoteInventory,
{
    let started_at = Utc::now();
    tracing::info!(
        root = %root.display(),
        dry_run = options.dry_run,
        "starting reconciliation pass"
    );

    let synchronizer =
        GitSynchronizer::new(git, options.remote_name.clone(), options.clean_excludes.clone());
    let outcome = synchronizer.synchronize()?;

    let changes = if outcome.changed {
        detect_changes(git, &outcome.before, &outcome.after).unwrap_or_else(|err| {
            tracing::error!(error = %err, "failed to detect changed projects");
            ChangeSet::new()
        })
    } else {
        ChangeSet::new()
    };

    let disk = scan_projects(root)?;
    tracing::info!(count = disk.len(), "found projects on disk");

    let mut index = RemoteIndex::new(list_or_empty(remote));

    let mut reconciler = Reconciler::new(remote, options.dry_run);
    let duplicates: Vec<(ProjectName, Vec<RemoteProjectId>)> = index
        .duplicates()
        .into_iter()
        .map(|(name, ids)| (name.clone(), ids.into_iter().cloned().collect()))
        .collect();
    for (name, ids) in &duplicates {
        reconciler.report_duplicates(name, &ids.iter().collect::<Vec<_>>());
    }

    let planned = plan(disk, &index, &changes);
    let projects = reconciler.execute(&planned, &mut index);

    let report = RunReport {
        started_at,
        finished_at: Utc::now(),
        dry_run: options.dry_run,
        branch: outcome.branch,
        state: outcome.state,
        before: outcome.before,
        after: outcome.after,
        changes,
        duplicates,
        projects,
    };
    report.log_summary();
    Ok(report)
}

fn list_or_empty<R: RemoteInventory>(remote: &R) -> Vec<RemoteProject> {
    match remote.list_projects() {
        Ok(projects) => {
            tracing::info!(count = projects.len(), "listed remote projects");
            projects
        }
        Err(err) => {
            tracing::warn!(
                error = %err,
                "failed to list remote projects, treating inventory as empty"
            );
            Vec::new()
        }
    }
}

// ---------------------------------------------------------------------------
// Inspection
// ---------------------------------------------------------------------------

/// Read-only view of the checkout and how a pass would treat each project.
#[derive(Debug, Clone, Serialize)]
pub struct Inspection {
    pub branch: String,
    pub ahead: usize,
    pub behind: usize,
    pub dirty: bool,
    pub state: &'static str,
    pub projects: Vec<InspectedProject>,
    /// Set when the remote listing failed; remote ids are then unknown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InspectedProject {
    pub name: ProjectName,
    pub manifest: String,
    pub remote_ids: Vec<RemoteProjectId>,
    pub duplicate: bool,
    /// Action with an empty change-set: create or no-op.
    pub action: Action,
}

/// Fetch, then report branch state and per-project remote standing.
///
/// Nothing in the checkout or on the remote is modified.
pub fn inspect<G, R>(
    root: &Path,
    git: &G,
    remote: &R,
    remote_name: &str,
) -> Result<Inspection, EngineError>
where
    G: GitBackend,
    R: RemoteInventory,
{
    let synchronizer = GitSynchronizer::new(git, remote_name, Vec::new());
    let (branch, status) = synchronizer.inspect()?;
    let state = BranchState::classify(&status);

    let disk = scan_projects(root)?;
    let (index, remote_error) = match remote.list_projects() {
        Ok(projects) => (RemoteIndex::new(projects), None),
        Err(err) => (RemoteIndex::default(), Some(err.to_string())),
    };

    let empty = ChangeSet::new();
    let projects = disk
        .into_iter()
        .map(|project| {
            let entries = index.get(&project.name);
            InspectedProject {
                action: classify(&project.name, &index, &empty),
                manifest: project
                    .manifest
                    .file_name()
                    .map(|f| f.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                remote_ids: entries.iter().map(|p| p.id.clone()).collect(),
                duplicate: entries.len() > 1,
                name: project.name,
            }
        })
        .collect();

    Ok(Inspection {
        branch,
        ahead: status.ahead,
        behind: status.behind,
        dirty: status.dirty,
        state: state.as_str(),
        projects,
        remote_error,
    })
}
