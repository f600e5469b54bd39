//! Converging the remote inventory to the disk inventory.
//!
//! Create path: an exact-name lookup guards against stale listings. Entries
//! found there are adopted instead of creating a second copy. Otherwise the
//! project is created and started, with one redeploy as the fallback when
//! start fails.
//!
//! Sync path: one target is chosen among same-named entries, updated
//! best-effort, then redeployed. A failed update does not block the redeploy.
//!
//! Nothing here returns an error; each failure becomes that project's outcome.

use std::collections::BTreeSet;

use compose_sync_core::{ProjectName, RemoteProject, RemoteProjectId};
use compose_sync_detector::{DiskProject, ProjectFiles};
use compose_sync_remote::{NewProject, ProjectUpdate, RemoteInventory};

use crate::index::RemoteIndex;
use crate::plan::{Action, PlannedProject};
use crate::report::{FailureStage, ProjectOutcome, ProjectReport, StartOutcome};

pub struct Reconciler<'a, R: RemoteInventory> {
    remote: &'a R,
    dry_run: bool,
    /// Names whose duplicates were already reported this pass.
    reported: BTreeSet<ProjectName>,
}

impl<'a, R: RemoteInventory> Reconciler<'a, R> {
    pub fn new(remote: &'a R, dry_run: bool) -> Self {
        Self {
            remote,
            dry_run,
            reported: BTreeSet::new(),
        }
    }

    /// Warn once per pass about a name held by several remote entries.
    ///
    /// Returns whether a warning was emitted.
    pub fn report_duplicates(&mut self, name: &ProjectName, ids: &[&RemoteProjectId]) -> bool {
        if ids.len() < 2 || !self.reported.insert(name.clone()) {
            return false;
        }
        let count = ids.len();
        let ids = ids.iter().map(|id| id.as_str()).collect::<Vec<_>>().join(", ");
        tracing::warn!(
            project = %name,
            count,
            ids = %ids,
            "duplicate remote projects share this name; clean up manually"
        );
        true
    }

    /// Carry out every planned action in order.
    pub fn execute(
        &mut self,
        planned: &[PlannedProject],
        index: &mut RemoteIndex,
    ) -> Vec<ProjectReport> {
        planned
            .iter()
            .map(|entry| {
                let outcome = match entry.action {
                    Action::Create => self.create(&entry.project, index),
                    Action::Sync => self.sync(&entry.project, index),
                    Action::Unchanged => ProjectOutcome::Unchanged,
                };
                ProjectReport {
                    name: entry.project.name.clone(),
                    outcome,
                }
            })
            .collect()
    }

    fn create(&mut self, project: &DiskProject, index: &mut RemoteIndex) -> ProjectOutcome {
        let name = &project.name;

        match self.remote.find_projects_by_name(name) {
            Ok(found) if !found.is_empty() => {
                let ids: Vec<RemoteProjectId> = found.iter().map(|p| p.id.clone()).collect();
                tracing::warn!(
                    project = %name,
                    ids = ?ids.iter().map(RemoteProjectId::as_str).collect::<Vec<_>>(),
                    "project already exists remotely, skipping create"
                );
                self.report_duplicates(name, &ids.iter().collect::<Vec<_>>());
                index.replace(name.clone(), found);
                return ProjectOutcome::Adopted { ids };
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(
                    project = %name,
                    error = %err,
                    "exact-name lookup failed, creating anyway"
                );
            }
        }

        let files = match read_files(project) {
            Ok(files) => files,
            Err(outcome) => return outcome,
        };

        if self.dry_run {
            tracing::info!(project = %name, "[dry-run] would create project");
            return ProjectOutcome::WouldCreate;
        }

        tracing::info!(project = %name, manifest = %project.manifest.display(), "creating project");
        let request = NewProject::new(name.clone(), files.compose, files.env);
        let id = match self.remote.create_project(&request) {
            Ok(id) => id,
            Err(err) => {
                tracing::error!(project = %name, error = %err, "failed to create project");
                return ProjectOutcome::Failed {
                    stage: FailureStage::Create,
                    error: err.to_string(),
                };
            }
        };
        tracing::info!(project = %name, %id, "created project");
        index.insert(RemoteProject::created(id.clone(), name.clone()));

        let start = self.start(name, &id);
        ProjectOutcome::Created { id, start }
    }

    fn start(&self, name: &ProjectName, id: &RemoteProjectId) -> StartOutcome {
        let err = match self.remote.start_project(id) {
            Ok(()) => {
                tracing::info!(project = %name, %id, "started project");
                return StartOutcome::Started;
            }
            Err(err) => err,
        };
        tracing::warn!(
            project = %name,
            %id,
            error = %err,
            "failed to start project, trying redeploy"
        );

        match self.remote.redeploy_project(id) {
            Ok(()) => {
                tracing::info!(project = %name, %id, "redeployed project after failed start");
                StartOutcome::RedeployedAfterStartFailure
            }
            Err(err) => {
                tracing::error!(
                    project = %name,
                    %id,
                    error = %err,
                    "failed to redeploy project after failed start"
                );
                StartOutcome::Failed
            }
        }
    }

    fn sync(&mut self, project: &DiskProject, index: &mut RemoteIndex) -> ProjectOutcome {
        let name = &project.name;
        let Some(target) = index.preferred(name) else {
            return self.create(project, index);
        };
        let id = target.id.clone();

        let files = match read_files(project) {
            Ok(files) => files,
            Err(outcome) => return outcome,
        };

        if self.dry_run {
            tracing::info!(project = %name, %id, "[dry-run] would update and redeploy project");
            return ProjectOutcome::WouldSync { id };
        }

        tracing::info!(project = %name, %id, "syncing project");
        let update = ProjectUpdate::new(Some(files.compose), files.env);
        let updated = if update.is_empty() {
            false
        } else {
            match self.remote.update_project(&id, &update) {
                Ok(()) => true,
                Err(err) => {
                    tracing::warn!(
                        project = %name,
                        %id,
                        error = %err,
                        "failed to update project, redeploying anyway"
                    );
                    false
                }
            }
        };

        match self.remote.redeploy_project(&id) {
            Ok(()) => {
                tracing::info!(project = %name, %id, updated, "redeployed project");
                ProjectOutcome::Synced { id, updated }
            }
            Err(err) => {
                tracing::error!(project = %name, %id, error = %err, "failed to redeploy project");
                ProjectOutcome::Failed {
                    stage: FailureStage::Redeploy,
                    error: err.to_string(),
                }
            }
        }
    }
}

fn read_files(project: &DiskProject) -> Result<ProjectFiles, ProjectOutcome> {
    project.read_files().map_err(|err| {
        tracing::error!(project = %project.name, error = %err, "failed to read manifest");
        ProjectOutcome::Failed {
            stage: FailureStage::ReadManifest,
            error: err.to_string(),
        }
    })
}
