//! Classification of disk projects into create, sync or no-op.

use compose_sync_core::{ChangeSet, ProjectName};
use compose_sync_detector::DiskProject;
use serde::Serialize;

use crate::index::RemoteIndex;

/// What a pass does with one disk project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    /// No remote entry carries the name.
    Create,
    /// The name exists remotely and its manifest changed.
    Sync,
    /// The name exists remotely and nothing changed.
    Unchanged,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Sync => "sync",
            Action::Unchanged => "no-op",
        }
    }
}

pub fn classify(name: &ProjectName, index: &RemoteIndex, changes: &ChangeSet) -> Action {
    if !index.contains(name) {
        Action::Create
    } else if changes.contains(name) {
        Action::Sync
    } else {
        Action::Unchanged
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedProject {
    pub project: DiskProject,
    pub action: Action,
}

/// Classify every disk project, keeping scan order.
pub fn plan(
    disk: Vec<DiskProject>,
    index: &RemoteIndex,
    changes: &ChangeSet,
) -> Vec<PlannedProject> {
    disk.into_iter()
        .map(|project| {
            let action = classify(&project.name, index, changes);
            PlannedProject { project, action }
        })
        .collect()
}
