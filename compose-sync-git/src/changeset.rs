//! Change-set detection between two revisions.

use std::path::Path;

use compose_sync_core::{is_manifest_filename, ChangeSet, ProjectName, Revision};

use crate::backend::GitBackend;
use crate::error::GitError;

/// Project names whose manifest differs between `old` and `new`.
///
/// Identical revisions short-circuit to an empty set without running git.
pub fn detect_changes<G: GitBackend>(
    git: &G,
    old: &Revision,
    new: &Revision,
) -> Result<ChangeSet, GitError> {
    if old == new {
        return Ok(ChangeSet::new());
    }

    let files = git.diff_name_only(old, new)?;
    tracing::info!(count = files.len(), "detected changed files");

    let mut changes = ChangeSet::new();
    for file in &files {
        tracing::debug!(file = %file, "changed file");
        if let Some(project) = project_for_path(file) {
            if changes.insert(project.clone()) {
                tracing::info!(%project, "detected change in project");
            }
        }
    }
    Ok(changes)
}

/// Map a repository-relative path to its project, if it is a manifest.
///
/// The project is the base name of the manifest's immediate parent directory.
/// A manifest at the repository root belongs to no project.
pub fn project_for_path(file: &str) -> Option<ProjectName> {
    let path = Path::new(file);
    let file_name = path.file_name()?.to_str()?;
    if !is_manifest_filename(file_name) {
        return None;
    }
    let parent = path.parent()?.file_name()?.to_str()?;
    Some(ProjectName::from(parent))
}
