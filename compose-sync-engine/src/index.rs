//! Remote inventory keyed by name.
//!
//! Remote names are not unique, so each name maps to every entry carrying
//! it, in listing order. Callers pick a target with [`select_preferred`].

use std::collections::BTreeMap;

use compose_sync_core::{ProjectName, RemoteProject, RemoteProjectId};

use crate::tiebreak::select_preferred;

#[derive(Debug, Clone, Default)]
pub struct RemoteIndex {
    by_name: BTreeMap<ProjectName, Vec<RemoteProject>>,
}

impl RemoteIndex {
    pub fn new(projects: Vec<RemoteProject>) -> Self {
        let mut index = Self::default();
        for project in projects {
            index.insert(project);
        }
        index
    }

    /// Append an entry after any existing entries of the same name.
    pub fn insert(&mut self, project: RemoteProject) {
        self.by_name
            .entry(project.name.clone())
            .or_default()
            .push(project);
    }

    /// Replace every entry recorded for `name`.
    pub fn replace(&mut self, name: ProjectName, projects: Vec<RemoteProject>) {
        self.by_name.insert(name, projects);
    }

    /// Entries named `name`, empty if there are none.
    pub fn get(&self, name: &ProjectName) -> &[RemoteProject] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, name: &ProjectName) -> bool {
        !self.get(name).is_empty()
    }

    /// The single entry operations on `name` should target.
    pub fn preferred(&self, name: &ProjectName) -> Option<&RemoteProject> {
        select_preferred(self.get(name))
    }

    /// Names held by more than one entry, with every id involved.
    pub fn duplicates(&self) -> Vec<(&ProjectName, Vec<&RemoteProjectId>)> {
        self.by_name
            .iter()
            .filter(|(_, entries)| entries.len() > 1)
            .map(|(name, entries)| (name, entries.iter().map(|p| &p.id).collect()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.by_name.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
