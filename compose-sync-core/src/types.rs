//! Domain types for compose-sync.
//!
//! Remote records deserialize from the orchestration API's camelCase JSON.
//! Every field is optional on the wire, so every field defaults.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Manifest filenames
// ---------------------------------------------------------------------------

/// Recognized manifest filenames, highest priority first.
pub const MANIFEST_FILENAMES: [&str; 4] = [
    "compose.yaml",
    "compose.yml",
    "docker-compose.yaml",
    "docker-compose.yml",
];

/// Optional per-project environment file.
pub const ENV_FILENAME: &str = ".env";

/// `true` if `file_name` (a base name, not a path) is a recognized manifest.
pub fn is_manifest_filename(file_name: &str) -> bool {
    MANIFEST_FILENAMES.contains(&file_name)
}

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A project name: the directory name on disk and the name on the remote.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProjectName(pub String);

impl ProjectName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this name can be used as a remote project identifier.
    ///
    /// ASCII letters, digits, `-`, `_` and `.` only; must not be empty or
    /// start with `.`.
    pub fn is_valid_identifier(&self) -> bool {
        !self.0.is_empty()
            && !self.0.starts_with('.')
            && self
                .0
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ProjectName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProjectName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Opaque identifier the remote assigns to a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RemoteProjectId(pub String);

impl RemoteProjectId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RemoteProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for RemoteProjectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RemoteProjectId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A git commit identifier as printed by `git rev-parse`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Revision(pub String);

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for Revision {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Remote records
// ---------------------------------------------------------------------------

/// A project as listed by the remote orchestration API.
///
/// Names are not unique remotely; see the engine's tie-break.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteProject {
    pub id: RemoteProjectId,
    pub name: ProjectName,
    pub status: String,
    pub status_reason: String,
    pub dir_name: String,
    pub path: String,
    pub compose_content: String,
    pub env_content: String,
    pub created_at: String,
    pub updated_at: String,
}

impl RemoteProject {
    /// Record for a project we just created, before any listing has seen it.
    pub fn created(id: RemoteProjectId, name: ProjectName) -> Self {
        Self {
            id,
            name,
            ..Self::default()
        }
    }

    /// `updatedAt`, falling back to `createdAt`; `None` if neither parses.
    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.updated_at).or_else(|| parse_timestamp(&self.created_at))
    }
}

/// Parse an RFC 3339 timestamp with optional fractional seconds.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

// ---------------------------------------------------------------------------
// Change-set
// ---------------------------------------------------------------------------

/// Project names whose manifest differs between two revisions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet(BTreeSet<ProjectName>);

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the name was already present.
    pub fn insert(&mut self, name: ProjectName) -> bool {
        self.0.insert(name)
    }

    pub fn contains(&self, name: &ProjectName) -> bool {
        self.0.contains(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProjectName> {
        self.0.iter()
    }
}

impl FromIterator<ProjectName> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = ProjectName>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
