//! Disk inventory scanning for `compose-sync-detector`.
//!
//! `scan_projects(root)` enumerates the immediate subdirectories of the
//! repository root and keeps those containing a manifest. Manifest lookup is
//! ordered: the first filename in [`MANIFEST_FILENAMES`] that exists wins and
//! is the file read everywhere downstream.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use compose_sync_core::{ProjectName, ENV_FILENAME, MANIFEST_FILENAMES};
use thiserror::Error;

/// Directory reserved for the tool's own installation files.
pub const RESERVED_DIR: &str = "syncTool";

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A project candidate discovered on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskProject {
    pub name: ProjectName,
    /// Absolute or root-relative path of the project directory.
    pub dir: PathBuf,
    /// The highest-priority manifest present in `dir`.
    pub manifest: PathBuf,
}

/// Contents a project submits to the remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFiles {
    pub compose: String,
    /// `None` when the project has no `.env` file.
    pub env: Option<String>,
}

/// Errors from disk scanning.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to read projects directory {path}: {source}")]
    ReadRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read manifest {path}: {source}")]
    ReadManifest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// List every project directory under `root`, sorted by name.
///
/// Hidden directories, [`RESERVED_DIR`], directories without a manifest and
/// names that are not valid remote identifiers are skipped.
pub fn scan_projects(root: &Path) -> Result<Vec<DiskProject>, ScanError> {
    let entries = fs::read_dir(root).map_err(|source| ScanError::ReadRoot {
        path: root.to_path_buf(),
        source,
    })?;

    let mut projects = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable directory entry");
                continue;
            }
        };
        if !entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            continue;
        }

        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            tracing::warn!(path = %entry.path().display(), "skipping non UTF-8 directory name");
            continue;
        };
        if name.starts_with('.') || name == RESERVED_DIR {
            continue;
        }

        let dir = entry.path();
        let Some(manifest) = find_manifest(&dir) else {
            continue;
        };

        let name = ProjectName::from(name);
        if !name.is_valid_identifier() {
            tracing::warn!(project = %name, "directory name is not a valid project name, skipping");
            continue;
        }
        projects.push(DiskProject {
            name,
            dir,
            manifest,
        });
    }

    projects.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(projects)
}

/// Return the highest-priority manifest directly inside `dir`.
pub fn find_manifest(dir: &Path) -> Option<PathBuf> {
    MANIFEST_FILENAMES
        .iter()
        .map(|file| dir.join(file))
        .find(|path| path.is_file())
}

impl DiskProject {
    /// Read the manifest and the optional `.env` file.
    ///
    /// Both are read as bytes and decoded lossily, so invalid UTF-8 becomes
    /// U+FFFD rather than failing the project. A missing or unreadable
    /// `.env` is not an error.
    pub fn read_files(&self) -> Result<ProjectFiles, ScanError> {
        let compose = read_lossy(&self.manifest).map_err(|source| ScanError::ReadManifest {
            path: self.manifest.clone(),
            source,
        })?;

        let env_path = self.dir.join(ENV_FILENAME);
        let env = match read_lossy(&env_path) {
            Ok(content) => Some(content),
            Err(err) if err.kind() == ErrorKind::NotFound => None,
            Err(err) => {
                tracing::warn!(
                    path = %env_path.display(),
                    error = %err,
                    "ignoring unreadable env file"
                );
                None
            }
        };

        Ok(ProjectFiles { compose, env })
    }
}

fn read_lossy(path: &Path) -> std::io::Result<String> {
    fs::read(path).map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
}
