//! The narrow VCS interface and its subprocess implementation.

use std::path::{Path, PathBuf};
use std::process::Command;

use compose_sync_core::Revision;

use crate::auth::GitInvocation;
use crate::error::GitError;

/// Everything the synchronizer and change-set detector need from git.
pub trait GitBackend {
    /// `git fetch <remote> [<branch>]`.
    fn fetch(&self, remote: &str, branch: Option<&str>) -> Result<(), GitError>;

    /// Name of the checked-out branch.
    fn current_branch(&self) -> Result<String, GitError>;

    /// Resolve `rev` to a commit identifier.
    fn rev_parse(&self, rev: &str) -> Result<Revision, GitError>;

    /// `(ahead, behind)` of `HEAD` relative to `upstream`.
    fn ahead_behind(&self, upstream: &str) -> Result<(usize, usize), GitError>;

    /// Whether the working tree has staged, unstaged or untracked changes.
    fn is_dirty(&self) -> Result<bool, GitError>;

    /// `git reset --hard <target>`.
    fn reset_hard(&self, target: &str) -> Result<(), GitError>;

    /// Remove untracked files and directories except those matching `excludes`.
    fn clean(&self, excludes: &[String]) -> Result<(), GitError>;

    /// Paths that differ between two revisions.
    fn diff_name_only(&self, old: &Revision, new: &Revision) -> Result<Vec<String>, GitError>;
}

/// [`GitBackend`] that shells out to the `git` binary inside a checkout.
#[derive(Debug, Clone)]
pub struct CommandGit {
    repo: PathBuf,
    invocation: GitInvocation,
}

impl CommandGit {
    pub fn new(repo: impl Into<PathBuf>, invocation: GitInvocation) -> Self {
        Self {
            repo: repo.into(),
            invocation,
        }
    }

    pub fn repo(&self) -> &Path {
        &self.repo
    }

    /// Run `git <args>` and return trimmed stdout.
    fn run(&self, args: &[&str]) -> Result<String, GitError> {
        let command = format!("git {}", args.join(" "));
        tracing::debug!(%command, "running git");

        let output = Command::new("git")
            .current_dir(&self.repo)
            .args(&self.invocation.config_args)
            .args(args)
            .envs(self.invocation.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .output()
            .map_err(|source| GitError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(GitError::Failed {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl GitBackend for CommandGit {
    fn fetch(&self, remote: &str, branch: Option<&str>) -> Result<(), GitError> {
        match branch {
            Some(branch) => self.run(&["fetch", remote, branch]),
            None => self.run(&["fetch", remote]),
        }
        .map(|_| ())
    }

    fn current_branch(&self) -> Result<String, GitError> {
        self.run(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    fn rev_parse(&self, rev: &str) -> Result<Revision, GitError> {
        self.run(&["rev-parse", rev]).map(Revision)
    }

    fn ahead_behind(&self, upstream: &str) -> Result<(usize, usize), GitError> {
        let range = format!("{upstream}...HEAD");
        let output = self.run(&["rev-list", "--left-right", "--count", &range])?;
        parse_left_right(&output).ok_or_else(|| GitError::Parse {
            command: format!("git rev-list --left-right --count {range}"),
            output,
        })
    }

    fn is_dirty(&self) -> Result<bool, GitError> {
        self.run(&["status", "--porcelain"])
            .map(|output| !output.is_empty())
    }

    fn reset_hard(&self, target: &str) -> Result<(), GitError> {
        self.run(&["reset", "--hard", target]).map(|_| ())
    }

    fn clean(&self, excludes: &[String]) -> Result<(), GitError> {
        let mut args = vec!["clean", "-fd"];
        for pattern in excludes {
            args.push("-e");
            args.push(pattern.as_str());
        }
        self.run(&args).map(|_| ())
    }

    fn diff_name_only(&self, old: &Revision, new: &Revision) -> Result<Vec<String>, GitError> {
        let output = self.run(&["diff", "--name-only", &old.0, &new.0])?;
        Ok(output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

/// Parse `rev-list --left-right --count <upstream>...HEAD` output.
///
/// The left count is commits only on the upstream (behind), the right count
/// commits only on `HEAD` (ahead). Returns `(ahead, behind)`.
fn parse_left_right(output: &str) -> Option<(usize, usize)> {
    let mut fields = output.split_whitespace();
    let behind = fields.next()?.parse().ok()?;
    let ahead = fields.next()?.parse().ok()?;
    if fields.next().is_some() {
        return None;
    }
    Some((ahead, behind))
}
