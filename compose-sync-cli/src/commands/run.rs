//! `compose-sync run`: one reconciliation pass.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::{Color, Colorize};
use compose_sync_core::{config::GIT_REMOTE, Config};
use compose_sync_engine::{run_pass, PassOptions, ProjectOutcome, RunReport, StartOutcome};

use super::{git_backend, remote_client};

/// Arguments for `compose-sync run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Synchronize git and report planned remote changes without making them.
    #[arg(long)]
    pub dry_run: bool,
}

impl RunArgs {
    pub fn run(self, config: &Config) -> Result<()> {
        tracing::info!(
            repo = %config.repo_path.display(),
            base_url = %config.base_url,
            env_id = %config.env_id,
            git_auth = config.git_auth.method(),
            "starting compose-sync"
        );

        let git = git_backend(config);
        let remote = remote_client(config);
        let options = PassOptions {
            remote_name: GIT_REMOTE.to_string(),
            clean_excludes: config.clean_excludes.clone(),
            dry_run: self.dry_run,
        };

        let report = run_pass(&config.repo_path, &git, &remote, &options)
            .context("reconciliation pass failed")?;
        print_report(&report);

        if report.all_failed() {
            bail!(
                "all {} attempted projects failed",
                report.counts().attempted()
            );
        }
        Ok(())
    }
}

fn print_report(report: &RunReport) {
    let prefix = if report.dry_run { "[dry-run] " } else { "" };
    if report.is_noop() {
        println!("{prefix}✓ all projects are in sync ({} on {})", report.after, report.branch);
        return;
    }

    let counts = report.counts();
    println!(
        "{prefix}✓ {} created, {} adopted, {} synced, {} planned, {} unchanged, {} failed",
        counts.created,
        counts.adopted,
        counts.synced,
        counts.planned,
        counts.unchanged,
        counts.failed
    );
    for project in &report.projects {
        let name = &project.name;
        let (line, color) = match &project.outcome {
            ProjectOutcome::Unchanged => continue,
            ProjectOutcome::Created { id, start } => match start {
                StartOutcome::Started => (format!("  +  {name} ({id})"), Some(Color::Green)),
                StartOutcome::RedeployedAfterStartFailure => (
                    format!("  +  {name} ({id}, redeployed after failed start)"),
                    Some(Color::Yellow),
                ),
                StartOutcome::Failed => (
                    format!("  ✗  {name} ({id}, created but failed to start)"),
                    Some(Color::Red),
                ),
            },
            ProjectOutcome::Adopted { ids } => {
                let ids: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
                (
                    format!("  =  {name} (already exists: {})", ids.join(", ")),
                    Some(Color::Yellow),
                )
            }
            ProjectOutcome::Synced { id, updated: true } => {
                (format!("  ✎  {name} ({id})"), Some(Color::Green))
            }
            ProjectOutcome::Synced { id, updated: false } => (
                format!("  ✎  {name} ({id}, redeployed without update)"),
                Some(Color::Yellow),
            ),
            ProjectOutcome::WouldCreate => (format!("  ~  {name} (create)"), None),
            ProjectOutcome::WouldSync { id } => {
                (format!("  ~  {name} (update + redeploy {id})"), None)
            }
            ProjectOutcome::Failed { stage, error } => (
                format!("  ✗  {name} ({} failed: {error})", stage.as_str()),
                Some(Color::Red),
            ),
        };
        match color {
            Some(color) => println!("{}", line.as_str().color(color)),
            None => println!("{line}"),
        }
    }
}
