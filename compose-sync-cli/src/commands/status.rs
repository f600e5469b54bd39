//! `compose-sync status`: read-only view of the checkout and the remote.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use compose_sync_core::{config::GIT_REMOTE, Config};
use compose_sync_engine::{inspect, Action, Inspection};
use tabled::{settings::Style, Table, Tabled};

use super::{git_backend, remote_client};

/// Arguments for `compose-sync status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    pub fn run(self, config: &Config) -> Result<()> {
        let git = git_backend(config);
        let remote = remote_client(config);
        let view = inspect(&config.repo_path, &git, &remote, GIT_REMOTE)
            .context("failed to inspect repository")?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&view).context("failed to serialize status JSON")?
            );
            return Ok(());
        }
        print_table(&view);
        Ok(())
    }
}

#[derive(Tabled)]
struct StatusTableRow {
    #[tabled(rename = "project")]
    project: String,
    #[tabled(rename = "manifest")]
    manifest: String,
    #[tabled(rename = "remote id")]
    remote_id: String,
    #[tabled(rename = "next run")]
    action: String,
}

fn print_table(view: &Inspection) {
    let dirty = if view.dirty { "dirty".red() } else { "clean".green() };
    println!(
        "compose-sync v{} | {} | {} | ahead {} | behind {} | {}",
        env!("CARGO_PKG_VERSION"),
        view.branch.as_str().bold(),
        state_label(view.state),
        view.ahead,
        view.behind,
        dirty,
    );
    if let Some(err) = &view.remote_error {
        println!("{} {err}", "remote unavailable:".red().bold());
    }
    if view.projects.is_empty() {
        println!("No projects found.");
        return;
    }

    let rows: Vec<StatusTableRow> = view
        .projects
        .iter()
        .map(|p| {
            let ids: Vec<&str> = p.remote_ids.iter().map(|id| id.as_str()).collect();
            let remote_id = match ids.as_slice() {
                [] => "-".to_string(),
                [id] => id.to_string(),
                many => format!("{} (duplicate)", many.join(", ")),
            };
            StatusTableRow {
                project: p.name.to_string(),
                manifest: p.manifest.clone(),
                remote_id,
                action: action_label(p.action),
            }
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}

fn state_label(state: &str) -> String {
    match state {
        "in-sync" => state.green().to_string(),
        "behind" => state.yellow().to_string(),
        _ => state.red().to_string(),
    }
}

fn action_label(action: Action) -> String {
    match action {
        Action::Create => action.as_str().yellow().to_string(),
        Action::Sync => action.as_str().cyan().to_string(),
        Action::Unchanged => action.as_str().bright_black().to_string(),
    }
}
