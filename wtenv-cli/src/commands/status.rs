//! `worktree-env status [--all] [--json]`

use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use wtenv_core::config::load_project_config;
use wtenv_core::RegistryPaths;
use wtenv_sync::StatusRow;

use super::current_worktree;

/// Arguments for `worktree-env status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// List every project, not only the one owning the current worktree.
    #[arg(long)]
    pub all: bool,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    pub fn run(self, paths: &RegistryPaths) -> Result<()> {
        let project = if self.all {
            None
        } else {
            let worktree = current_worktree()?;
            let config = load_project_config(&worktree.root)
                .context("cannot determine the current project; use --all to list every project")?;
            Some(config.name)
        };

        let rows = wtenv_sync::status(paths, project.as_ref())
            .context("failed to read registry")?;
        if self.json {
            return print_json(rows);
        }
        print_table(rows);
        Ok(())
    }
}

#[derive(Serialize)]
struct StatusReportJson {
    summary: StatusSummaryJson,
    worktrees: Vec<WorktreeStatusJson>,
}

#[derive(Serialize)]
struct StatusSummaryJson {
    projects: usize,
    worktrees: usize,
    missing: usize,
}

#[derive(Serialize)]
struct WorktreeStatusJson {
    project: String,
    worktree: String,
    path: String,
    present: bool,
    ports: BTreeMap<String, u16>,
    env: BTreeMap<String, String>,
}

#[derive(Tabled)]
struct StatusTableRow {
    #[tabled(rename = "worktree")]
    worktree: String,
    #[tabled(rename = "ports")]
    ports: String,
    #[tabled(rename = "path")]
    path: String,
    #[tabled(rename = "state")]
    state: String,
}

fn summary(rows: &[StatusRow]) -> StatusSummaryJson {
    StatusSummaryJson {
        projects: rows.iter().map(|r| &r.project).collect::<BTreeSet<_>>().len(),
        worktrees: rows.len(),
        missing: rows.iter().filter(|r| !r.present).count(),
    }
}

fn print_json(rows: Vec<StatusRow>) -> Result<()> {
    let payload = StatusReportJson {
        summary: summary(&rows),
        worktrees: rows
            .into_iter()
            .map(|row| WorktreeStatusJson {
                project: row.project.to_string(),
                worktree: row.worktree,
                path: row.path.display().to_string(),
                present: row.present,
                ports: row
                    .ports
                    .into_iter()
                    .map(|(role, port)| (role.to_string(), port))
                    .collect(),
                env: row.env,
            })
            .collect(),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize status JSON")?
    );
    Ok(())
}

fn print_table(rows: Vec<StatusRow>) {
    let summary = summary(&rows);
    println!(
        "worktree-env v{} | {} projects | {} worktrees | {} missing",
        env!("CARGO_PKG_VERSION"),
        summary.projects,
        summary.worktrees,
        summary.missing,
    );

    if rows.is_empty() {
        println!("No allocations registered.");
        return;
    }

    let mut grouped = BTreeMap::<String, Vec<StatusRow>>::new();
    for row in rows {
        grouped.entry(row.project.to_string()).or_default().push(row);
    }

    for (project, rows) in grouped {
        println!("{}", project.bold());
        let table_rows: Vec<StatusTableRow> = rows
            .into_iter()
            .map(|row| StatusTableRow {
                ports: format_ports(&row),
                worktree: row.worktree,
                path: row.path.display().to_string(),
                state: if row.present {
                    "ok".green().to_string()
                } else {
                    "missing".red().bold().to_string()
                },
            })
            .collect();
        let mut table = Table::new(table_rows);
        table.with(Style::rounded());
        println!("{table}");
    }

    if summary.missing > 0 {
        println!("Run 'worktree-env gc' to release ports held by missing worktrees.");
    }
}

fn format_ports(row: &StatusRow) -> String {
    if row.ports.is_empty() {
        return "-".to_string();
    }
    row.ports
        .iter()
        .map(|(role, port)| format!("{role}={port}"))
        .collect::<Vec<_>>()
        .join(" ")
}
