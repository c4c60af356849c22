//! `worktree-env init [--no-direnv]`

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use wtenv_core::RegistryPaths;
use wtenv_sync::{DirenvStatus, InitOptions, WriteResult};

use super::current_worktree;

/// Allocate ports for the current worktree and write its .envrc.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Do not run `direnv allow` after writing .envrc.
    #[arg(long)]
    pub no_direnv: bool,
}

impl InitArgs {
    pub fn run(self, paths: &RegistryPaths) -> Result<()> {
        let worktree = current_worktree()?;
        let opts = InitOptions {
            direnv: !self.no_direnv,
        };
        let report = wtenv_sync::init(paths, &worktree, opts)
            .with_context(|| format!("failed to init '{}'", worktree.root.display()))?;

        if !report.pruned.is_empty() {
            println!("Pruned {} stale entries.", report.pruned.len());
        }

        let envrc_state = match &report.envrc {
            WriteResult::Written { .. } => "written".green(),
            WriteResult::Unchanged { .. } => "unchanged".bright_black(),
        };
        println!("{} {}", "Project: ".bold(), report.project);
        println!("{} {}", "Worktree:".bold(), report.worktree);
        println!("{} {} ({envrc_state})", "Envrc:   ".bold(), report.envrc.path().display());

        if !report.ports.is_empty() {
            println!("{}", "Ports:".bold());
            for (role, port) in &report.ports {
                println!("  {role}={port}");
            }
        }
        if !report.env.is_empty() {
            println!("{}", "Env:".bold());
            for (name, value) in &report.env {
                println!("  {name}={value}");
            }
        }

        match report.direnv {
            DirenvStatus::Allowed | DirenvStatus::Skipped => {}
            DirenvStatus::NotInstalled => eprintln!(
                "{} direnv not found; run `direnv allow` in {} to load the environment",
                "warning:".yellow().bold(),
                report.root.display()
            ),
            DirenvStatus::Failed { message } => eprintln!(
                "{} `direnv allow` failed: {message}",
                "warning:".yellow().bold()
            ),
        }
        Ok(())
    }
}
