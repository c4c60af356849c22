//! `worktree-env release`

use anyhow::{Context, Result};
use clap::Args;

use wtenv_core::RegistryPaths;

use super::current_worktree;

/// Release the current worktree's allocation.
#[derive(Args, Debug)]
pub struct ReleaseArgs {}

impl ReleaseArgs {
    pub fn run(self, paths: &RegistryPaths) -> Result<()> {
        let worktree = current_worktree()?;
        let report = wtenv_sync::release(paths, &worktree.root)
            .with_context(|| format!("failed to release '{}'", worktree.root.display()))?;

        if !report.released {
            println!("No allocation found for this worktree.");
            return Ok(());
        }
        println!(
            "✓ Released '{}' from project '{}'",
            worktree.name, report.project
        );
        if let Some(envrc) = report.envrc_removed {
            println!("  Removed: {}", envrc.display());
        }
        Ok(())
    }
}
