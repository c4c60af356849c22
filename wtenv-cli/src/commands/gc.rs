//! `worktree-env gc`

use anyhow::{Context, Result};
use clap::Args;

use wtenv_core::RegistryPaths;

/// Remove allocations whose worktree directory no longer exists.
#[derive(Args, Debug)]
pub struct GcArgs {}

impl GcArgs {
    pub fn run(self, paths: &RegistryPaths) -> Result<()> {
        let removed = wtenv_sync::gc(paths).context("garbage collection failed")?;
        if removed.is_empty() {
            println!("No stale entries found.");
            return Ok(());
        }
        println!("Removed {} stale entries:", removed.len());
        for entry in &removed {
            println!("  {entry}");
        }
        Ok(())
    }
}
