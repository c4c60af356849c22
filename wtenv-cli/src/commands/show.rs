//! `worktree-env show`

use anyhow::Result;
use clap::Args;

use wtenv_core::RegistryPaths;

use super::current_worktree;

/// Print the current worktree's allocated values.
#[derive(Args, Debug)]
pub struct ShowArgs {}

impl ShowArgs {
    pub fn run(self, paths: &RegistryPaths) -> Result<()> {
        let worktree = current_worktree()?;
        for (key, value) in wtenv_sync::show(paths, &worktree.root)? {
            println!("{key}={value}");
        }
        Ok(())
    }
}
