pub mod gc;
pub mod init;
pub mod release;
pub mod show;
pub mod status;

use anyhow::{Context, Result};

use wtenv_detector::Worktree;

/// The git worktree containing the current directory.
pub(crate) fn current_worktree() -> Result<Worktree> {
    let cwd = std::env::current_dir().context("cannot read current directory")?;
    wtenv_detector::discover(&cwd)
        .context("worktree-env must be run inside a git repository or worktree")
}
