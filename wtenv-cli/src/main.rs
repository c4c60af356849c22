//! worktree-env: per-worktree port and environment allocation.
//!
//! # Usage
//!
//! ```text
//! worktree-env [--config-dir DIR] init [--no-direnv]
//! worktree-env [--config-dir DIR] show
//! worktree-env [--config-dir DIR] release
//! worktree-env [--config-dir DIR] status [--all] [--json]
//! worktree-env [--config-dir DIR] gc
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use commands::{
    gc::GcArgs, init::InitArgs, release::ReleaseArgs, show::ShowArgs, status::StatusArgs,
};
use wtenv_core::paths::CONFIG_DIR_ENV;
use wtenv_core::RegistryPaths;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "worktree-env",
    version,
    about = "Allocate unique ports and environment values for each git worktree",
    long_about = None,
)]
struct Cli {
    /// Directory holding registry.json, registry.lock and config.toml
    /// (default: ~/.config/worktree-env).
    #[arg(long, global = true, env = CONFIG_DIR_ENV, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Allocate ports for the current worktree and write its .envrc.
    Init(InitArgs),

    /// Print the current worktree's allocated values as KEY=VALUE lines.
    Show(ShowArgs),

    /// Release the current worktree's ports and remove its .envrc.
    Release(ReleaseArgs),

    /// List allocations for the current project (or every project).
    Status(StatusArgs),

    /// Remove allocations whose worktree directory no longer exists.
    Gc(GcArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let paths = match cli.config_dir {
        Some(dir) => RegistryPaths::new(dir),
        None => RegistryPaths::default_location().context("could not determine config directory")?,
    };
    tracing::debug!(config_dir = %paths.root().display(), "using config directory");

    match cli.command {
        Commands::Init(args) => args.run(&paths),
        Commands::Show(args) => args.run(&paths),
        Commands::Release(args) => args.run(&paths),
        Commands::Status(args) => args.run(&paths),
        Commands::Gc(args) => args.run(&paths),
    }
}

/// Logs go to stderr so `show` and `status --json` stay machine-readable.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
