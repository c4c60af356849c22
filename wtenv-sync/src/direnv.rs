//! `direnv allow` after a fresh `.envrc`.

use std::path::Path;
use std::process::Command;

/// What happened when approving the `.envrc` with direnv.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirenvStatus {
    Allowed,
    /// The `direnv` binary is not on `PATH`.
    NotInstalled,
    Failed { message: String },
    /// Disabled by the caller (`--no-direnv`).
    Skipped,
}

/// Run `direnv allow <root>`. Never fails the caller; the outcome is reported.
pub fn allow(root: &Path) -> DirenvStatus {
    let status = match Command::new("direnv").arg("allow").arg(root).output() {
        Ok(output) if output.status.success() => DirenvStatus::Allowed,
        Ok(output) => DirenvStatus::Failed {
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => DirenvStatus::NotInstalled,
        Err(e) => DirenvStatus::Failed {
            message: e.to_string(),
        },
    };
    match &status {
        DirenvStatus::Allowed => tracing::debug!(root = %root.display(), "direnv allowed"),
        DirenvStatus::NotInstalled => tracing::warn!("direnv not found on PATH; run `direnv allow` manually"),
        DirenvStatus::Failed { message } => {
            tracing::warn!(root = %root.display(), error = %message, "direnv allow failed")
        }
        DirenvStatus::Skipped => {}
    }
    status
}
