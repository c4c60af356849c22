//! Worktree discovery for `wtenv-detector`.
//!
//! `discover(dir)` asks git for the top-level directory of the worktree that
//! contains `dir`, canonicalizes it, and derives a sanitized label from its
//! final path component. Each linked worktree of a repository has its own
//! top level, so every checkout gets its own registry key.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A discovered git worktree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worktree {
    /// Canonical absolute path of the worktree root.
    pub root: PathBuf,
    /// Sanitized label (`[a-z0-9_]+`) used in templates and status output.
    pub name: String,
}

/// Errors from worktree discovery.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("not a git repository: {path}")]
    NotAGitRepo { path: PathBuf },

    #[error("failed to run git in {path}: {source}")]
    Git {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Locate the worktree containing `dir` and derive its label.
pub fn discover(dir: &Path) -> Result<Worktree, DetectError> {
    let root = repo_root(dir)?;
    let name = sanitize_name(&worktree_name(&root));
    tracing::debug!(root = %root.display(), name = %name, "discovered worktree");
    Ok(Worktree { root, name })
}

/// Canonical top-level directory of the git worktree containing `dir`.
///
/// Returns `DetectError::NotAGitRepo` when git reports `dir` is outside any
/// repository, and `DetectError::Git` when git itself cannot be run.
pub fn repo_root(dir: &Path) -> Result<PathBuf, DetectError> {
    let output = Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .current_dir(dir)
        .output()
        .map_err(|source| DetectError::Git {
            path: dir.to_path_buf(),
            source,
        })?;

    if !output.status.success() {
        return Err(DetectError::NotAGitRepo {
            path: dir.to_path_buf(),
        });
    }

    let top = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if top.is_empty() {
        return Err(DetectError::NotAGitRepo {
            path: dir.to_path_buf(),
        });
    }
    let top = PathBuf::from(top);
    top.canonicalize()
        .map_err(|source| DetectError::Io { path: top, source })
}

/// Final path component of `path`, or the empty string for `/`.
pub fn worktree_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Lowercase, map every char outside `[a-z0-9]` to `_`, collapse runs of
/// `_`, and trim `_` from both ends.
pub fn sanitize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars().flat_map(char::to_lowercase) {
        let c = if c.is_ascii_lowercase() || c.is_ascii_digit() { c } else { '_' };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }
    out.trim_matches('_').to_string()
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
