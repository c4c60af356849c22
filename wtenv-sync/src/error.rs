//! Error types for wtenv-sync.

use std::path::PathBuf;

use thiserror::Error;

use wtenv_core::error::{ConfigError, RegistryError};
use wtenv_core::types::ProjectName;
use wtenv_detector::DetectError;
use wtenv_renderer::RenderError;

/// All errors that can arise from worktree operations.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("render error: {0}")]
    Render(#[from] RenderError),

    #[error("{0}")]
    Detect(#[from] DetectError),

    /// An I/O error on a worktree file, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `show` on a worktree that was never initialized (or was released).
    #[error("no allocation found for {path} in project '{project}'. Run `worktree-env init` first.")]
    AllocationNotFound { project: ProjectName, path: PathBuf },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
