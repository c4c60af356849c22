//! # wtenv-sync
//!
//! Worktree operations: [`init`], [`show`], [`release`], [`status`], [`gc`].
//!
//! Every operation runs one locked registry session and then, for `init` and
//! `release`, brings the worktree's `.envrc` in line with what was committed.

pub mod direnv;
pub mod error;
pub mod pipeline;
pub mod writer;

pub use direnv::DirenvStatus;
pub use error::SyncError;
pub use pipeline::{
    gc, init, release, show, status, InitOptions, InitReport, ReleaseReport, StatusRow,
};
pub use writer::WriteResult;
