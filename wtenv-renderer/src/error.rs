//! Error types for wtenv-renderer.

use thiserror::Error;

/// All errors that can arise from template rendering operations.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The placeholder pattern failed to compile.
    #[error("template pattern error: {0}")]
    Pattern(#[from] regex::Error),
}
