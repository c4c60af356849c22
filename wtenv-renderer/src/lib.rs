//! # wtenv-renderer
//!
//! Renders per-worktree environment values from `{placeholder}` templates and
//! produces the `.envrc` text that exports them.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use wtenv_core::types::{PortMap, ProjectName};
//! use wtenv_renderer::{Renderer, TemplateVars};
//!
//! fn db_name(ports: &PortMap) -> Option<String> {
//!     let renderer = Renderer::new().ok()?;
//!     let vars = TemplateVars::new(&ProjectName::from("myapp"), "main", ports);
//!     Some(renderer.render_template("{project}_dev_{worktree}", &vars))
//! }
//! ```

pub mod context;
pub mod engine;
pub mod envrc;
pub mod error;

pub use context::TemplateVars;
pub use engine::Renderer;
pub use envrc::{render_envrc, shell_quote, ENVRC_FILE};
pub use error::RenderError;
