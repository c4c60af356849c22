//! worktree-env core library: allocation registry, locked sessions, port
//! allocation and reconciliation, configuration.
//!
//! Public API surface:
//! - [`types`]: newtypes and the persisted `Registry` / `Allocation` records
//! - [`error`]: [`RegistryError`], [`ConfigError`]
//! - [`registry`]: in-memory store primitives + atomic load / save
//! - [`session`]: [`LockedRegistry`], the only way to reach the registry file
//! - [`ports`]: first-fit [`allocate`]
//! - [`reconcile`]: per-worktree [`reconcile_ports`]
//! - [`gc`]: [`collect_stale`]
//! - [`config`], [`paths`]: config files and storage locations

pub mod config;
pub mod error;
pub mod gc;
pub mod paths;
pub mod ports;
pub mod reconcile;
pub mod registry;
pub mod session;
pub mod types;

pub use config::{GlobalConfig, ProjectConfig};
pub use error::{ConfigError, RegistryError};
pub use gc::{collect_stale, StaleEntry};
pub use paths::RegistryPaths;
pub use ports::allocate;
pub use reconcile::reconcile_ports;
pub use session::LockedRegistry;
pub use types::{Allocation, PortMap, PortRange, ProjectEntries, ProjectName, Registry, RoleName};
