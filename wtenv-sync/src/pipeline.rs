//! Worktree operations shared by every CLI command.
//!
//! Each operation opens exactly one [`LockedRegistry`] session. Files inside
//! the worktree (`.envrc`) are touched only after the session has committed,
//! so a failed session never leaves a `.envrc` that disagrees with the
//! registry.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use wtenv_core::config::{load_global_config, load_project_config};
use wtenv_core::types::{Allocation, PortMap, ProjectName};
use wtenv_core::{collect_stale, reconcile_ports, LockedRegistry, RegistryPaths, StaleEntry};
use wtenv_detector::Worktree;
use wtenv_renderer::{render_envrc, Renderer, TemplateVars, ENVRC_FILE};

use crate::direnv::{self, DirenvStatus};
use crate::error::SyncError;
use crate::writer::{remove_envrc, write_envrc, WriteResult};

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitOptions {
    /// Run `direnv allow` after writing `.envrc`.
    pub direnv: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self { direnv: true }
    }
}

/// Outcome of [`init`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub project: ProjectName,
    pub worktree: String,
    pub root: PathBuf,
    pub envrc: WriteResult,
    pub ports: PortMap,
    pub env: BTreeMap<String, String>,
    /// Stale allocations pruned at the start of the session.
    pub pruned: Vec<StaleEntry>,
    pub direnv: DirenvStatus,
}

/// Allocate (or re-allocate) ports and env for `worktree`, commit them, and
/// write `<root>/.envrc`.
///
/// Roles that survive a config change keep their ports; the whole call is
/// idempotent when nothing changed.
pub fn init(
    paths: &RegistryPaths,
    worktree: &Worktree,
    opts: InitOptions,
) -> Result<InitReport, SyncError> {
    let config = load_project_config(&worktree.root)?;
    let global = load_global_config(paths)?;
    let renderer = Renderer::new()?;
    let requested = config.requested_roles();

    let session = LockedRegistry::new(paths.clone());
    let (pruned, ports, env) = session.update(|registry| {
        let pruned = collect_stale(registry);
        let ports = reconcile_ports(
            registry,
            &config.name,
            &worktree.root,
            &requested,
            global.port_range,
        )?;
        let vars = TemplateVars::new(&config.name, &worktree.name, &ports);
        let env = renderer.render_env(&config.env, &vars);
        registry.set(
            &config.name,
            worktree.root.clone(),
            Allocation {
                worktree: worktree.name.clone(),
                ports: ports.clone(),
                env: env.clone(),
            },
        );
        Ok::<_, SyncError>((pruned, ports, env))
    })?;

    let body = render_envrc(&config.name, &worktree.name, &ports, &env);
    let envrc = write_envrc(&worktree.root.join(ENVRC_FILE), &body)?;

    let direnv = if opts.direnv {
        direnv::allow(&worktree.root)
    } else {
        DirenvStatus::Skipped
    };

    tracing::info!(
        project = %config.name,
        worktree = %worktree.name,
        ports = ports.len(),
        env = env.len(),
        pruned = pruned.len(),
        "initialized worktree"
    );

    Ok(InitReport {
        project: config.name,
        worktree: worktree.name.clone(),
        root: worktree.root.clone(),
        envrc,
        ports,
        env,
        pruned,
        direnv,
    })
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

/// Every value the worktree exports, sorted by key: ports as decimal strings,
/// then env vars (an env var shadows a port role of the same name).
pub fn show(paths: &RegistryPaths, root: &Path) -> Result<Vec<(String, String)>, SyncError> {
    let config = load_project_config(root)?;
    let allocation = LockedRegistry::new(paths.clone())
        .read(|registry| Ok::<_, SyncError>(registry.get(&config.name, root).cloned()))?
        .ok_or_else(|| SyncError::AllocationNotFound {
            project: config.name.clone(),
            path: root.to_path_buf(),
        })?;

    Ok(merged_values(&allocation).into_iter().collect())
}

fn merged_values(allocation: &Allocation) -> BTreeMap<String, String> {
    let mut values: BTreeMap<String, String> = allocation
        .ports
        .iter()
        .map(|(role, port)| (role.to_string(), port.to_string()))
        .collect();
    values.extend(allocation.env.clone());
    values
}

// ---------------------------------------------------------------------------
// release
// ---------------------------------------------------------------------------

/// Outcome of [`release`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseReport {
    pub project: ProjectName,
    /// Whether the registry held an allocation for this worktree.
    pub released: bool,
    /// Set when a `.envrc` was deleted.
    pub envrc_removed: Option<PathBuf>,
}

/// Remove the worktree's allocation and its generated `.envrc`.
pub fn release(paths: &RegistryPaths, root: &Path) -> Result<ReleaseReport, SyncError> {
    let config = load_project_config(root)?;
    let released = LockedRegistry::new(paths.clone())
        .update(|registry| Ok::<_, SyncError>(registry.remove(&config.name, root)))?;

    let mut envrc_removed = None;
    if released {
        let envrc = root.join(ENVRC_FILE);
        if remove_envrc(&envrc)? {
            envrc_removed = Some(envrc);
        }
        tracing::info!(project = %config.name, path = %root.display(), "released worktree");
    }

    Ok(ReleaseReport {
        project: config.name,
        released,
        envrc_removed,
    })
}

// ---------------------------------------------------------------------------
// status
// ---------------------------------------------------------------------------

/// One allocation as listed by [`status`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRow {
    pub project: ProjectName,
    pub worktree: String,
    pub path: PathBuf,
    pub ports: PortMap,
    pub env: BTreeMap<String, String>,
    /// Whether the worktree directory still exists (`false` → `gc` will prune it).
    pub present: bool,
}

/// List allocations in registry order, optionally restricted to one project.
pub fn status(
    paths: &RegistryPaths,
    project: Option<&ProjectName>,
) -> Result<Vec<StatusRow>, SyncError> {
    LockedRegistry::new(paths.clone()).read(|registry| {
        let rows = registry
            .projects
            .iter()
            .filter(|(name, _)| project.map_or(true, |wanted| *name == wanted))
            .flat_map(|(name, entries)| {
                entries.iter().map(move |(path, allocation)| StatusRow {
                    project: name.clone(),
                    worktree: allocation.worktree.clone(),
                    path: path.clone(),
                    ports: allocation.ports.clone(),
                    env: allocation.env.clone(),
                    present: path.is_dir(),
                })
            })
            .collect();
        Ok::<_, SyncError>(rows)
    })
}

// ---------------------------------------------------------------------------
// gc
// ---------------------------------------------------------------------------

/// Prune allocations whose worktree directory no longer exists.
pub fn gc(paths: &RegistryPaths) -> Result<Vec<StaleEntry>, SyncError> {
    let removed = LockedRegistry::new(paths.clone())
        .update(|registry| Ok::<_, SyncError>(collect_stale(registry)))?;
    tracing::info!(removed = removed.len(), "garbage collection finished");
    Ok(removed)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
