//! Allocation record store.
//!
//! # Storage layout
//!
//! ```text
//! <config_dir>/
//!   registry.json        (whole registry, rewritten in full on every commit)
//!   registry.json.tmp    (transient; renamed over registry.json)
//! ```
//!
//! The in-memory primitives ([`Registry::get`], [`Registry::set`],
//! [`Registry::remove`], [`Registry::all_used_ports`]) never lock or touch the
//! disk. [`load_at`] and [`save_at`] do plain I/O and are only called from
//! inside a [`crate::session::LockedRegistry`].

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::{io_err, RegistryError};
use crate::types::{Allocation, ProjectEntries, ProjectName, Registry};

// ---------------------------------------------------------------------------
// 1. In-memory primitives
// ---------------------------------------------------------------------------

impl Registry {
    pub fn get(&self, project: &ProjectName, path: &Path) -> Option<&Allocation> {
        self.projects.get(project)?.get(path)
    }

    /// Insert or replace the allocation for `(project, path)`.
    pub fn set(&mut self, project: &ProjectName, path: impl Into<PathBuf>, allocation: Allocation) {
        self.projects
            .entry(project.clone())
            .or_default()
            .insert(path.into(), allocation);
    }

    /// Remove the allocation for `(project, path)`, dropping the project entry
    /// when it becomes empty. Returns whether anything was removed.
    pub fn remove(&mut self, project: &ProjectName, path: &Path) -> bool {
        let Some(entries) = self.projects.get_mut(project) else {
            return false;
        };
        let removed = entries.remove(path).is_some();
        if entries.is_empty() {
            self.projects.remove(project);
        }
        removed
    }

    /// Every port held by any worktree of any project.
    pub fn all_used_ports(&self) -> BTreeSet<u16> {
        self.projects
            .values()
            .flat_map(|entries| entries.values())
            .flat_map(|allocation| allocation.ports.values().copied())
            .collect()
    }

    pub fn project(&self, project: &ProjectName) -> Option<&ProjectEntries> {
        self.projects.get(project)
    }
}

// ---------------------------------------------------------------------------
// 2. Load
// ---------------------------------------------------------------------------

/// Load the registry from `path`, or an empty registry if the file is absent.
///
/// Returns `RegistryError::Corrupted` (with path + serde_json context) if the
/// file does not parse as the expected shape.
pub fn load_at(path: &Path) -> Result<Registry, RegistryError> {
    if !path.exists() {
        return Ok(Registry::default());
    }
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    serde_json::from_str(&contents).map_err(|source| RegistryError::Corrupted {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// 3. Save (atomic)
// ---------------------------------------------------------------------------

/// Atomically replace `path` with the serialized registry.
///
/// Write flow: serialize → `<path>.tmp` sibling → `chmod 0600` → `rename`.
/// `.tmp` is always in the same directory as the target (same filesystem).
pub fn save_at(path: &Path, registry: &Registry) -> Result<(), RegistryError> {
    let mut json = serde_json::to_string_pretty(registry)?;
    json.push('\n');

    let tmp = tmp_path(path);
    std::fs::write(&tmp, json).map_err(|e| io_err(&tmp, e))?;
    set_file_permissions(&tmp)?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), RegistryError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), RegistryError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
