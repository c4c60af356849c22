//! Cross-process registry session.
//!
//! Protocol for [`LockedRegistry::update`]:
//!
//! 1. Create the config directory if missing.
//! 2. Take an exclusive `flock` on `registry.lock` (blocks, no timeout).
//! 3. Load `registry.json`, or start empty if absent. Corrupt → abort.
//! 4. Run the caller's closure on the mutable registry.
//! 5. On `Ok`, atomically replace `registry.json`. On `Err`, write nothing.
//! 6. Release the lock (the guard's `Drop`, on every exit path).
//!
//! One lock serializes every session on the machine, whatever project or
//! worktree it touches.

use std::fs::{File, OpenOptions};
use std::path::PathBuf;

use fs2::FileExt;

use crate::error::{io_err, RegistryError};
use crate::paths::RegistryPaths;
use crate::registry;
use crate::types::Registry;

/// Entry point for every registry read or mutation.
#[derive(Debug, Clone)]
pub struct LockedRegistry {
    paths: RegistryPaths,
}

impl LockedRegistry {
    pub fn new(paths: RegistryPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &RegistryPaths {
        &self.paths
    }

    /// Run `f` against the registry under the lock and commit its changes.
    ///
    /// Either every mutation made by `f` is persisted or, if `f` (or the load)
    /// fails, none is: the file on disk stays byte-identical.
    pub fn update<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Registry) -> Result<T, E>,
        E: From<RegistryError>,
    {
        let _guard = self.lock()?;
        let path = self.paths.registry_file();
        let mut registry = registry::load_at(&path)?;

        let value = f(&mut registry)?;

        registry::save_at(&path, &registry)?;
        tracing::debug!(path = %path.display(), "registry committed");
        Ok(value)
    }

    /// Run `f` against a consistent snapshot under the lock. Never writes,
    /// so reading an absent registry does not create the file.
    pub fn read<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Registry) -> Result<T, E>,
        E: From<RegistryError>,
    {
        let _guard = self.lock()?;
        let registry = registry::load_at(&self.paths.registry_file())?;
        f(&registry)
    }

    fn lock(&self) -> Result<LockGuard, RegistryError> {
        let dir = self.paths.root();
        std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

        let path = self.paths.lock_file();
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| io_err(&path, e))?;

        match file.try_lock_exclusive() {
            Ok(()) => {}
            Err(e) if e.raw_os_error() == fs2::lock_contended_error().raw_os_error() => {
                tracing::info!(path = %path.display(), "registry is locked by another process, waiting");
                file.lock_exclusive().map_err(|e| io_err(&path, e))?;
            }
            Err(e) => return Err(io_err(&path, e)),
        }

        Ok(LockGuard { file, path })
    }
}

/// Holds the exclusive lock; unlocks when dropped.
struct LockGuard {
    file: File,
    path: PathBuf,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if let Err(err) = FileExt::unlock(&self.file) {
            // Closing the descriptor right after still releases the flock.
            tracing::warn!(path = %self.path.display(), error = %err, "failed to unlock registry");
        }
    }
}
