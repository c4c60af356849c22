//! Storage locations under the worktree-env config directory.
//!
//! ```text
//! <config_dir>/            ($WORKTREE_ENV_CONFIG_DIR or ~/.config/worktree-env)
//!   config.toml            (optional global config)
//!   registry.json          (allocation registry)
//!   registry.lock          (advisory lock target, never read)
//! ```

use std::path::{Path, PathBuf};

use crate::error::RegistryError;

pub const CONFIG_DIR_ENV: &str = "WORKTREE_ENV_CONFIG_DIR";
pub const REGISTRY_FILE: &str = "registry.json";
pub const LOCK_FILE: &str = "registry.lock";
pub const GLOBAL_CONFIG_FILE: &str = "config.toml";
pub const PROJECT_CONFIG_FILE: &str = ".worktree-env.toml";

/// Explicit handle to a config directory. Threaded into every session so
/// tests can point at a `TempDir` instead of mutating the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryPaths {
    root: PathBuf,
}

impl RegistryPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `~/.config/worktree-env`, resolved through `dirs::home_dir()`.
    pub fn default_location() -> Result<Self, RegistryError> {
        let home = dirs::home_dir().ok_or(RegistryError::HomeNotFound)?;
        Ok(Self::new(home.join(".config").join("worktree-env")))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn registry_file(&self) -> PathBuf {
        self.root.join(REGISTRY_FILE)
    }

    pub fn lock_file(&self) -> PathBuf {
        self.root.join(LOCK_FILE)
    }

    pub fn global_config_file(&self) -> PathBuf {
        self.root.join(GLOBAL_CONFIG_FILE)
    }
}

/// `<worktree root>/.worktree-env.toml`: pure, no I/O.
pub fn project_config_path(worktree_root: &Path) -> PathBuf {
    worktree_root.join(PROJECT_CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_live_under_root() {
        let paths = RegistryPaths::new("/tmp/wtenv");
        assert_eq!(paths.registry_file(), PathBuf::from("/tmp/wtenv/registry.json"));
        assert_eq!(paths.lock_file(), PathBuf::from("/tmp/wtenv/registry.lock"));
        assert_eq!(paths.global_config_file(), PathBuf::from("/tmp/wtenv/config.toml"));
    }

    #[test]
    fn project_config_is_in_worktree_root() {
        assert!(project_config_path(Path::new("/code/app")).ends_with(".worktree-env.toml"));
    }
}
