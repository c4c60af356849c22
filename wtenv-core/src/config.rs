//! Project (`.worktree-env.toml`) and global (`config.toml`) configuration.
//!
//! Port roles keep their order of appearance in the file: allocation walks
//! them in that order, so the first role listed gets the lowest free port.

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::paths::{project_config_path, RegistryPaths};
use crate::types::{PortRange, ProjectName, RoleName};

// ---------------------------------------------------------------------------
// Project config
// ---------------------------------------------------------------------------

/// Per-role port options. Currently empty (`PORT = {}`); reserved for future keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PortSpec {}

/// An environment variable rendered from a `{placeholder}` template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EnvSpec {
    #[serde(default)]
    pub template: String,
}

/// Parsed `.worktree-env.toml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    pub name: ProjectName,
    pub ports: IndexMap<RoleName, PortSpec>,
    pub env: IndexMap<String, EnvSpec>,
}

impl ProjectConfig {
    /// Requested port roles, in file order.
    pub fn requested_roles(&self) -> Vec<RoleName> {
        self.ports.keys().cloned().collect()
    }
}

#[derive(Debug, Deserialize)]
struct RawProjectConfig {
    #[serde(default)]
    project: RawProjectSection,
    #[serde(default)]
    ports: IndexMap<RoleName, PortSpec>,
    #[serde(default)]
    env: IndexMap<String, EnvSpec>,
}

#[derive(Debug, Default, Deserialize)]
struct RawProjectSection {
    name: Option<String>,
}

/// Load `<worktree_root>/.worktree-env.toml`.
///
/// Returns `ConfigError::NotFound` if absent and
/// `ConfigError::MissingProjectName` if `[project] name` is missing or empty.
pub fn load_project_config(worktree_root: &Path) -> Result<ProjectConfig, ConfigError> {
    let path = project_config_path(worktree_root);
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: worktree_root.to_path_buf(),
        });
    }
    let contents = read(&path)?;
    let raw: RawProjectConfig =
        toml::from_str(&contents).map_err(|source| ConfigError::Parse { path: path.clone(), source })?;

    let name = match raw.project.name {
        Some(name) if !name.trim().is_empty() => ProjectName::from(name),
        _ => return Err(ConfigError::MissingProjectName { path }),
    };

    // Keys become `export NAME=...` lines in `.envrc`.
    let keys = raw.ports.keys().map(|role| role.0.as_str()).chain(raw.env.keys().map(String::as_str));
    for key in keys {
        if !is_shell_identifier(key) {
            return Err(ConfigError::InvalidName {
                path,
                name: key.to_string(),
            });
        }
    }

    Ok(ProjectConfig {
        name,
        ports: raw.ports,
        env: raw.env,
    })
}

// ---------------------------------------------------------------------------
// Global config
// ---------------------------------------------------------------------------

/// Parsed `<config_dir>/config.toml`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlobalConfig {
    pub port_range: PortRange,
}

#[derive(Debug, Default, Deserialize)]
struct RawGlobalConfig {
    #[serde(default)]
    ports: RawPortsSection,
}

#[derive(Debug, Default, Deserialize)]
struct RawPortsSection {
    range: Option<[u16; 2]>,
}

/// Load the global config, falling back to defaults when the file is absent.
pub fn load_global_config(paths: &RegistryPaths) -> Result<GlobalConfig, ConfigError> {
    let path = paths.global_config_file();
    if !path.exists() {
        return Ok(GlobalConfig::default());
    }
    let contents = read(&path)?;
    let raw: RawGlobalConfig =
        toml::from_str(&contents).map_err(|source| ConfigError::Parse { path: path.clone(), source })?;

    let port_range = match raw.ports.range {
        None => PortRange::default(),
        Some([low, high]) => {
            PortRange::new(low, high).ok_or(ConfigError::InvalidPortRange { path, low, high })?
        }
    };
    Ok(GlobalConfig { port_range })
}

/// `[A-Za-z_][A-Za-z0-9_]*`
fn is_shell_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
