//! Error types for wtenv-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::PortRange;

/// All errors that can arise from registry sessions and port allocation.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Underlying I/O failure, annotated with the path involved.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The registry file exists but does not parse as the expected shape.
    #[error(
        "registry file is corrupted at {path}: {source}. Back up and delete {path} to reset."
    )]
    Corrupted {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// JSON serialization error (write-back path).
    #[error("registry serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Every port in the configured range is already taken.
    #[error(
        "no available ports in range {range}. Run `worktree-env gc` to prune stale entries \
         or widen `[ports] range` in the global config.toml"
    )]
    PortsExhausted { range: PortRange },

    /// `dirs::home_dir()` returned `None`: cannot locate the config directory.
    #[error("cannot determine home directory; set $HOME or WORKTREE_ENV_CONFIG_DIR")]
    HomeNotFound,
}

/// Errors from loading the project or global configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no .worktree-env.toml found in {path}")]
    NotFound { path: PathBuf },

    #[error("{path} must have a [project] name")]
    MissingProjectName { path: PathBuf },

    /// TOML parse error on load: includes file path and the parser's context.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A `[ports]` or `[env]` key that is not a shell identifier.
    #[error("invalid name '{name}' in {path}; port roles and env vars must match [A-Za-z_][A-Za-z0-9_]*")]
    InvalidName { path: PathBuf, name: String },

    #[error("invalid port range {low}-{high} in {path}; expected 1 <= low <= high")]
    InvalidPortRange { path: PathBuf, low: u16, high: u16 },
}

/// Convenience constructor for [`RegistryError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RegistryError {
    RegistryError::Io {
        path: path.into(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_message_names_range_and_remedy() {
        let msg = RegistryError::PortsExhausted {
            range: PortRange { low: 4000, high: 4000 },
        }
        .to_string();
        assert!(msg.contains("4000-4000"), "got: {msg}");
        assert!(msg.contains("worktree-env gc"), "got: {msg}");
    }

    #[test]
    fn home_not_found_error_message() {
        assert!(RegistryError::HomeNotFound.to_string().contains("home directory"));
    }
}
