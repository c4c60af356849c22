//! `.envrc` body for direnv.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use wtenv_core::types::{PortMap, ProjectName};

pub const ENVRC_FILE: &str = ".envrc";

/// Render the `.envrc` contents: a generated-file header, then one
/// `export` line per port and per env var, each group sorted by name.
/// Env vars come last, so an env var shadows a port role of the same name.
pub fn render_envrc(
    project: &ProjectName,
    worktree: &str,
    ports: &PortMap,
    env: &BTreeMap<String, String>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Generated by worktree-env for {project} ({worktree}).");
    let _ = writeln!(out, "# Do not edit by hand; re-run `worktree-env init` instead.");
    for (role, port) in ports {
        let _ = writeln!(out, "export {role}={port}");
    }
    for (name, value) in env {
        let _ = writeln!(out, "export {name}={}", shell_quote(value));
    }
    out
}

/// Quote `value` for POSIX shells. Values made only of safe characters are
/// emitted bare; anything else is single-quoted.
pub fn shell_quote(value: &str) -> String {
    let safe = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-./:@%+,=".contains(c));
    if safe {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}
