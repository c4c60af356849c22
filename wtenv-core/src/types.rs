//! Domain types for the worktree allocation registry.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.
//! All persisted types are serializable via serde + serde_json and reject
//! unknown fields on load.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed project identity (the `[project] name` of a worktree config).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectName(pub String);

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ProjectName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProjectName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A logical port identifier such as `PORT` or `LIVE_PORT`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleName(pub String);

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for RoleName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RoleName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Port range
// ---------------------------------------------------------------------------

/// Inclusive range of port numbers the allocator may hand out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRange {
    pub low: u16,
    pub high: u16,
}

impl PortRange {
    pub const DEFAULT: PortRange = PortRange { low: 4000, high: 8999 };

    /// Returns `None` unless `1 <= low <= high`.
    pub fn new(low: u16, high: u16) -> Option<Self> {
        (low >= 1 && low <= high).then_some(Self { low, high })
    }

    pub fn contains(&self, port: u16) -> bool {
        (self.low..=self.high).contains(&port)
    }
}

impl Default for PortRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

// ---------------------------------------------------------------------------
// Persisted structs
// ---------------------------------------------------------------------------

/// Ports granted to one worktree, keyed by role.
pub type PortMap = BTreeMap<RoleName, u16>;

/// Worktrees of one project, keyed by absolute worktree path.
pub type ProjectEntries = BTreeMap<PathBuf, Allocation>;

/// One worktree's resource grant.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Allocation {
    /// Sanitized worktree label, used for display and `{worktree}` templates.
    pub worktree: String,
    #[serde(default)]
    pub ports: PortMap,
    /// Rendered environment values.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

/// Root of `registry.json`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Registry {
    #[serde(default)]
    pub projects: BTreeMap<ProjectName, ProjectEntries>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
