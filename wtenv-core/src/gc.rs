//! Stale-entry collection: drop allocations whose worktree directory is gone.

use std::fmt;
use std::path::PathBuf;

use crate::types::{ProjectName, Registry};

/// One allocation removed by [`collect_stale`]. Displays as `project: path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleEntry {
    pub project: ProjectName,
    pub path: PathBuf,
}

impl fmt::Display for StaleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.project, self.path.display())
    }
}

/// Remove every allocation whose path is no longer a directory, and every
/// project left without allocations. Returns what was removed, in registry order.
pub fn collect_stale(registry: &mut Registry) -> Vec<StaleEntry> {
    let mut removed = Vec::new();

    registry.projects.retain(|project, entries| {
        entries.retain(|path, _| {
            let alive = path.is_dir();
            if !alive {
                tracing::debug!(project = %project, path = %path.display(), "pruning stale allocation");
                removed.push(StaleEntry {
                    project: project.clone(),
                    path: path.clone(),
                });
            }
            alive
        });
        !entries.is_empty()
    });

    removed
}
