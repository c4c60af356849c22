//! Port reconciliation for one worktree.
//!
//! Ports already granted to the same `(project, path)` are carried over for
//! every role that is still requested; only new roles go through the
//! allocator. Roles that are no longer requested are dropped, which frees
//! their ports once the new allocation is committed.

use std::path::Path;

use crate::error::RegistryError;
use crate::ports::allocate;
use crate::types::{PortMap, PortRange, ProjectName, Registry, RoleName};

/// Compute the port map for `(project, path)` given the roles now requested.
///
/// Does not mutate `registry`; the caller stores the result with
/// [`Registry::set`].
pub fn reconcile_ports(
    registry: &Registry,
    project: &ProjectName,
    path: &Path,
    requested: &[RoleName],
    range: PortRange,
) -> Result<PortMap, RegistryError> {
    let empty = PortMap::new();
    let old = registry
        .get(project, path)
        .map(|allocation| &allocation.ports)
        .unwrap_or(&empty);

    // Our own previous ports must not count against us.
    let mut used = registry.all_used_ports();
    for port in old.values() {
        used.remove(port);
    }

    let mut ports = PortMap::new();
    let mut fresh = Vec::new();
    for role in requested {
        match old.get(role) {
            Some(&port) => {
                ports.insert(role.clone(), port);
                used.insert(port);
            }
            None => fresh.push(role.clone()),
        }
    }

    let allocated = allocate(&fresh, &used, range)?;
    tracing::debug!(
        project = %project,
        path = %path.display(),
        reused = ports.len(),
        allocated = allocated.len(),
        "reconciled ports"
    );
    ports.extend(allocated);
    Ok(ports)
}
