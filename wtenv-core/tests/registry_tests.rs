//! Session-level registry tests: error messages, atomic write safety, and the
//! gc → reconcile → set flow an init runs inside one session.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use assert_fs::prelude::*;
use predicates::prelude::predicate;
use wtenv_core::{
    collect_stale, reconcile_ports, Allocation, LockedRegistry, PortRange, ProjectName,
    Registry, RegistryError, RegistryPaths, RoleName,
};

fn proj() -> ProjectName {
    ProjectName::from("myapp")
}

fn roles(names: &[&str]) -> Vec<RoleName> {
    names.iter().copied().map(RoleName::from).collect()
}

fn session(config: &assert_fs::TempDir) -> LockedRegistry {
    LockedRegistry::new(RegistryPaths::new(config.path()))
}

/// What an init does inside its session: prune, reconcile, overwrite.
fn init_worktree(
    reg: &mut Registry,
    worktree: &Path,
    requested: &[RoleName],
    range: PortRange,
) -> Result<BTreeMap<RoleName, u16>, RegistryError> {
    collect_stale(reg);
    let ports = reconcile_ports(reg, &proj(), worktree, requested, range)?;
    reg.set(
        &proj(),
        worktree,
        Allocation {
            worktree: "wt".into(),
            ports: ports.clone(),
            env: BTreeMap::new(),
        },
    );
    Ok(ports)
}

// ---------------------------------------------------------------------------
// 1. Load error messages
// ---------------------------------------------------------------------------

#[test]
fn corrupt_registry_error_names_file_and_remedy() {
    let config = assert_fs::TempDir::new().expect("tempdir");
    config.child("registry.json").write_str("not json{{{").expect("write");

    let err = session(&config)
        .update(|_| Ok::<_, RegistryError>(()))
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("registry.json"), "must contain file path, got: {msg}");
    assert!(msg.contains("Back up and delete"), "must tell the operator what to do, got: {msg}");
    config.child("registry.json").assert("not json{{{");
}

#[test]
fn wrong_type_registry_is_corrupted() {
    let config = assert_fs::TempDir::new().expect("tempdir");
    config.child("registry.json").write_str("[1, 2, 3]").expect("write");

    let err = session(&config)
        .read(|_| Ok::<_, RegistryError>(()))
        .unwrap_err();
    assert!(matches!(err, RegistryError::Corrupted { .. }), "got: {err}");
}

// ---------------------------------------------------------------------------
// 2. Atomic write safety
// ---------------------------------------------------------------------------

#[test]
fn config_dir_is_created_on_first_session() {
    let parent = assert_fs::TempDir::new().expect("tempdir");
    let paths = RegistryPaths::new(parent.path().join("nested").join("worktree-env"));
    LockedRegistry::new(paths)
        .update(|_| Ok::<_, RegistryError>(()))
        .expect("session");

    parent
        .child("nested/worktree-env/registry.json")
        .assert(predicate::path::exists());
    parent
        .child("nested/worktree-env/registry.json.tmp")
        .assert(predicate::path::missing());
}

#[test]
fn mid_write_crash_leaves_original_intact() {
    let config = assert_fs::TempDir::new().expect("tempdir");
    let worktree = assert_fs::TempDir::new().expect("tempdir");
    let s = session(&config);
    s.update(|reg| init_worktree(reg, worktree.path(), &roles(&["PORT"]), PortRange::default()))
        .expect("init");

    let original = fs::read(config.child("registry.json").path()).expect("read original");

    // Simulate crash: .tmp written but process died before rename
    config
        .child("registry.json.tmp")
        .write_str("CRASH - INCOMPLETE WRITE")
        .expect("write crash tmp");

    let ports = s
        .read(|reg| Ok::<_, RegistryError>(reg.all_used_ports()))
        .expect("registry still loads");
    assert_eq!(ports.into_iter().collect::<Vec<_>>(), vec![4000]);
    assert_eq!(original, fs::read(config.child("registry.json").path()).unwrap());
}

// ---------------------------------------------------------------------------
// 3. Init flow inside sessions
// ---------------------------------------------------------------------------

#[test]
fn two_worktrees_never_share_ports() {
    let config = assert_fs::TempDir::new().expect("tempdir");
    let a = assert_fs::TempDir::new().expect("tempdir");
    let b = assert_fs::TempDir::new().expect("tempdir");
    let s = session(&config);
    let requested = roles(&["PORT", "LIVE_PORT"]);

    let pa = s
        .update(|reg| init_worktree(reg, a.path(), &requested, PortRange::default()))
        .unwrap();
    let pb = s
        .update(|reg| init_worktree(reg, b.path(), &requested, PortRange::default()))
        .unwrap();

    assert!(pa.values().all(|p| !pb.values().any(|q| q == p)));
}

#[test]
fn reinit_across_sessions_is_stable() {
    let config = assert_fs::TempDir::new().expect("tempdir");
    let wt = assert_fs::TempDir::new().expect("tempdir");
    let s = session(&config);
    let requested = roles(&["PORT", "LIVE_PORT"]);

    let first = s
        .update(|reg| init_worktree(reg, wt.path(), &requested, PortRange::default()))
        .unwrap();
    let second = s
        .update(|reg| init_worktree(reg, wt.path(), &requested, PortRange::default()))
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn exhaustion_aborts_without_write_back() {
    let config = assert_fs::TempDir::new().expect("tempdir");
    let a = assert_fs::TempDir::new().expect("tempdir");
    let b = assert_fs::TempDir::new().expect("tempdir");
    let s = session(&config);
    let tiny = PortRange::new(4000, 4000).unwrap();

    s.update(|reg| init_worktree(reg, a.path(), &roles(&["PORT"]), tiny))
        .expect("first worktree fits");
    let before = fs::read(config.child("registry.json").path()).unwrap();

    let err = s
        .update(|reg| init_worktree(reg, b.path(), &roles(&["PORT"]), tiny))
        .unwrap_err();
    assert!(matches!(err, RegistryError::PortsExhausted { .. }));
    assert_eq!(before, fs::read(config.child("registry.json").path()).unwrap());
}

#[test]
fn deleted_worktree_ports_are_reclaimed_by_next_init() {
    let config = assert_fs::TempDir::new().expect("tempdir");
    let survivor = assert_fs::TempDir::new().expect("tempdir");
    let s = session(&config);
    let tiny = PortRange::new(4000, 4000).unwrap();

    let doomed = assert_fs::TempDir::new().expect("tempdir");
    let doomed_path = doomed.path().to_path_buf();
    s.update(|reg| init_worktree(reg, &doomed_path, &roles(&["PORT"]), tiny))
        .unwrap();
    doomed.close().expect("remove worktree");

    let ports = s
        .update(|reg| init_worktree(reg, survivor.path(), &roles(&["PORT"]), tiny))
        .expect("gc frees the only port");
    assert_eq!(ports[&RoleName::from("PORT")], 4000);

    let gone = s
        .read(|reg| Ok::<_, RegistryError>(reg.get(&proj(), &doomed_path).is_none()))
        .unwrap();
    assert!(gone);
}
