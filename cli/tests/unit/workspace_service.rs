//! Unit tests for workspace membership and configuration access.

#![allow(clippy::expect_used)]

use std::path::Path;

use blip_cli::application::services::workspace;
use blip_cli::domain::config::MachineConfiguration;
use blip_cli::domain::machine::MachineSize;
use blip_cli::domain::{GlobalConfig, WorkspaceConfig, WorkspaceError, WorkspaceMachine};
use blip_cli::infra::config::YamlWorkspaceStore;
use blip_cli::infra::fs::StdFs;

use crate::mocks::{MemoryConfigStore, MemoryFs, MemoryWorkspaceStore};

fn machine(driver: &str) -> WorkspaceMachine {
    WorkspaceMachine {
        domains: Vec::new(),
        configuration: MachineConfiguration::from(MachineSize::default()),
        driver: driver.to_string(),
        attached: false,
    }
}

// ── Membership ───────────────────────────────────────────────────────────────

#[test]
fn nested_directory_resolves_to_enclosing_workspace() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();
    std::fs::write(root.join("blip.yml"), "version: 0.1.0\n").expect("write blip.yml");
    std::fs::create_dir_all(root.join(".blip")).expect("create .blip");
    let nested = root.join("services").join("api");
    std::fs::create_dir_all(&nested).expect("create nested");

    let paths = workspace::require_workspace(&StdFs, &nested).expect("inside workspace");

    assert_eq!(paths.root, root);
    assert_eq!(paths.certs_dir(), root.join(".blip").join("certs"));
}

#[test]
fn definition_file_alone_is_not_a_workspace() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("blip.yml"), "version: 0.1.0\n").expect("write blip.yml");

    assert!(!workspace::is_workspace(&StdFs, dir.path()));
    let err = workspace::require_workspace(&StdFs, dir.path()).expect_err("not a workspace");
    assert!(matches!(
        err.downcast_ref::<WorkspaceError>(),
        Some(WorkspaceError::NotAWorkspace)
    ));
}

#[test]
fn locate_outside_workspace_returns_start() {
    let fs = MemoryFs::new();
    let start = Path::new("/home/dev/project");

    assert_eq!(workspace::locate(&fs, start).root, start);
}

// ── Creation ─────────────────────────────────────────────────────────────────

#[test]
fn create_workspace_writes_definition_and_state_dir() {
    let dir = tempfile::tempdir().expect("tempdir");

    let created = workspace::create_workspace(&StdFs, &YamlWorkspaceStore, dir.path(), "0.1.0")
        .expect("create succeeds");

    assert!(created);
    assert!(dir.path().join(".blip").is_dir());
    let yaml = std::fs::read_to_string(dir.path().join("blip.yml")).expect("blip.yml");
    assert!(yaml.contains("version: 0.1.0"), "got: {yaml}");
}

#[test]
fn create_workspace_inside_existing_one_is_noop() {
    let fs = MemoryFs::new()
        .with_file("/ws/blip.yml", "")
        .with_dir("/ws/.blip")
        .with_dir("/ws/sub");
    let store = MemoryWorkspaceStore::default();

    let created = workspace::create_workspace(&fs, &store, Path::new("/ws/sub"), "0.1.0")
        .expect("create succeeds");

    assert!(!created);
    assert!(store.get("/ws/sub/blip.yml").is_none());
}

// ── Global configuration ─────────────────────────────────────────────────────

#[test]
fn first_global_read_persists_default() {
    let store = MemoryConfigStore::default();

    let config = workspace::read_global_config(&store).expect("read succeeds");
    assert_eq!(config, GlobalConfig::default());
    assert_eq!(*store.saves.lock().expect("saves lock"), 1);

    workspace::read_global_config(&store).expect("second read succeeds");
    assert_eq!(*store.saves.lock().expect("saves lock"), 1);
}

#[test]
fn overwrite_global_config_replaces_stored_value() {
    let store = MemoryConfigStore::default();
    let config = GlobalConfig {
        default_driver: Some("hyperv".to_string()),
    };

    workspace::overwrite_global_config(&store, &config).expect("write succeeds");

    assert_eq!(
        workspace::read_global_config(&store).expect("read succeeds"),
        config
    );
}

// ── Machine resolution ───────────────────────────────────────────────────────

#[test]
fn first_recorded_machine_becomes_default() {
    let mut config = WorkspaceConfig::new("0.1.0");
    workspace::record_machine(&mut config, "web", machine("virtualbox"));
    workspace::record_machine(&mut config, "db", machine("virtualbox"));

    assert_eq!(config.default_machine.as_deref(), Some("web"));
    assert_eq!(
        workspace::resolve_machine(&config, None).expect("default"),
        "web"
    );
    assert_eq!(
        workspace::resolve_machine(&config, Some("db")).expect("explicit"),
        "db"
    );
}

#[test]
fn resolve_machine_reports_unknown_and_missing_default() {
    let mut config = WorkspaceConfig::new("0.1.0");

    let err = workspace::resolve_machine(&config, None).expect_err("no default");
    assert!(matches!(
        err.downcast_ref::<WorkspaceError>(),
        Some(WorkspaceError::NoDefaultMachine)
    ));

    workspace::record_machine(&mut config, "web", machine("virtualbox"));
    let err = workspace::resolve_machine(&config, Some("ghost")).expect_err("unknown");
    assert!(matches!(
        err.downcast_ref::<WorkspaceError>(),
        Some(WorkspaceError::MachineNotFound(name)) if name == "ghost"
    ));
}
