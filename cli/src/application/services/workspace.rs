//! Workspace membership plus global and workspace configuration access.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::{ConfigStore, LocalFs, WorkspaceStore};
use crate::domain::error::WorkspaceError;
use crate::domain::workspace::{WORKSPACE_FILE, WORKSPACE_STATE_DIR};
use crate::domain::{
    GlobalConfig, WorkspaceConfig, WorkspaceMachine, WorkspacePaths, locate_workspace_root,
};

/// Whether `dir` holds both the definition file and the state directory.
pub fn is_workspace_root(fs: &impl LocalFs, dir: &Path) -> bool {
    let file = dir.join(WORKSPACE_FILE);
    fs.exists(&file) && !fs.is_dir(&file) && fs.is_dir(&dir.join(WORKSPACE_STATE_DIR))
}

/// Paths rooted at the nearest workspace enclosing `start`, or at `start`
/// itself when there is none.
pub fn locate(fs: &impl LocalFs, start: &Path) -> WorkspacePaths {
    WorkspacePaths::new(locate_workspace_root(start, |dir| is_workspace_root(fs, dir)))
}

/// Whether `start` lies inside a workspace.
pub fn is_workspace(fs: &impl LocalFs, start: &Path) -> bool {
    is_workspace_root(fs, &locate(fs, start).root)
}

/// Paths of the enclosing workspace.
///
/// # Errors
///
/// Returns [`WorkspaceError::NotAWorkspace`] outside a workspace.
pub fn require_workspace(fs: &impl LocalFs, start: &Path) -> Result<WorkspacePaths> {
    let paths = locate(fs, start);
    if is_workspace_root(fs, &paths.root) {
        Ok(paths)
    } else {
        Err(WorkspaceError::NotAWorkspace.into())
    }
}

/// Turn `dir` into a workspace. Returns `false` when `dir` already is inside one.
///
/// # Errors
///
/// Returns an error if the state directory or definition file cannot be written.
pub fn create_workspace(
    fs: &impl LocalFs,
    store: &impl WorkspaceStore,
    dir: &Path,
    version: &str,
) -> Result<bool> {
    if is_workspace(fs, dir) {
        return Ok(false);
    }
    let paths = WorkspacePaths::new(dir.to_path_buf());
    fs.create_dir_all(&paths.state_dir())
        .with_context(|| format!("creating {}", paths.state_dir().display()))?;
    store.save(&paths.config_file(), &WorkspaceConfig::new(version))?;
    Ok(true)
}

/// Load `blip.yml` from the enclosing workspace.
///
/// # Errors
///
/// Returns an error outside a workspace or if the file cannot be parsed.
pub fn read_workspace(
    fs: &impl LocalFs,
    store: &impl WorkspaceStore,
    start: &Path,
) -> Result<(WorkspacePaths, WorkspaceConfig)> {
    let paths = require_workspace(fs, start)?;
    let config = store.load(&paths.config_file())?;
    Ok((paths, config))
}

/// Replace `blip.yml` in the workspace at `paths`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn overwrite_workspace(
    store: &impl WorkspaceStore,
    paths: &WorkspacePaths,
    config: &WorkspaceConfig,
) -> Result<()> {
    store.save(&paths.config_file(), config)
}

/// Load the global configuration, writing the default on first use.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or created.
pub fn read_global_config(store: &impl ConfigStore) -> Result<GlobalConfig> {
    if let Some(config) = store.load()? {
        return Ok(config);
    }
    let config = GlobalConfig::default();
    store.save(&config)?;
    Ok(config)
}

/// Replace the global configuration.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn overwrite_global_config(store: &impl ConfigStore, config: &GlobalConfig) -> Result<()> {
    store.save(config)
}

/// The machine an operation targets: `requested`, else the workspace default.
///
/// # Errors
///
/// Returns [`WorkspaceError::MachineNotFound`] for an unknown name and
/// [`WorkspaceError::NoDefaultMachine`] when nothing was requested and no
/// default is set.
pub fn resolve_machine(config: &WorkspaceConfig, requested: Option<&str>) -> Result<String> {
    let name = match requested {
        Some(name) => name,
        None => config
            .default_machine
            .as_deref()
            .ok_or(WorkspaceError::NoDefaultMachine)?,
    };
    if config.machines.contains_key(name) {
        Ok(name.to_string())
    } else {
        Err(WorkspaceError::MachineNotFound(name.to_string()).into())
    }
}

/// Add or replace machine `name` in the workspace definition. The first
/// machine recorded becomes the default.
pub fn record_machine(config: &mut WorkspaceConfig, name: &str, machine: WorkspaceMachine) {
    config.machines.insert(name.to_string(), machine);
    if config.default_machine.is_none() {
        config.default_machine = Some(name.to_string());
    }
}
