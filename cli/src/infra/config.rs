//! Infrastructure implementations of the `ConfigStore` and `WorkspaceStore` ports.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::paths::{CONFIG_ENV, config_dir};
use crate::application::ports::{ConfigStore, WorkspaceStore};
use crate::domain::{GlobalConfig, WorkspaceConfig};

/// Global configuration file name inside the configuration directory.
pub const CONFIG_FILE: &str = "config.yml";

/// Production implementation of `ConfigStore` that uses a YAML file on disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlConfigStore;

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<Option<GlobalConfig>> {
        let path = self.path()?;
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        serde_yaml::from_str(&content)
            .map(Some)
            .with_context(|| format!("cannot parse {}", path.display()))
    }

    fn save(&self, config: &GlobalConfig) -> Result<()> {
        let path = self.path()?;
        write_yaml(&path, config)
    }

    fn path(&self) -> Result<PathBuf> {
        if let Ok(val) = std::env::var(CONFIG_ENV) {
            return Ok(PathBuf::from(val));
        }
        Ok(config_dir()?.join(CONFIG_FILE))
    }
}

/// Reads and writes `blip.yml`.
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlWorkspaceStore;

impl WorkspaceStore for YamlWorkspaceStore {
    fn load(&self, path: &Path) -> Result<WorkspaceConfig> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
    }

    fn save(&self, path: &Path, config: &WorkspaceConfig) -> Result<()> {
        write_yaml(path, config)
    }
}

fn write_yaml(path: &Path, value: &impl serde::Serialize) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create {}", parent.display()))?;
    }
    let content = serde_yaml::to_string(value).context("cannot serialize config")?;
    std::fs::write(path, content).with_context(|| format!("cannot write {}", path.display()))
}
