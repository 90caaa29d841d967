//! Domain types for the global configuration and the workspace definition.
//!
//! Pure data only: no I/O, no async, no filesystem access. Keys are
//! camelCase on disk.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::machine::MachineSize;

// ── Global config ────────────────────────────────────────────────────────────

/// Per-user configuration stored in `<config_dir>/config.yml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalConfig {
    /// Driver used by `machine create` when none is passed.
    pub default_driver: Option<String>,
}

// ── Workspace definition ─────────────────────────────────────────────────────

/// Contents of `blip.yml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceConfig {
    /// CLI version that created the workspace.
    pub version: String,
    #[serde(default)]
    pub default_machine: Option<String>,
    #[serde(default)]
    pub machines: BTreeMap<String, WorkspaceMachine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<WorkspaceTemplate>,
}

impl WorkspaceConfig {
    /// Fresh definition for a new workspace.
    #[must_use]
    pub fn new(version: &str) -> Self {
        Self {
            version: version.to_string(),
            default_machine: None,
            machines: BTreeMap::new(),
            template: None,
        }
    }

    /// The machine owning `domain`, if any.
    #[must_use]
    pub fn machine_for_domain(&self, domain: &str) -> Option<&str> {
        self.machines
            .iter()
            .find(|(_, m)| m.domains.iter().any(|d| d == domain))
            .map(|(name, _)| name.as_str())
    }
}

/// Template the workspace was scaffolded from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceTemplate {
    pub name: String,
    #[serde(default)]
    pub configuration: BTreeMap<String, serde_yaml::Value>,
}

/// One machine entry in the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceMachine {
    #[serde(default)]
    pub domains: Vec<String>,
    pub configuration: MachineConfiguration,
    pub driver: String,
    #[serde(default)]
    pub attached: bool,
}

/// Sizing and shares for a machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub cpu_count: u32,
    #[serde(rename = "ramMB")]
    pub ram_mb: u32,
    #[serde(rename = "diskMB")]
    pub disk_mb: u32,
    /// Guest path → host share.
    #[serde(default)]
    pub shared_folders: BTreeMap<String, SharedFolder>,
}

impl From<MachineSize> for MachineConfiguration {
    fn from(size: MachineSize) -> Self {
        Self {
            group: None,
            cpu_count: size.cpu_count,
            ram_mb: size.ram_mb,
            disk_mb: size.disk_mb,
            shared_folders: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedFolder {
    pub host_path: String,
}
