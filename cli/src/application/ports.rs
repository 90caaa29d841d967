//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`: never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::Output;

use anyhow::Result;

use crate::domain::{GlobalConfig, MachineEnvironment, WorkspaceConfig};

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
///
/// Implementations wait for the child to exit and capture its output. There
/// is no built-in timeout.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program with the ambient process environment.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;

    /// Run a program with `env` layered over the ambient environment.
    async fn run_with_env(
        &self,
        program: &str,
        args: &[&str],
        env: &MachineEnvironment,
    ) -> Result<Output>;
}

// ── Privileged Helper Port ────────────────────────────────────────────────────

/// Captured result of a privileged invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrivilegedOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Runs a shell command line with elevated privileges.
///
/// May block on an interactive credential prompt. A non-zero `code` is
/// treated as failure by callers.
#[allow(async_fn_in_trait)]
pub trait PrivilegedExecutor {
    async fn exec(&self, command_line: &str) -> Result<PrivilegedOutput>;
}

// ── Filesystem Port ───────────────────────────────────────────────────────────

/// Abstracts the raw filesystem operations services need.
pub trait LocalFs {
    fn exists(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn write(&self, path: &Path, content: &str) -> Result<()>;
}

// ── Configuration Ports ───────────────────────────────────────────────────────

/// Global configuration persistence.
pub trait ConfigStore {
    /// Load the configuration; a missing file yields `None`.
    fn load(&self) -> Result<Option<GlobalConfig>>;
    /// Persist the configuration, creating parent directories.
    fn save(&self, config: &GlobalConfig) -> Result<()>;
    /// Location of the configuration file.
    fn path(&self) -> Result<PathBuf>;
}

/// Workspace definition (`blip.yml`) persistence.
pub trait WorkspaceStore {
    fn load(&self, path: &Path) -> Result<WorkspaceConfig>;
    fn save(&self, path: &Path, config: &WorkspaceConfig) -> Result<()>;
}

// ── Certificate Port ──────────────────────────────────────────────────────────

/// Produces `<domain>.key` and `<domain>.crt` inside `dir`.
pub trait CertificateIssuer {
    fn issue(&self, domain: &str, dir: &Path) -> Result<()>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait: no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
