//! Application context: unified state passed to every command handler.
//!
//! `AppContext` owns the tool handles and every infrastructure adapter, so
//! command handlers only borrow. The tool handles cache their availability
//! probe for the lifetime of the process.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::services::routing::DomainRouter;
use crate::application::services::{machine, workspace};
use crate::application::Toolchain;
use crate::domain::MachineEnvironment;
use crate::infra::certs::RcgenIssuer;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::{YamlConfigStore, YamlWorkspaceStore};
use crate::infra::fs::StdFs;
use crate::infra::paths;
use crate::infra::privileged::SudoExecutor;
use crate::output::{HumanRenderer, JsonRenderer, OutputContext, Renderer, TerminalReporter};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
#[allow(clippy::struct_excessive_bools)]
pub struct AppFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
    /// Debug diagnostics on stderr.
    pub verbose: bool,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Gated external tools.
    pub tools: Toolchain,
    pub runner: TokioCommandRunner,
    pub fs: StdFs,
    pub sudo: SudoExecutor,
    pub config_store: YamlConfigStore,
    pub workspace_store: YamlWorkspaceStore,
    pub issuer: RcgenIssuer,
    /// Hosts file to route domains through.
    pub hosts_path: PathBuf,
    /// Directory the command was invoked from.
    pub cwd: PathBuf,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// JSON mode implies quiet so stdout carries only the JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let mode = if flags.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };
        let cwd = std::env::current_dir().context("cannot determine current directory")?;

        Ok(Self {
            output: OutputContext::new(flags.no_color, flags.quiet || flags.json),
            mode,
            tools: Toolchain::default(),
            runner: TokioCommandRunner::new(),
            fs: StdFs,
            sudo: SudoExecutor,
            config_store: YamlConfigStore,
            workspace_store: YamlWorkspaceStore,
            issuer: RcgenIssuer,
            hosts_path: paths::hosts_path(),
            cwd,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Returns the appropriate `Renderer` variant for the current output mode.
    #[must_use]
    pub fn renderer(&self) -> Renderer<'_> {
        match self.mode {
            OutputMode::Human => Renderer::Human(HumanRenderer::new(&self.output)),
            OutputMode::Json => Renderer::Json(JsonRenderer),
        }
    }

    #[must_use]
    pub fn reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }

    /// Per-user configuration directory.
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn config_dir(&self) -> Result<PathBuf> {
        paths::config_dir()
    }

    #[must_use]
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Domain routing bound to this context's adapters.
    #[must_use]
    pub fn router(
        &self,
    ) -> DomainRouter<
        '_,
        TokioCommandRunner,
        StdFs,
        SudoExecutor,
        YamlWorkspaceStore,
        RcgenIssuer,
        TerminalReporter<'_>,
    > {
        DomainRouter {
            runner: &self.runner,
            fs: &self.fs,
            sudo: &self.sudo,
            store: &self.workspace_store,
            issuer: &self.issuer,
            reporter: self.reporter(),
            machine_tool: &self.tools.machine,
            hosts_path: &self.hosts_path,
            cwd: &self.cwd,
        }
    }

    /// Connection environment for docker/compose invocations.
    ///
    /// `requested` wins; otherwise the workspace default machine is used when
    /// there is one; otherwise `None`, meaning the ambient docker host.
    ///
    /// # Errors
    ///
    /// Returns an error if the machine tool is unavailable or the env dump fails.
    pub async fn machine_environment(
        &self,
        requested: Option<&str>,
    ) -> Result<Option<MachineEnvironment>> {
        let name = match requested {
            Some(name) => Some(name.to_string()),
            None if workspace::is_workspace(&self.fs, &self.cwd) => {
                let (_, config) =
                    workspace::read_workspace(&self.fs, &self.workspace_store, &self.cwd)?;
                config.default_machine
            }
            None => None,
        };
        match name {
            Some(name) => {
                let env =
                    machine::env(&self.runner, &self.tools.machine, &name, machine::DEFAULT_SHELL)
                        .await?;
                Ok(Some(env))
            }
            None => Ok(None),
        }
    }
}
