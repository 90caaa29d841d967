//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags};
use crate::commands;

/// Reproducible multi-machine Docker workspaces
#[derive(Parser)]
#[command(
    name = "blip",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print debug diagnostics to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a workspace in the current directory
    Init(commands::init::InitArgs),

    /// Manage machines
    #[command(subcommand)]
    Machine(commands::machine::MachineCommand),

    /// List containers
    Ps(commands::ps::PsArgs),

    /// Drive a compose project
    #[command(subcommand)]
    Compose(commands::compose::ComposeCommand),

    /// Route domains to machines
    #[command(subcommand)]
    Domain(commands::domain::DomainCommand),

    /// Inspect the hosts file
    #[command(subcommand)]
    Hosts(commands::hosts::HostsCommand),

    /// Manage TLS certificates
    #[command(subcommand)]
    Cert(commands::cert::CertCommand),

    /// Manage global configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Output flags for `AppContext::new`.
    #[must_use]
    pub fn flags(&self) -> AppFlags {
        AppFlags {
            no_color: self.no_color,
            quiet: self.quiet,
            json: self.json,
            verbose: self.verbose,
        }
    }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self, app: &AppContext) -> Result<ExitCode> {
        match self.command {
            Command::Init(args) => commands::init::run(app, &args),
            Command::Machine(cmd) => commands::machine::run(app, cmd).await,
            Command::Ps(args) => commands::ps::run(app, &args).await,
            Command::Compose(cmd) => commands::compose::run(app, cmd).await,
            Command::Domain(cmd) => commands::domain::run(app, cmd).await,
            Command::Hosts(cmd) => commands::hosts::run(app, cmd).await,
            Command::Cert(cmd) => commands::cert::run(app, &cmd),
            Command::Config(cmd) => commands::config::run(app, cmd),
            Command::Version => commands::version::run(app),
        }
    }
}
