//! `blip hosts`: inspect the hosts file.

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::services::hosts::HostsFile;

/// Hosts subcommands.
#[derive(Subcommand)]
pub enum HostsCommand {
    /// List domain mappings
    Ls {
        /// Also print comment and unrecognised lines
        #[arg(long)]
        all: bool,
    },
}

/// Run the hosts command.
///
/// # Errors
///
/// Returns an error if the hosts file cannot be read, even with elevated privileges.
pub async fn run(app: &AppContext, cmd: HostsCommand) -> Result<ExitCode> {
    match cmd {
        HostsCommand::Ls { all } => {
            let hosts = HostsFile::load(&app.fs, &app.sudo, &app.hosts_path).await?;
            app.renderer().render_hosts(hosts.document(), all)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}
