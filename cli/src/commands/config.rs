//! `blip config`: show and set global configuration values.

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::application::services::workspace;

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Set configuration value
    Set {
        /// Configuration key (defaultDriver)
        key: String,
        /// Configuration value
        value: String,
    },
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error for an unknown key or when the file cannot be read or written.
pub fn run(app: &AppContext, cmd: ConfigCommand) -> Result<ExitCode> {
    match cmd {
        ConfigCommand::Show => {
            let config = workspace::read_global_config(&app.config_store)?;
            let path = app.config_store.path()?;
            app.renderer().render_config(&config, &path)?;
        }
        ConfigCommand::Set { key, value } => {
            let mut config = workspace::read_global_config(&app.config_store)?;
            match key.as_str() {
                "defaultDriver" => config.default_driver = Some(value.clone()),
                _ => anyhow::bail!("Unknown setting: {key}\n\nValid settings: defaultDriver"),
            }
            workspace::overwrite_global_config(&app.config_store, &config)?;
            app.output.success(&format!("Set {key} = {value}"));
        }
    }
    Ok(ExitCode::SUCCESS)
}
