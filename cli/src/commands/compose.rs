//! `blip compose`: drive a compose project against a machine.

use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::app::AppContext;
use crate::application::services::compose;
use crate::output::progress;

/// Options shared by every compose subcommand.
#[derive(Args)]
pub struct ComposeTarget {
    /// Compose file
    #[arg(short, long, default_value = compose::DEFAULT_COMPOSE_FILE)]
    pub file: String,

    /// Machine to run against (default: the workspace default machine)
    #[arg(long)]
    pub machine: Option<String>,
}

/// Compose subcommands.
#[derive(Subcommand)]
pub enum ComposeCommand {
    /// Create and start the project's containers (detached)
    Up(ComposeTarget),
    /// Stop and remove the project's containers
    Down(ComposeTarget),
    /// Start existing containers
    Start(ComposeTarget),
    /// Stop running containers
    Stop(ComposeTarget),
}

/// Run the compose command.
///
/// # Errors
///
/// Returns an error if compose is unavailable or the invocation fails.
pub async fn run(app: &AppContext, cmd: ComposeCommand) -> Result<ExitCode> {
    let (verb, target) = match &cmd {
        ComposeCommand::Up(t) => ("up", t),
        ComposeCommand::Down(t) => ("down", t),
        ComposeCommand::Start(t) => ("start", t),
        ComposeCommand::Stop(t) => ("stop", t),
    };
    let env = app.machine_environment(target.machine.as_deref()).await?;
    let env = env.as_ref();
    let file = target.file.as_str();
    let tool = &app.tools.compose;

    let pb = progress::spinner(&app.output, &format!("compose {verb} ({file})..."));
    match &cmd {
        ComposeCommand::Up(_) => compose::up(&app.runner, tool, env, file).await?,
        ComposeCommand::Down(_) => compose::down(&app.runner, tool, env, file).await?,
        ComposeCommand::Start(_) => compose::start(&app.runner, tool, env, file).await?,
        ComposeCommand::Stop(_) => compose::stop(&app.runner, tool, env, file).await?,
    }
    progress::finish_ok(&pb, &format!("compose {verb} done"));
    Ok(ExitCode::SUCCESS)
}
