//! `blip init`: turn a directory into a workspace.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::workspace;
use crate::output::Renderer;

/// Arguments for the `blip init` command.
#[derive(Args)]
pub struct InitArgs {
    /// Directory to initialise (defaults to the current directory)
    #[arg(long)]
    pub path: Option<PathBuf>,
}

/// Run `blip init`.
///
/// # Errors
///
/// Returns an error if the definition file or state directory cannot be written.
pub fn run(app: &AppContext, args: &InitArgs) -> Result<ExitCode> {
    let dir = args.path.clone().unwrap_or_else(|| app.cwd.clone());
    let created = workspace::create_workspace(
        &app.fs,
        &app.workspace_store,
        &dir,
        env!("CARGO_PKG_VERSION"),
    )?;
    let root = workspace::locate(&app.fs, &dir).root;

    match app.renderer() {
        Renderer::Json(r) => r.render(&serde_json::json!({
            "created": created,
            "root": root,
        }))?,
        Renderer::Human(_) => {
            if created {
                app.output
                    .success(&format!("Workspace initialised in {}", root.display()));
                app.output.info("Next: blip machine create <name>");
            } else {
                app.output
                    .info(&format!("Already inside the workspace at {}", root.display()));
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
