//! `blip ps`: list containers on a machine, optionally scoped to a compose project.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::{compose, docker};
use crate::domain::ContainerField;
use crate::domain::container::request_fields;

/// Arguments for `blip ps`.
#[derive(Args)]
pub struct PsArgs {
    /// Machine to query (default: the workspace default machine)
    #[arg(long)]
    pub machine: Option<String>,

    /// Only containers of this compose project file
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = compose::DEFAULT_COMPOSE_FILE)]
    pub compose: Option<String>,

    /// Comma separated fields to show (default: all)
    #[arg(long, value_delimiter = ',')]
    pub fields: Vec<ContainerField>,
}

/// Run `blip ps`.
///
/// # Errors
///
/// Returns an error if a tool is unavailable or any invocation fails.
pub async fn run(app: &AppContext, args: &PsArgs) -> Result<ExitCode> {
    let env = app.machine_environment(args.machine.as_deref()).await?;
    let fields = request_fields(&args.fields);

    let containers = match &args.compose {
        Some(file) => {
            compose::ps(
                &app.runner,
                &app.tools.compose,
                &app.tools.docker,
                env.as_ref(),
                file,
                &fields,
            )
            .await?
        }
        None => docker::ps(&app.runner, &app.tools.docker, env.as_ref(), &fields).await?,
    };

    app.renderer().render_containers(&containers, &fields)?;
    Ok(ExitCode::SUCCESS)
}
