//! `blip domain`: route hostnames to workspace machines.

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::output::Renderer;

/// Domain subcommands.
#[derive(Subcommand)]
pub enum DomainCommand {
    /// Map a domain to a machine and issue its certificate
    Add {
        /// Domain name, e.g. app.blip.test
        domain: String,
        /// Machine serving the domain (default: the workspace default machine)
        #[arg(long)]
        machine: Option<String>,
    },
    /// Unmap a domain
    Rm {
        /// Domain name
        domain: String,
    },
}

/// Run the domain command.
///
/// # Errors
///
/// Returns an error for an invalid domain, outside a workspace, or when
/// the hosts file cannot be updated.
pub async fn run(app: &AppContext, cmd: DomainCommand) -> Result<ExitCode> {
    let router = app.router();
    match cmd {
        DomainCommand::Add { domain, machine } => {
            let outcome = router.bind_domain(machine.as_deref(), &domain).await?;
            match app.renderer() {
                Renderer::Json(r) => r.render(&serde_json::json!({
                    "domain": domain,
                    "machine": outcome.machine,
                    "address": outcome.address,
                    "replaced": outcome.replaced,
                    "certificateIssued": outcome.certificate_issued,
                }))?,
                Renderer::Human(_) => {
                    app.output.success(&format!(
                        "{domain} → {} ({})",
                        outcome.address, outcome.machine
                    ));
                    if outcome.certificate_issued {
                        app.output.info(&format!("Issued certificate for {domain}"));
                    }
                }
            }
        }
        DomainCommand::Rm { domain } => {
            let removed = router.unbind_domain(&domain).await?;
            match app.renderer() {
                Renderer::Json(r) => r.render(&serde_json::json!({
                    "domain": domain,
                    "removed": removed,
                }))?,
                Renderer::Human(_) if removed => {
                    app.output.success(&format!("{domain} unmapped"));
                }
                Renderer::Human(_) => app.output.info(&format!("{domain} was not mapped")),
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
