//! `blip cert`: per-domain TLS certificates.

use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::app::AppContext;
use crate::application::services::certs::{self, CertScope};
use crate::output::Renderer;

/// Domain and storage scope shared by the cert subcommands.
#[derive(Args)]
pub struct CertTarget {
    /// Domain name
    pub domain: String,

    /// Use the per-user store instead of the workspace's `.blip/certs`
    #[arg(long)]
    pub global: bool,
}

impl CertTarget {
    fn scope(&self) -> CertScope {
        if self.global {
            CertScope::Global
        } else {
            CertScope::Workspace
        }
    }
}

/// Cert subcommands.
#[derive(Subcommand)]
pub enum CertCommand {
    /// Issue a self-signed certificate (overwrites an existing one)
    Create(CertTarget),
    /// Check whether a certificate exists; exits 1 when it does not
    Exists(CertTarget),
}

/// Run the cert command.
///
/// # Errors
///
/// Returns an error for an invalid domain, when the workspace scope is used
/// outside a workspace, or when issuing fails.
pub fn run(app: &AppContext, cmd: &CertCommand) -> Result<ExitCode> {
    match cmd {
        CertCommand::Create(target) => {
            let dir = certs::certs_dir(&app.fs, target.scope(), &app.config_dir()?, &app.cwd)?;
            certs::create_domain_certificate(&app.fs, &app.issuer, &dir, &target.domain)?;
            match app.renderer() {
                Renderer::Json(r) => r.render(&serde_json::json!({
                    "domain": target.domain,
                    "dir": dir,
                }))?,
                Renderer::Human(_) => app.output.success(&format!(
                    "Certificate for {} written to {}",
                    target.domain,
                    dir.display()
                )),
            }
            Ok(ExitCode::SUCCESS)
        }
        CertCommand::Exists(target) => {
            let dir = certs::certs_dir(&app.fs, target.scope(), &app.config_dir()?, &app.cwd)?;
            let exists = certs::domain_certificate_exists(&app.fs, &dir, &target.domain)?;
            match app.renderer() {
                Renderer::Json(r) => r.render(&serde_json::json!({
                    "domain": target.domain,
                    "exists": exists,
                }))?,
                Renderer::Human(_) if exists => app.output.success(&format!(
                    "Certificate for {} found in {}",
                    target.domain,
                    dir.display()
                )),
                Renderer::Human(_) => app.output.warn(&format!(
                    "No certificate for {} in {}",
                    target.domain,
                    dir.display()
                )),
            }
            Ok(if exists {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}
