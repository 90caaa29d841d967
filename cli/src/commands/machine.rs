//! `blip machine`: manage the virtualized docker hosts.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::app::AppContext;
use crate::application::services::{machine, workspace};
use crate::domain::config::{MachineConfiguration, WorkspaceMachine};
use crate::domain::machine::{self as machine_domain, CreateOptions, DEFAULT_DRIVER, MachineSize};
use crate::domain::MachineField;
use crate::output::{Renderer, progress};

/// Machine subcommands.
#[derive(Subcommand)]
pub enum MachineCommand {
    /// List machines
    Ls {
        /// Comma separated fields to show (default: all)
        #[arg(long, value_delimiter = ',')]
        fields: Vec<MachineField>,
    },
    /// Create a machine and add it to the current workspace
    Create(CreateArgs),
    /// Start a machine (default: the workspace default machine)
    Start { name: Option<String> },
    /// Stop a machine (default: the workspace default machine)
    Stop { name: Option<String> },
    /// Remove a machine and unmap its domains
    Rm { name: String },
    /// Print the connection environment, e.g. `eval $(blip machine env web)`
    Env {
        name: Option<String>,
        /// Shell flavour for the export lines
        #[arg(long, default_value = machine::DEFAULT_SHELL)]
        shell: String,
        /// Print parsed `KEY=value` pairs instead of the shell script
        #[arg(long)]
        parsed: bool,
    },
}

/// Arguments for `blip machine create`.
#[derive(Args)]
pub struct CreateArgs {
    /// Machine name
    pub name: String,

    /// Virtualization driver (default: global defaultDriver, else virtualbox)
    #[arg(long)]
    pub driver: Option<String>,

    /// Number of CPUs
    #[arg(long, default_value_t = MachineSize::default().cpu_count)]
    pub cpu_count: u32,

    /// Memory in MB
    #[arg(long, default_value_t = MachineSize::default().ram_mb)]
    pub ram: u32,

    /// Disk size in MB
    #[arg(long, default_value_t = MachineSize::default().disk_mb)]
    pub disk: u32,

    /// Registry mirror for the engine (repeatable)
    #[arg(long = "engine-registry-mirror")]
    pub registry_mirror: Vec<String>,

    /// Insecure registry for the engine (repeatable)
    #[arg(long = "engine-insecure-registry")]
    pub insecure_registry: Vec<String>,

    /// Extra driver flags, shell quoted, e.g. "--virtualbox-no-share"
    #[arg(long, allow_hyphen_values = true)]
    pub driver_opts: Option<String>,
}

/// Run the machine command.
///
/// # Errors
///
/// Returns an error if the machine tool is unavailable or the operation fails.
pub async fn run(app: &AppContext, cmd: MachineCommand) -> Result<ExitCode> {
    match cmd {
        MachineCommand::Ls { fields } => {
            let fields = machine_domain::request_fields(&fields);
            let machines = machine::ls(&app.runner, &app.tools.machine, &fields).await?;
            app.renderer().render_machines(&machines, &fields)?;
        }
        MachineCommand::Create(args) => create(app, args).await?,
        MachineCommand::Start { name } => {
            let name = target(app, name)?;
            let pb = progress::spinner(&app.output, &format!("Starting {name}..."));
            machine::start(&app.runner, &app.tools.machine, &name).await?;
            progress::finish_ok(&pb, &format!("{name} started"));
        }
        MachineCommand::Stop { name } => {
            let name = target(app, name)?;
            let pb = progress::spinner(&app.output, &format!("Stopping {name}..."));
            machine::stop(&app.runner, &app.tools.machine, &name).await?;
            progress::finish_ok(&pb, &format!("{name} stopped"));
        }
        MachineCommand::Rm { name } => {
            let pb = progress::spinner(&app.output, &format!("Removing {name}..."));
            machine::remove(&app.runner, &app.tools.machine, &name).await?;
            progress::finish_clear(&pb);
            let unmapped = if workspace::is_workspace(&app.fs, &app.cwd) {
                app.router().forget_machine(&name).await?
            } else {
                Vec::new()
            };
            match app.renderer() {
                Renderer::Json(r) => r.render(&serde_json::json!({
                    "removed": name,
                    "unmappedDomains": unmapped,
                }))?,
                Renderer::Human(_) => {
                    app.output.success(&format!("{name} removed"));
                    for domain in &unmapped {
                        app.output.info(&format!("Unmapped {domain}"));
                    }
                }
            }
        }
        MachineCommand::Env {
            name,
            shell,
            parsed,
        } => {
            let name = target(app, name)?;
            if parsed || app.is_json() {
                let env = machine::env(&app.runner, &app.tools.machine, &name, &shell).await?;
                app.renderer().render_environment(&env)?;
            } else {
                let script =
                    machine::env_stdout(&app.runner, &app.tools.machine, &name, &shell).await?;
                print!("{script}");
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn create(app: &AppContext, args: CreateArgs) -> Result<()> {
    let driver = match args.driver {
        Some(driver) => driver,
        None => workspace::read_global_config(&app.config_store)?
            .default_driver
            .unwrap_or_else(|| DEFAULT_DRIVER.to_string()),
    };
    let size = MachineSize {
        cpu_count: args.cpu_count,
        ram_mb: args.ram,
        disk_mb: args.disk,
    };
    let mut driver_options = size.driver_options(&driver);
    if let Some(raw) = &args.driver_opts {
        let tokens = shell_words::split(raw).context("cannot parse --driver-opts")?;
        driver_options.extend(machine_domain::pair_driver_options(&tokens));
    }
    let options = CreateOptions {
        driver: driver.clone(),
        engine_registry_mirror: args.registry_mirror,
        engine_insecure_registry: args.insecure_registry,
    };

    let pb = progress::spinner(&app.output, &format!("Creating {}...", args.name));
    let created = machine::create(
        &app.runner,
        &app.tools.machine,
        &args.name,
        &options,
        &driver_options,
    )
    .await?;
    progress::finish_clear(&pb);

    let in_workspace = workspace::is_workspace(&app.fs, &app.cwd);
    if in_workspace {
        let (paths, mut config) =
            workspace::read_workspace(&app.fs, &app.workspace_store, &app.cwd)?;
        let domains = config
            .machines
            .get(&args.name)
            .map(|m| m.domains.clone())
            .unwrap_or_default();
        workspace::record_machine(
            &mut config,
            &args.name,
            WorkspaceMachine {
                domains,
                configuration: MachineConfiguration::from(size),
                driver,
                attached: !created,
            },
        );
        workspace::overwrite_workspace(&app.workspace_store, &paths, &config)?;
    }

    match app.renderer() {
        Renderer::Json(r) => r.render(&serde_json::json!({
            "name": args.name,
            "created": created,
            "workspace": in_workspace,
        }))?,
        Renderer::Human(_) => {
            if created {
                app.output.success(&format!("{} created", args.name));
            } else {
                app.output
                    .info(&format!("{} already exists", args.name));
            }
        }
    }
    Ok(())
}

/// `name`, or the workspace default machine when omitted.
fn target(app: &AppContext, name: Option<String>) -> Result<String> {
    if let Some(name) = name {
        return Ok(name);
    }
    let (_, config) = workspace::read_workspace(&app.fs, &app.workspace_store, &app.cwd)?;
    workspace::resolve_machine(&config, None)
}
