//! Machine tool operations: list, create, env, start, stop, remove.
//!
//! Every operation validates the machine name and passes the availability
//! gate before doing real work. Nothing is retried.

use anyhow::Result;

use super::run_tool;
use crate::application::ports::CommandRunner;
use crate::application::tooling::ToolHandle;
use crate::domain::machine::{
    self, CreateOptions, MachineEnvironment, MachineField, MachineRecord, validate_machine_name,
};

/// Shell flavour used when none is given.
pub const DEFAULT_SHELL: &str = "bash";

/// List machines with the requested fields (`Name` always included).
///
/// # Errors
///
/// Returns an error if the machine tool is unavailable or the listing fails.
pub async fn ls(
    runner: &impl CommandRunner,
    tool: &ToolHandle,
    fields: &[MachineField],
) -> Result<Vec<MachineRecord>> {
    tool.ensure_available(runner).await?;

    let fields = machine::request_fields(fields);
    let template = machine::format_template(&fields);
    let stdout = run_tool(
        runner,
        tool.program(),
        &["ls", "--format", template.as_str()],
        None,
    )
    .await?;
    Ok(machine::parse_ls(&stdout, &fields))
}

/// Create machine `name` unless one with that name already exists.
///
/// Returns `true` when a machine was created.
///
/// # Errors
///
/// Returns an error if the name is blank, the tool is unavailable, or
/// either the listing or the create invocation fails.
pub async fn create(
    runner: &impl CommandRunner,
    tool: &ToolHandle,
    name: &str,
    options: &CreateOptions,
    driver_options: &[(String, Option<String>)],
) -> Result<bool> {
    validate_machine_name(name)?;
    tool.ensure_available(runner).await?;

    let existing = ls(runner, tool, &[MachineField::Name]).await?;
    if existing.iter().any(|m| m.name == name) {
        tracing::info!(machine = name, "machine already exists, skipping create");
        return Ok(false);
    }

    let extra = machine::create_args(options, driver_options);
    let mut args = vec!["create", name];
    args.extend(extra.iter().map(String::as_str));
    run_tool(runner, tool.program(), &args, None).await?;
    Ok(true)
}

/// Connection environment for `name`, parsed from the shell-export dump.
///
/// # Errors
///
/// Returns an error if the name is blank, the tool is unavailable, or the
/// invocation fails.
pub async fn env(
    runner: &impl CommandRunner,
    tool: &ToolHandle,
    name: &str,
    shell: &str,
) -> Result<MachineEnvironment> {
    let stdout = env_stdout(runner, tool, name, shell).await?;
    Ok(MachineEnvironment::parse(&stdout))
}

/// Raw `docker-machine env <name> --shell <shell>` output.
///
/// # Errors
///
/// Returns an error if the name is blank, the tool is unavailable, or the
/// invocation fails.
pub async fn env_stdout(
    runner: &impl CommandRunner,
    tool: &ToolHandle,
    name: &str,
    shell: &str,
) -> Result<String> {
    validate_machine_name(name)?;
    tool.ensure_available(runner).await?;
    run_tool(runner, tool.program(), &["env", name, "--shell", shell], None).await
}

/// Start machine `name`.
///
/// # Errors
///
/// Returns an error if the name is blank, the tool is unavailable, or the
/// invocation fails.
pub async fn start(runner: &impl CommandRunner, tool: &ToolHandle, name: &str) -> Result<()> {
    lifecycle(runner, tool, &["start", name], name).await
}

/// Stop machine `name`.
///
/// # Errors
///
/// Returns an error if the name is blank, the tool is unavailable, or the
/// invocation fails.
pub async fn stop(runner: &impl CommandRunner, tool: &ToolHandle, name: &str) -> Result<()> {
    lifecycle(runner, tool, &["stop", name], name).await
}

/// Force-remove machine `name`.
///
/// # Errors
///
/// Returns an error if the name is blank, the tool is unavailable, or the
/// invocation fails.
pub async fn remove(runner: &impl CommandRunner, tool: &ToolHandle, name: &str) -> Result<()> {
    lifecycle(runner, tool, &["rm", "--force", name], name).await
}

async fn lifecycle(
    runner: &impl CommandRunner,
    tool: &ToolHandle,
    args: &[&str],
    name: &str,
) -> Result<()> {
    validate_machine_name(name)?;
    tool.ensure_available(runner).await?;
    run_tool(runner, tool.program(), args, None).await?;
    Ok(())
}
