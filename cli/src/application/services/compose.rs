//! Compose bridge: engine-side container detail scoped to one compose project.

use anyhow::Result;

use super::{docker, run_tool};
use crate::application::ports::CommandRunner;
use crate::application::tooling::ToolHandle;
use crate::domain::{ContainerField, ContainerRecord, MachineEnvironment};

/// Compose file used when none is given.
pub const DEFAULT_COMPOSE_FILE: &str = "docker-compose.yml";

/// Containers that belong to the compose project in `file`.
///
/// Lists every container through the engine, lists the project's ids through
/// compose, and keeps the intersection.
///
/// # Errors
///
/// Returns an error if either tool is unavailable or any invocation fails.
pub async fn ps(
    runner: &impl CommandRunner,
    compose: &ToolHandle,
    docker_tool: &ToolHandle,
    env: Option<&MachineEnvironment>,
    file: &str,
    fields: &[ContainerField],
) -> Result<Vec<ContainerRecord>> {
    compose.ensure_available(runner).await?;

    let containers = docker::ps(runner, docker_tool, env, fields).await?;

    let stdout = run_tool(runner, compose.program(), &["-f", file, "ps", "-q"], env).await?;
    let project_ids: Vec<&str> = stdout
        .lines()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .collect();

    Ok(containers
        .into_iter()
        .filter(|c| project_ids.iter().any(|id| c.matches_id(id)))
        .collect())
}

/// `docker-compose -f <file> up -d`
///
/// # Errors
///
/// Returns an error if compose is unavailable or the invocation fails.
pub async fn up(
    runner: &impl CommandRunner,
    compose: &ToolHandle,
    env: Option<&MachineEnvironment>,
    file: &str,
) -> Result<()> {
    project_command(runner, compose, env, &["-f", file, "up", "-d"]).await
}

/// `docker-compose -f <file> down`
///
/// # Errors
///
/// Returns an error if compose is unavailable or the invocation fails.
pub async fn down(
    runner: &impl CommandRunner,
    compose: &ToolHandle,
    env: Option<&MachineEnvironment>,
    file: &str,
) -> Result<()> {
    project_command(runner, compose, env, &["-f", file, "down"]).await
}

/// `docker-compose -f <file> start`
///
/// # Errors
///
/// Returns an error if compose is unavailable or the invocation fails.
pub async fn start(
    runner: &impl CommandRunner,
    compose: &ToolHandle,
    env: Option<&MachineEnvironment>,
    file: &str,
) -> Result<()> {
    project_command(runner, compose, env, &["-f", file, "start"]).await
}

/// `docker-compose -f <file> stop`
///
/// # Errors
///
/// Returns an error if compose is unavailable or the invocation fails.
pub async fn stop(
    runner: &impl CommandRunner,
    compose: &ToolHandle,
    env: Option<&MachineEnvironment>,
    file: &str,
) -> Result<()> {
    project_command(runner, compose, env, &["-f", file, "stop"]).await
}

async fn project_command(
    runner: &impl CommandRunner,
    compose: &ToolHandle,
    env: Option<&MachineEnvironment>,
    args: &[&str],
) -> Result<()> {
    compose.ensure_available(runner).await?;
    run_tool(runner, compose.program(), args, env).await?;
    Ok(())
}
