//! Application services: use-case orchestration.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application`: never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

pub mod certs;
pub mod compose;
pub mod docker;
pub mod hosts;
pub mod machine;
pub mod routing;
pub mod workspace;

use anyhow::{Context, Result};

use crate::application::ports::CommandRunner;
use crate::application::tooling::ensure_success;
use crate::domain::MachineEnvironment;

/// Run one tool invocation and return its stdout, failing on non-zero exit.
///
/// `env` is layered over the ambient environment when present.
pub(crate) async fn run_tool(
    runner: &impl CommandRunner,
    program: &str,
    args: &[&str],
    env: Option<&MachineEnvironment>,
) -> Result<String> {
    tracing::debug!(program, ?args, machine_env = env.is_some(), "running tool");
    let output = match env {
        Some(env) => runner.run_with_env(program, args, env).await,
        None => runner.run(program, args).await,
    }
    .with_context(|| format!("{program} {}", args.first().copied().unwrap_or_default()))?;
    let output = ensure_success(program, args, output)?;
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
