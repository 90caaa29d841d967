//! Container listing with status reconciliation.
//!
//! Imports only from `crate::domain` and `crate::application`.

use anyhow::Result;

use super::run_tool;
use crate::application::ports::CommandRunner;
use crate::application::tooling::ToolHandle;
use crate::domain::container::{self, ContainerField, ContainerRecord, INSPECT_TEMPLATE};
use crate::domain::MachineEnvironment;

/// List all containers (`docker ps -a`) with the requested fields.
///
/// An empty `fields` slice requests every field. The id is always requested.
/// When `Status` is requested, a second `docker inspect` pass replaces the
/// listing's coarse status with the engine's lifecycle state.
///
/// # Errors
///
/// Returns an error if docker is unavailable or either invocation fails.
pub async fn ps(
    runner: &impl CommandRunner,
    docker: &ToolHandle,
    env: Option<&MachineEnvironment>,
    fields: &[ContainerField],
) -> Result<Vec<ContainerRecord>> {
    docker.ensure_available(runner).await?;

    let fields = container::request_fields(fields);
    let columns = container::listing_columns(&fields);
    let template = container::format_template(&columns);
    let stdout = run_tool(
        runner,
        docker.program(),
        &["ps", "-a", "--format", template.as_str()],
        env,
    )
    .await?;
    let mut records = container::parse_ps(&stdout, &columns);

    if fields.contains(&ContainerField::Status) && !records.is_empty() {
        let inspected = {
            let mut args = vec!["inspect", "--format", INSPECT_TEMPLATE];
            args.extend(records.iter().map(|r| r.id.as_str()));
            let stdout = run_tool(runner, docker.program(), &args, env).await?;
            container::parse_inspect(&stdout)
        };
        container::reconcile_statuses(&mut records, &inspected);
    }

    Ok(records)
}
