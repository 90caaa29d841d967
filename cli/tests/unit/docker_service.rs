//! Unit tests for container listing and status reconciliation.

#![allow(clippy::expect_used)]

use blip_cli::application::ToolHandle;
use blip_cli::application::services::docker;
use blip_cli::domain::{CommandError, ContainerField, ContainerStatus, MachineEnvironment};

use crate::mocks::ScriptedRunner;

const STATUS_TEMPLATE: &str = "{{.ID}}|{{.Status}}|{{.Names}}";

#[tokio::test]
async fn status_is_replaced_by_inspect_state() {
    let runner = ScriptedRunner::new()
        .with_tools()
        .ok(
            "docker",
            &["ps", "-a", "--format", STATUS_TEMPLATE],
            "abc123def456|Up 2 hours|web\n0123456789ab|Exited (0) 3 days ago|db\n",
        )
        .ok(
            "docker",
            &["inspect"],
            "\"abc123def456ffff|exited\"\n0123456789abcccc|dead\n",
        );
    let tool = ToolHandle::docker();

    let records = docker::ps(
        &runner,
        &tool,
        None,
        &[ContainerField::Status, ContainerField::Names],
    )
    .await
    .expect("ps succeeds");

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, "abc123def456");
    assert_eq!(records[0].names.as_deref(), Some("web"));
    assert_eq!(records[0].status, Some(ContainerStatus::Exited));
    assert_eq!(records[1].status, Some(ContainerStatus::Dead));
}

#[tokio::test]
async fn inspect_receives_every_listed_id() {
    let runner = ScriptedRunner::new()
        .with_tools()
        .ok(
            "docker",
            &["ps"],
            "aaaaaaaaaaaa|Up|web\nbbbbbbbbbbbb|Up|db\n",
        )
        .ok("docker", &["inspect"], "");
    let tool = ToolHandle::docker();

    let records = docker::ps(
        &runner,
        &tool,
        None,
        &[ContainerField::Status, ContainerField::Names],
    )
    .await
    .expect("ps succeeds");

    let inspect = runner
        .calls()
        .into_iter()
        .find(|c| c.args.first().map(String::as_str) == Some("inspect"))
        .expect("inspect was called");
    assert_eq!(
        inspect.args,
        [
            "inspect",
            "--format",
            "{{.ID}}|{{.State.Status}}",
            "aaaaaaaaaaaa",
            "bbbbbbbbbbbb"
        ]
    );
    // The listing's coarse status never survives reconciliation.
    assert!(records.iter().all(|r| r.status.is_none()));
}

#[tokio::test]
async fn no_inspect_pass_without_status_field() {
    let runner = ScriptedRunner::new()
        .with_tools()
        .ok("docker", &["ps"], "abc123def456|nginx:1.25\n");
    let tool = ToolHandle::docker();

    let records = docker::ps(&runner, &tool, None, &[ContainerField::Image])
        .await
        .expect("ps succeeds");

    assert_eq!(records[0].image.as_deref(), Some("nginx:1.25"));
    assert_eq!(records[0].id, "abc123def456");
    assert_eq!(runner.count("docker", &["inspect"]), 0);
    assert_eq!(
        runner.lines()[1],
        "docker ps -a --format {{.ID}}|{{.Image}}"
    );
}

#[tokio::test]
async fn piped_command_does_not_corrupt_the_inspected_id() {
    let runner = ScriptedRunner::new()
        .with_tools()
        .ok(
            "docker",
            &["ps", "-a", "--format", "{{.ID}}|{{.Status}}|{{.Command}}"],
            "abc123def456|Up 2 hours|\"sh -c 'tail -f x | grep y'\"\n",
        )
        .ok(
            "docker",
            &["inspect", "--format", "{{.ID}}|{{.State.Status}}", "abc123def456"],
            "abc123def456ffff|running\n",
        );
    let tool = ToolHandle::docker();

    let records = docker::ps(
        &runner,
        &tool,
        None,
        &[ContainerField::Command, ContainerField::Status],
    )
    .await
    .expect("ps succeeds");

    assert_eq!(records[0].id, "abc123def456");
    assert_eq!(records[0].status, Some(ContainerStatus::Running));
    assert_eq!(
        records[0].command.as_deref(),
        Some("\"sh -c 'tail -f x | grep y'\"")
    );
}

#[tokio::test]
async fn machine_environment_is_passed_to_every_invocation() {
    let runner = ScriptedRunner::new()
        .with_tools()
        .ok("docker", &["ps"], "abc123def456|Up|web\n")
        .ok("docker", &["inspect"], "abc123def456|running\n");
    let tool = ToolHandle::docker();
    let env = MachineEnvironment::from_pairs([("DOCKER_HOST", "tcp://192.168.99.100:2376")]);

    docker::ps(
        &runner,
        &tool,
        Some(&env),
        &[ContainerField::Status, ContainerField::Names],
    )
    .await
    .expect("ps succeeds");

    let calls = runner.calls();
    assert!(!calls[0].with_env, "probe runs in the ambient environment");
    assert!(calls[1..].iter().all(|c| c.with_env));
}

#[tokio::test]
async fn failing_listing_surfaces_stderr() {
    let runner = ScriptedRunner::new().with_tools().fail(
        "docker",
        &["ps"],
        1,
        "Cannot connect to the Docker daemon",
    );
    let tool = ToolHandle::docker();

    let err = docker::ps(&runner, &tool, None, &[])
        .await
        .expect_err("listing fails");

    let CommandError::Failed { program, stderr, .. } =
        err.downcast_ref::<CommandError>().expect("CommandError");
    assert_eq!(program, "docker");
    assert!(stderr.contains("Docker daemon"));
}

#[tokio::test]
async fn unavailable_docker_runs_nothing_else() {
    let runner = ScriptedRunner::new().missing("docker");
    let tool = ToolHandle::docker();

    assert!(docker::ps(&runner, &tool, None, &[]).await.is_err());
    assert_eq!(runner.lines(), ["docker -v"]);
}
