//! Unit tests for the tool availability gate.

#![allow(clippy::expect_used)]

use blip_cli::application::{Availability, ToolHandle};
use blip_cli::domain::ToolError;

use crate::mocks::ScriptedRunner;

#[tokio::test]
async fn probe_runs_once_for_repeated_calls() {
    let runner = ScriptedRunner::new().with_tools();
    let docker = ToolHandle::docker();
    assert_eq!(docker.availability(), Availability::Unknown);

    for _ in 0..3 {
        docker.ensure_available(&runner).await.expect("docker available");
    }

    assert_eq!(docker.availability(), Availability::Available);
    assert_eq!(runner.count("docker", &["-v"]), 1);
}

#[tokio::test]
async fn missing_tool_fails_every_call_without_reprobing() {
    let runner = ScriptedRunner::new().fail("docker-machine", &["-v"], 127, "not found");
    let tool = ToolHandle::docker_machine();

    for _ in 0..2 {
        let err = tool
            .ensure_available(&runner)
            .await
            .expect_err("tool should be unavailable");
        let ToolError::Unavailable { tool: name, message } =
            err.downcast_ref::<ToolError>().expect("ToolError");
        assert_eq!(name, "docker-machine");
        assert!(message.contains("install-machine"), "got: {message}");
    }

    assert_eq!(tool.availability(), Availability::Missing);
    assert_eq!(runner.count("docker-machine", &["-v"]), 1);
}

#[tokio::test]
async fn spawn_failure_counts_as_missing() {
    let runner = ScriptedRunner::new().missing("docker-compose");
    let compose = ToolHandle::docker_compose();

    let err = compose
        .ensure_available(&runner)
        .await
        .expect_err("spawn failure should be unavailable");

    assert!(err.to_string().contains("Docker compose is missing"), "got: {err}");
    assert_eq!(compose.availability(), Availability::Missing);
}

#[tokio::test]
async fn handles_cache_independently() {
    let runner = ScriptedRunner::new()
        .ok("docker", &["-v"], "Docker version 24.0.7\n")
        .missing("docker-compose");
    let docker = ToolHandle::docker();
    let compose = ToolHandle::docker_compose();

    docker.ensure_available(&runner).await.expect("docker available");
    assert!(compose.ensure_available(&runner).await.is_err());
    docker.ensure_available(&runner).await.expect("docker still available");

    assert_eq!(runner.lines(), ["docker -v", "docker-compose -v"]);
}
