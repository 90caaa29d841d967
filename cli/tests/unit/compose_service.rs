//! Unit tests for the compose bridge.

#![allow(clippy::expect_used)]

use blip_cli::application::ToolHandle;
use blip_cli::application::services::compose;
use blip_cli::domain::{ContainerField, ContainerStatus, MachineEnvironment};

use crate::mocks::ScriptedRunner;

#[tokio::test]
async fn ps_keeps_only_project_containers() {
    let runner = ScriptedRunner::new()
        .with_tools()
        .ok(
            "docker",
            &["ps"],
            "aaaaaaaaaaaa|Up|app_web_1\nbbbbbbbbbbbb|Up|other\ncccccccccccc|Up|app_db_1\n",
        )
        .ok(
            "docker",
            &["inspect"],
            "aaaaaaaaaaaa1111|running\nbbbbbbbbbbbb2222|running\ncccccccccccc3333|paused\n",
        )
        .ok(
            "docker-compose",
            &["-f", "docker-compose.yml", "ps", "-q"],
            "aaaaaaaaaaaa1111\ncccccccccccc3333\ndddddddddddd4444\n\n",
        );
    let compose_tool = ToolHandle::docker_compose();
    let docker_tool = ToolHandle::docker();

    let records = compose::ps(
        &runner,
        &compose_tool,
        &docker_tool,
        None,
        compose::DEFAULT_COMPOSE_FILE,
        &[ContainerField::Status, ContainerField::Names],
    )
    .await
    .expect("compose ps succeeds");

    let names: Vec<_> = records.iter().filter_map(|r| r.names.as_deref()).collect();
    assert_eq!(names, ["app_web_1", "app_db_1"]);
    assert_eq!(records[1].status, Some(ContainerStatus::Paused));
}

#[tokio::test]
async fn ps_with_empty_project_returns_nothing() {
    let runner = ScriptedRunner::new()
        .with_tools()
        .ok("docker", &["ps"], "aaaaaaaaaaaa|nginx\n")
        .ok("docker", &["inspect"], "aaaaaaaaaaaa|running\n")
        .ok("docker-compose", &["-f"], "");
    let compose_tool = ToolHandle::docker_compose();
    let docker_tool = ToolHandle::docker();

    let records = compose::ps(
        &runner,
        &compose_tool,
        &docker_tool,
        None,
        "stack.yml",
        &[],
    )
    .await
    .expect("compose ps succeeds");

    assert!(records.is_empty());
    assert_eq!(
        runner.lines().last().expect("compose call"),
        "docker-compose -f stack.yml ps -q"
    );
}

#[tokio::test]
async fn project_commands_forward_file_and_environment() {
    let runner = ScriptedRunner::new()
        .with_tools()
        .ok("docker-compose", &["-f"], "");
    let tool = ToolHandle::docker_compose();
    let env = MachineEnvironment::from_pairs([("DOCKER_MACHINE_NAME", "web")]);

    compose::up(&runner, &tool, Some(&env), "app.yml").await.expect("up");
    compose::start(&runner, &tool, Some(&env), "app.yml").await.expect("start");
    compose::stop(&runner, &tool, Some(&env), "app.yml").await.expect("stop");
    compose::down(&runner, &tool, Some(&env), "app.yml").await.expect("down");

    assert_eq!(
        runner.lines(),
        [
            "docker-compose -v",
            "docker-compose -f app.yml up -d",
            "docker-compose -f app.yml start",
            "docker-compose -f app.yml stop",
            "docker-compose -f app.yml down",
        ]
    );
    assert!(runner.calls()[1..].iter().all(|c| c.with_env));
}

#[tokio::test]
async fn missing_compose_stops_before_docker() {
    let runner = ScriptedRunner::new().missing("docker-compose");
    let compose_tool = ToolHandle::docker_compose();
    let docker_tool = ToolHandle::docker();

    let err = compose::ps(&runner, &compose_tool, &docker_tool, None, "app.yml", &[])
        .await
        .expect_err("compose missing");

    assert!(err.to_string().contains("Docker compose is missing"));
    assert_eq!(runner.lines(), ["docker-compose -v"]);
}
