//! Unit tests for the machine tool operations.

#![allow(clippy::expect_used)]

use blip_cli::application::services::machine;
use blip_cli::application::{Availability, ToolHandle};
use blip_cli::domain::machine::{CreateOptions, MachineSize};
use blip_cli::domain::{MachineField, MachineState, ValidationError};

use crate::helpers::machine_env_dump;
use crate::mocks::ScriptedRunner;

#[tokio::test]
async fn ls_parses_requested_fields_and_appends_name() {
    let runner = ScriptedRunner::new().with_tools().ok(
        "docker-machine",
        &["ls", "--format", "{{.State}}|{{.URL}}|{{.Name}}"],
        "Running|tcp://192.168.99.100:2376|web\nStopped||db\n",
    );
    let tool = ToolHandle::docker_machine();

    let machines = machine::ls(&runner, &tool, &[MachineField::State, MachineField::Url])
        .await
        .expect("ls succeeds");

    assert_eq!(machines.len(), 2);
    assert_eq!(machines[0].name, "web");
    assert_eq!(machines[0].state, Some(MachineState::Running));
    assert_eq!(machines[0].url.as_deref(), Some("tcp://192.168.99.100:2376"));
    assert_eq!(machines[1].name, "db");
    assert_eq!(machines[1].state, Some(MachineState::Stopped));
}

#[tokio::test]
async fn create_skips_existing_machine() {
    let runner = ScriptedRunner::new()
        .with_tools()
        .ok("docker-machine", &["ls"], "web\ndb\n");
    let tool = ToolHandle::docker_machine();

    let created = machine::create(&runner, &tool, "web", &CreateOptions::default(), &[])
        .await
        .expect("create succeeds");

    assert!(!created);
    assert_eq!(runner.count("docker-machine", &["create"]), 0);
}

#[tokio::test]
async fn create_passes_driver_registry_and_size_flags() {
    let runner = ScriptedRunner::new()
        .with_tools()
        .ok("docker-machine", &["ls"], "db\n")
        .ok("docker-machine", &["create"], "");
    let tool = ToolHandle::docker_machine();
    let options = CreateOptions {
        driver: "virtualbox".to_string(),
        engine_registry_mirror: vec!["https://mirror.local".to_string()],
        engine_insecure_registry: vec!["registry.local:5000".to_string()],
    };
    let mut driver_options = MachineSize {
        cpu_count: 2,
        ram_mb: 4096,
        disk_mb: 20480,
    }
    .driver_options("virtualbox");
    driver_options.push(("--virtualbox-no-share".to_string(), None));

    let created = machine::create(&runner, &tool, "web", &options, &driver_options)
        .await
        .expect("create succeeds");

    assert!(created);
    assert_eq!(
        runner.lines().last().expect("create call"),
        "docker-machine create web --driver virtualbox \
         --engine-registry-mirror https://mirror.local \
         --engine-insecure-registry registry.local:5000 \
         --virtualbox-cpu-count 2 --virtualbox-memory 4096 --virtualbox-disk-size 20480 \
         --virtualbox-no-share"
    );
}

#[tokio::test]
async fn blank_name_is_rejected_before_probing() {
    let runner = ScriptedRunner::new();
    let tool = ToolHandle::docker_machine();

    for result in [
        machine::start(&runner, &tool, " ").await,
        machine::stop(&runner, &tool, "").await,
        machine::remove(&runner, &tool, "").await,
    ] {
        let err = result.expect_err("blank name rejected");
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::EmptyMachineName)
        );
    }

    assert!(runner.calls().is_empty());
    assert_eq!(tool.availability(), Availability::Unknown);
}

#[tokio::test]
async fn lifecycle_commands_use_expected_arguments() {
    let runner = ScriptedRunner::new()
        .with_tools()
        .ok("docker-machine", &["start"], "")
        .ok("docker-machine", &["stop"], "")
        .ok("docker-machine", &["rm"], "");
    let tool = ToolHandle::docker_machine();

    machine::start(&runner, &tool, "web").await.expect("start");
    machine::stop(&runner, &tool, "web").await.expect("stop");
    machine::remove(&runner, &tool, "web").await.expect("remove");

    assert_eq!(
        runner.lines(),
        [
            "docker-machine -v",
            "docker-machine start web",
            "docker-machine stop web",
            "docker-machine rm --force web",
        ]
    );
}

#[tokio::test]
async fn env_parses_exports_for_shell() {
    let runner = ScriptedRunner::new().with_tools().ok(
        "docker-machine",
        &["env", "web", "--shell", "bash"],
        &machine_env_dump("web", "192.168.99.100"),
    );
    let tool = ToolHandle::docker_machine();

    let env = machine::env(&runner, &tool, "web", machine::DEFAULT_SHELL)
        .await
        .expect("env succeeds");

    assert_eq!(env.machine_name(), Some("web"));
    assert_eq!(env.machine_address(), Some("192.168.99.100"));
    assert!(env.tls_verify());
}
