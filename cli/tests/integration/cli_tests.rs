//! Integration tests for the CLI surface: help, version, global flags and
//! argument validation.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn blip() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("blip"));
    cmd.env("NO_COLOR", "1");
    cmd
}

// --- Help and version tests ---

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    // clap with arg_required_else_help shows help on stderr and exits 2
    blip().assert().code(2).stderr(predicate::str::contains(
        "Reproducible multi-machine Docker workspaces",
    ));
}

#[test]
fn test_cli_help_lists_commands() {
    blip()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("machine"))
        .stdout(predicate::str::contains("domain"))
        .stdout(predicate::str::contains("compose"));
}

#[test]
fn test_cli_version_flag_shows_version() {
    blip()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("blip"));
}

#[test]
fn test_version_command_shows_version() {
    blip()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "blip {}",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn test_version_command_json_outputs_valid_json() {
    let output = blip()
        .args(["version", "--json"])
        .output()
        .expect("run blip");
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
}

// --- Argument validation ---

#[test]
fn test_unknown_container_field_is_rejected() {
    blip()
        .args(["ps", "--fields", "Names,Bogus"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown field 'Bogus'"));
}

#[test]
fn test_unknown_machine_field_is_rejected() {
    blip()
        .args(["machine", "ls", "--fields", "Nope"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Valid fields:"));
}

#[test]
fn test_blank_machine_name_fails_before_tool_lookup() {
    blip()
        .args(["machine", "rm", " "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("machine name must be set"));
}

#[test]
fn test_unknown_subcommand_fails() {
    blip().arg("frobnicate").assert().code(2);
}
