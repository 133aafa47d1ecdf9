//! Smoke tests for the `cicat` binary (offline commands only).

use assert_cmd::Command;
use predicates::prelude::*;

fn cicat() -> Command {
    Command::cargo_bin("cicat").expect("binary builds")
}

#[test]
fn help_lists_commands() {
    cicat()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("refresh"))
        .stdout(predicate::str::contains("versions"));
}

#[test]
fn unknown_subcommand_fails() {
    cicat()
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn info_works_with_empty_config() {
    let dir = tempfile::tempdir().unwrap();
    cicat()
        .env("CICAT_CONFIG_DIR", dir.path())
        .env("CICAT_NO_PROGRESS", "1")
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("components cached: 0"));
}

#[test]
fn version_flag() {
    cicat().arg("--version").assert().success().stdout(predicate::str::contains("cicat"));
}
