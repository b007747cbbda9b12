//! Binary-Level Usage Tests
//!
//! These tests run the compiled `db-cli` binary and only cover paths that
//! do not touch the platform keyring or a database server.

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper to create a test command with an isolated config directory
fn db_cli(config_dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("db-cli").unwrap();
    cmd.env("DB_CLI_CONFIG_DIR", config_dir)
        .env_remove("DB_CLI_TIMEOUT_SECS")
        .env_remove("DB_CLI_ADMIN_DATABASE")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    let dir = tempfile::TempDir::new().unwrap();
    db_cli(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("view"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("reset"));
}

#[test]
fn test_version_flag() {
    let dir = tempfile::TempDir::new().unwrap();
    db_cli(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_subcommand_is_usage_error() {
    let dir = tempfile::TempDir::new().unwrap();
    db_cli(dir.path()).assert().code(2);
}

#[test]
fn test_unknown_subcommand_is_usage_error() {
    let dir = tempfile::TempDir::new().unwrap();
    db_cli(dir.path())
        .arg("migrate")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_view_help_mentions_show_password() {
    let dir = tempfile::TempDir::new().unwrap();
    db_cli(dir.path())
        .args(["view", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--show-password"));
}

#[test]
fn test_invalid_settings_reported_as_json_envelope() {
    let dir = tempfile::TempDir::new().unwrap();
    let output = db_cli(dir.path())
        .env("DB_CLI_TIMEOUT_SECS", "0")
        .args(["view", "--json"])
        .assert()
        .code(8)
        .get_output()
        .stdout
        .clone();

    let envelope: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(envelope["ok"], false);
    assert_eq!(envelope["command"], "view");
    assert_eq!(envelope["error"]["code"], "CONFIG_ERROR");
}

#[test]
fn test_invalid_settings_reported_for_humans() {
    let dir = tempfile::TempDir::new().unwrap();
    db_cli(dir.path())
        .env("DB_CLI_ADMIN_DATABASE", "bad name")
        .arg("reset")
        .assert()
        .code(8)
        .stdout(predicate::str::contains("Error"))
        .stdout(predicate::str::contains("DB_CLI_ADMIN_DATABASE"));
}
