//! CLI smoke tests for the webtime-server binary
//!
//! These tests verify that the CLI commands work correctly, including
//! configuration validation, help output, and basic command functionality.

use std::process::{Command, Stdio};
use tempfile::TempDir;

/// Helper to run the webtime-server binary with given arguments
fn run_webtime_server(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_webtime-server"))
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute webtime-server")
}

/// Write a minimal config file rooted in a temp dir and return its path.
fn write_config(tmp: &TempDir, database_url: &str) -> std::path::PathBuf {
    let home = tmp.path().join("home");
    let config_path = tmp.path().join("config.yaml");
    let yaml = format!(
        r#"
server:
  home_dir: "{}"
  host: "127.0.0.1"
  port: 0

database:
  url: "{}"

auth:
  token_secret: "smoke-test-secret"
  token_ttl: "1h"
"#,
        home.display(),
        database_url
    );
    std::fs::write(&config_path, yaml).expect("Failed to write config");
    config_path
}

#[test]
fn test_cli_help_command() {
    let output = run_webtime_server(&["--help"]);

    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("webtime-server"),
        "Should contain binary name"
    );
    assert!(
        stdout.contains("Usage:") || stdout.contains("USAGE:"),
        "Should contain usage information"
    );
    assert!(stdout.contains("run"), "Should contain 'run' subcommand");
    assert!(
        stdout.contains("check"),
        "Should contain 'check' subcommand"
    );
    assert!(stdout.contains("--config"), "Should mention config option");
}

#[test]
fn test_cli_version_command() {
    let output = run_webtime_server(&["--version"]);

    assert!(output.status.success(), "Version command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("0.1.0"), "Should contain version number");
}

#[test]
fn test_check_command_with_valid_config() {
    let tmp = TempDir::new().unwrap();
    let config_path = write_config(&tmp, "sqlite://db/webtime.db");

    let output = run_webtime_server(&[
        "--config",
        config_path.to_str().unwrap(),
        "check",
    ]);

    assert!(
        output.status.success(),
        "Check should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Configuration OK"));
    assert!(stdout.contains("sqlite"));
}

#[test]
fn test_check_command_rejects_unsupported_backend() {
    let tmp = TempDir::new().unwrap();
    let config_path = write_config(&tmp, "mysql://localhost/webtime");

    let output = run_webtime_server(&[
        "--config",
        config_path.to_str().unwrap(),
        "check",
    ]);

    assert!(!output.status.success(), "Check should fail for mysql DSN");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unsupported database type"));
}

#[test]
fn test_print_config_outputs_yaml() {
    let tmp = TempDir::new().unwrap();
    let config_path = write_config(&tmp, "sqlite://db/webtime.db");

    let output = run_webtime_server(&[
        "--config",
        config_path.to_str().unwrap(),
        "--print-config",
    ]);

    assert!(output.status.success(), "print-config should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("server:"));
    assert!(stdout.contains("port:"));
    // Secrets still appear; print-config is a local debugging aid
    assert!(stdout.contains("auth:"));
}
