//! Integration tests for the rcfg binary
//!
//! Runs the compiled CLI against a mock server and checks stdout, stderr and
//! exit status.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use mockito::{Matcher, Server};
use tempfile::TempDir;

/// Writes an empty config file so the user's own config is never picked up
fn empty_config(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("config.json");
    fs::write(&path, "{}").expect("Failed to write config");
    path
}

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_rcfg"))
        .args(args)
        .env_remove("RCFG_URL")
        .env_remove("RCFG_CACHE_FOR")
        .env_remove("RCFG_TIMEOUT")
        .output()
        .expect("Failed to execute rcfg")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(output.status.success(), "Expected --help to exit successfully");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("rcfg"), "Help should mention rcfg");
    assert!(stdout.contains("set-ttl"), "Help should list set-ttl");
    assert!(stdout.contains("all-dep-on-by"), "Help should list all-dep-on-by");
}

#[test]
fn test_missing_subcommand_fails() {
    let output = run_cli(&[]);
    assert!(!output.status.success());
}

#[test]
fn test_get_prints_body() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/db/get")
        .match_query(Matcher::UrlEncoded("k".into(), "feature.flag".into()))
        .with_body("enabled")
        .expect(1)
        .create();
    let dir = TempDir::new().expect("Failed to create temp directory");
    let config = empty_config(&dir);

    let output = run_cli(&[
        "--config",
        config.to_str().unwrap(),
        "--url",
        &server.url(),
        "get",
        "db",
        "feature.flag",
    ]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim_end(), "enabled");
    mock.assert();
}

#[test]
fn test_url_from_config_file() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/team/add")
        .with_body("namespace created")
        .expect(1)
        .create();
    let dir = TempDir::new().expect("Failed to create temp directory");
    let path = dir.path().join("config.json");
    fs::write(&path, format!(r#"{{"url": "{}"}}"#, server.url())).unwrap();

    let output = run_cli(&["--config", path.to_str().unwrap(), "add", "team"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("namespace created"));
    mock.assert();
}

#[test]
fn test_rejection_exits_with_error() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/db/get")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body("no such key")
        .create();
    let dir = TempDir::new().expect("Failed to create temp directory");
    let config = empty_config(&dir);

    let output = run_cli(&[
        "--config",
        config.to_str().unwrap(),
        "--url",
        &server.url(),
        "get",
        "db",
        "missing",
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("404"), "stderr: {}", stderr);
    assert!(stderr.contains("no such key"), "stderr: {}", stderr);
}

#[test]
fn test_invalid_url_exits_with_error() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let config = empty_config(&dir);

    let output = run_cli(&[
        "--config",
        config.to_str().unwrap(),
        "--url",
        "not a url",
        "add",
        "db",
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid base URL"), "stderr: {}", stderr);
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use rcfg::cli::{Cli, Command};

    #[test]
    fn test_remove_dep_arguments() {
        let cli = Cli::parse_from(["rcfg", "remove-dep", "db", "a", "b"]);
        assert_eq!(
            cli.command,
            Command::RemoveDep {
                namespace: "db".to_string(),
                key: "a".to_string(),
                dep: "b".to_string(),
            }
        );
    }

    #[test]
    fn test_timeout_flag() {
        let cli = Cli::parse_from(["rcfg", "--timeout", "3", "deps", "db", "a"]);
        assert_eq!(cli.timeout, Some(3));
    }

    #[test]
    fn test_non_numeric_cache_for_is_rejected() {
        let result = Cli::try_parse_from(["rcfg", "--cache-for", "soon", "get", "db", "k"]);
        assert!(result.is_err());
    }
}
