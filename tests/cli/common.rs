//! Cross-cutting CLI tests (help, version, error handling)

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help() {
    cargo_bin_cmd!("rjlink")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("rjlink finds DLsite work numbers"));
}

#[test]
fn test_version() {
    cargo_bin_cmd!("rjlink")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_no_subcommand() {
    cargo_bin_cmd!("rjlink")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_invalid_subcommand() {
    cargo_bin_cmd!("rjlink")
        .arg("invalid")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_convert_help() {
    cargo_bin_cmd!("rjlink")
        .args(["convert", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Convert RJ numbers"));
}

#[test]
fn test_missing_config_file() {
    cargo_bin_cmd!("rjlink")
        .args(["convert", "--fragment", "--config", "/nonexistent/rjlink.toml"])
        .write_stdin("<p>RJ123456</p>")
        .assert()
        .failure();
}
