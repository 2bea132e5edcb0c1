//! Convert subcommand tests

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const PAGE: &str = "<html><body><p>See RJ123456</p></body></html>\n";

#[test]
fn test_convert_stdin_to_stdout() {
    cargo_bin_cmd!("rjlink")
        .arg("convert")
        .write_stdin(PAGE)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "<a href=\"https://www.dlsite.com/maniax/work/=/product_id/RJ123456.html\"",
        ))
        .stdout(predicate::str::contains("<body class=\"dlsite-rj-converted\">"));
}

#[test]
fn test_convert_file_to_stdout_leaves_file() {
    let temp_dir = TempDir::new().unwrap();
    let test_file = temp_dir.path().join("page.html");
    fs::write(&test_file, PAGE).unwrap();

    cargo_bin_cmd!("rjlink")
        .args(["convert", test_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("product_id/RJ123456.html"));

    assert_eq!(fs::read_to_string(&test_file).unwrap(), PAGE);
}

#[test]
fn test_convert_write_in_place() {
    let temp_dir = TempDir::new().unwrap();
    let test_file = temp_dir.path().join("page.html");
    fs::write(&test_file, PAGE).unwrap();

    cargo_bin_cmd!("rjlink")
        .args(["convert", "--write", test_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Converted"));

    let content = fs::read_to_string(&test_file).unwrap();
    assert!(content.contains("product_id/RJ123456.html"));
}

#[test]
fn test_convert_write_requires_file() {
    cargo_bin_cmd!("rjlink")
        .args(["convert", "--write"])
        .write_stdin(PAGE)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--write needs an input file"));
}

#[test]
fn test_convert_check_unconverted() {
    let temp_dir = TempDir::new().unwrap();
    let test_file = temp_dir.path().join("page.html");
    fs::write(&test_file, PAGE).unwrap();

    cargo_bin_cmd!("rjlink")
        .args(["convert", "--check", test_file.to_str().unwrap()])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Diff in"));

    assert_eq!(fs::read_to_string(&test_file).unwrap(), PAGE);
}

#[test]
fn test_convert_check_converted() {
    let temp_dir = TempDir::new().unwrap();
    let test_file = temp_dir.path().join("page.html");
    fs::write(&test_file, "<html><body><p>Nothing here</p></body></html>").unwrap();

    cargo_bin_cmd!("rjlink")
        .args(["convert", "--check", test_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to convert"));
}

#[test]
fn test_convert_check_and_write_conflict() {
    cargo_bin_cmd!("rjlink")
        .args(["convert", "--check", "--write", "page.html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_convert_without_body_warns() {
    cargo_bin_cmd!("rjlink")
        .arg("convert")
        .write_stdin("<p>RJ123456</p>")
        .assert()
        .success()
        .stdout("<p>RJ123456</p>")
        .stderr(predicate::str::contains("no <body> found"));
}

#[test]
fn test_convert_fragment() {
    cargo_bin_cmd!("rjlink")
        .args(["convert", "--fragment"])
        .write_stdin("<p>RJ123456</p>")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "<p class=\"dlsite-rj-converted\"><a href=",
        ));
}

#[test]
fn test_convert_uses_config_from_parent_dir() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("rjlink.toml"),
        "base_url = \"https://example.com/w/\"\nurl_suffix = \"\"\n",
    )
    .unwrap();
    let sub = temp_dir.path().join("pages");
    fs::create_dir(&sub).unwrap();
    let test_file = sub.join("page.html");
    fs::write(&test_file, PAGE).unwrap();

    cargo_bin_cmd!("rjlink")
        .args(["convert", test_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("href=\"https://example.com/w/RJ123456\""));
}

#[test]
fn test_convert_explicit_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("custom.toml");
    fs::write(&config, "processed_class = \"done\"\n").unwrap();

    cargo_bin_cmd!("rjlink")
        .args(["convert", "--config", config.to_str().unwrap()])
        .write_stdin(PAGE)
        .assert()
        .success()
        .stdout(predicate::str::contains("<body class=\"done\">"));
}

#[test]
fn test_convert_invalid_pattern_in_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("bad.toml");
    fs::write(&config, "pattern = \"RJ[0-9\"\n").unwrap();

    cargo_bin_cmd!("rjlink")
        .args(["convert", "--config", config.to_str().unwrap()])
        .write_stdin(PAGE)
        .assert()
        .failure();
}
