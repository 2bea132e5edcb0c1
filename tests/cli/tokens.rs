//! Tokens subcommand tests

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

const PAGE: &str =
    "<html><body><p>RJ123456</p><a href=\"/x\">RJ654321</a></body></html>";

#[test]
fn test_tokens_text_output() {
    cargo_bin_cmd!("rjlink")
        .arg("tokens")
        .write_stdin(PAGE)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "RJ123456\thtml > body > p\thttps://www.dlsite.com/maniax/work/=/product_id/RJ123456.html",
        ))
        .stdout(predicate::str::contains(
            "RJ654321\thtml > body > a\tskipped: inside <a>",
        ));
}

#[test]
fn test_tokens_json_output() {
    let output = cargo_bin_cmd!("rjlink")
        .args(["tokens", "--json"])
        .write_stdin(PAGE)
        .output()
        .unwrap();
    assert!(output.status.success());

    let hits: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let hits = hits.as_array().unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0]["token"], "RJ123456");
    assert!(hits[0].get("skipped").is_none());
    assert_eq!(hits[1]["skipped"], "inside <a>");
}

#[test]
fn test_tokens_none_found() {
    cargo_bin_cmd!("rjlink")
        .arg("tokens")
        .write_stdin("<p>nothing</p>")
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains("No RJ numbers found"));
}

#[test]
fn test_tokens_does_not_modify_input() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let test_file = temp_dir.path().join("page.html");
    std::fs::write(&test_file, PAGE).unwrap();

    cargo_bin_cmd!("rjlink")
        .args(["tokens", test_file.to_str().unwrap()])
        .assert()
        .success();

    assert_eq!(std::fs::read_to_string(&test_file).unwrap(), PAGE);
}

#[test]
fn test_tokens_skip_head_like_convert() {
    let input = "<html><head><title>RJ111111</title></head><body><p>RJ222222</p></body></html>";

    cargo_bin_cmd!("rjlink")
        .arg("tokens")
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("RJ222222"))
        .stdout(predicate::str::contains("RJ111111").not());
}

#[test]
fn test_tokens_without_body_needs_fragment() {
    cargo_bin_cmd!("rjlink")
        .arg("tokens")
        .write_stdin("<p>RJ123456</p>")
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains("no <body> found"));

    cargo_bin_cmd!("rjlink")
        .args(["tokens", "--fragment"])
        .write_stdin("<p>RJ123456</p>")
        .assert()
        .success()
        .stdout(predicate::str::contains("RJ123456\tp\t"));
}
