//! CLI smoke tests

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("pdfconv")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("info"));
}

#[test]
fn test_serve_help_lists_overrides() {
    Command::cargo_bin("pdfconv")
        .unwrap()
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("--upload-limit"))
        .stdout(predicate::str::contains("--timeout"));
}

#[test]
fn test_info_reports_tools() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("pdfconv.toml");
    std::fs::write(
        &config,
        "[conversion]\npdf2docx_cmd = \"pdf2docx-not-installed\"\n",
    )
    .unwrap();

    Command::cargo_bin("pdfconv")
        .unwrap()
        .args(["info", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Conversion Tools:"))
        .stdout(predicate::str::contains("Not found (pdf2docx-not-installed)"));
}

#[test]
fn test_serve_with_broken_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("broken.toml");
    std::fs::write(&config, "[server\nport = ").unwrap();

    Command::cargo_bin("pdfconv")
        .unwrap()
        .args(["serve", "--config"])
        .arg(&config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[test]
fn test_unknown_command_fails() {
    Command::cargo_bin("pdfconv")
        .unwrap()
        .arg("frobnicate")
        .assert()
        .failure();
}
