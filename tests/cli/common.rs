//! Cross-cutting CLI tests (help, version, error handling)

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help() {
    cargo_bin_cmd!("supermd")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("SuperMD extends CommonMark/GFM"));
}

#[test]
fn test_version() {
    cargo_bin_cmd!("supermd")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_no_subcommand() {
    cargo_bin_cmd!("supermd")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_invalid_subcommand() {
    cargo_bin_cmd!("supermd")
        .arg("invalid")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_check_help() {
    cargo_bin_cmd!("supermd")
        .args(["check", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Check a SuperMD"));
}

#[test]
fn test_parse_help() {
    cargo_bin_cmd!("supermd")
        .args(["parse", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("annotated AST"));
}
