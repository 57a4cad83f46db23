//! Parse subcommand tests

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_parse_stdin_dumps_tree() {
    cargo_bin_cmd!("supermd")
        .arg("parse")
        .write_stdin("# Title\n\nbody\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("document"))
        .stdout(predicate::str::contains("heading"))
        .stdout(predicate::str::contains("paragraph"));
}

#[test]
fn test_parse_shows_attached_directives() {
    let temp_dir = TempDir::new().unwrap();
    let test_file = temp_dir.path().join("page.smd");
    fs::write(&test_file, "# [W]($heading.id('w'))\n").unwrap();

    cargo_bin_cmd!("supermd")
        .args(["parse", test_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Directive"))
        .stdout(predicate::str::contains("\"w\""));
}

#[test]
fn test_parse_still_prints_diagnostics() {
    cargo_bin_cmd!("supermd")
        .arg("parse")
        .write_stdin("[x]($link)\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("missing call to 'url'"));
}
