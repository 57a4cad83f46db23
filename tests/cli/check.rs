//! Check subcommand tests

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_check_clean_stdin() {
    cargo_bin_cmd!("supermd")
        .arg("check")
        .write_stdin("# [Welcome]($heading.id('intro'))\n\nplain text\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No directive errors found"));
}

#[test]
fn test_check_clean_file() {
    let temp_dir = TempDir::new().unwrap();
    let test_file = temp_dir.path().join("page.smd");
    fs::write(&test_file, "[x]($link.url('https://example.com'))\n").unwrap();

    cargo_bin_cmd!("supermd")
        .args(["check", test_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("No directive errors found"));
}

#[test]
fn test_check_reports_errors_and_fails() {
    let temp_dir = TempDir::new().unwrap();
    let test_file = temp_dir.path().join("page.smd");
    fs::write(&test_file, "body\n\n[x]($link)\n").unwrap();

    cargo_bin_cmd!("supermd")
        .args(["check", test_file.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("page.smd:3:1"))
        .stderr(predicate::str::contains("missing call to 'url'"));
}

#[test]
fn test_check_missing_file() {
    cargo_bin_cmd!("supermd")
        .args(["check", "does-not-exist.smd"])
        .assert()
        .failure();
}

#[test]
fn test_check_with_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("custom.toml");
    fs::write(&config_file, "[extensions]\ntable = false\n").unwrap();
    let test_file = temp_dir.path().join("page.smd");
    fs::write(&test_file, "[ok]($text.attrs('kbd'))\n").unwrap();

    cargo_bin_cmd!("supermd")
        .args([
            "check",
            "--config",
            config_file.to_str().unwrap(),
            test_file.to_str().unwrap(),
        ])
        .assert()
        .success();
}

#[test]
fn test_check_invalid_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("bad.toml");
    fs::write(&config_file, "extensions = 3\n").unwrap();

    cargo_bin_cmd!("supermd")
        .args(["check", "--config", config_file.to_str().unwrap()])
        .write_stdin("text\n")
        .assert()
        .failure();
}
