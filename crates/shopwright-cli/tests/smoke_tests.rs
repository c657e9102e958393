//! Smoke tests for the shopwright binary
//!
//! These run the `config` command and argument parsing only; the `smoke`
//! command needs Chromium and a reachable storefront.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin until assert_cmd is updated
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Command for the shopwright binary with a clean environment
fn shopwright() -> Command {
    let mut cmd = Command::cargo_bin("shopwright").expect("shopwright binary should exist");
    cmd.env_remove("SHOPWRIGHT_BASE_URL")
        .env_remove("SHOPWRIGHT_HEADLESS")
        .env_remove("SHOPWRIGHT_LOG")
        .env_remove("RUST_LOG");
    cmd
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    shopwright()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.4.0"));
}

#[test]
fn test_help_flag() {
    shopwright()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("smoke"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_smoke_help_lists_flags() {
    shopwright()
        .args(["smoke", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--base-url"))
        .stdout(predicate::str::contains("--headed"))
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn test_no_subcommand_fails() {
    shopwright()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_unknown_subcommand_fails() {
    shopwright().arg("record").assert().failure();
}

// ============================================================================
// Config Command Tests
// ============================================================================

#[test]
fn test_config_prints_defaults() {
    shopwright()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "base_url: https://bearstore-testsite.smartbear.com",
        ))
        .stdout(predicate::str::contains("headless: true"));
}

#[test]
fn test_config_reads_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("suite.yaml");
    fs::write(&path, "base_url: http://localhost:5000\nheadless: false\n").unwrap();

    shopwright()
        .arg("config")
        .arg("--config")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("base_url: http://localhost:5000"))
        .stdout(predicate::str::contains("headless: false"));
}

#[test]
fn test_config_env_overrides_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("suite.yaml");
    fs::write(&path, "base_url: http://localhost:5000\n").unwrap();

    shopwright()
        .env("SHOPWRIGHT_BASE_URL", "https://staging.shop.test")
        .args(["config", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("base_url: https://staging.shop.test"));
}

#[test]
fn test_config_rejects_invalid_base_url() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("suite.yaml");
    fs::write(&path, "base_url: shop.test\n").unwrap();

    shopwright()
        .args(["config", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_config_rejects_bad_headless_env() {
    shopwright()
        .env("SHOPWRIGHT_HEADLESS", "maybe")
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("SHOPWRIGHT_HEADLESS must be a boolean"));
}

#[test]
fn test_config_missing_file_fails() {
    shopwright()
        .args(["config", "--config", "/nonexistent/suite.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("I/O error"));
}

// ============================================================================
// Smoke Command Tests
// ============================================================================

#[test]
fn test_smoke_rejects_invalid_base_url_before_launch() {
    shopwright()
        .args(["smoke", "--base-url", "not-a-url"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"))
        .stderr(predicate::str::contains("base_url"));
}
