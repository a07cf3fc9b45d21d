use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

fn squadledger(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("squadledger").expect("binary built");
    cmd.current_dir(dir.path())
        .env("SQUADLEDGER_DATABASE", dir.path().join("cli.db"))
        .env_remove("RUST_LOG");
    cmd
}

fn json_stdout(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("run squadledger");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is one JSON document")
}

fn write_config(dir: &Path, contents: &str) -> std::path::PathBuf {
    let path = dir.join("custom.toml");
    fs::write(&path, contents).expect("write config");
    path
}

#[test]
fn cli_returns_nonzero_on_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "[ledger]\nmax_cas_attempts = 0\n");

    squadledger(&dir)
        .args(["config", "validate", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("ledger.max_cas_attempts"));
}

#[test]
fn explicit_config_must_exist() {
    let dir = tempfile::tempdir().unwrap();
    squadledger(&dir)
        .args(["config", "validate", "--config", "nope.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config file"));
}

#[test]
fn outcome_flow_persists_between_invocations() {
    let dir = tempfile::tempdir().unwrap();

    squadledger(&dir)
        .args(["squad", "create", "alpha"])
        .assert()
        .success();

    let applied = json_stdout(squadledger(&dir).args(["match", "apply", "alpha", "m1", "WIN", "--json"]));
    assert_eq!(applied["duplicate"], false);
    assert_eq!(applied["ledger"]["current_bounty_coins"], 50);

    let again = json_stdout(squadledger(&dir).args(["match", "apply", "alpha", "m1", "WIN", "--json"]));
    assert_eq!(again["duplicate"], true);

    let shown = json_stdout(squadledger(&dir).args(["squad", "show", "alpha", "--json"]));
    assert_eq!(shown["ledger"]["current_bounty_coins"], 50);
    assert_eq!(shown["ledger"]["tier"], "SILVER");
    assert_eq!(shown["ledger"]["version"], 1);
}

#[test]
fn unknown_outcome_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    squadledger(&dir)
        .args(["squad", "create", "alpha"])
        .assert()
        .success();

    squadledger(&dir)
        .args(["match", "apply", "alpha", "m1", "DRAW"])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn overdrawn_withdrawal_fails_without_debit() {
    let dir = tempfile::tempdir().unwrap();
    squadledger(&dir)
        .args(["squad", "create", "alpha"])
        .assert()
        .success();

    squadledger(&dir)
        .args(["withdraw", "alpha", "10", "--payout", "acct-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("insufficient"));

    let listed = json_stdout(squadledger(&dir).args(["withdrawals", "alpha", "--json"]));
    assert_eq!(listed["withdrawals"].as_array().map(Vec::len), Some(0));
}

#[test]
fn divisions_lists_catalog_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = json_stdout(squadledger(&dir).args(["divisions", "--json"]));

    let divisions = catalog["divisions"].as_array().expect("divisions array");
    assert_eq!(divisions.len(), 3);
    assert_eq!(divisions[0]["tier"], "SILVER");
    assert_eq!(divisions[0]["promotion_threshold"], 250);
    assert!(divisions[2]["promotion_threshold"].is_null());
}
