//! CLI integration tests for the mindstone binary.
//!
//! These run the compiled binary; the interactive `run` flow is not driven
//! here, only the scriptable subcommands.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn mindstone_cmd() -> Command {
    Command::cargo_bin("mindstone").expect("failed to find mindstone binary")
}

#[test]
fn test_version_flag() {
    mindstone_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_lists_subcommands() {
    mindstone_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("classify"))
        .stdout(predicate::str::contains("reset"));
}

#[test]
fn test_classify_high_load() {
    mindstone_cmd()
        .args(["classify", "5,5,0,0,0,0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("type: 1"))
        .stdout(predicate::str::contains("부담-양 많음, 유지 어려움"));
}

#[test]
fn test_classify_flux_dominates() {
    mindstone_cmd()
        .args(["classify", "0,0,0,3,4,0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("type: 4"));
}

#[test]
fn test_classify_gear_override() {
    // Provisional type 3 (D == F == 4) is overridden to 5 by E=5, C>=3.
    mindstone_cmd()
        .args(["classify", "0,3,0,4,4,5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("type: 5"));
}

#[test]
fn test_classify_rejects_wrong_arity() {
    mindstone_cmd()
        .args(["classify", "1,2,3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid scores"));
}

#[test]
fn test_classify_rejects_out_of_range_scores() {
    mindstone_cmd()
        .args(["classify", "200,200,0,0,0,0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid scores"));
}

#[test]
fn test_classify_rejects_non_numeric_input() {
    mindstone_cmd()
        .args(["classify", "a,b,c,d,e,f"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid scores"));
}

#[test]
fn test_reset_succeeds_without_saved_progress() {
    let data_dir = TempDir::new().unwrap();
    mindstone_cmd()
        .env("MINDSTONE_DATA_DIR", data_dir.path())
        .args(["reset", "minji@example.com"])
        .assert()
        .success();
}
