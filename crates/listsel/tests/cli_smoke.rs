use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join(relative)
}

#[test]
fn help_displays_usage() {
    Command::cargo_bin("listsel")
        .expect("binary exists")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn run_reports_passing_scripts() {
    Command::cargo_bin("listsel")
        .expect("binary exists")
        .arg("run")
        .arg(fixture("fixtures/remove_full_range.sel"))
        .arg(fixture("fixtures/insert_overflow.sel"))
        .assert()
        .success()
        .stdout(predicate::str::contains("ok    "))
        .stdout(predicate::str::contains("2 script(s), 0 failed"));
}

#[test]
fn run_fails_on_unmet_expectation() {
    Command::cargo_bin("listsel")
        .expect("binary exists")
        .arg("run")
        .arg(fixture("failing/anchor_mismatch.sel"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("FAIL"))
        .stdout(predicate::str::contains("line 2: anchor expected 11, found 10"))
        .stderr(predicate::str::contains("1 script(s) failed"));
}

#[test]
fn run_emits_json_report() {
    Command::cargo_bin("listsel")
        .expect("binary exists")
        .args(["run", "--json", "--threads", "1"])
        .arg(fixture("fixtures/remove_head.sel"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"passed\": true"))
        .stdout(predicate::str::contains("\"intervals\""));
}

#[test]
fn completions_are_generated() {
    Command::cargo_bin("listsel")
        .expect("binary exists")
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("listsel"));
}
