//! CLI binary smoke tests using assert_cmd.
//!
//! These tests exercise the compiled `boundary` binary to verify that
//! argument parsing, output files and error handling work end-to-end.

use std::io::Write;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("boundary").unwrap()
}

fn write_samples(dir: &Path, rows: &[&str]) -> PathBuf {
    let path = dir.join("samples.csv");
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(f, "x1,x2,label").unwrap();
    for row in rows {
        writeln!(f, "{}", row).unwrap();
    }
    path
}

fn small_config(dir: &Path) -> PathBuf {
    let path = dir.join("run.yaml");
    std::fs::write(&path, "evaluation:\n  grid_resolution: 25\n").unwrap();
    path
}

// ---------------------------------------------------------------------------
// Top-level
// ---------------------------------------------------------------------------

#[test]
fn no_args_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_flag() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("evaluate"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("boundary"));
}

// ---------------------------------------------------------------------------
// Config subcommand
// ---------------------------------------------------------------------------

#[test]
fn config_prints_defaults() {
    cmd()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("grid_resolution: 400"))
        .stdout(predicate::str::contains("decision_boundary.svg"));
}

#[test]
fn config_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.yaml");
    cmd()
        .args(["config", "-o"])
        .arg(&path)
        .assert()
        .success();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("threshold: 0.5"));
}

// ---------------------------------------------------------------------------
// Evaluate subcommand
// ---------------------------------------------------------------------------

#[test]
fn evaluate_requires_samples() {
    cmd()
        .arg("evaluate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("samples"));
}

#[test]
fn evaluate_writes_figure_and_prints_metrics() {
    let dir = tempfile::tempdir().unwrap();
    let samples = write_samples(dir.path(), &["-3,-1,0", "2,1,1", "4,-2,1", "-1,-4,0"]);
    let config = small_config(dir.path());
    let figure = dir.path().join("fig.svg");
    let report = dir.path().join("report.html");

    cmd()
        .arg("evaluate")
        .arg(&samples)
        .arg("--config")
        .arg(&config)
        .arg("-o")
        .arg(&figure)
        .arg("--report")
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("model:    y = 0.00 + 1.00 x_1 + 1.00 x_2"))
        .stdout(predicate::str::contains("acc=1.00 | avg(prec)=1.00 | rocauc=1.00 | prauc=1.00"));

    let svg = std::fs::read_to_string(&figure).unwrap();
    assert!(svg.contains("True Positive"));
    assert!(std::fs::read_to_string(&report).unwrap().contains("<svg"));
}

#[test]
fn evaluate_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let samples = write_samples(dir.path(), &["-3,-1,0", "2,1,1", "4,-2,1", "-1,-4,0"]);
    let config = small_config(dir.path());
    let figure = dir.path().join("fig.svg");

    cmd()
        .arg("evaluate")
        .arg(&samples)
        .arg("-c")
        .arg(&config)
        .arg("-o")
        .arg(&figure)
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"roc_auc\": 1.0"))
        .stdout(predicate::str::contains("\"average_precision\""));
}

#[test]
fn evaluate_bad_label_fails() {
    let dir = tempfile::tempdir().unwrap();
    let samples = write_samples(dir.path(), &["-3,-1,0", "2,1,7"]);
    let config = small_config(dir.path());
    let figure = dir.path().join("fig.svg");

    cmd()
        .arg("evaluate")
        .arg(&samples)
        .arg("-c")
        .arg(&config)
        .arg("-o")
        .arg(&figure)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a binary label"));
    assert!(!figure.exists());
}

#[test]
fn evaluate_infinite_feature_fails() {
    let dir = tempfile::tempdir().unwrap();
    let samples = write_samples(dir.path(), &["-3,-1,0", "2,1,1", "inf,0,1"]);
    let config = small_config(dir.path());
    let figure = dir.path().join("fig.svg");

    cmd()
        .arg("evaluate")
        .arg(&samples)
        .arg("-c")
        .arg(&config)
        .arg("-o")
        .arg(&figure)
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .failure()
        .stderr(predicate::str::contains("row 2 column 0 is not finite"));
    assert!(!figure.exists());
}

#[test]
fn evaluate_missing_file_fails() {
    cmd()
        .args(["evaluate", "/nonexistent/samples.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}
