//! Integration tests for the `detect` subcommand.

mod common;

use common::{cmd, write_fixture};
use predicates::prelude::*;

#[test]
fn detect_lists_markers_and_footers() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());

    cmd()
        .args(["detect", "2024S_A", "--dpi", "72"])
        .arg("--root")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Q1\tpage 0\ttop 100.0"))
        .stdout(predicate::str::contains("Q2\tpage 0\ttop 600.0"))
        .stdout(predicate::str::contains("2 questions, footers on 1/1 pages"));
}

#[test]
fn detect_json_output_parses() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());

    let output = cmd()
        .args(["detect", "2024S_A", "--format", "json"])
        .arg("--root")
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["doc_key"], "2024S_A");
    assert_eq!(value["markers"][0]["question_num"], 1);
    assert_eq!(value["markers"][1]["page_num"], 0);
    assert_eq!(value["footers"][0], 950.0);
}

#[test]
fn detect_missing_document_fails() {
    let dir = tempfile::tempdir().unwrap();

    cmd()
        .args(["detect", "2024S_A"])
        .arg("--root")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error loading 2024S_A"));
}

#[test]
fn detect_rejects_malformed_key() {
    let dir = tempfile::tempdir().unwrap();

    cmd()
        .args(["detect", "not-a-key"])
        .arg("--root")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid document key"));
}
