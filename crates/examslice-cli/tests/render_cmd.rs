//! Integration tests for the `render` subcommand.

mod common;

use common::{cmd, write_fixture};
use predicates::prelude::*;

#[test]
fn render_requires_a_target() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());

    cmd()
        .args(["render", "2024S_A", "--dpi", "72"])
        .arg("--root")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("specify --question N or --all"));
}

#[test]
fn render_single_question_writes_image_and_state() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());

    cmd()
        .args(["render", "2024S_A", "--dpi", "72", "--question", "1"])
        .arg("--root")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("confirmed Q01 -> "));

    assert!(dir.path().join("cropped/2024S_A/Q01.png").exists());
    assert!(!dir.path().join("cropped/2024S_A/Q02.png").exists());

    let state: serde_json::Value =
        serde_json::from_slice(&std::fs::read(dir.path().join("crop_state.json")).unwrap())
            .unwrap();
    assert_eq!(state["2024S_A"][0]["confirmed"], true);
    assert_eq!(state["2024S_A"][1]["confirmed"], false);
}

#[test]
fn render_all_confirms_everything() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());

    cmd()
        .args(["render", "2024S_A", "--dpi", "72", "--all"])
        .arg("--root")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("confirmed 2 question(s), 2/2 total"));

    assert!(dir.path().join("cropped/2024S_A/Q01.png").exists());
    assert!(dir.path().join("cropped/2024S_A/Q02.png").exists());
}

#[test]
fn render_all_skips_already_confirmed() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());

    cmd()
        .args(["render", "2024S_A", "--dpi", "72", "--question", "1"])
        .arg("--root")
        .arg(dir.path())
        .assert()
        .success();

    cmd()
        .args(["render", "2024S_A", "--dpi", "72", "--all"])
        .arg("--root")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("confirmed 1 question(s), 2/2 total"));
}
