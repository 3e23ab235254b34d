//! Human-mode end-to-end tests.

use std::fs;

use predicates::prelude::*;
use tempfile::TempDir;

use crate::common::cli::CliRunner;
use crate::common::fixtures::BoothAssets;
use crate::common::init_test_logging;

#[test]
fn human_quick_start_lists_commands() {
    init_test_logging();
    CliRunner::new()
        .assert(&[])
        .success()
        .stdout(predicate::str::contains("QUICK START"))
        .stdout(predicate::str::contains("booth run --fast"));
}

#[test]
fn human_fast_run_prints_total_time() {
    init_test_logging();
    let assets = BoothAssets::create(4);
    let work = TempDir::new().unwrap();
    let config = work.path().join("booth.yaml");
    fs::write(&config, "capture:\n  width: 144\n  height: 108\n").unwrap();
    let output = work.path().join("snaps");

    let result = CliRunner::new().run(&[
        "--config",
        config.to_str().unwrap(),
        "run",
        "--fast",
        "--output",
        output.to_str().unwrap(),
        "--assets",
        assets.path().to_str().unwrap(),
    ]);
    result
        .assert_success()
        .assert_stdout_contains("Session")
        .assert_stdout_contains("_2x2.jpg")
        .assert_stdout_contains("Total run time: ");

    let jpgs = fs::read_dir(&output)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|x| x == "jpg"))
        .count();
    assert_eq!(jpgs, 5);
}

#[test]
fn human_failed_run_still_prints_total_time() {
    init_test_logging();
    let empty = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    CliRunner::new()
        .assert(&[
            "run",
            "--fast",
            "--output",
            output.path().to_str().unwrap(),
            "--assets",
            empty.path().to_str().unwrap(),
        ])
        .failure()
        .stderr(predicate::str::contains("intro_1.jpg"))
        .stdout(predicate::str::contains("Total run time: "));
}

#[test]
fn human_check_ready_booth() {
    init_test_logging();
    let assets = BoothAssets::create(4);

    CliRunner::new()
        .assert(&["check", "--assets", assets.path().to_str().unwrap()])
        .success()
        .stdout(predicate::str::contains("Booth is ready"));
}

#[test]
fn human_check_missing_assets() {
    init_test_logging();
    let empty = TempDir::new().unwrap();

    CliRunner::new()
        .assert(&["check", "--assets", empty.path().to_str().unwrap()])
        .failure()
        .stdout(predicate::str::contains("missing"))
        .stdout(predicate::str::contains("get_ready_4.jpg"));
}

#[test]
fn human_error_has_hint_prefix() {
    init_test_logging();
    let work = TempDir::new().unwrap();
    let missing = work.path().join("nope.toml");

    CliRunner::new()
        .assert(&["--config", missing.to_str().unwrap(), "config"])
        .failure()
        .stderr(predicate::str::contains("unexpected error"));
}

#[test]
fn human_config_path_is_under_config_home() {
    init_test_logging();
    let cli = CliRunner::new();
    let expected = cli.home().join(".config").join("photobooth").join("booth.toml");

    cli.assert(&["config", "--path"])
        .success()
        .stdout(predicate::str::contains(expected.to_str().unwrap()));
}

#[test]
fn human_completions_for_bash() {
    init_test_logging();
    CliRunner::new()
        .assert(&["completions", "bash"])
        .success()
        .stdout(predicate::str::contains("booth"));
}
