//! Integration tests for configuration files.
//!
//! Tests load real files from disk and check that the resulting
//! configuration flows into the screen table, the asset check and the
//! CLI overrides the way the booth uses them.

use std::fs;

use booth::check::check_assets;
use booth::cli::{Cli, Commands};
use booth::composite::LayoutKind;
use booth::config::{self, BoothConfig, ReviewMode, TimingConfig, TriggerBackend};
use booth::error::BoothError;
use booth::overlay::ScreenTable;
use clap::Parser;
use tempfile::TempDir;

use crate::common::fixtures::BoothAssets;

#[test]
fn test_toml_file_drives_screen_table() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("booth.toml");
    fs::write(
        &path,
        r#"
[capture]
shot_count = 2

[review]
layouts = ["1x4"]

[paths]
assets = "art"
output = "snaps"
"#,
    )
    .unwrap();

    let config = config::load_config(&path).unwrap();
    let table = ScreenTable::from_config(&config);
    let names: Vec<String> = table
        .required_assets()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(
        names,
        [
            "intro_1.jpg",
            "intro_2.jpg",
            "get_ready_1.jpg",
            "get_ready_2.jpg",
            "black.jpg",
            "processing.jpg",
            "all_done.jpg",
        ]
    );
    assert!(table.assets().ends_with("art"));
    assert!(table.assets().is_absolute());
}

#[test]
fn test_yaml_and_toml_agree() {
    let dir = TempDir::new().unwrap();
    let toml_path = dir.path().join("booth.toml");
    let yaml_path = dir.path().join("booth.yaml");
    fs::write(
        &toml_path,
        "[timing]\nprep_secs = 1\nreview_secs = 8\n\n[review]\nmode = \"playback\"\n",
    )
    .unwrap();
    fs::write(
        &yaml_path,
        "timing:\n  prep_secs: 1\n  review_secs: 8\nreview:\n  mode: playback\n",
    )
    .unwrap();

    let from_toml = config::load_config(&toml_path).unwrap();
    let from_yaml = config::load_config(&yaml_path).unwrap();
    assert_eq!(from_toml, from_yaml);
    assert_eq!(from_toml.review.mode, ReviewMode::Playback);
    assert_eq!(from_toml.timing.countdown_from, 3);
}

#[test]
fn test_explicit_missing_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = config::load_or_default(Some(&dir.path().join("absent.toml"))).unwrap_err();
    assert!(matches!(err, BoothError::ConfigNotFound { .. }));
}

#[test]
fn test_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("booth.json");
    fs::write(&path, "{}").unwrap();
    let err = config::load_config(&path).unwrap_err();
    assert!(matches!(err, BoothError::ConfigParse(msg) if msg.contains(".toml")));
}

#[test]
fn test_cli_overrides_then_fast_mode() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("booth.toml");
    fs::write(&path, "[trigger]\nbackend = \"streamdeck\"\n").unwrap();

    let cli = Cli::parse_from([
        "booth",
        "--config",
        path.to_str().unwrap(),
        "run",
        "--fast",
        "--mode",
        "playback",
        "-o",
        "/tmp/booth-out",
    ]);
    let Some(Commands::Run(args)) = &cli.command else {
        panic!("expected run");
    };

    let mut config = config::load_or_default(cli.config.as_deref()).unwrap();
    args.apply(&mut config);
    let config = config.effective();
    config.validate().unwrap();

    assert_eq!(config.trigger.backend, TriggerBackend::Auto);
    assert_eq!(config.timing, TimingConfig::zeroed());
    assert_eq!(config.review.mode, ReviewMode::Playback);
    assert_eq!(config.paths.output.to_str(), Some("/tmp/booth-out"));
}

#[test]
fn test_check_passes_on_complete_assets() {
    let assets = BoothAssets::create(4).with_template(
        LayoutKind::Grid2x2,
        (1296, 972),
        "flowers",
        (1296, 972),
        (240, 200, 200),
    );
    let mut config = BoothConfig::default();
    config.paths.assets = assets.path().to_path_buf();
    config.paths.output = assets.path().to_path_buf();

    let report = check_assets(&config);
    assert!(report.ok, "{:?}", report.issues);
    assert_eq!(report.found.len(), 9 + 1);
    assert_eq!(report.warnings().count(), 0);
}

#[test]
fn test_check_reports_layout_mismatch() {
    let assets = BoothAssets::create(3);
    let mut config = BoothConfig::default();
    config.capture.shot_count = 3;
    config.paths.assets = assets.path().to_path_buf();
    config.paths.output = assets.path().to_path_buf();

    let report = check_assets(&config);
    assert!(!report.ok);
    let subjects: Vec<_> = report.errors().map(|i| i.subject.as_str()).collect();
    assert_eq!(subjects, ["config"]);
}

#[test]
fn test_absurd_strip_margins_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("booth.toml");
    fs::write(&path, "[strip]\nheader = 4294967295\n").unwrap();

    let err = config::load_config(&path).unwrap_err();
    assert!(matches!(err, BoothError::ConfigInvalid(msg) if msg.contains("strip.header")));
}
