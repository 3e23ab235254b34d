//! Output mode abstraction for robot and human output.

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

use crate::check::CheckReport;
use crate::cli::Cli;
use crate::config::BoothConfig;
use crate::controller::RunSummary;
use crate::device::DeviceInfo;
use crate::error::{BoothError, Result};

mod human;
mod robot;

pub use human::HumanOutput;
pub use robot::RobotOutput;

/// JSON formatting options for robot mode.
#[derive(Debug, Clone, Copy)]
pub enum RobotFormat {
    /// Pretty-printed JSON (default for --robot).
    Json,
    /// Single-line JSON (--format=json-compact).
    JsonCompact,
}

/// Determines how command output is rendered.
#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    /// JSON output for scripting.
    Robot(RobotFormat),
    /// Styled terminal output for the operator.
    Human,
}

impl OutputMode {
    /// Create OutputMode from CLI arguments.
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.use_json() {
            let format = if cli.use_compact_json() {
                RobotFormat::JsonCompact
            } else {
                RobotFormat::Json
            };
            Self::Robot(format)
        } else {
            if cli.no_color {
                console::set_colors_enabled(false);
                console::set_colors_enabled_stderr(false);
            }
            Self::Human
        }
    }

    /// Returns true if output should be JSON.
    #[must_use]
    pub const fn is_robot(&self) -> bool {
        matches!(self, Self::Robot(_))
    }

    /// Convert into the appropriate Output implementation.
    #[must_use]
    pub fn into_output(self) -> Box<dyn Output> {
        match self {
            Self::Robot(format) => Box::new(RobotOutput::new(format)),
            Self::Human => Box::new(HumanOutput::new()),
        }
    }
}

/// Build metadata printed by `booth version`.
#[derive(Debug, Clone, Serialize)]
pub struct VersionInfo {
    pub version: &'static str,
    pub git_sha: &'static str,
    pub git_dirty: bool,
    pub build_timestamp: &'static str,
    pub rustc_version: &'static str,
    pub target: &'static str,
}

/// Trait for all output operations.
///
/// Commands call these methods without knowing the output mode.
pub trait Output {
    // Basic messages
    fn success(&self, message: &str);
    fn error(&self, error: &BoothError);
    fn warning(&self, message: &str);

    /// The operator interrupted the run.
    fn goodbye(&self);

    // Booth results
    fn run_summary(&self, summary: &RunSummary);

    /// Final report of `booth run` on any outcome, with the wall time from
    /// startup to released devices.
    fn run_finished(&self, outcome: &Result<RunSummary>, elapsed: Duration);
    fn composites(&self, paths: &[PathBuf]);
    fn check_report(&self, report: &CheckReport);

    // Setup
    fn device_list(&self, devices: &[DeviceInfo]);
    fn config(&self, config: &BoothConfig, source: Option<&str>);
    fn config_path(&self, path: Option<&str>);

    // Metadata
    fn version_info(&self, info: &VersionInfo);
}
