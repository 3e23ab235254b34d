//! Human-friendly terminal output.

use std::path::PathBuf;
use std::time::Duration;

use console::style;
use tracing::{debug, instrument, trace};

use super::{Output, VersionInfo};
use crate::check::CheckReport;
use crate::config::{BoothConfig, to_toml};
use crate::controller::RunSummary;
use crate::device::DeviceInfo;
use crate::error::{BoothError, Result};

/// Styled terminal output for the operator.
#[derive(Debug, Default)]
pub struct HumanOutput;

impl HumanOutput {
    pub const fn new() -> Self {
        Self
    }
}

impl Output for HumanOutput {
    fn success(&self, message: &str) {
        println!("{} {message}", style("[OK]").green().bold());
    }

    #[instrument(skip(self))]
    fn error(&self, error: &BoothError) {
        debug!(recoverable = error.is_user_recoverable(), "Outputting error");
        eprintln!("{}: {error}", style("unexpected error").red().bold());

        if let BoothError::MultipleDevices { serials } = error {
            eprintln!("  Available devices:");
            for serial in serials {
                eprintln!("    - {}", style(serial).cyan());
            }
        }
        if let Some(suggestion) = error.suggestion() {
            eprintln!("{}: {suggestion}", style("Hint").yellow());
        }
    }

    fn warning(&self, message: &str) {
        eprintln!("{} {message}", style("[WARN]").yellow().bold());
    }

    fn goodbye(&self) {
        println!("goodbye");
    }

    #[instrument(skip_all, fields(sessions = summary.sessions.len()))]
    fn run_summary(&self, summary: &RunSummary) {
        for session in &summary.sessions {
            println!(
                "{} {} ({} frames)",
                style("Session").bold(),
                style(&session.id).cyan(),
                session.frames.len()
            );
            for path in &session.composites {
                println!("  {}", path.display());
            }
        }
        debug!(polls = summary.polls, "Run summary printed");
    }

    fn run_finished(&self, outcome: &Result<RunSummary>, elapsed: Duration) {
        match outcome {
            Ok(summary) => self.run_summary(summary),
            Err(e) if e.is_interrupt() => self.goodbye(),
            Err(e) => self.error(e),
        }
        println!("Total run time: {:.3}", elapsed.as_secs_f64());
    }

    fn composites(&self, paths: &[PathBuf]) {
        for path in paths {
            self.success(&format!("Wrote {}", path.display()));
        }
    }

    #[instrument(skip_all, fields(ok = report.ok))]
    fn check_report(&self, report: &CheckReport) {
        println!("{} {}", style("Assets:").bold(), report.assets_dir);
        for path in &report.found {
            trace!(%path, "found");
            println!("  {} {path}", style("ok").green());
        }
        for issue in report.errors() {
            println!("  {} {}: {}", style("missing").red().bold(), issue.subject, issue.message);
        }
        for issue in report.warnings() {
            println!("  {} {}: {}", style("warn").yellow(), issue.subject, issue.message);
        }
        if report.ok {
            self.success("Booth is ready");
        } else {
            println!("{}", style("Booth is not ready").red().bold());
        }
    }

    fn device_list(&self, devices: &[DeviceInfo]) {
        if devices.is_empty() {
            self.warning("No Stream Deck devices found");
            return;
        }
        println!("{}", style("Trigger devices:").bold());
        for device in devices {
            println!(
                "  {} ({}) {} keys",
                device.product_name,
                style(&device.serial).cyan(),
                device.key_count
            );
        }
    }

    fn config(&self, config: &BoothConfig, source: Option<&str>) {
        match source {
            Some(path) => println!("{}", style(format!("# {path}")).dim()),
            None => println!("{}", style("# built-in defaults").dim()),
        }
        match to_toml(config) {
            Ok(text) => print!("{text}"),
            Err(err) => self.error(&err),
        }
    }

    fn config_path(&self, path: Option<&str>) {
        println!("{}", path.unwrap_or("(no config directory on this platform)"));
    }

    fn version_info(&self, info: &VersionInfo) {
        println!("booth {}", info.version);
        println!(
            "git: {}{}",
            info.git_sha,
            if info.git_dirty { " (dirty)" } else { "" }
        );
        println!("built: {}", info.build_timestamp);
        println!("rustc: {}", info.rustc_version);
        println!("target: {}", info.target);
    }
}
