//! Robot mode JSON output.

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, trace};

use super::{Output, RobotFormat, VersionInfo};
use crate::check::CheckReport;
use crate::config::BoothConfig;
use crate::controller::RunSummary;
use crate::device::DeviceInfo;
use crate::error::{BoothError, Result};

/// JSON output for scripts.
pub struct RobotOutput {
    format: RobotFormat,
}

impl RobotOutput {
    pub const fn new(format: RobotFormat) -> Self {
        Self { format }
    }

    /// Output any serializable data as JSON to stdout.
    fn output_json<T: Serialize + ?Sized>(&self, data: &T) {
        let json = match self.format {
            RobotFormat::Json => serde_json::to_string_pretty(data),
            RobotFormat::JsonCompact => serde_json::to_string(data),
        };
        match json {
            Ok(json) => {
                trace!(json_len = json.len(), "JSON serialized");
                println!("{json}");
            }
            Err(err) => eprintln!(r#"{{"error":true,"message":"serialization failed: {err}"}}"#),
        }
    }

    fn error_json(error: &BoothError) -> serde_json::Value {
        serde_json::json!({
            "error": true,
            "message": error.to_string(),
            "suggestion": error.suggestion(),
            "recoverable": error.is_user_recoverable(),
        })
    }

    fn goodbye_json() -> serde_json::Value {
        serde_json::json!({
            "interrupted": true,
            "message": "goodbye"
        })
    }

    /// Errors always go to stderr, one document per error.
    fn emit_error(json: &serde_json::Value) {
        match serde_json::to_string_pretty(json) {
            Ok(text) => eprintln!("{text}"),
            Err(_) => eprintln!("{json}"),
        }
    }
}

impl Output for RobotOutput {
    fn success(&self, message: &str) {
        self.output_json(&serde_json::json!({
            "success": true,
            "message": message
        }));
    }

    fn error(&self, error: &BoothError) {
        debug!(error = %error, "Robot: error");
        Self::emit_error(&Self::error_json(error));
    }

    fn warning(&self, message: &str) {
        self.output_json(&serde_json::json!({
            "warning": true,
            "message": message
        }));
    }

    fn goodbye(&self) {
        self.output_json(&Self::goodbye_json());
    }

    fn run_summary(&self, summary: &RunSummary) {
        self.output_json(summary);
    }

    fn run_finished(&self, outcome: &Result<RunSummary>, elapsed: Duration) {
        let secs = elapsed.as_secs_f64();
        match outcome {
            Ok(summary) => {
                let mut json = serde_json::to_value(summary).unwrap_or_default();
                if let Some(fields) = json.as_object_mut() {
                    fields.insert("total_run_time_secs".to_string(), secs.into());
                }
                self.output_json(&json);
            }
            Err(e) if e.is_interrupt() => {
                let mut json = Self::goodbye_json();
                json["total_run_time_secs"] = secs.into();
                self.output_json(&json);
            }
            Err(e) => {
                debug!(error = %e, "Robot: run failed");
                let mut json = Self::error_json(e);
                json["total_run_time_secs"] = secs.into();
                Self::emit_error(&json);
            }
        }
    }

    fn composites(&self, paths: &[PathBuf]) {
        self.output_json(&serde_json::json!({ "composites": paths }));
    }

    fn check_report(&self, report: &CheckReport) {
        self.output_json(report);
    }

    fn device_list(&self, devices: &[DeviceInfo]) {
        self.output_json(devices);
    }

    fn config(&self, config: &BoothConfig, source: Option<&str>) {
        self.output_json(&serde_json::json!({
            "source": source,
            "config": config,
        }));
    }

    fn config_path(&self, path: Option<&str>) {
        self.output_json(&serde_json::json!({ "path": path }));
    }

    fn version_info(&self, info: &VersionInfo) {
        self.output_json(info);
    }
}
