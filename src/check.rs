//! Pre-flight asset verification.
//!
//! A booth that discovers a missing screen mid-session aborts with
//! `AssetNotFound`, so `booth check` looks for every file up front.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::composite::{CompositeLayout, CompositeRenderer};
use crate::config::{BoothConfig, ReviewMode};
use crate::overlay::ScreenTable;

/// Severity level for check issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    /// The booth cannot run.
    Error,
    /// The booth runs, possibly not as intended.
    Warning,
}

/// A single problem found by the check.
#[derive(Debug, Clone, Serialize)]
pub struct CheckIssue {
    /// File or setting the issue is about
    pub subject: String,
    pub message: String,
    pub severity: IssueSeverity,
}

/// Result of checking a configuration against the disk.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub ok: bool,
    pub assets_dir: String,
    /// Required asset files found.
    pub found: Vec<String>,
    pub issues: Vec<CheckIssue>,
}

impl CheckReport {
    fn new(assets: &Path) -> Self {
        Self {
            ok: true,
            assets_dir: assets.display().to_string(),
            found: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn add_error(&mut self, subject: impl Into<String>, message: impl Into<String>) {
        self.issues.push(CheckIssue {
            subject: subject.into(),
            message: message.into(),
            severity: IssueSeverity::Error,
        });
        self.ok = false;
    }

    pub fn add_warning(&mut self, subject: impl Into<String>, message: impl Into<String>) {
        self.issues.push(CheckIssue {
            subject: subject.into(),
            message: message.into(),
            severity: IssueSeverity::Warning,
        });
    }

    pub fn errors(&self) -> impl Iterator<Item = &CheckIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &CheckIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Warning)
    }
}

/// Check the screens, templates and output directory `config` needs.
#[instrument(skip_all, fields(assets = %config.paths.assets.display()))]
pub fn check_assets(config: &BoothConfig) -> CheckReport {
    let table = ScreenTable::from_config(config);
    let mut report = CheckReport::new(table.assets());

    if let Err(err) = config.validate() {
        report.add_error("config", err.to_string());
    }

    for path in table.required_assets() {
        let shown = path.display().to_string();
        if path.is_file() {
            report.found.push(shown);
        } else {
            report.add_error(shown, "missing screen asset");
        }
    }

    if config.review.mode == ReviewMode::Composite {
        let renderer = CompositeRenderer::from_config(config);
        let frames = usize::from(config.capture.shot_count);
        for &kind in &config.review.layouts {
            let layout = renderer.layout(kind, frames);
            check_templates(&mut report, layout.as_ref(), table.assets());
        }
    }

    let output = &config.paths.output;
    if !output.is_dir() {
        report.add_warning(
            output.display().to_string(),
            "output directory does not exist yet; it is created on start",
        );
    }

    debug!(
        found = report.found.len(),
        issues = report.issues.len(),
        ok = report.ok,
        "Asset check done"
    );
    report
}

fn check_templates(report: &mut CheckReport, layout: &dyn CompositeLayout, assets: &Path) {
    let pattern = layout.template_pattern(assets);
    let (w, h) = layout.canvas_size();
    let matches: Vec<_> = glob::glob(&pattern)
        .map(|paths| paths.filter_map(std::result::Result::ok).collect())
        .unwrap_or_default();

    if matches.is_empty() {
        report.add_warning(
            pattern,
            format!("no {} template for {w}x{h}; a white canvas is used", layout.kind()),
        );
        return;
    }
    for path in matches {
        match image::image_dimensions(&path) {
            Ok(size) if size == (w, h) => report.found.push(path.display().to_string()),
            Ok((tw, th)) => report.add_warning(
                path.display().to_string(),
                format!("template is {tw}x{th}, canvas is {w}x{h}; it will be skipped"),
            ),
            Err(e) => report.add_warning(path.display().to_string(), format!("unreadable: {e}")),
        }
    }
}
