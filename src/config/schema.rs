//! Booth configuration types.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! booth that captures four 1296x972 shots and renders a 2x2 composite.
//!
//! # Example TOML
//!
//! ```toml
//! fast = false
//!
//! [trigger]
//! backend = "streamdeck"
//! snap_key = 0
//! exit_key = 2
//!
//! [capture]
//! shot_count = 4
//! width = 1296
//! height = 972
//! camera = "command"
//! command = ["rpicam-still", "-n", "-o", "{output}", "--width", "{width}", "--height", "{height}"]
//!
//! [review]
//! mode = "composite"
//! layouts = ["2x2", "1x4"]
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::composite::LayoutKind;
use crate::error::{BoothError, Result};

/// Largest shot count with matching pose prompt assets.
pub const MAX_SHOTS: u8 = 9;

/// Largest accepted capture width or height.
pub const MAX_DIMENSION: u32 = 16_384;

/// Largest accepted strip border, header or footer.
pub const MAX_STRIP_MARGIN: u32 = 4_096;

/// Complete booth configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoothConfig {
    /// Test mode: zero delays, auto trigger, one cycle then exit.
    pub fast: bool,
    pub trigger: TriggerConfig,
    pub capture: CaptureConfig,
    pub timing: TimingConfig,
    pub review: ReviewConfig,
    pub strip: StripConfig,
    pub paths: PathsConfig,
}

/// Where trigger edges come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TriggerBackend {
    /// Stream Deck key or pedal.
    #[default]
    Streamdeck,
    /// Fires a snap trigger on every poll.
    Auto,
}

/// Trigger lines and idle-loop cadence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TriggerConfig {
    pub backend: TriggerBackend,
    /// Stream Deck serial, required when more than one is connected.
    pub serial: Option<String>,
    /// Key index that starts a session.
    pub snap_key: u8,
    /// Key index that exits the booth.
    pub exit_key: u8,
    /// Bounded wait per idle poll.
    pub poll_timeout_ms: u64,
    /// Idle iterations between blink toggles.
    pub blink_cadence: u32,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            backend: TriggerBackend::Streamdeck,
            serial: None,
            snap_key: 0,
            exit_key: 2,
            poll_timeout_ms: 100,
            blink_cadence: 5,
        }
    }
}

impl TriggerConfig {
    /// Poll timeout as a duration.
    pub const fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }
}

/// Still-capture primitive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CameraBackend {
    /// Generated test pattern, no hardware.
    #[default]
    Synthetic,
    /// External still-capture program.
    Command,
}

/// Photo capture settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptureConfig {
    pub shot_count: u8,
    pub width: u32,
    pub height: u32,
    pub jpeg_quality: u8,
    pub camera: CameraBackend,
    /// Argument vector for the command camera. `{output}`, `{width}` and
    /// `{height}` are substituted per shot.
    pub command: Vec<String>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            shot_count: 4,
            width: 1296,
            height: 972,
            jpeg_quality: 90,
            camera: CameraBackend::Synthetic,
            command: [
                "rpicam-still",
                "-n",
                "--hflip",
                "-o",
                "{output}",
                "--width",
                "{width}",
                "--height",
                "{height}",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

impl CaptureConfig {
    pub const fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Delays, in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    /// Pose prompt display time.
    pub prep_secs: u64,
    /// Countdown start digit; 0 disables the countdown.
    pub countdown_from: u32,
    /// Composite and "all done" display time.
    pub review_secs: u64,
    /// Per-frame display time in playback mode.
    pub playback_interval_secs: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            prep_secs: 3,
            countdown_from: 3,
            review_secs: 5,
            playback_interval_secs: 2,
        }
    }
}

impl TimingConfig {
    pub const fn prep(&self) -> Duration {
        Duration::from_secs(self.prep_secs)
    }

    pub const fn review(&self) -> Duration {
        Duration::from_secs(self.review_secs)
    }

    pub const fn playback_interval(&self) -> Duration {
        Duration::from_secs(self.playback_interval_secs)
    }

    /// All delays zeroed.
    pub const fn zeroed() -> Self {
        Self {
            prep_secs: 0,
            countdown_from: 0,
            review_secs: 0,
            playback_interval_secs: 0,
        }
    }
}

/// How the session is shown back to the guests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ReviewMode {
    /// Render composites and show them.
    #[default]
    Composite,
    /// Show each captured frame in turn.
    Playback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReviewConfig {
    pub mode: ReviewMode,
    /// Composites rendered in composite mode, in display order.
    pub layouts: Vec<LayoutKind>,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            mode: ReviewMode::Composite,
            layouts: vec![LayoutKind::Grid2x2],
        }
    }
}

/// Decorative margins of the vertical strip, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StripConfig {
    pub border: u32,
    pub header: u32,
    pub footer: u32,
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            border: 10,
            header: 50,
            footer: 300,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Screens, pose prompts and background templates.
    pub assets: PathBuf,
    /// Frames and composites.
    pub output: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            assets: PathBuf::from("assets"),
            output: PathBuf::from("/snaps"),
        }
    }
}

impl BoothConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply fast mode: zero every delay and force the auto trigger.
    ///
    /// Returns the configuration the booth actually runs with. A no-op when
    /// `fast` is off.
    #[must_use]
    pub fn effective(mut self) -> Self {
        if self.fast {
            debug!("Fast mode: zeroing delays and auto-firing the trigger");
            self.timing = TimingConfig::zeroed();
            self.trigger.backend = TriggerBackend::Auto;
        }
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        trace!("Validating booth config");
        let invalid = |msg: String| Err(BoothError::ConfigInvalid(msg));

        if !(1..=100).contains(&self.capture.jpeg_quality) {
            return invalid(format!(
                "capture.jpeg_quality must be 1-100, got {}",
                self.capture.jpeg_quality
            ));
        }
        if !(1..=MAX_SHOTS).contains(&self.capture.shot_count) {
            return invalid(format!(
                "capture.shot_count must be 1-{MAX_SHOTS}, got {}",
                self.capture.shot_count
            ));
        }
        if self.capture.width < 2 || self.capture.height < 2 {
            return invalid(format!(
                "capture resolution too small: {}x{}",
                self.capture.width, self.capture.height
            ));
        }
        if self.capture.width > MAX_DIMENSION || self.capture.height > MAX_DIMENSION {
            return invalid(format!(
                "capture resolution too large: {}x{} (max {MAX_DIMENSION} per side)",
                self.capture.width, self.capture.height
            ));
        }
        let StripConfig {
            border,
            header,
            footer,
        } = self.strip;
        for (name, value) in [("border", border), ("header", header), ("footer", footer)] {
            if value > MAX_STRIP_MARGIN {
                return invalid(format!(
                    "strip.{name} must be at most {MAX_STRIP_MARGIN}, got {value}"
                ));
            }
        }
        if self.capture.camera == CameraBackend::Command && self.capture.command.is_empty() {
            return invalid("capture.command is empty".to_string());
        }
        if self.trigger.poll_timeout_ms == 0 {
            return invalid("trigger.poll_timeout_ms must be positive".to_string());
        }
        if self.trigger.blink_cadence == 0 {
            return invalid("trigger.blink_cadence must be positive".to_string());
        }
        if self.trigger.snap_key == self.trigger.exit_key {
            return invalid(format!(
                "trigger.snap_key and trigger.exit_key are both {}",
                self.trigger.snap_key
            ));
        }
        if self.review.mode == ReviewMode::Composite {
            if self.review.layouts.is_empty() {
                return invalid("review.layouts is empty in composite mode".to_string());
            }
            for layout in &self.review.layouts {
                match layout.fixed_cells() {
                    Some(cells) if cells != usize::from(self.capture.shot_count) => {
                        return invalid(format!(
                            "layout {layout} holds {cells} frames but capture.shot_count is {}",
                            self.capture.shot_count
                        ));
                    }
                    _ => {}
                }
            }
        }

        debug!(
            shots = self.capture.shot_count,
            mode = ?self.review.mode,
            "Booth config validated"
        );
        Ok(())
    }
}
