//! CLI argument definitions.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::composite::LayoutKind;
use crate::config::{BoothConfig, CameraBackend, ReviewMode, TriggerBackend};
use crate::session::SessionId;

/// Photo booth kiosk: trigger, countdown, multi-shot capture and composites.
///
/// Robot Mode: Use --robot or --format=json for machine-parseable output.
#[derive(Parser, Debug)]
#[command(name = "booth", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (text for humans, json for scripts)
    #[arg(
        long,
        short = 'f',
        default_value = "text",
        global = true,
        env = "BOOTH_FORMAT"
    )]
    pub format: OutputFormat,

    /// Robot mode: equivalent to --format=json
    #[arg(long, global = true)]
    pub robot: bool,

    /// Verbose logging (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Configuration file (TOML or YAML)
    #[arg(long, short = 'c', global = true, env = "BOOTH_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format selection.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with optional color
    #[default]
    Text,
    /// JSON output for scripts
    Json,
    /// Compact JSON (single line)
    JsonCompact,
}

impl Cli {
    /// Returns true if output should be JSON (robot mode or explicit --format=json).
    pub const fn use_json(&self) -> bool {
        self.robot || matches!(self.format, OutputFormat::Json | OutputFormat::JsonCompact)
    }

    /// Returns true if output should be compact JSON.
    pub const fn use_compact_json(&self) -> bool {
        matches!(self.format, OutputFormat::JsonCompact)
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    // === Kiosk ===
    /// Run the booth until the exit trigger (or one session with --fast)
    Run(RunArgs),

    /// Rebuild composites from a session's frames on disk
    Compose(ComposeArgs),

    // === Setup ===
    /// Verify that every asset the configuration needs exists
    Check(CheckArgs),

    /// List connected Stream Deck trigger devices
    Devices,

    /// Print the effective configuration
    Config(ConfigArgs),

    // === Utilities ===
    /// Show version and build information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// === Argument Structs ===

/// Overrides applied on top of the configuration file.
///
/// # Examples
///
/// ```bash
/// # Dry run without hardware: one session, no delays
/// booth run --fast --output /tmp/snaps
///
/// # Real booth, frames shown back one by one
/// booth run --camera command --mode playback
/// ```
#[derive(Parser, Debug, Default)]
pub struct RunArgs {
    /// Zero every delay, auto-fire the trigger and exit after one session
    #[arg(long)]
    pub fast: bool,

    /// Trigger backend
    #[arg(long)]
    pub trigger: Option<TriggerBackend>,

    /// Camera backend
    #[arg(long)]
    pub camera: Option<CameraBackend>,

    /// Review mode
    #[arg(long)]
    pub mode: Option<ReviewMode>,

    /// Output directory for frames and composites
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Asset directory (screens and templates)
    #[arg(long, short = 'a')]
    pub assets: Option<PathBuf>,
}

impl RunArgs {
    /// Apply the overrides to `config`.
    pub fn apply(&self, config: &mut BoothConfig) {
        if self.fast {
            config.fast = true;
        }
        if let Some(trigger) = self.trigger {
            config.trigger.backend = trigger;
        }
        if let Some(camera) = self.camera {
            config.capture.camera = camera;
        }
        if let Some(mode) = self.mode {
            config.review.mode = mode;
        }
        if let Some(output) = &self.output {
            config.paths.output.clone_from(output);
        }
        if let Some(assets) = &self.assets {
            config.paths.assets.clone_from(assets);
        }
    }
}

#[derive(Parser, Debug)]
pub struct ComposeArgs {
    /// Session id (YYYYMMDD_HHMMSS)
    pub id: SessionId,

    /// Layouts to render (defaults to review.layouts)
    #[arg(long, short = 'l', value_delimiter = ',')]
    pub layout: Vec<LayoutKind>,

    /// Directory holding the frames (defaults to paths.output)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Asset directory (templates)
    #[arg(long, short = 'a')]
    pub assets: Option<PathBuf>,

    /// Seed for background template selection
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Asset directory to check (defaults to paths.assets)
    #[arg(long, short = 'a')]
    pub assets: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Show configuration file path only
    #[arg(long)]
    pub path: bool,
}

#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
