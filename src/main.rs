//! Photo booth CLI.
//!
//! Provides both operator-friendly and robot-mode (JSON) interfaces.
#![forbid(unsafe_code)]

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{CommandFactory, Parser};
use console::style;
use serde::Serialize;
use tracing::{debug, info};

use booth::check::check_assets;
use booth::cli::{
    CheckArgs, Cli, Commands, ComposeArgs, CompletionsArgs, ConfigArgs, RunArgs,
};
use booth::composite::CompositeRenderer;
use booth::config::{self, BoothConfig, default_config_path};
use booth::controller::{RunSummary, SessionController};
use booth::device::{self, DeviceContext};
use booth::error::{BoothError, Result};
use booth::interrupt::{InterruptFlag, install_ctrl_c_handler};
use booth::logging::init_logging;
use booth::output::{Output, OutputMode, VersionInfo};

/// Build information embedded at compile time.
mod build_info {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    pub fn git_sha() -> &'static str {
        option_env!("VERGEN_GIT_SHA").unwrap_or("unknown")
    }

    pub fn git_dirty() -> &'static str {
        option_env!("VERGEN_GIT_DIRTY").unwrap_or("false")
    }

    pub fn build_timestamp() -> &'static str {
        option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown")
    }

    pub fn rustc_semver() -> &'static str {
        option_env!("VERGEN_RUSTC_SEMVER").unwrap_or("unknown")
    }

    pub fn target() -> &'static str {
        option_env!("VERGEN_CARGO_TARGET_TRIPLE").unwrap_or("unknown")
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.use_json(), cli.verbose, cli.quiet);

    let mode = OutputMode::from_cli(&cli);
    let out = mode.into_output();

    match run(&cli, out.as_ref()) {
        Ok(code) => code,
        Err(e) if e.is_interrupt() => {
            out.goodbye();
            ExitCode::SUCCESS
        }
        Err(e) => {
            out.error(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, out: &dyn Output) -> Result<ExitCode> {
    match &cli.command {
        None => print_quick_start(cli),
        Some(Commands::Run(args)) => cmd_run(cli, args, out),
        Some(Commands::Compose(args)) => cmd_compose(cli, args, out),
        Some(Commands::Check(args)) => cmd_check(cli, args, out),
        Some(Commands::Devices) => cmd_devices(out),
        Some(Commands::Config(args)) => cmd_config(cli, args, out),
        Some(Commands::Version) => cmd_version(out),
        Some(Commands::Completions(args)) => cmd_completions(args),
    }
}

// === Quick Start ===

#[derive(Serialize)]
struct RobotQuickStart {
    tool: &'static str,
    version: &'static str,
    description: &'static str,
    commands: [(&'static str, &'static str); 5],
}

const QUICK_START: [(&str, &str); 5] = [
    ("booth check", "Verify screens and templates"),
    ("booth run", "Start the booth"),
    ("booth run --fast -o /tmp/snaps", "One session, no delays, no hardware"),
    ("booth compose <ID> -l 2x2,1x4", "Rebuild composites for a session"),
    ("booth devices", "List Stream Deck triggers"),
];

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn print_quick_start(cli: &Cli) -> Result<ExitCode> {
    if cli.use_json() {
        let help = RobotQuickStart {
            tool: "booth",
            version: build_info::VERSION,
            description: "Unattended photo booth kiosk",
            commands: QUICK_START,
        };
        if let Ok(json) = serde_json::to_string_pretty(&help) {
            println!("{json}");
        }
    } else {
        println!(
            "{} {} - photo booth kiosk\n",
            style("booth").bold().cyan(),
            build_info::VERSION
        );
        println!("{}", style("QUICK START").bold().underlined());
        for (command, what) in QUICK_START {
            println!("  {:<34} {what}", style(command).green());
        }
        println!("\nRun {} for full help", style("booth --help").yellow());
    }
    Ok(ExitCode::SUCCESS)
}

// === Kiosk ===

/// Configuration file plus CLI overrides, fast mode applied, validated.
fn effective_config(cli: &Cli, args: &RunArgs) -> Result<BoothConfig> {
    let mut config = config::load_or_default(cli.config.as_deref())?;
    args.apply(&mut config);
    let config = config.effective();
    config.validate()?;
    Ok(config)
}

fn cmd_run(cli: &Cli, args: &RunArgs, out: &dyn Output) -> Result<ExitCode> {
    let start = Instant::now();
    let outcome = run_booth(cli, args);
    out.run_finished(&outcome, start.elapsed());

    Ok(match &outcome {
        Err(e) if !e.is_interrupt() => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}

/// Open the devices, run the booth and release the devices again.
///
/// A run error wins over a release error.
fn run_booth(cli: &Cli, args: &RunArgs) -> Result<RunSummary> {
    let config = effective_config(cli, args)?;

    let interrupt = InterruptFlag::new();
    install_ctrl_c_handler(interrupt.clone())?;
    let mut ctx = DeviceContext::open(&config, interrupt)?;

    let mut controller = SessionController::new(config);
    let result = controller.run(&mut ctx);
    let released = ctx.release();
    info!(state = %controller.state(), "Booth stopped");

    let summary = result?;
    released?;
    Ok(summary)
}

fn cmd_compose(cli: &Cli, args: &ComposeArgs, out: &dyn Output) -> Result<ExitCode> {
    let mut config = config::load_or_default(cli.config.as_deref())?;
    if let Some(assets) = &args.assets {
        config.paths.assets.clone_from(assets);
    }
    let output = args.output.clone().unwrap_or_else(|| config.paths.output.clone());

    let frames: Vec<PathBuf> = (1..=u8::MAX)
        .map(|pose| args.id.frame_path(&output, pose))
        .take_while(|path| path.is_file())
        .collect();
    if frames.is_empty() {
        return Err(BoothError::AssetNotFound {
            path: args.id.frame_path(&output, 1).display().to_string(),
        });
    }
    debug!(id = %args.id, frames = frames.len(), "Frames found");

    let layouts = if args.layout.is_empty() {
        config.review.layouts.clone()
    } else {
        args.layout.clone()
    };

    let mut renderer = CompositeRenderer::from_config(&config);
    if let Some(seed) = args.seed {
        renderer = renderer.with_seed(seed);
    }
    let mut written = Vec::with_capacity(layouts.len());
    for kind in layouts {
        let target = args.id.composite_path(&output, kind);
        written.push(renderer.compose(kind, &frames, &target)?);
    }

    out.composites(&written);
    Ok(ExitCode::SUCCESS)
}

// === Setup ===

fn cmd_check(cli: &Cli, args: &CheckArgs, out: &dyn Output) -> Result<ExitCode> {
    let mut config = config::load_or_default(cli.config.as_deref())?;
    if let Some(assets) = &args.assets {
        config.paths.assets.clone_from(assets);
    }

    let report = check_assets(&config);
    out.check_report(&report);
    Ok(if report.ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn cmd_devices(out: &dyn Output) -> Result<ExitCode> {
    let devices = device::list_devices()?;
    out.device_list(&devices);
    Ok(ExitCode::SUCCESS)
}

fn cmd_config(cli: &Cli, args: &ConfigArgs, out: &dyn Output) -> Result<ExitCode> {
    let source = cli
        .config
        .clone()
        .or_else(|| default_config_path().filter(|p| p.exists()));

    if args.path {
        let path = cli.config.clone().or_else(default_config_path);
        out.config_path(path.map(|p| p.display().to_string()).as_deref());
        return Ok(ExitCode::SUCCESS);
    }

    let config = config::load_or_default(source.as_deref())?.effective();
    out.config(&config, source.map(|p| p.display().to_string()).as_deref());
    Ok(ExitCode::SUCCESS)
}

// === Utilities ===

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn cmd_version(out: &dyn Output) -> Result<ExitCode> {
    out.version_info(&VersionInfo {
        version: build_info::VERSION,
        git_sha: build_info::git_sha(),
        git_dirty: build_info::git_dirty() == "true",
        build_timestamp: build_info::build_timestamp(),
        rustc_version: build_info::rustc_semver(),
        target: build_info::target(),
    });
    Ok(ExitCode::SUCCESS)
}

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn cmd_completions(args: &CompletionsArgs) -> Result<ExitCode> {
    clap_complete::generate(args.shell, &mut Cli::command(), "booth", &mut io::stdout());
    Ok(ExitCode::SUCCESS)
}
