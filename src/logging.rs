//! Log setup for the booth.
//!
//! Everything goes to stderr so stdout stays free for command output. Robot
//! mode logs JSON lines and closes each instrumented span with its duration,
//! which is how composite render times show up for scripts watching a booth.

use std::io::{self, IsTerminal};

use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// HID chatter is only useful when debugging the trigger itself.
const QUIET_DEPENDENCIES: &str = "elgato_streamdeck=warn,hidapi=warn";

/// Shape of the log lines on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStyle {
    /// One JSON object per event, spans reported on close.
    Json,
    /// Colored multi-field lines for an operator at a terminal.
    Pretty,
    /// Plain single lines for journald or a redirected file.
    Compact,
}

impl LogStyle {
    pub const fn pick(robot_mode: bool, stderr_is_tty: bool) -> Self {
        match (robot_mode, stderr_is_tty) {
            (true, _) => Self::Json,
            (false, true) => Self::Pretty,
            (false, false) => Self::Compact,
        }
    }
}

/// Filter used when `RUST_LOG` is unset.
///
/// `-q` keeps errors only and beats any `-v`.
pub fn filter_directive(verbose: u8, quiet: bool) -> String {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    format!("booth={level},{QUIET_DEPENDENCIES}")
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_logging(robot_mode: bool, verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbose, quiet)));

    let base = fmt::layer()
        .with_writer(io::stderr)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false);
    let layer = match LogStyle::pick(robot_mode, io::stderr().is_terminal()) {
        LogStyle::Json => base
            .json()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .boxed(),
        LogStyle::Pretty => base.with_target(false).boxed(),
        LogStyle::Compact => base.with_ansi(false).with_target(false).compact().boxed(),
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init();
}
