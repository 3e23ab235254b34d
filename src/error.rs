//! Error types for photo booth operations.

use thiserror::Error;

/// Primary error type for the booth.
#[derive(Error, Debug)]
pub enum BoothError {
    // Asset errors
    #[error("Asset not found: {path}")]
    AssetNotFound { path: String },

    #[error("Image processing failed: {0}")]
    ImageProcessing(String),

    #[error("Composite needs {expected} frames, got {actual}")]
    FrameCount { expected: usize, actual: usize },

    // Hardware errors
    #[error("No Stream Deck devices found")]
    NoDevicesFound,

    #[error("Trigger device not found: {serial}")]
    DeviceNotFound { serial: String },

    #[error("Multiple trigger devices found, set trigger.serial: {serials:?}")]
    MultipleDevices { serials: Vec<String> },

    #[error("Trigger error: {0}")]
    Trigger(String),

    #[error("Capture failed for {path}: {reason}")]
    CaptureFailed { path: String, reason: String },

    #[error("Preview error: {0}")]
    Preview(String),

    #[error("Overlay {id} is not on the preview surface")]
    UnknownOverlay { id: u32 },

    // Configuration errors
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    // Process lifecycle
    #[error("Interrupted")]
    Interrupted,

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl BoothError {
    /// Returns true if the error is recoverable by the operator.
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::AssetNotFound { .. }
                | Self::NoDevicesFound
                | Self::DeviceNotFound { .. }
                | Self::MultipleDevices { .. }
                | Self::ConfigNotFound { .. }
                | Self::ConfigInvalid(_)
                | Self::Interrupted
        )
    }

    /// Returns true if the run ended because the operator interrupted it.
    pub const fn is_interrupt(&self) -> bool {
        matches!(self, Self::Interrupted)
    }

    /// Returns a suggestion for how to fix the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::AssetNotFound { .. } => Some("Run: booth check"),
            Self::NoDevicesFound => Some("Connect the trigger device or use --trigger auto"),
            Self::MultipleDevices { .. } => Some("Set trigger.serial in the config file"),
            Self::ConfigNotFound { .. } => Some("Pass --config or run without one for defaults"),
            Self::FrameCount { .. } => Some("Match capture.shot_count to the layout cell count"),
            _ => None,
        }
    }
}

/// Convenience type alias for Results using BoothError.
pub type Result<T> = std::result::Result<T, BoothError>;

/// Extension trait for adding context to errors.
pub trait ResultExt<T> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T, E: std::error::Error> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| BoothError::Other(format!("{}: {e}", f().into())))
    }
}
