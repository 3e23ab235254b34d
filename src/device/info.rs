//! Value types exchanged with booth peripherals.

use std::fmt;

use serde::Serialize;

/// Which physical trigger line fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerLine {
    /// Starts a capture session.
    Snap,
    /// Shuts the booth down.
    Exit,
}

/// A detected falling edge on a trigger line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TriggerEvent {
    pub line: TriggerLine,
    /// Milliseconds the poll waited before the edge arrived.
    pub waited_ms: u64,
}

impl TriggerEvent {
    pub const fn snap(waited_ms: u64) -> Self {
        Self {
            line: TriggerLine::Snap,
            waited_ms,
        }
    }

    pub const fn exit(waited_ms: u64) -> Self {
        Self {
            line: TriggerLine::Exit,
            waited_ms,
        }
    }

    pub const fn is_exit(&self) -> bool {
        matches!(self.line, TriggerLine::Exit)
    }
}

/// Surface-level identifier of an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct OverlayId(pub u32);

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Information about a connected Stream Deck usable as a trigger.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceInfo {
    /// Device serial number
    pub serial: String,
    /// Human-readable product name
    pub product_name: String,
    /// Number of keys (or pedals)
    pub key_count: u8,
    /// Device kind/model identifier
    pub kind: String,
}
