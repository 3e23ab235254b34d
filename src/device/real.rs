//! Stream Deck trigger backend.
//!
//! Any Stream Deck (including the three-pedal Stream Deck Pedal) can drive
//! the booth: one key is the snap line, another the exit line. A falling
//! edge is a key going from released to pressed.

use std::time::{Duration, Instant};

use elgato_streamdeck::info::Kind;
use elgato_streamdeck::{StreamDeck, StreamDeckInput};
use tracing::{debug, info, trace};

use super::TriggerSource;

/// Upper bound on reports dropped by one `discard_pending` call.
const MAX_DISCARDED_REPORTS: usize = 256;
use super::info::{DeviceInfo, TriggerEvent, TriggerLine};
use crate::error::{BoothError, Result};

fn hid_error(e: hidapi::HidError) -> BoothError {
    BoothError::Trigger(e.to_string())
}

/// List all connected Stream Deck devices.
pub fn list_devices() -> Result<Vec<DeviceInfo>> {
    let hid = elgato_streamdeck::new_hidapi().map_err(hid_error)?;

    Ok(elgato_streamdeck::list_devices(&hid)
        .into_iter()
        .map(|(kind, serial)| DeviceInfo {
            serial,
            product_name: kind_to_name(kind),
            key_count: kind.key_count(),
            kind: format!("{kind:?}"),
        })
        .collect())
}

/// Falling-edge detector over Stream Deck key states.
pub struct StreamDeckTrigger {
    deck: Option<StreamDeck>,
    snap_key: u8,
    exit_key: u8,
    last: Vec<bool>,
}

impl StreamDeckTrigger {
    /// Open a Stream Deck, optionally by serial number.
    pub fn open(serial: Option<&str>, snap_key: u8, exit_key: u8) -> Result<Self> {
        let hid = elgato_streamdeck::new_hidapi().map_err(hid_error)?;
        let devices = elgato_streamdeck::list_devices(&hid);

        if devices.is_empty() {
            return Err(BoothError::NoDevicesFound);
        }

        let (kind, target_serial) = if let Some(serial) = serial {
            devices
                .iter()
                .find(|(_, s)| s == serial)
                .cloned()
                .ok_or_else(|| BoothError::DeviceNotFound {
                    serial: serial.to_string(),
                })?
        } else if devices.len() == 1 {
            devices[0].clone()
        } else {
            let serials: Vec<_> = devices.iter().map(|(_, s)| s.clone()).collect();
            return Err(BoothError::MultipleDevices { serials });
        };

        let key_count = kind.key_count();
        for key in [snap_key, exit_key] {
            if key >= key_count {
                return Err(BoothError::ConfigInvalid(format!(
                    "trigger key {key} out of range: {} has {key_count} keys",
                    kind_to_name(kind)
                )));
            }
        }

        let deck = StreamDeck::connect(&hid, kind, &target_serial)
            .map_err(|e| BoothError::Trigger(format!("{target_serial}: {e}")))?;

        info!(serial = %target_serial, kind = ?kind, snap_key, exit_key, "Trigger device opened");

        Ok(Self {
            deck: Some(deck),
            snap_key,
            exit_key,
            last: vec![false; usize::from(key_count)],
        })
    }

    /// Apply a new key-state vector and report the edge it produced, if any.
    ///
    /// The exit line wins when both lines fall in the same report.
    fn edge(&mut self, states: &[bool]) -> Option<TriggerLine> {
        let fell = |key: u8| {
            let k = usize::from(key);
            states.get(k).copied().unwrap_or(false) && !self.last.get(k).copied().unwrap_or(false)
        };
        let line = if fell(self.exit_key) {
            Some(TriggerLine::Exit)
        } else if fell(self.snap_key) {
            Some(TriggerLine::Snap)
        } else {
            None
        };
        self.last = states.to_vec();
        line
    }

    /// Take a stale key-state vector without reporting an edge.
    fn absorb(&mut self, states: &[bool]) {
        self.last = states.to_vec();
    }
}

impl TriggerSource for StreamDeckTrigger {
    fn wait_for_edge(&mut self, timeout: Duration) -> Result<Option<TriggerEvent>> {
        let start = Instant::now();
        loop {
            let remaining = timeout.saturating_sub(start.elapsed());
            if remaining.is_zero() {
                return Ok(None);
            }

            let deck = self
                .deck
                .as_ref()
                .ok_or_else(|| BoothError::Trigger("trigger device already released".to_string()))?;
            let input = deck
                .read_input(Some(remaining))
                .map_err(|e| BoothError::Trigger(e.to_string()))?;

            if let StreamDeckInput::ButtonStateChange(states) = input {
                trace!(?states, "Key states changed");
                if let Some(line) = self.edge(&states) {
                    let waited_ms = start.elapsed().as_millis().min(u128::from(u64::MAX)) as u64;
                    debug!(?line, waited_ms, "Trigger edge");
                    return Ok(Some(TriggerEvent { line, waited_ms }));
                }
            }
        }
    }

    fn discard_pending(&mut self) -> Result<()> {
        let mut dropped = 0;
        while dropped < MAX_DISCARDED_REPORTS {
            let deck = self
                .deck
                .as_ref()
                .ok_or_else(|| BoothError::Trigger("trigger device already released".to_string()))?;
            let input = deck
                .read_input(Some(Duration::ZERO))
                .map_err(|e| BoothError::Trigger(e.to_string()))?;
            match input {
                StreamDeckInput::NoData => break,
                StreamDeckInput::ButtonStateChange(states) => self.absorb(&states),
                _ => {}
            }
            dropped += 1;
        }
        if dropped > 0 {
            debug!(dropped, "Discarded queued trigger reports");
        }
        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        if self.deck.take().is_some() {
            debug!("Trigger device closed");
        }
        Ok(())
    }
}

/// Convert device kind to human-readable name.
fn kind_to_name(kind: Kind) -> String {
    match kind {
        Kind::Original => "Stream Deck (Original)",
        Kind::OriginalV2 => "Stream Deck (Original V2)",
        Kind::Mini => "Stream Deck Mini",
        Kind::MiniMk2 => "Stream Deck Mini MK.2",
        Kind::Xl => "Stream Deck XL",
        Kind::XlV2 => "Stream Deck XL V2",
        Kind::Mk2 => "Stream Deck MK.2",
        Kind::Pedal => "Stream Deck Pedal",
        Kind::Plus => "Stream Deck +",
        Kind::Neo => "Stream Deck Neo",
        _ => "Unknown Stream Deck",
    }
    .to_string()
}
