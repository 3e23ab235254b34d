//! Hardware-free backends: an in-memory preview surface and an
//! always-firing trigger.

use std::collections::BTreeMap;
use std::time::Duration;

use image::RgbImage;
use tracing::{debug, info, trace};

use super::info::{OverlayId, TriggerEvent};
use super::{PreviewSurface, TriggerSource};
use crate::error::{BoothError, Result};

#[derive(Debug)]
struct Overlay {
    size: (u32, u32),
    layer: u8,
    alpha: u8,
}

/// Preview surface that tracks overlays in memory.
///
/// Used when the booth runs without a display (dry runs, CI). It enforces
/// the same contract as a real renderer: unknown ids are rejected.
#[derive(Debug, Default)]
pub struct HeadlessPreview {
    overlays: BTreeMap<OverlayId, Overlay>,
    annotation: String,
    next_id: u32,
    running: bool,
}

impl HeadlessPreview {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of overlays currently on the surface.
    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    /// Ids on `layer`, lowest id first.
    pub fn overlays_on_layer(&self, layer: u8) -> Vec<OverlayId> {
        self.overlays
            .iter()
            .filter(|(_, o)| o.layer == layer)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn annotation(&self) -> &str {
        &self.annotation
    }

    pub const fn is_running(&self) -> bool {
        self.running
    }

    fn overlay_mut(&mut self, id: OverlayId) -> Result<&mut Overlay> {
        self.overlays
            .get_mut(&id)
            .ok_or(BoothError::UnknownOverlay { id: id.0 })
    }
}

impl PreviewSurface for HeadlessPreview {
    fn start(&mut self) -> Result<()> {
        info!("Headless preview started");
        self.running = true;
        Ok(())
    }

    fn add_overlay(&mut self, buffer: RgbImage, size: (u32, u32), layer: u8) -> Result<OverlayId> {
        if size.0 > buffer.width() || size.1 > buffer.height() {
            return Err(BoothError::Preview(format!(
                "visible size {}x{} exceeds buffer {}x{}",
                size.0,
                size.1,
                buffer.width(),
                buffer.height()
            )));
        }
        self.next_id += 1;
        let id = OverlayId(self.next_id);
        debug!(%id, layer, w = size.0, h = size.1, "Overlay added");
        self.overlays.insert(
            id,
            Overlay {
                size,
                layer,
                alpha: 255,
            },
        );
        Ok(id)
    }

    fn remove_overlay(&mut self, id: OverlayId) -> Result<()> {
        let overlay = self
            .overlays
            .remove(&id)
            .ok_or(BoothError::UnknownOverlay { id: id.0 })?;
        debug!(%id, layer = overlay.layer, "Overlay removed");
        Ok(())
    }

    fn set_alpha(&mut self, id: OverlayId, alpha: u8) -> Result<()> {
        let overlay = self.overlay_mut(id)?;
        trace!(%id, alpha, size = ?overlay.size, "Overlay alpha");
        overlay.alpha = alpha;
        Ok(())
    }

    fn set_annotation(&mut self, text: &str) -> Result<()> {
        trace!(text = %text.trim(), "Annotation");
        self.annotation = text.to_string();
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        info!(remaining = self.overlays.len(), "Headless preview stopped");
        self.overlays.clear();
        self.running = false;
        Ok(())
    }
}

/// Trigger that reports a snap edge on every poll.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoTrigger;

impl TriggerSource for AutoTrigger {
    fn wait_for_edge(&mut self, _timeout: Duration) -> Result<Option<TriggerEvent>> {
        Ok(Some(TriggerEvent::snap(0)))
    }
}
