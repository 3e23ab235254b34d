//! Mock peripherals for unit and integration testing.
//!
//! Every mock is a cheap cloneable handle over shared state: hand one clone
//! to the [`DeviceContext`](super::DeviceContext) and keep another to make
//! assertions after the booth has run.
//!
//! # Example
//!
//! ```rust,ignore
//! use booth::device::mock::{MockPreview, Operation};
//! use booth::device::PreviewSurface;
//!
//! let mut preview = MockPreview::new();
//! let id = preview.add_overlay(image::RgbImage::new(32, 16), (30, 10), 3).unwrap();
//! preview.remove_overlay(id).unwrap();
//!
//! preview.assert_contains(&Operation::RemoveOverlay { id });
//! assert!(preview.overlays_on_layer(3).is_empty());
//! ```

use std::collections::{BTreeMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use image::RgbImage;
use tracing::trace;

use super::info::{OverlayId, TriggerEvent};
use super::{Camera, Clock, PreviewSurface, TriggerSource};
use crate::error::{BoothError, Result};
use crate::image_ops;

/// Recorded preview operation for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Start,
    AddOverlay {
        id: OverlayId,
        layer: u8,
        size: (u32, u32),
        buffer: (u32, u32),
    },
    RemoveOverlay {
        id: OverlayId,
    },
    SetAlpha {
        id: OverlayId,
        alpha: u8,
    },
    SetAnnotation {
        text: String,
    },
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockOverlay {
    pub layer: u8,
    pub size: (u32, u32),
    pub alpha: u8,
}

#[derive(Debug, Default)]
struct PreviewState {
    overlays: BTreeMap<OverlayId, MockOverlay>,
    log: Vec<Operation>,
    next_id: u32,
    fail_stop: bool,
}

/// Recording preview surface.
#[derive(Debug, Clone, Default)]
pub struct MockPreview {
    state: Arc<Mutex<PreviewState>>,
}

impl MockPreview {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `stop` fail.
    pub fn fail_stop(&self) {
        self.state.lock().unwrap().fail_stop = true;
    }

    // === Assertions ===

    /// Get all recorded operations.
    #[must_use]
    pub fn operations(&self) -> Vec<Operation> {
        self.state.lock().unwrap().log.clone()
    }

    /// Number of times `op` was recorded.
    #[must_use]
    pub fn count(&self, op: &Operation) -> usize {
        self.state
            .lock()
            .unwrap()
            .log
            .iter()
            .filter(|o| *o == op)
            .count()
    }

    /// Assert a specific operation was performed at least once.
    ///
    /// # Panics
    ///
    /// Panics if the operation was not found.
    pub fn assert_contains(&self, expected: &Operation) {
        let ops = self.operations();
        assert!(
            ops.contains(expected),
            "Expected operation {expected:?} not found in: {ops:#?}",
        );
    }

    /// Overlays currently on the surface.
    #[must_use]
    pub fn overlays(&self) -> BTreeMap<OverlayId, MockOverlay> {
        self.state.lock().unwrap().overlays.clone()
    }

    /// Ids currently on `layer`.
    #[must_use]
    pub fn overlays_on_layer(&self, layer: u8) -> Vec<OverlayId> {
        self.overlays()
            .into_iter()
            .filter(|(_, o)| o.layer == layer)
            .map(|(id, _)| id)
            .collect()
    }

    /// Every `add_overlay` call as `(id, layer)`, in order.
    #[must_use]
    pub fn added(&self) -> Vec<(OverlayId, u8)> {
        self.operations()
            .into_iter()
            .filter_map(|op| match op {
                Operation::AddOverlay { id, layer, .. } => Some((id, layer)),
                _ => None,
            })
            .collect()
    }

    /// Alpha values set on `id`, in order.
    #[must_use]
    pub fn alpha_history(&self, id: OverlayId) -> Vec<u8> {
        self.operations()
            .into_iter()
            .filter_map(|op| match op {
                Operation::SetAlpha { id: i, alpha } if i == id => Some(alpha),
                _ => None,
            })
            .collect()
    }

    /// Annotation texts, in order.
    #[must_use]
    pub fn annotations(&self) -> Vec<String> {
        self.operations()
            .into_iter()
            .filter_map(|op| match op {
                Operation::SetAnnotation { text } => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Clear the operation log for fresh assertions.
    pub fn clear_operations(&self) {
        self.state.lock().unwrap().log.clear();
    }

    fn record(state: &mut PreviewState, op: Operation) {
        trace!(?op, "Recording operation");
        state.log.push(op);
    }
}

impl PreviewSurface for MockPreview {
    fn start(&mut self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        Self::record(&mut state, Operation::Start);
        Ok(())
    }

    fn add_overlay(&mut self, buffer: RgbImage, size: (u32, u32), layer: u8) -> Result<OverlayId> {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = OverlayId(state.next_id);
        state.overlays.insert(
            id,
            MockOverlay {
                layer,
                size,
                alpha: 255,
            },
        );
        Self::record(
            &mut state,
            Operation::AddOverlay {
                id,
                layer,
                size,
                buffer: buffer.dimensions(),
            },
        );
        Ok(id)
    }

    fn remove_overlay(&mut self, id: OverlayId) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.overlays.remove(&id).is_none() {
            return Err(BoothError::UnknownOverlay { id: id.0 });
        }
        Self::record(&mut state, Operation::RemoveOverlay { id });
        Ok(())
    }

    fn set_alpha(&mut self, id: OverlayId, alpha: u8) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let overlay = state
            .overlays
            .get_mut(&id)
            .ok_or(BoothError::UnknownOverlay { id: id.0 })?;
        overlay.alpha = alpha;
        Self::record(&mut state, Operation::SetAlpha { id, alpha });
        Ok(())
    }

    fn set_annotation(&mut self, text: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        Self::record(
            &mut state,
            Operation::SetAnnotation {
                text: text.to_string(),
            },
        );
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        Self::record(&mut state, Operation::Stop);
        if state.fail_stop {
            return Err(BoothError::Preview("Mock stop failure".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct CameraState {
    captures: Vec<PathBuf>,
    closes: usize,
    write_files: bool,
    fail_on: Option<usize>,
}

/// Recording camera that writes solid-color frames.
#[derive(Debug, Clone)]
pub struct MockCamera {
    resolution: (u32, u32),
    state: Arc<Mutex<CameraState>>,
}

impl MockCamera {
    /// Camera that writes a real JPEG for every capture.
    #[must_use]
    pub fn new(resolution: (u32, u32)) -> Self {
        Self {
            resolution,
            state: Arc::new(Mutex::new(CameraState {
                write_files: true,
                ..CameraState::default()
            })),
        }
    }

    /// Camera that reports success but writes nothing.
    #[must_use]
    pub fn without_files(self) -> Self {
        self.state.lock().unwrap().write_files = false;
        self
    }

    /// Make the capture with the given 0-based index fail.
    #[must_use]
    pub fn failing_on(self, index: usize) -> Self {
        self.state.lock().unwrap().fail_on = Some(index);
        self
    }

    /// Paths captured so far.
    #[must_use]
    pub fn captures(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap().captures.clone()
    }

    #[must_use]
    pub fn close_count(&self) -> usize {
        self.state.lock().unwrap().closes
    }

    /// Color of the n-th (0-based) mock frame.
    #[must_use]
    pub const fn color_for(index: usize) -> (u8, u8, u8) {
        const PALETTE: [(u8, u8, u8); 4] =
            [(220, 30, 30), (30, 200, 30), (30, 30, 220), (230, 200, 20)];
        PALETTE[index % PALETTE.len()]
    }
}

impl Camera for MockCamera {
    fn resolution(&self) -> (u32, u32) {
        self.resolution
    }

    fn capture(&mut self, path: &Path) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let index = state.captures.len();
        if state.fail_on == Some(index) {
            return Err(BoothError::CaptureFailed {
                path: path.display().to_string(),
                reason: "Mock sensor failure".to_string(),
            });
        }
        if state.write_files {
            let (w, h) = self.resolution;
            let frame = image_ops::solid_canvas(w, h, Self::color_for(index));
            image_ops::save_jpeg(&frame, path, 95)?;
        }
        state.captures.push(path.to_path_buf());
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.state.lock().unwrap().closes += 1;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct TriggerState {
    script: VecDeque<Scripted>,
    polls: Vec<Duration>,
    discarded: Vec<TriggerEvent>,
    cleanups: usize,
}

/// One scripted poll result.
#[derive(Debug)]
struct Scripted {
    event: Option<TriggerEvent>,
    /// Arrived while no poll was running; `discard_pending` drops it.
    queued: bool,
}

/// Scripted trigger source.
///
/// Each poll pops the next scripted result; an exhausted script reports no
/// edge. Edges added with [`MockTrigger::queued_snap`] model presses made
/// mid-session: they sit at the head of the script until a poll reads them
/// or `discard_pending` drops them.
#[derive(Debug, Clone, Default)]
pub struct MockTrigger {
    state: Arc<Mutex<TriggerState>>,
}

impl MockTrigger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `n` polls that time out without an edge.
    #[must_use]
    pub fn idle(self, n: usize) -> Self {
        self.state
            .lock()
            .unwrap()
            .script
            .extend(std::iter::repeat_with(|| Scripted::polled(None)).take(n));
        self
    }

    /// Queue a snap edge.
    #[must_use]
    pub fn snap(self) -> Self {
        self.state
            .lock()
            .unwrap()
            .script
            .push_back(Scripted::polled(Some(TriggerEvent::snap(0))));
        self
    }

    /// Queue a snap edge pressed while the booth was busy.
    #[must_use]
    pub fn queued_snap(self) -> Self {
        self.state.lock().unwrap().script.push_back(Scripted {
            event: Some(TriggerEvent::snap(0)),
            queued: true,
        });
        self
    }

    /// Queue an exit edge.
    #[must_use]
    pub fn exit(self) -> Self {
        self.state
            .lock()
            .unwrap()
            .script
            .push_back(Scripted::polled(Some(TriggerEvent::exit(0))));
        self
    }

    /// Timeouts passed to each poll so far.
    #[must_use]
    pub fn polls(&self) -> Vec<Duration> {
        self.state.lock().unwrap().polls.clone()
    }

    /// Queued edges dropped by `discard_pending`.
    #[must_use]
    pub fn discarded(&self) -> Vec<TriggerEvent> {
        self.state.lock().unwrap().discarded.clone()
    }

    #[must_use]
    pub fn cleanup_count(&self) -> usize {
        self.state.lock().unwrap().cleanups
    }
}

impl Scripted {
    const fn polled(event: Option<TriggerEvent>) -> Self {
        Self {
            event,
            queued: false,
        }
    }
}

impl TriggerSource for MockTrigger {
    fn wait_for_edge(&mut self, timeout: Duration) -> Result<Option<TriggerEvent>> {
        let mut state = self.state.lock().unwrap();
        state.polls.push(timeout);
        Ok(state.script.pop_front().and_then(|s| s.event))
    }

    fn discard_pending(&mut self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        while state.script.front().is_some_and(|s| s.queued) {
            if let Some(event) = state.script.pop_front().and_then(|s| s.event) {
                state.discarded.push(event);
            }
        }
        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        self.state.lock().unwrap().cleanups += 1;
        Ok(())
    }
}

/// Clock that records sleeps instead of blocking.
#[derive(Debug, Clone, Default)]
pub struct MockClock {
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl MockClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every requested sleep, in order (zero-length sleeps included).
    #[must_use]
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }

    /// Sum of all requested sleeps.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.sleeps().iter().sum()
    }
}

impl Clock for MockClock {
    fn sleep(&self, duration: Duration) -> Result<()> {
        self.sleeps.lock().unwrap().push(duration);
        Ok(())
    }
}
