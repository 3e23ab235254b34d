//! Peripheral abstraction layer for the booth.
//!
//! The booth talks to four collaborators: a trigger source, a live preview
//! surface, a still camera and a clock. Each sits behind a trait so the
//! session logic runs the same against real hardware, the headless
//! backends, and the recording mocks used in tests.
//!
//! All of them are owned by one [`DeviceContext`], constructed at startup
//! and passed by `&mut` to every component. Only one thread ever touches it,
//! so no locking is involved.

mod camera;
mod clock;
mod headless;
mod info;
pub mod mock;
mod real;

pub use camera::{CommandCamera, SyntheticCamera};
pub use clock::SystemClock;
pub use headless::{AutoTrigger, HeadlessPreview};
pub use info::{DeviceInfo, OverlayId, TriggerEvent, TriggerLine};
pub use real::{StreamDeckTrigger, list_devices};

use std::path::Path;
use std::time::Duration;

use image::RgbImage;
use tracing::{debug, info, warn};

use crate::config::{BoothConfig, CameraBackend, TriggerBackend};
use crate::error::Result;
use crate::interrupt::InterruptFlag;

/// Source of trigger edges.
pub trait TriggerSource {
    /// Wait up to `timeout` for a falling edge on the snap or exit line.
    ///
    /// Returns `None` when the timeout elapses without an edge.
    fn wait_for_edge(&mut self, timeout: Duration) -> Result<Option<TriggerEvent>>;

    /// Drop input that queued up while nobody was polling.
    ///
    /// Sources that only see edges during `wait_for_edge` have nothing to
    /// drop.
    fn discard_pending(&mut self) -> Result<()> {
        Ok(())
    }

    /// Release the trigger hardware.
    fn cleanup(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Live preview renderer that overlays can be layered onto.
///
/// # Implementation Notes
///
/// - `buffer` passed to `add_overlay` is block aligned; `size` is the
///   visible (unpadded) region
/// - Higher layers draw above lower ones
/// - Removing or addressing an id that is not on the surface is an error
pub trait PreviewSurface {
    fn start(&mut self) -> Result<()>;

    fn add_overlay(&mut self, buffer: RgbImage, size: (u32, u32), layer: u8) -> Result<OverlayId>;

    fn remove_overlay(&mut self, id: OverlayId) -> Result<()>;

    fn set_alpha(&mut self, id: OverlayId, alpha: u8) -> Result<()>;

    /// Text drawn directly on the preview, outside any overlay.
    fn set_annotation(&mut self, text: &str) -> Result<()>;

    fn stop(&mut self) -> Result<()>;
}

/// Still-capture primitive.
pub trait Camera {
    /// Native photo resolution (width, height).
    fn resolution(&self) -> (u32, u32);

    /// Capture one still and write it to `path`.
    fn capture(&mut self, path: &Path) -> Result<()>;

    fn close(&mut self) -> Result<()>;
}

/// Blocking sleeps used for timed screens.
pub trait Clock {
    /// Sleep for `duration`. Zero returns immediately.
    ///
    /// # Errors
    ///
    /// `Interrupted` if the operator interrupts the process mid-sleep.
    fn sleep(&self, duration: Duration) -> Result<()>;
}

/// Every peripheral the booth owns, released exactly once.
pub struct DeviceContext {
    pub preview: Box<dyn PreviewSurface>,
    pub camera: Box<dyn Camera>,
    pub trigger: Box<dyn TriggerSource>,
    pub clock: Box<dyn Clock>,
    pub interrupt: InterruptFlag,
    released: bool,
}

impl DeviceContext {
    pub fn new(
        preview: Box<dyn PreviewSurface>,
        camera: Box<dyn Camera>,
        trigger: Box<dyn TriggerSource>,
        clock: Box<dyn Clock>,
        interrupt: InterruptFlag,
    ) -> Self {
        Self {
            preview,
            camera,
            trigger,
            clock,
            interrupt,
            released: false,
        }
    }

    /// Open the peripherals named by the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the trigger device cannot be opened.
    pub fn open(config: &BoothConfig, interrupt: InterruptFlag) -> Result<Self> {
        let trigger: Box<dyn TriggerSource> = match config.trigger.backend {
            TriggerBackend::Streamdeck => Box::new(StreamDeckTrigger::open(
                config.trigger.serial.as_deref(),
                config.trigger.snap_key,
                config.trigger.exit_key,
            )?),
            TriggerBackend::Auto => Box::new(AutoTrigger),
        };

        let resolution = config.capture.resolution();
        let camera: Box<dyn Camera> = match config.capture.camera {
            CameraBackend::Synthetic => Box::new(SyntheticCamera::new(resolution)),
            CameraBackend::Command => Box::new(CommandCamera::new(
                config.capture.command.clone(),
                resolution,
            )),
        };

        info!(
            trigger = ?config.trigger.backend,
            camera = ?config.capture.camera,
            "Peripherals opened"
        );

        Ok(Self::new(
            Box::new(HeadlessPreview::new()),
            camera,
            trigger,
            Box::new(SystemClock::new(interrupt.clone())),
            interrupt,
        ))
    }

    /// Start the live preview.
    pub fn start(&mut self) -> Result<()> {
        self.preview.start()
    }

    /// Whether `release` has already run.
    pub const fn is_released(&self) -> bool {
        self.released
    }

    /// Stop the preview, close the camera and tear down the trigger.
    ///
    /// Every step runs even if an earlier one fails; the first failure is
    /// returned. Later calls are no-ops.
    pub fn release(&mut self) -> Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        debug!("Releasing peripherals");

        let results = [
            self.preview.stop(),
            self.camera.close(),
            self.trigger.cleanup(),
        ];
        let mut first = None;
        for result in results {
            if let Err(err) = result {
                warn!(error = %err, "Peripheral release failed");
                first.get_or_insert(err);
            }
        }
        first.map_or(Ok(()), Err)
    }
}

impl Drop for DeviceContext {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            warn!(error = %err, "Release during drop failed");
        }
    }
}
