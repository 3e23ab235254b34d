//! Countdown and still capture for a single shot.

use std::time::Duration;

use tracing::{debug, info, instrument};

use crate::device::DeviceContext;
use crate::error::{BoothError, Result};
use crate::overlay::OverlayManager;
use crate::session::{Frame, Session};

/// Pushes the countdown digit to the bottom of the preview.
const DIGIT_PREFIX: &str = "\n\n\n\n";

/// Runs the digit countdown and takes one still per pose.
#[derive(Debug, Clone, Copy)]
pub struct CaptureSequencer {
    countdown_from: u32,
}

impl CaptureSequencer {
    /// `countdown_from` of zero disables the countdown.
    pub const fn new(countdown_from: u32) -> Self {
        Self { countdown_from }
    }

    /// Annotation shown for digit `n`.
    pub fn digit_text(n: u32) -> String {
        format!("{DIGIT_PREFIX}{n}")
    }

    /// Count down from `countdown_from` to 1, one digit per second.
    pub fn countdown(
        &self,
        ctx: &mut DeviceContext,
        overlays: &OverlayManager,
        pose: u8,
    ) -> Result<()> {
        for n in (1..=self.countdown_from).rev() {
            debug!(pose, n, "Countdown");
            overlays.set_text(ctx, &Self::digit_text(n))?;
            ctx.clock.sleep(Duration::from_secs(1))?;
        }
        Ok(())
    }

    /// Clear the countdown, capture shot `pose` and record it on the session.
    ///
    /// # Errors
    ///
    /// `CaptureFailed` if the camera fails or reports success without
    /// writing the file.
    #[instrument(skip_all, fields(id = %session.id(), pose = pose))]
    pub fn capture(
        &self,
        ctx: &mut DeviceContext,
        overlays: &OverlayManager,
        session: &mut Session,
        pose: u8,
    ) -> Result<Frame> {
        overlays.set_text(ctx, "")?;

        let path = session.frame_path(pose);
        ctx.camera.capture(&path)?;
        if !path.is_file() {
            return Err(BoothError::CaptureFailed {
                path: path.display().to_string(),
                reason: "camera reported success but wrote no file".to_string(),
            });
        }

        info!(path = %path.display(), "Shot saved");
        let frame = Frame { pose, path };
        session.record_frame(frame.clone());
        Ok(frame)
    }
}
