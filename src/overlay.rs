//! Overlay lifecycle on the live preview.
//!
//! An overlay is either *timed* (shown, held, removed before the call
//! returns) or *persistent* (the caller receives an [`OverlayHandle`] and
//! must hand it back to [`OverlayManager::remove`]). Handles are not
//! `Clone`, so a persistent overlay can be removed at most once.
//!
//! Named screens go through [`ScreenTable`], which maps every [`Screen`] to
//! its asset, layer and hold time.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, instrument, trace};

use crate::config::BoothConfig;
use crate::device::{DeviceContext, OverlayId};
use crate::error::Result;
use crate::image_ops;

/// Layer of the intro background and the processing backdrop.
pub const BASE_LAYER: u8 = 3;
/// Layer of the intro highlight and the processing screen.
pub const HIGHLIGHT_LAYER: u8 = 4;
/// Layer composites are reviewed on.
pub const COMPOSITE_LAYER: u8 = 5;

/// A persistent overlay on the preview surface.
#[derive(Debug, PartialEq, Eq)]
pub struct OverlayHandle {
    id: OverlayId,
    layer: u8,
    source: PathBuf,
}

impl OverlayHandle {
    pub const fn id(&self) -> OverlayId {
        self.id
    }

    pub const fn layer(&self) -> u8 {
        self.layer
    }

    pub fn source(&self) -> &Path {
        &self.source
    }
}

/// How long a screen stays up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hold {
    /// Stays until the caller removes it.
    Persistent,
    /// Removed after the delay. A zero delay skips the screen.
    Timed(Duration),
}

/// Every named screen the booth shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    IntroBackground,
    IntroHighlight,
    /// Pose prompt before shot `n` (1-based).
    Pose(u8),
    Backdrop,
    Processing,
    Composite(PathBuf),
    /// A single captured frame during playback.
    Frame(PathBuf),
    Done,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IntroBackground => write!(f, "intro"),
            Self::IntroHighlight => write!(f, "intro-highlight"),
            Self::Pose(n) => write!(f, "pose{n}"),
            Self::Backdrop => write!(f, "backdrop"),
            Self::Processing => write!(f, "processing"),
            Self::Composite(path) | Self::Frame(path) => write!(f, "{}", path.display()),
            Self::Done => write!(f, "done"),
        }
    }
}

/// Resolved placement of a screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenEntry {
    pub path: PathBuf,
    pub layer: u8,
    pub hold: Hold,
}

/// Screen → (asset, layer, hold) lookup.
#[derive(Debug, Clone)]
pub struct ScreenTable {
    assets: PathBuf,
    prep: Duration,
    review: Duration,
    shot_count: u8,
}

impl ScreenTable {
    pub fn new(assets: impl Into<PathBuf>, prep: Duration, review: Duration, shot_count: u8) -> Self {
        Self {
            assets: assets.into(),
            prep,
            review,
            shot_count,
        }
    }

    pub fn from_config(config: &BoothConfig) -> Self {
        Self::new(
            config.paths.assets.clone(),
            config.timing.prep(),
            config.timing.review(),
            config.capture.shot_count,
        )
    }

    pub fn assets(&self) -> &Path {
        &self.assets
    }

    pub fn entry(&self, screen: &Screen) -> ScreenEntry {
        let asset = |name: &str| self.assets.join(name);
        let (path, layer, hold) = match screen {
            Screen::IntroBackground => (asset("intro_1.jpg"), BASE_LAYER, Hold::Persistent),
            Screen::IntroHighlight => (asset("intro_2.jpg"), HIGHLIGHT_LAYER, Hold::Persistent),
            Screen::Pose(n) => (
                asset(&format!("get_ready_{n}.jpg")),
                BASE_LAYER,
                Hold::Timed(self.prep),
            ),
            Screen::Backdrop => (asset("black.jpg"), BASE_LAYER, Hold::Persistent),
            Screen::Processing => (asset("processing.jpg"), HIGHLIGHT_LAYER, Hold::Persistent),
            Screen::Composite(path) => (path.clone(), COMPOSITE_LAYER, Hold::Timed(self.review)),
            Screen::Frame(path) => (
                path.clone(),
                BASE_LAYER + self.shot_count,
                Hold::Persistent,
            ),
            Screen::Done => (asset("all_done.jpg"), BASE_LAYER, Hold::Timed(self.review)),
        };
        ScreenEntry { path, layer, hold }
    }

    /// Asset files the booth loads at runtime, in display order.
    pub fn required_assets(&self) -> Vec<PathBuf> {
        let mut screens = vec![Screen::IntroBackground, Screen::IntroHighlight];
        screens.extend((1..=self.shot_count).map(Screen::Pose));
        screens.extend([Screen::Backdrop, Screen::Processing, Screen::Done]);
        screens.iter().map(|s| self.entry(s).path).collect()
    }
}

/// Shows, holds and removes overlays on the preview surface.
#[derive(Debug)]
pub struct OverlayManager {
    table: ScreenTable,
    live: usize,
}

impl OverlayManager {
    pub const fn new(table: ScreenTable) -> Self {
        Self { table, live: 0 }
    }

    pub const fn table(&self) -> &ScreenTable {
        &self.table
    }

    /// Persistent overlays added and not yet removed.
    pub const fn live(&self) -> usize {
        self.live
    }

    /// Show an image on `layer`.
    ///
    /// A zero `duration` leaves the overlay up and returns its handle. A
    /// positive one holds it, removes it and returns `None`.
    ///
    /// # Errors
    ///
    /// `AssetNotFound` if `path` does not exist, or any preview or
    /// interrupt error while holding.
    #[instrument(skip(self, ctx), fields(path = %path.display()))]
    pub fn show(
        &mut self,
        ctx: &mut DeviceContext,
        path: &Path,
        layer: u8,
        duration: Duration,
    ) -> Result<Option<OverlayHandle>> {
        let handle = Self::add(ctx, path, layer)?;
        if duration.is_zero() {
            self.live += 1;
            return Ok(Some(handle));
        }

        // Take the overlay down even when the hold is interrupted.
        let held = ctx.clock.sleep(duration);
        ctx.preview.remove_overlay(handle.id)?;
        trace!(id = %handle.id, "Timed overlay removed");
        held.map(|()| None)
    }

    /// Show an image until the returned handle is removed.
    pub fn show_persistent(
        &mut self,
        ctx: &mut DeviceContext,
        path: &Path,
        layer: u8,
    ) -> Result<OverlayHandle> {
        let handle = Self::add(ctx, path, layer)?;
        self.live += 1;
        Ok(handle)
    }

    fn add(ctx: &mut DeviceContext, path: &Path, layer: u8) -> Result<OverlayHandle> {
        let img = image_ops::load(path)?;
        let (buffer, size) = image_ops::pad_to_block(&img);
        let id = ctx.preview.add_overlay(buffer, size, layer)?;
        debug!(%id, layer, w = size.0, h = size.1, "Overlay shown");
        Ok(OverlayHandle {
            id,
            layer,
            source: path.to_path_buf(),
        })
    }

    /// Remove a persistent overlay. `None` is a no-op.
    pub fn remove(&mut self, ctx: &mut DeviceContext, handle: Option<OverlayHandle>) -> Result<()> {
        let Some(handle) = handle else {
            return Ok(());
        };
        ctx.preview.remove_overlay(handle.id)?;
        self.live = self.live.saturating_sub(1);
        debug!(id = %handle.id, layer = handle.layer, "Overlay removed");
        Ok(())
    }

    /// Draw text directly on the preview; an empty string clears it.
    pub fn set_text(&self, ctx: &mut DeviceContext, text: &str) -> Result<()> {
        ctx.preview.set_annotation(text)
    }

    pub fn set_alpha(&self, ctx: &mut DeviceContext, handle: &OverlayHandle, alpha: u8) -> Result<()> {
        ctx.preview.set_alpha(handle.id, alpha)
    }

    /// Show a named screen.
    ///
    /// Persistent screens return their handle; timed screens are held and
    /// removed, or skipped entirely when their delay is zero.
    pub fn show_screen(
        &mut self,
        ctx: &mut DeviceContext,
        screen: &Screen,
    ) -> Result<Option<OverlayHandle>> {
        let entry = self.table.entry(screen);
        match entry.hold {
            Hold::Persistent => self
                .show_persistent(ctx, &entry.path, entry.layer)
                .map(Some),
            Hold::Timed(delay) if delay.is_zero() => {
                trace!(%screen, "Zero delay, screen skipped");
                Ok(None)
            }
            Hold::Timed(delay) => {
                debug!(%screen, secs = delay.as_secs_f32(), "Timed screen");
                self.show(ctx, &entry.path, entry.layer, delay)
            }
        }
    }
}
