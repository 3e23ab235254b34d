use std::path::{Path, PathBuf};

use image::{RgbImage, imageops};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, info, instrument, warn};

use super::layout::{CompositeLayout, Grid2x2, VerticalStrip};
use super::{LayoutKind, blank_canvas};
use crate::config::{BoothConfig, StripConfig};
use crate::error::{BoothError, Result};
use crate::image_ops;
use crate::session::Session;

/// Renders composites from captured frames.
pub struct CompositeRenderer {
    assets: PathBuf,
    resolution: (u32, u32),
    strip: StripConfig,
    quality: u8,
    rng: StdRng,
}

impl CompositeRenderer {
    pub fn new(assets: impl Into<PathBuf>, resolution: (u32, u32), strip: StripConfig, quality: u8) -> Self {
        Self {
            assets: assets.into(),
            resolution,
            strip,
            quality,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn from_config(config: &BoothConfig) -> Self {
        Self::new(
            config.paths.assets.clone(),
            config.capture.resolution(),
            config.strip,
            config.capture.jpeg_quality,
        )
    }

    /// Make template selection reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Geometry of `kind` for `frames` captured frames.
    pub fn layout(&self, kind: LayoutKind, frames: usize) -> Box<dyn CompositeLayout> {
        match kind {
            LayoutKind::Grid2x2 => Box::new(Grid2x2::new(self.resolution)),
            LayoutKind::Strip1x4 => Box::new(VerticalStrip::new(self.resolution, frames, self.strip)),
        }
    }

    /// Background for `layout`: a random matching template, or white.
    ///
    /// Templates whose decoded size differs from the canvas are skipped.
    pub fn background(&mut self, layout: &dyn CompositeLayout) -> Result<RgbImage> {
        let (w, h) = layout.canvas_size();
        let pattern = layout.template_pattern(&self.assets);

        let mut candidates: Vec<PathBuf> = glob::glob(&pattern)
            .map_err(|e| BoothError::Other(format!("bad template pattern {pattern}: {e}")))?
            .filter_map(std::result::Result::ok)
            .filter(|p| p.is_file())
            .collect();
        candidates.sort();
        candidates.shuffle(&mut self.rng);
        debug!(%pattern, found = candidates.len(), "Template candidates");

        for path in candidates {
            let template = image_ops::load(&path)?.to_rgb8();
            if template.dimensions() == (w, h) {
                info!(template = %path.display(), "Using background template");
                return Ok(template);
            }
            warn!(
                template = %path.display(),
                expected = %format!("{w}x{h}"),
                actual = %format!("{}x{}", template.width(), template.height()),
                "Template size mismatch, skipping"
            );
        }

        debug!(w, h, "No template, blank canvas");
        Ok(blank_canvas(w, h))
    }

    /// Paste `frames` onto a background and mirror the result.
    ///
    /// # Errors
    ///
    /// `FrameCount` if the number of frames differs from the layout's
    /// cells; `AssetNotFound` for a missing frame.
    pub fn render(&mut self, layout: &dyn CompositeLayout, frames: &[PathBuf]) -> Result<RgbImage> {
        if frames.len() != layout.cells() {
            return Err(BoothError::FrameCount {
                expected: layout.cells(),
                actual: frames.len(),
            });
        }

        let mut canvas = self.background(layout)?;
        let (bw, bh) = layout.thumb_bounds();
        for (index, path) in frames.iter().enumerate() {
            let frame = image_ops::load(path)?;
            let thumb = image_ops::thumbnail(&frame, bw, bh);
            let (x, y) = layout.offset(index, thumb.dimensions());
            debug!(index, x, y, tw = thumb.width(), th = thumb.height(), "Pasting frame");
            imageops::replace(&mut canvas, &thumb, i64::from(x), i64::from(y));
        }

        imageops::flip_horizontal_in_place(&mut canvas);
        Ok(canvas)
    }

    /// Render `kind` from `frames` and write it to `out`.
    #[instrument(skip(self, frames), fields(out = %out.display()))]
    pub fn compose(&mut self, kind: LayoutKind, frames: &[PathBuf], out: &Path) -> Result<PathBuf> {
        let layout = self.layout(kind, frames.len());
        let canvas = self.render(layout.as_ref(), frames)?;
        image_ops::save_jpeg(&canvas, out, self.quality)?;
        info!(layout = %kind, w = canvas.width(), h = canvas.height(), "Composite saved");
        Ok(out.to_path_buf())
    }

    /// Render every layout in `kinds` for a session, recording the outputs.
    pub fn compose_session(&mut self, session: &mut Session, kinds: &[LayoutKind]) -> Result<Vec<PathBuf>> {
        let frames = session.frame_paths();
        let mut written = Vec::with_capacity(kinds.len());
        for &kind in kinds {
            let out = session.composite_path(kind);
            let path = self.compose(kind, &frames, &out)?;
            session.record_composite(path.clone());
            written.push(path);
        }
        Ok(written)
    }
}
