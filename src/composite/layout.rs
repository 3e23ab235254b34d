//! Composite geometry.
//!
//! All coordinates are in canvas pixels before the final horizontal flip.

use std::path::{Path, PathBuf};

use super::LayoutKind;
use crate::config::StripConfig;

/// Placement rules of a composite style.
pub trait CompositeLayout {
    fn kind(&self) -> LayoutKind;

    /// Number of frames the layout holds.
    fn cells(&self) -> usize;

    /// Output canvas size.
    fn canvas_size(&self) -> (u32, u32);

    /// Box each frame is scaled down into.
    fn thumb_bounds(&self) -> (u32, u32);

    /// Top-left corner for frame `index` once scaled to `thumb`.
    fn offset(&self, index: usize, thumb: (u32, u32)) -> (u32, u32);

    /// Glob matching background templates for this canvas size.
    fn template_pattern(&self, assets: &Path) -> String {
        let (w, h) = self.canvas_size();
        let dir = glob::Pattern::escape(&assets.to_string_lossy());
        format!("{dir}/{}_at_{w}x{h}*", self.kind())
    }

    /// `<output>/<id>_<kind>.jpg`
    fn output_path(&self, output: &Path, id: &str) -> PathBuf {
        output.join(format!("{id}_{}.jpg", self.kind()))
    }
}

/// Four thumbnails around the canvas center.
///
/// ```text
///   +----------------------------+
///   |  outer                     |
///   |    +------+  +------+      |
///   |    |  1   |  |  0   |      |
///   |    +------+  +------+      |
///   |         2*inner            |
///   |    +------+  +------+      |
///   |    |  3   |  |  2   |      |
///   |    +------+  +------+      |
///   +----------------------------+
/// ```
///
/// Index 0 sits top right; the final flip moves it top left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid2x2 {
    width: u32,
    height: u32,
}

impl Grid2x2 {
    /// Grid on a canvas of one photo, `(width, height)`.
    pub const fn new(resolution: (u32, u32)) -> Self {
        Self {
            width: resolution.0,
            height: resolution.1,
        }
    }

    pub const fn outer_border(&self) -> u32 {
        self.width / 50
    }

    pub const fn inner_border(&self) -> u32 {
        self.width / 72
    }

    const fn center(&self) -> (u32, u32) {
        (self.width / 2, self.height / 2)
    }
}

impl CompositeLayout for Grid2x2 {
    fn kind(&self) -> LayoutKind {
        LayoutKind::Grid2x2
    }

    fn cells(&self) -> usize {
        4
    }

    fn canvas_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn thumb_bounds(&self) -> (u32, u32) {
        let (cx, cy) = self.center();
        let margin = self.outer_border() + self.inner_border();
        (cx.saturating_sub(margin), cy.saturating_sub(margin))
    }

    fn offset(&self, index: usize, (tw, th): (u32, u32)) -> (u32, u32) {
        let (cx, cy) = self.center();
        let inner = self.inner_border();
        let right = cx + inner;
        let left = cx.saturating_sub(inner + tw);
        let top = cy.saturating_sub(inner + th);
        let bottom = cy + inner;
        match index % 4 {
            0 => (right, top),
            1 => (left, top),
            2 => (right, bottom),
            _ => (left, bottom),
        }
    }
}

/// One column of thumbnails, header on top, footer below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerticalStrip {
    width: u32,
    height: u32,
    cells: usize,
    margins: StripConfig,
}

impl VerticalStrip {
    /// Strip of `cells` frames shot at `resolution`.
    pub const fn new(resolution: (u32, u32), cells: usize, margins: StripConfig) -> Self {
        Self {
            width: resolution.0,
            height: resolution.1,
            cells,
            margins,
        }
    }
}

impl CompositeLayout for VerticalStrip {
    fn kind(&self) -> LayoutKind {
        LayoutKind::Strip1x4
    }

    fn cells(&self) -> usize {
        self.cells
    }

    fn canvas_size(&self) -> (u32, u32) {
        let (tw, th) = self.thumb_bounds();
        let n = self.cells as u32;
        let StripConfig {
            border,
            header,
            footer,
        } = self.margins;
        // Saturates rather than wraps on absurd margins.
        let height = n
            .saturating_mul(th)
            .saturating_add(n.saturating_sub(1).saturating_mul(border))
            .saturating_add(header)
            .saturating_add(footer);
        (tw.saturating_add(border.saturating_mul(2)), height)
    }

    fn thumb_bounds(&self) -> (u32, u32) {
        (self.width / 2, self.height / 2)
    }

    fn offset(&self, index: usize, _thumb: (u32, u32)) -> (u32, u32) {
        let (_, th) = self.thumb_bounds();
        let StripConfig { border, header, .. } = self.margins;
        let step = th.saturating_add(border);
        (border, header.saturating_add((index as u32).saturating_mul(step)))
    }
}
