//! Composite rendering: captured frames arranged on a single canvas.
//!
//! Two layouts ship with the booth:
//!
//! - [`Grid2x2`]: four thumbnails in quadrants on a canvas the size of one
//!   photo.
//! - [`VerticalStrip`]: one column of half-size thumbnails with a header
//!   and a footer, like a classic photo strip.
//!
//! Both are pure geometry behind [`CompositeLayout`]; [`CompositeRenderer`]
//! picks a background, pastes the thumbnails and writes the JPEG.

pub mod layout;
mod render;

pub use layout::{CompositeLayout, Grid2x2, VerticalStrip};
pub use render::CompositeRenderer;

use std::fmt;

use clap::ValueEnum;
use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::image_ops;

/// Background used when no template matches.
pub const BLANK_COLOR: (u8, u8, u8) = (255, 255, 255);

/// The shipped composite styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum LayoutKind {
    /// Four thumbnails in a 2x2 grid.
    #[serde(rename = "2x2")]
    #[value(name = "2x2")]
    Grid2x2,
    /// Vertical photo strip, one thumbnail per shot.
    #[serde(rename = "1x4")]
    #[value(name = "1x4")]
    Strip1x4,
}

impl LayoutKind {
    /// Output file suffix and template prefix.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Grid2x2 => "2x2",
            Self::Strip1x4 => "1x4",
        }
    }

    /// Frames the layout requires, if fixed.
    ///
    /// The strip grows with the shot count; the grid always holds four.
    pub const fn fixed_cells(&self) -> Option<usize> {
        match self {
            Self::Grid2x2 => Some(4),
            Self::Strip1x4 => None,
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plain white canvas for composites without a template.
pub fn blank_canvas(width: u32, height: u32) -> RgbImage {
    image_ops::solid_canvas(width, height, BLANK_COLOR)
}
