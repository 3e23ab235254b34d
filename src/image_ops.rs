//! Image processing operations shared by overlays and composites.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use tracing::trace;

use crate::error::{BoothError, Result};

/// Preview overlay buffers must have a width that is a multiple of this.
pub const BLOCK_WIDTH: u32 = 32;
/// Preview overlay buffers must have a height that is a multiple of this.
pub const BLOCK_HEIGHT: u32 = 16;

/// Load an image file.
///
/// # Errors
///
/// `AssetNotFound` if the file does not exist, `ImageProcessing` if it
/// cannot be decoded.
pub fn load(path: &Path) -> Result<DynamicImage> {
    if !path.exists() {
        return Err(BoothError::AssetNotFound {
            path: path.display().to_string(),
        });
    }

    image::open(path).map_err(|e| BoothError::ImageProcessing(format!("{}: {e}", path.display())))
}

/// Round `value` up to the next multiple of `block`.
pub const fn align_up(value: u32, block: u32) -> u32 {
    value.div_ceil(block) * block
}

/// Pad an image to block-aligned dimensions.
///
/// The original is pasted at the origin and the padding stays black.
/// Returns the padded buffer together with the original size, which is the
/// visible region the renderer should use.
pub fn pad_to_block(img: &DynamicImage) -> (RgbImage, (u32, u32)) {
    let (w, h) = img.dimensions();
    let mut padded = RgbImage::new(align_up(w, BLOCK_WIDTH), align_up(h, BLOCK_HEIGHT));
    imageops::replace(&mut padded, &img.to_rgb8(), 0, 0);
    trace!(w, h, pw = padded.width(), ph = padded.height(), "Padded overlay");
    (padded, (w, h))
}

/// Size of `(w, h)` scaled down to fit within `(max_w, max_h)`.
///
/// Preserves the aspect ratio, fits the longest edge, and never enlarges.
pub fn fit_within(w: u32, h: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    if w <= max_w && h <= max_h {
        return (w, h);
    }
    let (w64, h64) = (u64::from(w), u64::from(h));
    let (mw, mh) = (u64::from(max_w), u64::from(max_h));

    if w64 * mh > h64 * mw {
        // width-limited
        let nh = (h64 * mw + w64 / 2) / w64;
        (max_w, nh.clamp(1, mh) as u32)
    } else {
        let nw = (w64 * mh + h64 / 2) / h64;
        (nw.clamp(1, mw) as u32, max_h)
    }
}

/// Downscale an image into a bounding box, preserving aspect ratio.
pub fn thumbnail(img: &DynamicImage, max_w: u32, max_h: u32) -> RgbImage {
    let (w, h) = img.dimensions();
    let (tw, th) = fit_within(w, h, max_w, max_h);
    if (tw, th) == (w, h) {
        return img.to_rgb8();
    }
    img.resize_exact(tw, th, FilterType::CatmullRom).to_rgb8()
}

/// A canvas filled with a single color.
pub fn solid_canvas(width: u32, height: u32, color: (u8, u8, u8)) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb([color.0, color.1, color.2]))
}

/// Save an RGB image as JPEG with a fixed quality.
///
/// # Errors
///
/// Returns an error if the file cannot be created or encoding fails.
pub fn save_jpeg(img: &RgbImage, path: &Path, quality: u8) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    JpegEncoder::new_with_quality(&mut writer, quality)
        .encode_image(img)
        .map_err(|e| BoothError::ImageProcessing(format!("{}: {e}", path.display())))?;
    writer.flush()?;
    Ok(())
}
