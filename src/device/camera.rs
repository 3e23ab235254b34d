//! Still-capture backends.

use std::path::Path;
use std::process::{Command, Stdio};

use image::{Rgb, RgbImage};
use tracing::{debug, info, instrument};

use super::Camera;
use crate::error::{BoothError, Result};
use crate::image_ops;

/// Camera that shells out to a still-capture program per shot.
///
/// The argument vector is a template: `{output}`, `{width}` and `{height}`
/// are replaced before each run, e.g.
/// `["rpicam-still", "-n", "-o", "{output}", "--width", "{width}", "--height", "{height}"]`.
pub struct CommandCamera {
    argv: Vec<String>,
    resolution: (u32, u32),
}

impl CommandCamera {
    pub const fn new(argv: Vec<String>, resolution: (u32, u32)) -> Self {
        Self { argv, resolution }
    }

    /// Argument vector for one capture into `path`.
    pub fn render_args(&self, path: &Path) -> Vec<String> {
        let output = path.display().to_string();
        let width = self.resolution.0.to_string();
        let height = self.resolution.1.to_string();
        self.argv
            .iter()
            .map(|arg| {
                arg.replace("{output}", &output)
                    .replace("{width}", &width)
                    .replace("{height}", &height)
            })
            .collect()
    }
}

impl Camera for CommandCamera {
    fn resolution(&self) -> (u32, u32) {
        self.resolution
    }

    #[instrument(skip(self), fields(path = %path.display()))]
    fn capture(&mut self, path: &Path) -> Result<()> {
        let args = self.render_args(path);
        let Some((program, rest)) = args.split_first() else {
            return Err(BoothError::CaptureFailed {
                path: path.display().to_string(),
                reason: "empty capture command".to_string(),
            });
        };
        debug!(%program, ?rest, "Running capture command");

        let output = Command::new(program)
            .args(rest)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| BoothError::CaptureFailed {
                path: path.display().to_string(),
                reason: format!("{program}: {e}"),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BoothError::CaptureFailed {
                path: path.display().to_string(),
                reason: format!("{program} exited with {}: {}", output.status, stderr.trim()),
            });
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        debug!("Command camera closed");
        Ok(())
    }
}

/// Camera that writes a generated test pattern instead of reading a sensor.
///
/// Each shot gets a different tint and a marker bar on its left edge, so
/// ordering and mirroring mistakes are visible in composites.
pub struct SyntheticCamera {
    resolution: (u32, u32),
    shots: u32,
}

impl SyntheticCamera {
    pub const fn new(resolution: (u32, u32)) -> Self {
        Self {
            resolution,
            shots: 0,
        }
    }

    /// The image the next capture will write.
    pub fn pattern(&self) -> RgbImage {
        let (w, h) = self.resolution;
        let tint = (self.shots.wrapping_mul(67) % 256) as u8;
        let bar = w / 10;
        RgbImage::from_fn(w, h, |x, y| {
            if x < bar {
                Rgb([255, 255, 0])
            } else {
                Rgb([
                    (u64::from(x) * 255 / u64::from(w.max(1))) as u8,
                    (u64::from(y) * 255 / u64::from(h.max(1))) as u8,
                    tint,
                ])
            }
        })
    }
}

impl Camera for SyntheticCamera {
    fn resolution(&self) -> (u32, u32) {
        self.resolution
    }

    fn capture(&mut self, path: &Path) -> Result<()> {
        image_ops::save_jpeg(&self.pattern(), path, 95)?;
        self.shots += 1;
        info!(path = %path.display(), shot = self.shots, "Synthetic still written");
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
