//! Test fixture helpers for creating temporary booth data.
//!
//! Asset sets and frames live in temporary directories that are cleaned up
//! when the fixture is dropped.

use std::path::{Path, PathBuf};

use booth::composite::LayoutKind;
use booth::config::BoothConfig;
use booth::device::DeviceContext;
use booth::device::mock::{MockCamera, MockClock, MockPreview, MockTrigger};
use booth::image_ops;
use booth::interrupt::InterruptFlag;
use booth::overlay::ScreenTable;
use booth::session::SessionId;
use tempfile::TempDir;

/// Size of the generated screen images. Deliberately not block aligned.
pub const SCREEN_SIZE: (u32, u32) = (50, 30);

/// A complete set of screen assets in a temporary directory.
///
/// # Example
///
/// ```ignore
/// let assets = BoothAssets::create(4);
/// let config = fast_config(assets.path(), output.path(), (144, 108));
/// ```
pub struct BoothAssets {
    pub dir: TempDir,
}

impl BoothAssets {
    /// Write every screen a booth with `shot_count` poses loads.
    ///
    /// # Panics
    ///
    /// Panics if an image cannot be written.
    #[must_use]
    pub fn create(shot_count: u8) -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let table = ScreenTable::new(
            dir.path(),
            std::time::Duration::ZERO,
            std::time::Duration::ZERO,
            shot_count,
        );
        for (i, path) in table.required_assets().iter().enumerate() {
            let shade = (i as u8).wrapping_mul(20);
            let img = image_ops::solid_canvas(SCREEN_SIZE.0, SCREEN_SIZE.1, (shade, shade, shade));
            image_ops::save_jpeg(&img, path, 90)
                .unwrap_or_else(|e| panic!("Failed to save {}: {e}", path.display()));
        }
        Self { dir }
    }

    /// Add a background template named `<kind>_at_<w>x<h>_<name>.jpg`.
    ///
    /// `size` is the actual pixel size written, which may differ from the
    /// size in the name.
    #[must_use]
    pub fn with_template(
        self,
        kind: LayoutKind,
        canvas: (u32, u32),
        name: &str,
        size: (u32, u32),
        color: (u8, u8, u8),
    ) -> Self {
        let path = self
            .dir
            .path()
            .join(format!("{kind}_at_{}x{}_{name}.jpg", canvas.0, canvas.1));
        let img = image_ops::solid_canvas(size.0, size.1, color);
        image_ops::save_jpeg(&img, &path, 95).expect("Failed to save template");
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Fast-mode configuration at `resolution`, pointed at the given dirs.
#[must_use]
pub fn fast_config(assets: &Path, output: &Path, resolution: (u32, u32)) -> BoothConfig {
    let mut config = BoothConfig {
        fast: true,
        ..BoothConfig::default()
    };
    config.capture.width = resolution.0;
    config.capture.height = resolution.1;
    config.paths.assets = assets.to_path_buf();
    config.paths.output = output.to_path_buf();
    config.effective()
}

/// Configuration with the stock delays, for runs against the mock clock.
#[must_use]
pub fn timed_config(assets: &Path, output: &Path, resolution: (u32, u32)) -> BoothConfig {
    let mut config = fast_config(assets, output, resolution);
    config.fast = false;
    config.timing = BoothConfig::default().timing;
    config
}

/// Write `count` solid frames for session `id` into `dir`.
///
/// Frame `n` uses [`MockCamera::color_for`] so composites can be checked
/// cell by cell.
#[must_use]
pub fn write_frames(dir: &Path, id: &SessionId, count: u8, resolution: (u32, u32)) -> Vec<PathBuf> {
    (1..=count)
        .map(|pose| {
            let path = id.frame_path(dir, pose);
            let color = MockCamera::color_for(usize::from(pose - 1));
            let img = image_ops::solid_canvas(resolution.0, resolution.1, color);
            image_ops::save_jpeg(&img, &path, 95).expect("Failed to save frame");
            path
        })
        .collect()
}

/// A device context wired to mocks, with handles kept for assertions.
pub struct MockBooth {
    pub ctx: DeviceContext,
    pub preview: MockPreview,
    pub camera: MockCamera,
    pub trigger: MockTrigger,
    pub clock: MockClock,
    pub interrupt: InterruptFlag,
}

impl MockBooth {
    #[must_use]
    pub fn new(camera: MockCamera, trigger: MockTrigger) -> Self {
        let preview = MockPreview::new();
        let clock = MockClock::new();
        let interrupt = InterruptFlag::new();
        let ctx = DeviceContext::new(
            Box::new(preview.clone()),
            Box::new(camera.clone()),
            Box::new(trigger.clone()),
            Box::new(clock.clone()),
            interrupt.clone(),
        );
        Self {
            ctx,
            preview,
            camera,
            trigger,
            clock,
            interrupt,
        }
    }
}

/// Whether `pixel` is close to `expected` on every channel.
#[must_use]
pub fn close_to(pixel: [u8; 3], expected: (u8, u8, u8)) -> bool {
    let (r, g, b) = expected;
    [r, g, b]
        .iter()
        .zip(pixel)
        .all(|(&e, p)| e.abs_diff(p) <= 24)
}
