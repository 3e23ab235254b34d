//! Integration tests for overlay show/hold/remove against the mock preview.

use std::time::Duration;

use booth::device::mock::{MockCamera, MockTrigger, Operation};
use booth::device::{DeviceContext, SystemClock};
use booth::error::BoothError;
use booth::interrupt::InterruptFlag;
use booth::overlay::{BASE_LAYER, COMPOSITE_LAYER, HIGHLIGHT_LAYER, OverlayManager, Screen, ScreenTable};

use crate::common::fixtures::{BoothAssets, MockBooth, SCREEN_SIZE};
use crate::common::init_test_logging;

fn manager(assets: &BoothAssets) -> OverlayManager {
    OverlayManager::new(ScreenTable::new(
        assets.path(),
        Duration::from_secs(3),
        Duration::from_secs(5),
        4,
    ))
}

fn mock_booth() -> MockBooth {
    MockBooth::new(MockCamera::new((64, 48)), MockTrigger::new())
}

#[test]
fn test_pose_screen_is_held_then_removed() {
    init_test_logging();
    let assets = BoothAssets::create(4);
    let mut overlays = manager(&assets);
    let mut booth = mock_booth();

    let handle = overlays.show_screen(&mut booth.ctx, &Screen::Pose(2)).unwrap();
    assert!(handle.is_none());
    assert_eq!(booth.clock.sleeps(), vec![Duration::from_secs(3)]);

    let (id, layer) = booth.preview.added()[0];
    assert_eq!(layer, BASE_LAYER);
    booth.preview.assert_contains(&Operation::RemoveOverlay { id });
    assert!(booth.preview.overlays().is_empty());
    assert_eq!(overlays.live(), 0);
}

#[test]
fn test_persistent_screens_stack_and_unwind() {
    init_test_logging();
    let assets = BoothAssets::create(4);
    let mut overlays = manager(&assets);
    let mut booth = mock_booth();

    let background = overlays
        .show_screen(&mut booth.ctx, &Screen::IntroBackground)
        .unwrap()
        .unwrap();
    let highlight = overlays
        .show_screen(&mut booth.ctx, &Screen::IntroHighlight)
        .unwrap()
        .unwrap();
    assert_eq!(background.layer(), BASE_LAYER);
    assert_eq!(highlight.layer(), HIGHLIGHT_LAYER);
    assert!(highlight.source().ends_with("intro_2.jpg"));
    assert_eq!(overlays.live(), 2);
    assert!(booth.clock.sleeps().is_empty());

    overlays.set_alpha(&mut booth.ctx, &highlight, 0).unwrap();
    assert_eq!(booth.preview.overlays()[&highlight.id()].alpha, 0);

    overlays.remove(&mut booth.ctx, Some(highlight)).unwrap();
    overlays.remove(&mut booth.ctx, Some(background)).unwrap();
    overlays.remove(&mut booth.ctx, None).unwrap();
    assert_eq!(overlays.live(), 0);
    assert!(booth.preview.overlays().is_empty());
}

#[test]
fn test_buffer_is_block_padded() {
    init_test_logging();
    let assets = BoothAssets::create(4);
    let mut overlays = manager(&assets);
    let mut booth = mock_booth();

    let handle = overlays
        .show_screen(&mut booth.ctx, &Screen::Backdrop)
        .unwrap()
        .unwrap();

    // 50x30 rounds up to 64x32.
    booth.preview.assert_contains(&Operation::AddOverlay {
        id: handle.id(),
        layer: BASE_LAYER,
        size: SCREEN_SIZE,
        buffer: (64, 32),
    });
}

#[test]
fn test_composite_and_frame_layers() {
    let assets = BoothAssets::create(4);
    let table = ScreenTable::new(assets.path(), Duration::ZERO, Duration::from_secs(5), 4);

    let composite = table.entry(&Screen::Composite(assets.path().join("x_2x2.jpg")));
    assert_eq!(composite.layer, COMPOSITE_LAYER);

    let frame = table.entry(&Screen::Frame(assets.path().join("x_p1.jpg")));
    assert_eq!(frame.layer, BASE_LAYER + 4);

    assert_eq!(table.required_assets().len(), 2 + 4 + 3);
    assert!(table.required_assets().iter().all(|p| p.is_file()));
}

#[test]
fn test_zero_delay_screen_is_skipped() {
    init_test_logging();
    let assets = BoothAssets::create(4);
    let mut overlays = OverlayManager::new(ScreenTable::new(
        assets.path(),
        Duration::ZERO,
        Duration::ZERO,
        4,
    ));
    let mut booth = mock_booth();

    assert!(overlays.show_screen(&mut booth.ctx, &Screen::Done).unwrap().is_none());
    assert!(overlays.show_screen(&mut booth.ctx, &Screen::Pose(1)).unwrap().is_none());
    assert!(booth.preview.operations().is_empty());
}

#[test]
fn test_missing_asset_adds_nothing() {
    init_test_logging();
    let assets = BoothAssets::create(2);
    let mut overlays = manager(&assets);
    let mut booth = mock_booth();

    let err = overlays
        .show_screen(&mut booth.ctx, &Screen::Pose(3))
        .unwrap_err();
    assert!(
        matches!(&err, BoothError::AssetNotFound { path } if path.ends_with("get_ready_3.jpg")),
        "{err}"
    );
    assert!(booth.preview.added().is_empty());
}

#[test]
fn test_interrupted_hold_still_removes_overlay() {
    init_test_logging();
    let assets = BoothAssets::create(4);
    let mut overlays = manager(&assets);

    let preview = booth::device::mock::MockPreview::new();
    let interrupt = InterruptFlag::new();
    let mut ctx = DeviceContext::new(
        Box::new(preview.clone()),
        Box::new(MockCamera::new((64, 48))),
        Box::new(MockTrigger::new()),
        Box::new(SystemClock::new(interrupt.clone())),
        interrupt.clone(),
    );
    interrupt.raise();

    let err = overlays
        .show(&mut ctx, &assets.path().join("all_done.jpg"), BASE_LAYER, Duration::from_secs(30))
        .unwrap_err();
    assert!(err.is_interrupt());
    assert_eq!(preview.added().len(), 1);
    assert!(preview.overlays().is_empty());
}
