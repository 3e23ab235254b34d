//! Integration tests for composite rendering on disk.

use booth::composite::{CompositeLayout, CompositeRenderer, LayoutKind};
use booth::config::StripConfig;
use booth::device::mock::MockCamera;
use booth::error::BoothError;
use booth::session::{Session, SessionId};
use tempfile::TempDir;

use crate::common::fixtures::{BoothAssets, close_to, write_frames};
use crate::common::init_test_logging;

const SMALL: (u32, u32) = (144, 108);
const WHITE: (u8, u8, u8) = (255, 255, 255);

fn session_id() -> SessionId {
    "20240309_070501".parse().unwrap()
}

fn renderer(assets: &BoothAssets, resolution: (u32, u32)) -> CompositeRenderer {
    CompositeRenderer::new(assets.path(), resolution, StripConfig::default(), 90).with_seed(7)
}

#[test]
fn test_grid_at_full_resolution() {
    init_test_logging();
    let assets = BoothAssets::create(4);
    let output = TempDir::new().unwrap();
    let id = session_id();
    let frames = write_frames(output.path(), &id, 4, (1296, 972));
    let target = id.composite_path(output.path(), LayoutKind::Grid2x2);

    let written = renderer(&assets, (1296, 972))
        .compose(LayoutKind::Grid2x2, &frames, &target)
        .unwrap();
    assert_eq!(written, target);
    assert!(target.ends_with("20240309_070501_2x2.jpg"));

    let img = image::open(&target).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (1296, 972));
    assert!(close_to(img.get_pixel(324, 243).0, MockCamera::color_for(0)));
    assert!(close_to(img.get_pixel(972, 243).0, MockCamera::color_for(1)));
    assert!(close_to(img.get_pixel(324, 729).0, MockCamera::color_for(2)));
    assert!(close_to(img.get_pixel(972, 729).0, MockCamera::color_for(3)));
    // Gutter between the two columns.
    assert!(close_to(img.get_pixel(648, 243).0, WHITE));
}

#[test]
fn test_matching_template_is_background() {
    init_test_logging();
    let assets =
        BoothAssets::create(4).with_template(LayoutKind::Grid2x2, SMALL, "party", SMALL, (20, 20, 200));
    let output = TempDir::new().unwrap();
    let id = session_id();
    let frames = write_frames(output.path(), &id, 4, SMALL);
    let target = id.composite_path(output.path(), LayoutKind::Grid2x2);

    renderer(&assets, SMALL)
        .compose(LayoutKind::Grid2x2, &frames, &target)
        .unwrap();

    let img = image::open(&target).unwrap().to_rgb8();
    assert!(close_to(img.get_pixel(0, 0).0, (20, 20, 200)));
    assert!(close_to(img.get_pixel(36, 27).0, MockCamera::color_for(0)));
}

#[test]
fn test_wrong_size_template_falls_back_to_white() {
    init_test_logging();
    let assets = BoothAssets::create(4).with_template(
        LayoutKind::Grid2x2,
        SMALL,
        "stretched",
        (100, 100),
        (20, 20, 200),
    );
    let output = TempDir::new().unwrap();
    let id = session_id();
    let frames = write_frames(output.path(), &id, 4, SMALL);
    let target = id.composite_path(output.path(), LayoutKind::Grid2x2);

    renderer(&assets, SMALL)
        .compose(LayoutKind::Grid2x2, &frames, &target)
        .unwrap();

    let img = image::open(&target).unwrap().to_rgb8();
    assert!(close_to(img.get_pixel(0, 0).0, WHITE));
}

#[test]
fn test_template_for_other_layout_is_ignored() {
    init_test_logging();
    let assets = BoothAssets::create(4).with_template(
        LayoutKind::Strip1x4,
        SMALL,
        "party",
        SMALL,
        (20, 20, 200),
    );
    let output = TempDir::new().unwrap();
    let id = session_id();
    let frames = write_frames(output.path(), &id, 4, SMALL);
    let target = id.composite_path(output.path(), LayoutKind::Grid2x2);

    renderer(&assets, SMALL)
        .compose(LayoutKind::Grid2x2, &frames, &target)
        .unwrap();

    let img = image::open(&target).unwrap().to_rgb8();
    assert!(close_to(img.get_pixel(0, 0).0, WHITE));
}

#[test]
fn test_strip_stacks_frames_top_to_bottom() {
    init_test_logging();
    let assets = BoothAssets::create(4);
    let output = TempDir::new().unwrap();
    let id = session_id();
    let frames = write_frames(output.path(), &id, 4, SMALL);
    let target = id.composite_path(output.path(), LayoutKind::Strip1x4);

    let mut renderer = renderer(&assets, SMALL);
    let layout = renderer.layout(LayoutKind::Strip1x4, frames.len());
    let (w, h) = layout.canvas_size();
    renderer
        .compose(LayoutKind::Strip1x4, &frames, &target)
        .unwrap();

    let img = image::open(&target).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (w, h));

    // 72x54 cells below a 50px header, 10px apart.
    let StripConfig { border, header, .. } = StripConfig::default();
    let (tw, th) = layout.thumb_bounds();
    for cell in 0..4u32 {
        let y = header + cell * (th + border) + th / 2;
        let x = w - 1 - (border + tw / 2);
        assert!(
            close_to(img.get_pixel(x, y).0, MockCamera::color_for(cell as usize)),
            "cell {cell}: {:?}",
            img.get_pixel(x, y)
        );
    }
    assert!(close_to(img.get_pixel(w / 2, h - 10).0, WHITE));
}

#[test]
fn test_grid_rejects_wrong_frame_count() {
    init_test_logging();
    let assets = BoothAssets::create(4);
    let output = TempDir::new().unwrap();
    let id = session_id();
    let frames = write_frames(output.path(), &id, 3, SMALL);
    let target = id.composite_path(output.path(), LayoutKind::Grid2x2);

    let err = renderer(&assets, SMALL)
        .compose(LayoutKind::Grid2x2, &frames, &target)
        .unwrap_err();
    assert!(matches!(
        err,
        BoothError::FrameCount {
            expected: 4,
            actual: 3
        }
    ));
    assert!(!target.exists());
}

#[test]
fn test_compose_session_records_outputs() {
    init_test_logging();
    let assets = BoothAssets::create(4);
    let output = TempDir::new().unwrap();
    let id = session_id();
    let frames = write_frames(output.path(), &id, 4, SMALL);

    let mut session = Session::with_id(id.clone(), chrono::Local::now(), output.path());
    for (i, path) in frames.into_iter().enumerate() {
        session.record_frame(booth::session::Frame {
            pose: (i + 1) as u8,
            path,
        });
    }

    let written = renderer(&assets, SMALL)
        .compose_session(&mut session, &[LayoutKind::Grid2x2, LayoutKind::Strip1x4])
        .unwrap();
    assert_eq!(
        written,
        vec![
            id.composite_path(output.path(), LayoutKind::Grid2x2),
            id.composite_path(output.path(), LayoutKind::Strip1x4),
        ]
    );
    assert_eq!(session.composites(), written.as_slice());
    assert!(written.iter().all(|p| p.is_file()));
}

#[test]
fn test_seeded_template_choice_is_stable() {
    init_test_logging();
    let assets = BoothAssets::create(4)
        .with_template(LayoutKind::Grid2x2, SMALL, "a", SMALL, (200, 20, 20))
        .with_template(LayoutKind::Grid2x2, SMALL, "b", SMALL, (20, 200, 20))
        .with_template(LayoutKind::Grid2x2, SMALL, "c", SMALL, (20, 20, 200));
    let output = TempDir::new().unwrap();
    let id = session_id();
    let frames = write_frames(output.path(), &id, 4, SMALL);

    let corner = |name: &str| {
        let target = output.path().join(name);
        renderer(&assets, SMALL)
            .compose(LayoutKind::Grid2x2, &frames, &target)
            .unwrap();
        image::open(&target).unwrap().to_rgb8().get_pixel(0, 0).0
    };
    let first = corner("one.jpg");
    let second = corner("two.jpg");
    assert!(close_to(first, (second[0], second[1], second[2])));
    assert!(!close_to(first, WHITE));
}
