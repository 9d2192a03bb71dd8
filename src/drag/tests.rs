//! Unit tests for the drag module.

use bevy::prelude::*;
use proptest::prelude::*;

use super::*;
use crate::common::Modifiers;
use crate::config::EngineSettings;
use crate::drawing::{DataPoint, Style};
use crate::error::EngineError;
use crate::mapper::{LinearMapper, Scales};
use crate::render::HandleTag;
use crate::tools::ToolRegistry;

fn p(x: f64, y: f64) -> DataPoint {
    DataPoint::new(x, y)
}

fn create(tool: &str, points: Vec<DataPoint>) -> Drawing {
    ToolRegistry::with_builtin_tools()
        .create(tool, points, Style::default())
        .unwrap()
}

fn trendline() -> Drawing {
    // Screen (0,0) -> (40,40) on the default scales
    create("trendline", vec![p(0.0, 100.0), p(5.0, 90.0)])
}

fn with_hit_ctx<R>(f: impl FnOnce(&HitContext<'_>) -> R) -> R {
    let registry = ToolRegistry::with_builtin_tools();
    let settings = EngineSettings::default();
    let scales = Scales::default();
    let ctx = HitContext {
        mapper: &LinearMapper,
        scales: &scales,
        registry: &registry,
        settings: &settings,
    };
    f(&ctx)
}

fn assert_close(a: DataPoint, b: DataPoint) {
    assert!((a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6, "{:?} != {:?}", a, b);
}

#[test]
fn test_direct_move_uses_total_pixel_offset() {
    let scales = Scales::default();
    let mut drawings = vec![trendline()];
    let mv = DirectMove::begin(&drawings[0], [&drawings[0]], Vec2::new(10.0, 10.0), &LinearMapper, &scales).unwrap();

    // Intermediate samples must not accumulate
    mv.update(&mut drawings, Vec2::new(13.0, 12.0), &LinearMapper, &scales);
    mv.update(&mut drawings, Vec2::new(30.0, 70.0), &LinearMapper, &scales);
    let updated = mv.update(&mut drawings, Vec2::new(26.0, 50.0), &LinearMapper, &scales);

    assert_eq!(updated, vec![drawings[0].id()]);
    assert_close(drawings[0].points[0], p(2.0, 90.0));
    assert_close(drawings[0].points[1], p(7.0, 80.0));
}

#[test]
fn test_multi_selection_moves_together_except_locked() {
    let scales = Scales::default();
    let lead = trendline();
    let other = create("horizontal_line", vec![p(20.0, 50.0)]);
    let mut locked = create("horizontal_line", vec![p(30.0, 25.0)]);
    locked.locked = true;
    let mut drawings = vec![lead, other, locked];

    let mv = DirectMove::begin(&drawings[0], drawings.iter(), Vec2::ZERO, &LinearMapper, &scales).unwrap();
    assert_eq!(mv.targets.len(), 2);
    mv.update(&mut drawings, Vec2::new(8.0, 4.0), &LinearMapper, &scales);

    assert_close(drawings[0].points[0], p(1.0, 99.0));
    assert_close(drawings[1].points[0], p(21.0, 49.0));
    assert_eq!(drawings[2].points[0], p(30.0, 25.0));
}

#[test]
fn test_revert_restores_start_points() {
    let scales = Scales::default();
    let mut drawings = vec![trendline()];
    let original = drawings[0].points.clone();
    let mv = DirectMove::begin(&drawings[0], [&drawings[0]], Vec2::ZERO, &LinearMapper, &scales).unwrap();
    mv.update(&mut drawings, Vec2::new(50.0, 50.0), &LinearMapper, &scales);
    mv.revert(&mut drawings);
    assert_eq!(drawings[0].points, original);
}

#[test]
fn test_move_skips_deleted_targets() {
    let scales = Scales::default();
    let drawings = vec![trendline()];
    let mv = DirectMove::begin(&drawings[0], [&drawings[0]], Vec2::ZERO, &LinearMapper, &scales).unwrap();
    let mut remaining: Vec<Drawing> = Vec::new();
    assert!(mv.update(&mut remaining, Vec2::new(5.0, 5.0), &LinearMapper, &scales).is_empty());
}

proptest! {
    #[test]
    fn prop_move_there_and_back_restores_points(dx in -300.0f32..300.0, dy in -300.0f32..300.0) {
        let scales = Scales::default();
        let mut drawings = vec![trendline()];
        let original = drawings[0].points.clone();
        let origin = Vec2::new(100.0, 100.0);

        let there = DirectMove::begin(&drawings[0], [&drawings[0]], origin, &LinearMapper, &scales).unwrap();
        there.update(&mut drawings, origin + Vec2::new(dx, dy), &LinearMapper, &scales);

        let back = DirectMove::begin(&drawings[0], [&drawings[0]], origin, &LinearMapper, &scales).unwrap();
        back.update(&mut drawings, origin - Vec2::new(dx, dy), &LinearMapper, &scales);

        for (a, b) in drawings[0].points.iter().zip(&original) {
            prop_assert!((a.x - b.x).abs() < 1e-3);
            prop_assert!((a.y - b.y).abs() < 1e-3);
        }
    }
}

#[test]
fn test_handle_resize_moves_point() {
    let scales = Scales::default();
    let mut drawing = trendline();
    let resize = HandleResize::begin(&mut drawing, 1, true).unwrap();
    assert!(resize.update(&mut drawing, Vec2::new(80.0, 200.0), Modifiers::NONE, &LinearMapper, &scales));
    assert_close(drawing.points[1], p(10.0, 50.0));
    assert_close(drawing.points[0], p(0.0, 100.0));
    assert_eq!(resize.before.points[1], p(5.0, 90.0));
}

#[test]
fn test_handle_resize_snaps_around_other_point() {
    let scales = Scales::default();
    let mut drawing = trendline();
    let resize = HandleResize::begin(&mut drawing, 1, true).unwrap();
    resize.update(&mut drawing, Vec2::new(80.0, 8.0), Modifiers::shift(), &LinearMapper, &scales);
    // Snapped flat: same price as the anchor at (0, 0)
    assert!((drawing.points[1].y - 100.0).abs() < 1e-4);
    let length = Vec2::new(80.0, 8.0).length();
    assert!((drawing.points[1].x * 8.0 - f64::from(length)).abs() < 1e-3);
}

#[test]
fn test_handle_resize_without_snap_participation_ignores_shift() {
    let scales = Scales::default();
    let mut drawing = create("rectangle", vec![p(0.0, 100.0), p(5.0, 90.0)]);
    let resize = HandleResize::begin(&mut drawing, 1, false).unwrap();
    resize.update(&mut drawing, Vec2::new(80.0, 8.0), Modifiers::shift(), &LinearMapper, &scales);
    assert_close(drawing.points[1], p(10.0, 98.0));
}

#[test]
fn test_handle_resize_rejects_missing_index() {
    let mut drawing = trendline();
    assert!(HandleResize::begin(&mut drawing, 2, false).is_none());
}

#[test]
fn test_shape_handler_takes_precedence() {
    let scales = Scales::default();
    let mut circle = create("circle", vec![p(10.0, 50.0), p(15.0, 50.0)]);
    let resize = HandleResize::begin(&mut circle, 0, false).unwrap();
    // Centre handle to data (20, 60)
    resize.update(&mut circle, Vec2::new(160.0, 160.0), Modifiers::NONE, &LinearMapper, &scales);
    assert_close(circle.points[0], p(20.0, 60.0));
    assert_close(circle.points[1], p(25.0, 60.0));
}

#[test]
fn test_custom_handle_is_delegated_to_shape() {
    let scales = Scales::default();
    let mut rect = create("rectangle", vec![p(0.0, 100.0), p(5.0, 90.0)]);
    let resize = CustomHandleResize::begin(&rect, "corner_x1_y0").unwrap();
    // Data (8, 70)
    assert!(resize.update(&mut rect, Vec2::new(64.0, 120.0), Modifiers::NONE, &LinearMapper, &scales));
    assert_close(rect.points[0], p(0.0, 70.0));
    assert_close(rect.points[1], p(8.0, 90.0));

    assert!(!CustomHandleResize { role: "unknown", ..resize }.update(
        &mut rect,
        Vec2::ZERO,
        Modifiers::NONE,
        &LinearMapper,
        &scales
    ));
}

#[test]
fn test_custom_handle_needs_capability() {
    assert!(CustomHandleResize::begin(&trendline(), "corner_x1_y0").is_none());
}

#[test]
fn test_check_drag_target_filters() {
    let mut locked = trendline();
    locked.locked = true;
    let circle = create("circle", vec![p(10.0, 50.0), p(15.0, 50.0)]);
    let drawings = vec![locked, circle];
    let (locked_id, circle_id) = (drawings[0].id(), drawings[1].id());

    with_hit_ctx(|ctx| {
        assert!(matches!(
            check_drag_target(&drawings, locked_id, Vec2::new(20.0, 20.0), ctx),
            Err(EngineError::DrawingLocked(_))
        ));
        assert!(matches!(
            check_drag_target(&drawings, DrawingId::new(), Vec2::ZERO, ctx),
            Err(EngineError::StaleDrawing(_))
        ));
        // Circle centre (80, 200), radius 40
        assert!(matches!(
            check_drag_target(&drawings, circle_id, Vec2::new(80.0, 200.0), ctx),
            Err(EngineError::InteriorGrab(_))
        ));
        assert_eq!(check_drag_target(&drawings, circle_id, Vec2::new(120.0, 201.0), ctx).unwrap(), 1);
    });
}

#[test]
fn test_double_click_window() {
    let id = DrawingId::new();
    let tag = HandleTag::Point(0);
    let mut detector = DoubleClickDetector::default();
    assert!(!detector.register(id, tag, 1_000, 400, 40));
    assert!(detector.register(id, tag, 1_200, 400, 40));
    // Consumed: a third press starts over
    assert!(!detector.register(id, tag, 1_300, 400, 40));
    // Too slow
    assert!(!detector.register(id, tag, 2_000, 400, 40));
}

#[test]
fn test_double_click_ignores_bounce_and_other_handles() {
    let id = DrawingId::new();
    let mut detector = DoubleClickDetector::default();
    assert!(!detector.register(id, HandleTag::Point(0), 1_000, 400, 40));
    assert!(!detector.register(id, HandleTag::Point(0), 1_010, 400, 40));
    assert!(detector.register(id, HandleTag::Point(0), 1_100, 400, 40));

    assert!(!detector.register(id, HandleTag::Point(0), 5_000, 400, 40));
    assert!(!detector.register(id, HandleTag::Point(1), 5_100, 400, 40));
}

#[test]
fn test_gesture_flags() {
    assert!(Gesture::None.is_idle());
    assert!(!Gesture::Collecting { continuous: false }.needs_primary_held());
    assert!(Gesture::Collecting { continuous: true }.needs_primary_held());
    let marquee = Gesture::Marquee(crate::selection::Marquee::new(Vec2::ZERO));
    assert!(marquee.needs_primary_held());
    assert!(!marquee.is_drag());
}
