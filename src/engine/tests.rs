//! Unit tests for the drawing engine.

use std::sync::{Arc, Mutex};

use bevy::prelude::*;

use super::*;
use crate::broadcast::RecordingSink;
use crate::common::{EngineKey, Modifiers, PointerButton, PointerInput};
use crate::drawing::{Placeholder, Style};
use crate::persistence::MemoryStore;
use crate::selection::ToolbarState;

fn p(x: f64, y: f64) -> DataPoint {
    DataPoint::new(x, y)
}

fn engine() -> DrawingEngine {
    DrawingEngine::default()
}

fn engine_with_sink() -> (DrawingEngine, Arc<Mutex<RecordingSink>>) {
    let sink = Arc::new(Mutex::new(RecordingSink::default()));
    let mut engine = engine();
    engine.add_broadcast_sink(sink.clone());
    (engine, sink)
}

fn broadcasts(sink: &Arc<Mutex<RecordingSink>>) -> Vec<BroadcastEvent> {
    sink.lock().unwrap().events.clone()
}

/// Screen (0,0) -> (40,40) on the default scales
fn place_trendline(engine: &mut DrawingEngine) -> DrawingId {
    engine.place_drawing("trendline", vec![p(0.0, 100.0), p(5.0, 90.0)]).unwrap()
}

fn down(x: f32, y: f32) -> PointerInput {
    PointerInput::at(Vec2::new(x, y))
}

fn drag_to(x: f32, y: f32) -> PointerInput {
    PointerInput::at(Vec2::new(x, y)).held()
}

#[test]
fn test_trendline_two_points_commits_and_selects() {
    let (mut engine, sink) = engine_with_sink();
    assert!(engine.set_tool("trendline"));

    let first = engine.add_point(p(0.0, 100.0)).unwrap();
    assert!(!first.is_complete);
    assert_eq!(first.count, 1);
    let second = engine.add_point(p(5.0, 110.0)).unwrap();
    assert!(second.is_complete);

    assert_eq!(engine.drawings().len(), 1);
    let drawing = &engine.drawings()[0];
    let id = drawing.id();
    assert_eq!(drawing.tool(), "trendline");
    assert_eq!(drawing.points, vec![p(0.0, 100.0), p(5.0, 110.0)]);
    assert!(drawing.selected);
    assert_eq!(engine.selection().ids(), &[id]);

    let anchor = drawing.bounding_box(&LinearMapper, &Scales::default()).unwrap();
    assert_eq!(engine.toolbar(), ToolbarState::Shown { id, anchor });
    // Not persistent: the tool is released after one drawing
    assert_eq!(engine.active_tool(), None);
    assert!(engine.drain_events().contains(&EngineEvent::ToolChanged(None)));

    assert_eq!(engine.delete_selected(), 1);
    let events = broadcasts(&sink);
    assert!(matches!(events.first(), Some(BroadcastEvent::Add { index: 0, .. })));
    assert_eq!(events.last(), Some(&BroadcastEvent::Remove { id, index: 0 }));
    assert_eq!(engine.toolbar(), ToolbarState::Hidden);
}

#[test]
fn test_unknown_tool_is_rejected() {
    let mut engine = engine();
    assert!(!engine.set_tool("no_such_tool"));
    assert_eq!(engine.active_tool(), None);
    assert!(engine.add_point(p(0.0, 0.0)).is_none());
}

#[test]
fn test_keep_drawing_mode_keeps_tool_armed() {
    let mut engine = engine();
    engine.config_mut().settings.keep_drawing_mode = true;
    engine.set_tool("horizontal_line");
    engine.add_point(p(1.0, 50.0));
    engine.add_point(p(2.0, 60.0));
    assert_eq!(engine.drawings().len(), 2);
    assert_eq!(engine.active_tool(), Some("horizontal_line"));
}

#[test]
fn test_undo_redo_add() {
    let mut engine = engine();
    let id = place_trendline(&mut engine);
    assert!(engine.can_undo());

    assert!(engine.undo());
    assert!(engine.drawings().is_empty());
    assert!(engine.selection().is_empty());
    assert!(engine.can_redo());

    assert!(engine.redo());
    assert_eq!(engine.drawings().len(), 1);
    assert_eq!(engine.drawings()[0].id(), id);
}

#[test]
fn test_undo_delete_restores_index() {
    let (mut engine, sink) = engine_with_sink();
    let first = place_trendline(&mut engine);
    let second = engine.place_drawing("ray", vec![p(10.0, 50.0), p(20.0, 60.0)]).unwrap();

    assert!(engine.delete_drawing(first));
    assert_eq!(engine.drawings()[0].id(), second);

    assert!(engine.undo());
    let order: Vec<_> = engine.drawings().iter().map(Drawing::id).collect();
    assert_eq!(order, vec![first, second]);
    assert!(matches!(broadcasts(&sink).last(), Some(BroadcastEvent::Add { index: 0, .. })));
}

#[test]
fn test_locked_drawing_survives_delete_key() {
    let mut engine = engine();
    let id = place_trendline(&mut engine);
    assert!(engine.set_locked(id, true));
    assert!(!engine.key_down(EngineKey::Delete));
    assert_eq!(engine.delete_selected(), 0);
    assert_eq!(engine.drawings().len(), 1);
}

#[test]
fn test_locked_drawing_deletes_by_id() {
    let mut engine = engine();
    let id = place_trendline(&mut engine);
    assert!(engine.set_locked(id, true));

    assert!(engine.delete_drawing(id));
    assert!(engine.drawings().is_empty());

    assert!(engine.undo());
    assert!(engine.drawing(id).is_some_and(|d| d.locked));
}

#[test]
fn test_clear_all_is_undone_per_drawing() {
    let (mut engine, sink) = engine_with_sink();
    place_trendline(&mut engine);
    engine.place_drawing("ray", vec![p(10.0, 50.0), p(20.0, 60.0)]);

    engine.clear_all();
    assert!(engine.drawings().is_empty());
    assert_eq!(broadcasts(&sink).last(), Some(&BroadcastEvent::Clear));

    assert!(engine.undo());
    assert_eq!(engine.drawings().len(), 1);
    assert!(engine.undo());
    assert_eq!(engine.drawings().len(), 2);
}

#[test]
fn test_pointer_drag_moves_and_undoes() {
    let (mut engine, sink) = engine_with_sink();
    let id = place_trendline(&mut engine);

    assert!(engine.pointer_down(down(20.0, 20.0)));
    assert!(matches!(engine.gesture(), Gesture::DirectMove(_)));
    assert!(engine.pointer_move(drag_to(36.0, 20.0)));
    assert!(engine.pointer_up(down(36.0, 20.0)));
    assert!(engine.gesture().is_idle());

    // 16px right is two bars
    assert_eq!(engine.drawing(id).unwrap().points, vec![p(2.0, 100.0), p(7.0, 90.0)]);
    assert!(matches!(broadcasts(&sink).last(), Some(BroadcastEvent::Update { index: 0, .. })));

    assert!(engine.undo());
    assert_eq!(engine.drawing(id).unwrap().points, vec![p(0.0, 100.0), p(5.0, 90.0)]);
}

#[test]
fn test_click_without_motion_records_nothing() {
    let (mut engine, sink) = engine_with_sink();
    place_trendline(&mut engine);
    let before = broadcasts(&sink).len();

    engine.pointer_down(down(20.0, 20.0));
    engine.pointer_up(down(20.0, 20.0));
    assert_eq!(broadcasts(&sink).len(), before);

    // The only history entry is still the add
    assert!(engine.undo());
    assert!(engine.drawings().is_empty());
}

#[test]
fn test_lost_release_abandons_and_reverts() {
    let mut engine = engine();
    let id = place_trendline(&mut engine);

    engine.pointer_down(down(20.0, 20.0));
    engine.pointer_move(drag_to(60.0, 20.0));
    assert_ne!(engine.drawing(id).unwrap().points[0], p(0.0, 100.0));

    // Move without the button: the release never arrived
    engine.pointer_move(PointerInput::at(Vec2::new(80.0, 20.0)));
    assert!(engine.gesture().is_idle());
    assert_eq!(engine.drawing(id).unwrap().points, vec![p(0.0, 100.0), p(5.0, 90.0)]);
}

#[test]
fn test_escape_reverts_drag() {
    let mut engine = engine();
    let id = place_trendline(&mut engine);
    engine.pointer_down(down(20.0, 20.0));
    engine.pointer_move(drag_to(60.0, 60.0));

    assert!(engine.key_down(EngineKey::Escape));
    assert!(engine.gesture().is_idle());
    assert_eq!(engine.drawing(id).unwrap().points[0], p(0.0, 100.0));
}

#[test]
fn test_handle_drag_resizes_one_point() {
    let mut engine = engine();
    let id = place_trendline(&mut engine);

    // Second point's handle sits at (40,40)
    assert!(engine.pointer_down(down(41.0, 39.0)));
    assert!(matches!(engine.gesture(), Gesture::HandleResize(_)));
    engine.pointer_move(drag_to(80.0, 40.0));
    engine.pointer_up(down(80.0, 40.0));

    assert_eq!(engine.drawing(id).unwrap().points, vec![p(0.0, 100.0), p(10.0, 90.0)]);
}

#[test]
fn test_double_click_on_handle_opens_editor() {
    let mut engine = engine();
    let id = place_trendline(&mut engine);
    engine.drain_events();

    engine.pointer_down(down(40.0, 40.0).at_time(1_000));
    engine.pointer_up(down(40.0, 40.0).at_time(1_050));
    engine.pointer_down(down(40.0, 40.0).at_time(1_200));

    assert!(engine.drain_events().contains(&EngineEvent::OpenEditor(id)));
    assert!(engine.gesture().is_idle());
}

#[test]
fn test_marquee_selects_overlapping_drawings() {
    let mut engine = engine();
    let inside = place_trendline(&mut engine);
    let outside = engine.place_drawing("trendline", vec![p(60.0, 50.0), p(70.0, 40.0)]).unwrap();
    engine.deselect_all();

    let shift = Modifiers::shift();
    assert!(engine.pointer_down(down(-10.0, -10.0).with_modifiers(shift)));
    assert!(matches!(engine.gesture(), Gesture::Marquee(_)));
    engine.pointer_move(drag_to(100.0, 100.0).with_modifiers(shift));
    engine.pointer_up(down(100.0, 100.0).with_modifiers(shift));

    assert!(engine.selection().contains(inside));
    assert!(!engine.selection().contains(outside));
}

#[test]
fn test_marquee_cancelled_when_shift_released() {
    let mut engine = engine();
    place_trendline(&mut engine);
    engine.deselect_all();

    engine.pointer_down(down(-10.0, -10.0).with_modifiers(Modifiers::shift()));
    engine.pointer_move(drag_to(100.0, 100.0));
    assert!(engine.gesture().is_idle());
    engine.pointer_up(down(100.0, 100.0));
    assert!(engine.selection().is_empty());
}

#[test]
fn test_click_on_empty_space_deselects() {
    let mut engine = engine();
    place_trendline(&mut engine);
    assert!(engine.pointer_down(down(400.0, 300.0)));
    assert!(engine.selection().is_empty());
    assert_eq!(engine.toolbar(), ToolbarState::Hidden);
}

#[test]
fn test_ctrl_click_toggles_multi_selection() {
    let mut engine = engine();
    let first = place_trendline(&mut engine);
    let second = engine.place_drawing("trendline", vec![p(60.0, 50.0), p(70.0, 40.0)]).unwrap();

    engine.pointer_down(down(20.0, 20.0).with_modifiers(Modifiers::ctrl()));
    assert_eq!(engine.selection().len(), 2);
    assert!(engine.selection().contains(first) && engine.selection().contains(second));
    assert_eq!(engine.toolbar(), ToolbarState::Hidden);

    engine.pointer_down(down(20.0, 20.0).with_modifiers(Modifiers::ctrl()));
    assert_eq!(engine.selection().ids(), &[second]);
}

#[test]
fn test_multi_selection_moves_together() {
    let mut engine = engine();
    let first = place_trendline(&mut engine);
    let second = engine.place_drawing("trendline", vec![p(60.0, 50.0), p(70.0, 40.0)]).unwrap();
    engine.select_drawing(first, true);

    engine.pointer_down(down(20.0, 20.0));
    engine.pointer_move(drag_to(28.0, 20.0));
    engine.pointer_up(down(28.0, 20.0));

    assert_eq!(engine.drawing(first).unwrap().points[0], p(1.0, 100.0));
    assert_eq!(engine.drawing(second).unwrap().points[0], p(61.0, 50.0));
}

#[test]
fn test_right_click_opens_context_menu() {
    let mut engine = engine();
    let id = place_trendline(&mut engine);
    engine.deselect_all();
    engine.drain_events();

    let position = Vec2::new(20.0, 20.0);
    assert!(engine.pointer_down(PointerInput::at(position).with_button(PointerButton::Secondary)));
    assert!(engine.selection().contains(id));
    assert!(engine.drain_events().contains(&EngineEvent::ContextMenuRequested { id: Some(id), position }));
}

#[test]
fn test_escape_unwinds_one_step_at_a_time() {
    let mut engine = engine();
    engine.set_tool("polyline");
    engine.add_point(p(0.0, 50.0));
    assert!(engine.tool_state() != &ToolState::Idle);

    assert!(engine.key_down(EngineKey::Escape));
    assert_eq!(engine.active_tool(), Some("polyline"));
    assert!(engine.collected_points().is_empty());

    assert!(engine.key_down(EngineKey::Escape));
    assert_eq!(engine.active_tool(), None);
    assert!(!engine.key_down(EngineKey::Escape));
}

#[test]
fn test_right_click_terminates_polyline() {
    let mut engine = engine();
    engine.set_tool("polyline");
    engine.add_point(p(0.0, 50.0));
    engine.add_point(p(5.0, 60.0));
    engine.add_point(p(10.0, 40.0));
    assert!(engine.drawings().is_empty());

    engine.pointer_down(down(0.0, 0.0).with_button(PointerButton::Secondary));
    assert_eq!(engine.drawings().len(), 1);
    assert_eq!(engine.drawings()[0].points.len(), 3);
}

#[test]
fn test_single_point_polyline_is_discarded() {
    let mut engine = engine();
    engine.set_tool("polyline");
    engine.add_point(p(0.0, 50.0));
    assert!(!engine.key_down(EngineKey::Enter));
    assert!(engine.drawings().is_empty());
    assert_eq!(engine.active_tool(), Some("polyline"));
}

#[test]
fn test_brush_samples_while_held() {
    let mut engine = engine();
    engine.set_tool("brush");

    engine.pointer_down(down(0.0, 0.0));
    assert!(matches!(engine.gesture(), Gesture::Collecting { continuous: true }));
    engine.pointer_move(drag_to(10.0, 0.0));
    // Too close to the previous sample
    engine.pointer_move(drag_to(11.0, 0.0));
    engine.pointer_move(drag_to(20.0, 5.0));
    engine.pointer_up(down(20.0, 5.0));

    assert_eq!(engine.drawings().len(), 1);
    assert_eq!(engine.drawings()[0].points.len(), 3);
    // Persistent tool stays armed
    assert_eq!(engine.active_tool(), Some("brush"));
    assert!(engine.gesture().is_idle());
}

#[test]
fn test_fixed_tool_by_pointer() {
    let mut engine = engine();
    engine.set_tool("trendline");
    engine.pointer_down(down(0.0, 0.0));
    engine.pointer_up(down(0.0, 0.0));
    engine.pointer_move(PointerInput::at(Vec2::new(40.0, 40.0)));
    assert!(engine.preview_group().is_some());
    engine.pointer_down(down(40.0, 40.0));

    assert_eq!(engine.drawings().len(), 1);
    assert_eq!(engine.drawings()[0].points, vec![p(0.0, 100.0), p(5.0, 90.0)]);
}

#[test]
fn test_position_tool_drags_target_after_press() {
    let mut engine = engine();
    engine.set_tool("long_position");
    engine.pointer_down(down(80.0, 200.0));

    assert_eq!(engine.drawings().len(), 1);
    assert_eq!(engine.drawings()[0].points.len(), 3);
    assert!(matches!(engine.gesture(), Gesture::HandleResize(_)));

    engine.pointer_up(down(80.0, 200.0));
    assert!(engine.gesture().is_idle());
    assert_eq!(engine.active_tool(), None);
}

#[test]
fn test_text_waits_for_content() {
    let mut engine = engine();
    engine.set_tool("text");
    engine.add_point(p(10.0, 50.0));

    assert!(engine.drawings().is_empty());
    assert!(engine.pending_text().is_some());
    let requested = engine
        .drain_events()
        .into_iter()
        .any(|e| matches!(e, EngineEvent::TextEntryRequested { ref tool, .. } if tool == "text"));
    assert!(requested);

    let id = engine.submit_text("hello").unwrap();
    let drawing = engine.drawing(id).unwrap();
    assert_eq!(drawing.shape().content_holder().and_then(|h| h.content()), Some("hello"));
}

#[test]
fn test_blank_text_is_discarded() {
    let mut engine = engine();
    engine.set_tool("note");
    engine.add_point(p(10.0, 50.0));
    assert!(engine.submit_text("   ").is_none());
    assert!(engine.drawings().is_empty());
    assert!(engine.pending_text().is_none());
}

#[test]
fn test_sticker_requires_glyph() {
    let mut engine = engine();
    assert!(!engine.set_tool("sticker"));
    engine.set_sticker(Some("🚀"));
    assert!(engine.set_tool("sticker"));
    engine.add_point(p(3.0, 40.0));

    let drawing = &engine.drawings()[0];
    assert_eq!(drawing.shape().content_holder().and_then(|h| h.content()), Some("🚀"));
}

#[test]
fn test_empty_image_placeholder_swept_on_deselect() {
    let (mut engine, sink) = engine_with_sink();
    let id = engine.place_drawing("image", vec![p(0.0, 100.0), p(5.0, 90.0)]).unwrap();
    assert_eq!(engine.drawing(id).unwrap().placeholder, Placeholder::Speculative);

    engine.deselect_all();
    assert!(engine.drawings().is_empty());
    assert_eq!(broadcasts(&sink).last(), Some(&BroadcastEvent::Remove { id, index: 0 }));
}

#[test]
fn test_swept_placeholder_leaves_no_history() {
    let mut engine = engine();
    let line = place_trendline(&mut engine);
    engine.set_tool("image");
    engine.add_point(p(10.0, 80.0));
    engine.add_point(p(15.0, 70.0));
    assert_eq!(engine.drawings().len(), 2);

    engine.deselect_all();
    assert_eq!(engine.drawings().len(), 1);

    // The next undo reaches the trendline; nothing brings the placeholder back
    assert!(engine.undo());
    assert!(engine.drawing(line).is_none());
    assert!(engine.redo());
    assert!(!engine.redo());
    let tools: Vec<_> = engine.drawings().iter().map(|d| d.tool().to_string()).collect();
    assert_eq!(tools, vec!["trendline".to_string()]);
}

#[test]
fn test_opened_placeholder_is_kept() {
    let mut engine = engine();
    let id = engine.place_drawing("image", vec![p(0.0, 100.0), p(5.0, 90.0)]).unwrap();
    assert!(engine.open_settings(id));
    engine.deselect_all();
    assert_eq!(engine.drawing(id).unwrap().placeholder, Placeholder::Pinned);
}

#[test]
fn test_style_edits_coalesce_within_debounce() {
    let mut engine = engine();
    let id = place_trendline(&mut engine);
    let original = engine.drawing(id).unwrap().style.clone();

    assert!(engine.set_style_at(id, Style::default().with_stroke_width(2.0), 1_000));
    assert!(engine.set_style_at(id, Style::default().with_stroke_width(4.0), 1_200));
    assert!(!engine.poll_style_debounce(1_300));
    assert!(engine.poll_style_debounce(1_700));

    // One undo reverts both edits
    assert!(engine.undo());
    assert_eq!(engine.drawing(id).unwrap().style, original);
    assert!(engine.undo());
    assert!(engine.drawings().is_empty());
}

#[test]
fn test_style_is_remembered_per_tool() {
    let mut engine = engine();
    let id = place_trendline(&mut engine);
    let wide = Style::default().with_stroke_width(5.0);
    engine.set_style_at(id, wide.clone(), 0);

    let next = place_trendline(&mut engine);
    assert_eq!(engine.drawing(next).unwrap().style, wide);
}

#[test]
fn test_hidden_drawing_leaves_selection() {
    let mut engine = engine();
    let id = place_trendline(&mut engine);
    assert!(engine.set_hidden(id, true));
    assert!(engine.selection().is_empty());
    assert!(engine.find_drawings_at_point(Vec2::new(20.0, 20.0)).is_empty());
}

#[test]
fn test_set_text_needs_content_holder() {
    let mut engine = engine();
    let id = place_trendline(&mut engine);
    assert!(!engine.set_text(id, "nope"));
}

#[test]
fn test_eraser_mode_deletes_on_click() {
    let mut engine = engine();
    let locked = engine.place_drawing("trendline", vec![p(60.0, 50.0), p(70.0, 40.0)]).unwrap();
    engine.set_locked(locked, true);
    let id = place_trendline(&mut engine);
    engine.config_mut().settings.eraser_mode = true;

    assert!(engine.pointer_down(down(20.0, 20.0)));
    assert!(engine.drawing(id).is_none());

    // Locked drawings are not erased
    engine.pointer_down(down(520.0, 220.0));
    assert!(engine.drawing(locked).is_some());
}

#[test]
fn test_fill_interaction_off_while_armed() {
    let mut engine = engine();
    assert!(engine.fill_interaction_enabled());
    engine.set_tool("rectangle");
    assert!(!engine.fill_interaction_enabled());
    engine.clear_tool();
    assert!(engine.fill_interaction_enabled());
}

#[test]
fn test_captured_drag_resolves_group_handle() {
    let mut engine = engine();
    let id = place_trendline(&mut engine);
    engine.deselect_all();
    assert!(engine.flush_renders() > 0);
    assert!(!engine.has_pending_renders());

    let handle = engine.group_handle(id).unwrap();
    assert!(engine.begin_captured_drag(handle, Vec2::new(20.0, 20.0)));
    assert!(engine.selection().contains(id));
    assert!(matches!(engine.gesture(), Gesture::DirectMove(_)));
}

#[test]
fn test_captured_drag_rejects_circle_interior() {
    let mut engine = engine();
    // Centre (80,200), radius 40
    let id = engine.place_drawing("circle", vec![p(10.0, 50.0), p(15.0, 50.0)]).unwrap();
    engine.flush_renders();
    let handle = engine.group_handle(id).unwrap();

    assert!(!engine.begin_captured_drag(handle, Vec2::new(80.0, 200.0)));
    assert!(engine.gesture().is_idle());
    assert!(engine.begin_captured_drag(handle, Vec2::new(120.0, 201.0)));
}

#[test]
fn test_copy_paste_offsets_and_selects() {
    let mut engine = engine();
    let original = place_trendline(&mut engine);
    assert_eq!(engine.copy_selection(), 1);

    let pasted = engine.paste();
    assert_eq!(pasted.len(), 1);
    assert_ne!(pasted[0], original);
    assert_eq!(engine.drawing(pasted[0]).unwrap().points, vec![p(5.0, 100.0), p(10.0, 90.0)]);
    assert_eq!(engine.selection().ids(), pasted.as_slice());
}

#[test]
fn test_duplicate_leaves_clipboard_alone() {
    let mut engine = engine();
    let id = place_trendline(&mut engine);
    let copy = engine.duplicate_drawing(id).unwrap();
    assert_ne!(copy, id);
    assert_eq!(engine.drawings().len(), 2);
    assert!(engine.clipboard().is_empty());
}

#[test]
fn test_store_saves_and_session_loads() {
    let mut engine = DrawingEngine::default().with_store(MemoryStore::default(), "BTC");
    let first = place_trendline(&mut engine);
    let second = engine.place_drawing("ray", vec![p(10.0, 50.0), p(20.0, 60.0)]).unwrap();

    let records = engine.store().unwrap().load("BTC").unwrap();
    assert_eq!(records.len(), 2);

    let mut store = MemoryStore::default();
    store.save("BTC", &records).unwrap();
    let mut other = DrawingEngine::default().with_store(store, "ETH");
    assert_eq!(other.load_session("BTC"), 2);
    assert_eq!(other.session_key(), "BTC");

    let ids: Vec<_> = other.drawings().iter().map(Drawing::id).collect();
    assert_eq!(ids, vec![first, second]);
    assert!(!other.can_undo());
    assert!(other.has_pending_renders());
}

#[test]
fn test_undo_persists_once_replay_ends() {
    let mut engine = DrawingEngine::default().with_store(MemoryStore::default(), "BTC");
    place_trendline(&mut engine);
    engine.undo();
    assert!(engine.store().unwrap().load("BTC").unwrap().is_empty());
}

#[test]
fn test_candles_stamp_drawings() {
    let mut engine = engine();
    let id = place_trendline(&mut engine);
    assert!(engine.drawing(id).unwrap().timestamp_points.is_none());

    let candles = (0..10)
        .map(|i| Candle {
            time: 60_000 * i,
            open: 1.0,
            high: 2.0,
            low: 0.5,
            close: 1.5,
        })
        .collect();
    engine.set_candles(candles);
    assert!(engine.drawing(id).unwrap().timestamp_points.is_some());
}

#[test]
fn test_hit_testing_follows_new_scales_before_flush() {
    let mut engine = engine();
    let id = place_trendline(&mut engine);
    engine.flush_renders();
    assert!(engine.drawing(id).unwrap().group().is_some());

    // Ten bars of scroll move the line 80px right
    engine.set_scales(Scales {
        first_index: -10.0,
        ..Scales::default()
    });
    assert!(engine.has_pending_renders());
    assert!(engine.find_drawings_at_point(Vec2::new(20.0, 20.0)).is_empty());
    assert_eq!(engine.find_drawings_at_point(Vec2::new(100.0, 20.0)).len(), 1);
}

#[test]
fn test_stroke_width_edit_applies_to_hits_before_flush() {
    let mut engine = engine();
    let id = place_trendline(&mut engine);
    engine.flush_renders();
    // 10px off the line, beyond the default tolerance
    let near = Vec2::new(27.0, 13.0);
    assert!(engine.find_drawings_at_point(near).is_empty());

    assert!(engine.set_style(id, Style::default().with_stroke_width(30.0)));
    assert_eq!(engine.find_drawings_at_point(near).len(), 1);
}

#[test]
fn test_rescale_presents_each_drawing_once() {
    let mut engine = engine();
    for i in 0..3 {
        let x = i as f64 * 10.0;
        engine.place_drawing("trendline", vec![p(x, 100.0), p(x + 5.0, 90.0)]);
    }
    engine.flush_renders();

    engine.set_scales(Scales {
        bar_spacing: 4.0,
        ..Scales::default()
    });
    engine.set_scales(Scales {
        bar_spacing: 6.0,
        ..Scales::default()
    });
    assert_eq!(engine.flush_renders(), 3);
    assert!(!engine.has_pending_renders());
}
