//! Unit tests for the selection module.

use bevy::prelude::*;

use super::*;
use crate::drawing::{ContentHolder, DataPoint, Drawing, Placeholder, Style};
use crate::mapper::{LinearMapper, Scales};
use crate::tools::ToolRegistry;

fn line(registry: &ToolRegistry, y: f64) -> Drawing {
    registry
        .create(
            "trendline",
            vec![DataPoint::new(0.0, y), DataPoint::new(10.0, y)],
            Style::default(),
        )
        .unwrap()
}

fn placeholder(registry: &ToolRegistry) -> Drawing {
    let mut image = registry
        .create(
            "image",
            vec![DataPoint::new(0.0, 90.0), DataPoint::new(5.0, 80.0)],
            Style::default(),
        )
        .unwrap();
    image.placeholder = Placeholder::Speculative;
    image
}

#[test]
fn test_select_replaces_without_add() {
    let registry = ToolRegistry::with_builtin_tools();
    let mut drawings = vec![line(&registry, 10.0), line(&registry, 20.0)];
    let (a, b) = (drawings[0].id(), drawings[1].id());
    let mut selection = SelectionState::default();

    assert_eq!(selection.select(&mut drawings, a, false, false), SelectOutcome::Selected);
    assert_eq!(selection.select(&mut drawings, b, false, false), SelectOutcome::Selected);
    assert_eq!(selection.ids(), &[b]);
    assert!(!drawings[0].selected);
    assert!(drawings[1].selected);
}

#[test]
fn test_add_to_selection_toggles_and_primary_is_latest() {
    let registry = ToolRegistry::with_builtin_tools();
    let mut drawings = vec![line(&registry, 10.0), line(&registry, 20.0)];
    let (a, b) = (drawings[0].id(), drawings[1].id());
    let mut selection = SelectionState::default();

    selection.select(&mut drawings, a, true, false);
    selection.select(&mut drawings, b, true, false);
    assert_eq!(selection.primary(), Some(b));
    assert_eq!(selection.len(), 2);

    assert_eq!(selection.select(&mut drawings, b, true, false), SelectOutcome::Deselected);
    assert_eq!(selection.primary(), Some(a));
    assert!(!drawings[1].selected);
}

#[test]
fn test_locked_drawing_is_not_selectable() {
    let registry = ToolRegistry::with_builtin_tools();
    let mut drawings = vec![line(&registry, 10.0)];
    drawings[0].locked = true;
    let id = drawings[0].id();
    let mut selection = SelectionState::default();

    assert_eq!(selection.select(&mut drawings, id, false, false), SelectOutcome::Ignored);
    assert_eq!(selection.select(&mut drawings, id, false, true), SelectOutcome::Ignored);
    assert!(selection.is_empty());
}

#[test]
fn test_eraser_mode_requests_deletion() {
    let registry = ToolRegistry::with_builtin_tools();
    let mut drawings = vec![line(&registry, 10.0)];
    let id = drawings[0].id();
    let mut selection = SelectionState::default();
    assert_eq!(selection.select(&mut drawings, id, false, true), SelectOutcome::Erase);
    assert!(selection.is_empty());
}

#[test]
fn test_stale_id_is_ignored() {
    let registry = ToolRegistry::with_builtin_tools();
    let mut drawings = vec![line(&registry, 10.0)];
    let stale = line(&registry, 30.0).id();
    let mut selection = SelectionState::default();
    assert_eq!(selection.select(&mut drawings, stale, true, false), SelectOutcome::Ignored);
}

#[test]
fn test_deselect_all_is_idempotent_and_sweeps_placeholders_once() {
    let registry = ToolRegistry::with_builtin_tools();
    let mut drawings = vec![line(&registry, 10.0), placeholder(&registry)];
    let (a, image) = (drawings[0].id(), drawings[1].id());
    let mut selection = SelectionState::default();
    selection.select(&mut drawings, a, true, false);
    selection.select(&mut drawings, image, true, false);

    let first = selection.deselect_all(&mut drawings);
    assert_eq!(first.removed.len(), 1);
    assert_eq!(first.removed[0].0, 1);
    assert_eq!(first.deselected, vec![a]);
    assert_eq!(drawings.len(), 1);

    let second = selection.deselect_all(&mut drawings);
    assert!(second.removed.is_empty());
    assert!(second.deselected.is_empty());
    assert!(selection.is_empty());
    assert_eq!(drawings.len(), 1);
}

#[test]
fn test_pinned_or_filled_placeholder_survives_deselect() {
    let registry = ToolRegistry::with_builtin_tools();
    let mut pinned = placeholder(&registry);
    pinned.placeholder = Placeholder::Pinned;
    let mut filled = placeholder(&registry);
    filled
        .shape_mut()
        .content_holder_mut()
        .unwrap()
        .set_content("chart.png");
    let mut drawings = vec![pinned, filled];
    let ids: Vec<_> = drawings.iter().map(|d| d.id()).collect();

    let mut selection = SelectionState::default();
    for id in ids {
        selection.select(&mut drawings, id, true, false);
    }
    let sweep = selection.deselect_all(&mut drawings);
    assert!(sweep.removed.is_empty());
    assert_eq!(drawings.len(), 2);
}

#[test]
fn test_toolbar_follows_selection_cardinality() {
    let registry = ToolRegistry::with_builtin_tools();
    let mut drawings = vec![line(&registry, 90.0), line(&registry, 80.0)];
    let (a, b) = (drawings[0].id(), drawings[1].id());
    let mut selection = SelectionState::default();
    let scales = Scales::default();

    assert_eq!(
        ToolbarState::for_selection(&selection, &drawings, &LinearMapper, &scales),
        ToolbarState::Hidden
    );

    selection.select(&mut drawings, a, false, false);
    let ToolbarState::Shown { id, anchor } =
        ToolbarState::for_selection(&selection, &drawings, &LinearMapper, &scales)
    else {
        panic!("toolbar should be shown for one selection");
    };
    assert_eq!(id, a);
    assert_eq!(anchor.min, Vec2::new(0.0, 40.0));
    assert_eq!(anchor.max, Vec2::new(80.0, 40.0));

    selection.select(&mut drawings, b, true, false);
    assert!(!ToolbarState::for_selection(&selection, &drawings, &LinearMapper, &scales).is_shown());
}

#[test]
fn test_marquee_selects_overlapping_bounds() {
    let registry = ToolRegistry::with_builtin_tools();
    // y = 40 and y = 200 on screen
    let drawings = vec![line(&registry, 90.0), line(&registry, 50.0)];
    let mut marquee = Marquee::new(Vec2::new(20.0, 20.0));
    marquee.current = Vec2::new(60.0, 60.0);

    assert!(marquee.is_drag(5.0));
    let inside = marquee.drawings_in(&drawings, &LinearMapper, &Scales::default());
    assert_eq!(inside, vec![drawings[0].id()]);
}

#[test]
fn test_short_marquee_is_a_click() {
    let mut marquee = Marquee::new(Vec2::new(20.0, 20.0));
    marquee.current = Vec2::new(22.0, 21.0);
    assert!(!marquee.is_drag(5.0));
}
