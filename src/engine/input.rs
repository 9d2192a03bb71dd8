//! Pointer and keyboard handling.
//!
//! Press, move and release map onto the current [`Gesture`]: an armed tool
//! collects points, a press on a handle of a selected drawing resizes it, a
//! press on a stroke selects and moves, and a Shift press on empty space
//! starts a marquee.

use bevy::prelude::*;

use super::{DrawingEngine, EngineEvent};
use crate::common::{CursorHint, EngineKey, PointerButton, PointerInput};
use crate::constants::MIN_MARQUEE_DRAG;
use crate::drag::{check_drag_target, CustomHandleResize, DirectMove, Gesture, HandleResize};
use crate::drawing::{DataPoint, Drawing, DrawingId};
use crate::mapper::MagnetMode;
use crate::render::{ElementShape, GroupHandle, HandleTag};
use crate::selection::Marquee;
use crate::tools::{constrain_point, CreationBehavior};

/// Index of the target point of a position marker
const POSITION_TARGET_INDEX: usize = 2;

impl DrawingEngine {
    /// Returns `true` if the press was consumed.
    pub fn pointer_down(&mut self, input: PointerInput) -> bool {
        match input.button {
            PointerButton::Middle => false,
            PointerButton::Secondary => self.secondary_press(input),
            PointerButton::Primary => {
                if self.gesture.needs_primary_held() {
                    debug!("New press during {}; the last release was lost", self.gesture.name());
                    self.abandon_gesture();
                }
                if self.tools.is_armed() {
                    self.tool_press(input)
                } else {
                    self.select_press(input)
                }
            }
        }
    }

    pub fn pointer_move(&mut self, input: PointerInput) -> bool {
        if self.gesture.needs_primary_held() && !input.primary_held {
            debug!("Primary button released outside the release path; abandoning {}", self.gesture.name());
            return self.abandon_gesture();
        }

        match std::mem::take(&mut self.gesture) {
            Gesture::DirectMove(mv) => {
                let moved = mv.update(&mut self.drawings, input.position, self.mapper.as_ref(), &self.scales);
                for id in &moved {
                    self.schedule(*id);
                }
                self.gesture = Gesture::DirectMove(mv);
                !moved.is_empty()
            }
            Gesture::HandleResize(resize) => {
                let changed = match self.position_of(resize.id) {
                    Some(index) => resize.update(
                        &mut self.drawings[index],
                        input.position,
                        input.modifiers,
                        self.mapper.as_ref(),
                        &self.scales,
                    ),
                    None => false,
                };
                if changed {
                    self.schedule(resize.id);
                }
                self.gesture = Gesture::HandleResize(resize);
                changed
            }
            Gesture::CustomHandleResize(resize) => {
                let changed = match self.position_of(resize.id) {
                    Some(index) => resize.update(
                        &mut self.drawings[index],
                        input.position,
                        input.modifiers,
                        self.mapper.as_ref(),
                        &self.scales,
                    ),
                    None => false,
                };
                if changed {
                    self.schedule(resize.id);
                }
                self.gesture = Gesture::CustomHandleResize(resize);
                changed
            }
            Gesture::Marquee(mut marquee) => {
                if !input.modifiers.shift {
                    debug!("Marquee cancelled: Shift released");
                    self.emit(EngineEvent::FullRedrawRequested);
                    return true;
                }
                marquee.current = input.position;
                self.gesture = Gesture::Marquee(marquee);
                true
            }
            Gesture::Collecting { continuous: true } => {
                self.gesture = Gesture::Collecting { continuous: true };
                self.sample_freehand(input)
            }
            Gesture::Collecting { continuous: false } => {
                self.gesture = Gesture::Collecting { continuous: false };
                self.preview_point = self.pointer_to_data(&input);
                self.preview_point.is_some()
            }
            Gesture::None => self.hover(input),
        }
    }

    pub fn pointer_up(&mut self, input: PointerInput) -> bool {
        if input.button != PointerButton::Primary {
            return false;
        }
        match std::mem::take(&mut self.gesture) {
            Gesture::DirectMove(mv) => {
                let befores = mv.targets.into_iter().map(|t| t.before).collect();
                self.commit_changes(befores);
                self.set_cursor(CursorHint::Pointer);
                true
            }
            Gesture::HandleResize(resize) => {
                if let Some(index) = self.position_of(resize.id) {
                    resize.end(&mut self.drawings[index]);
                }
                self.commit_changes(vec![resize.before]);
                true
            }
            Gesture::CustomHandleResize(resize) => {
                self.commit_changes(vec![resize.before]);
                true
            }
            Gesture::Marquee(marquee) => {
                self.finish_marquee(marquee);
                true
            }
            Gesture::Collecting { continuous: true } => {
                self.terminate_drawing();
                true
            }
            other => {
                self.gesture = other;
                false
            }
        }
    }

    pub fn key_down(&mut self, key: EngineKey) -> bool {
        match key {
            EngineKey::Delete | EngineKey::Backspace => {
                if self.gesture.is_drag() {
                    return false;
                }
                self.delete_selected() > 0
            }
            EngineKey::Escape => {
                if self.gesture.is_drag() || matches!(self.gesture, Gesture::Marquee(_)) {
                    self.abandon_gesture()
                } else if self.cancel_text_entry() || self.cancel_drawing() {
                    true
                } else if self.tools.is_armed() {
                    self.clear_tool();
                    true
                } else if !self.selection.is_empty() {
                    self.deselect_all();
                    true
                } else {
                    false
                }
            }
            EngineKey::Enter => self.terminate_drawing().is_some(),
            EngineKey::Undo => self.undo(),
            EngineKey::Redo => self.redo(),
        }
    }

    /// Start a move from a pointer press the host captured on a presented
    /// group, without a hit test. The same lock and border filters apply.
    pub fn begin_captured_drag(&mut self, handle: GroupHandle, position: Vec2) -> bool {
        let Some(id) = self.geometry.owner(handle) else {
            debug!("No drawing owns group {:?}", handle);
            return false;
        };
        if self.tools.is_armed() || !self.gesture.is_idle() {
            return false;
        }
        if let Err(e) = check_drag_target(&self.drawings, id, position, &self.hit_context()) {
            debug!("Not dragging: {}", e);
            return false;
        }
        if !self.selection.contains(id) && !self.select_drawing(id, false) {
            return false;
        }
        self.begin_direct_move(id, position)
    }

    /// Drop the current gesture, reverting any change it made.
    pub fn abandon_gesture(&mut self) -> bool {
        match std::mem::take(&mut self.gesture) {
            Gesture::None => false,
            Gesture::Collecting { .. } => {
                self.tools.cancel();
                self.preview_point = None;
                self.emit(EngineEvent::FullRedrawRequested);
                true
            }
            Gesture::DirectMove(mv) => {
                mv.revert(&mut self.drawings);
                for id in mv.ids() {
                    self.schedule(id);
                }
                true
            }
            Gesture::HandleResize(resize) => {
                self.revert_to(&resize.before);
                if let Some(index) = self.position_of(resize.id) {
                    resize.end(&mut self.drawings[index]);
                }
                true
            }
            Gesture::CustomHandleResize(resize) => {
                self.revert_to(&resize.before);
                true
            }
            Gesture::Marquee(_) => {
                self.emit(EngineEvent::FullRedrawRequested);
                true
            }
        }
    }

    fn secondary_press(&mut self, input: PointerInput) -> bool {
        if self.tools.is_collecting() {
            let point_by_point = self
                .tools
                .active_tool()
                .and_then(|tool| self.config.registry.get(tool))
                .is_some_and(|spec| spec.is_point_by_point());
            if point_by_point {
                self.terminate_drawing();
            } else {
                self.cancel_drawing();
            }
            return true;
        }
        if self.tools.is_armed() {
            self.clear_tool();
            return true;
        }

        let id = self.find_drawings_at_point(input.position).first().map(|hit| hit.id);
        if let Some(id) = id
            && !self.config.settings.eraser_mode
            && !self.selection.contains(id)
        {
            self.select_drawing(id, false);
        }
        self.emit(EngineEvent::ContextMenuRequested {
            id,
            position: input.position,
        });
        true
    }

    fn tool_press(&mut self, input: PointerInput) -> bool {
        let Some(point) = self.pointer_to_data(&input) else {
            return false;
        };
        let risk_reward = self
            .tools
            .active_tool()
            .and_then(|tool| self.config.registry.get(tool))
            .is_some_and(|spec| matches!(spec.behavior, CreationBehavior::RiskReward(_)));

        match self.push_point(point) {
            Some((_, Some(id))) if risk_reward => {
                // The target follows the pointer until release
                self.begin_handle_drag(id, HandleTag::Point(POSITION_TARGET_INDEX));
                true
            }
            Some(_) => true,
            None => false,
        }
    }

    fn select_press(&mut self, input: PointerInput) -> bool {
        let position = input.position;

        if let Some((id, tag)) = self.handle_at(position) {
            let settings = &self.config.settings;
            let (window, min) = (settings.double_click_ms, settings.double_click_min_ms);
            if self.double_click.register(id, tag, input.time_ms, window, min) {
                return self.open_settings(id);
            }
            return self.begin_handle_drag(id, tag);
        }

        let Some(top) = self.find_drawings_at_point(position).first().copied() else {
            if input.modifiers.shift {
                self.gesture = Gesture::Marquee(Marquee::new(position));
                return true;
            }
            if self.selection.is_empty() {
                return false;
            }
            self.deselect_all();
            return true;
        };

        if self.config.settings.eraser_mode {
            return self.select_drawing(top.id, false);
        }
        if input.modifiers.ctrl {
            return self.select_drawing(top.id, true);
        }
        if !self.selection.contains(top.id) && !self.select_drawing(top.id, false) {
            return false;
        }
        self.begin_direct_move(top.id, position);
        true
    }

    /// Move `id`, together with the rest of the selection if it is selected.
    fn begin_direct_move(&mut self, id: DrawingId, position: Vec2) -> bool {
        let index = match check_drag_target(&self.drawings, id, position, &self.hit_context()) {
            Ok(index) => index,
            Err(e) => {
                debug!("Not dragging: {}", e);
                return false;
            }
        };
        let in_selection = self.selection.contains(id);
        let group: Vec<&Drawing> = self
            .drawings
            .iter()
            .filter(|d| d.id() == id || (in_selection && self.selection.contains(d.id())))
            .collect();
        let Some(mv) = DirectMove::begin(&self.drawings[index], group, position, self.mapper.as_ref(), &self.scales)
        else {
            return false;
        };
        self.gesture = Gesture::DirectMove(mv);
        self.set_cursor(CursorHint::Move);
        true
    }

    fn begin_handle_drag(&mut self, id: DrawingId, tag: HandleTag) -> bool {
        let Some(index) = self.position_of(id) else {
            return false;
        };
        if self.drawings[index].locked {
            return false;
        }
        let angle_snap = self
            .config
            .registry
            .get(self.drawings[index].tool())
            .is_some_and(|spec| spec.angle_snap);

        let gesture = match tag {
            HandleTag::Point(point) => {
                HandleResize::begin(&mut self.drawings[index], point, angle_snap).map(Gesture::HandleResize)
            }
            HandleTag::Custom(role) => {
                CustomHandleResize::begin(&self.drawings[index], role).map(Gesture::CustomHandleResize)
            }
        };
        let Some(gesture) = gesture else {
            return false;
        };
        self.gesture = gesture;
        self.schedule(id);
        self.set_cursor(CursorHint::Grab);
        true
    }

    /// Handle of a selected, unlocked drawing under `position`, topmost first
    fn handle_at(&self, position: Vec2) -> Option<(DrawingId, HandleTag)> {
        let radius = self.config.settings.handle_radius;
        self.drawings
            .iter()
            .rev()
            .filter(|d| d.selected && !d.locked && d.is_renderable())
            .find_map(|d| {
                let group = d.build_group(self.mapper.as_ref(), &self.scales, true, false);
                group
                    .handles()
                    .find(|(_, element)| {
                        matches!(element.shape, ElementShape::Circle { center, .. } if center.distance(position) <= radius)
                    })
                    .map(|(tag, _)| (d.id(), tag))
            })
    }

    /// Pointer position for the armed tool, with its point constraint and
    /// magnet applied. Alt forces the strong magnet.
    fn pointer_to_data(&self, input: &PointerInput) -> Option<DataPoint> {
        let spec = self.config.registry.get(self.tools.active_tool()?)?;
        let collected: Vec<Vec2> = self
            .tools
            .points()
            .iter()
            .map(|p| self.mapper.data_to_screen(*p, &self.scales))
            .collect();
        let screen = constrain_point(spec, &collected, input.position, input.modifiers.shift);
        let continuous = spec.is_continuous();
        let point = self.mapper.screen_to_data(screen, &self.scales, continuous);

        // Constrained points keep their geometry
        if continuous || screen != input.position {
            return Some(point);
        }
        let magnet = if input.modifiers.alt {
            MagnetMode::Strong
        } else {
            self.config.settings.magnet_mode
        };
        Some(self.mapper.snap_to_ohlc(point, self.candles.candles(), &self.scales, magnet))
    }

    /// Append a freehand sample, dropping ones too close to the last point.
    fn sample_freehand(&mut self, input: PointerInput) -> bool {
        let Some(last) = self.tools.points().last() else {
            return false;
        };
        let last = self.mapper.data_to_screen(*last, &self.scales);
        if last.distance(input.position) < self.config.settings.freehand_min_spacing {
            return false;
        }
        match self.pointer_to_data(&input) {
            Some(point) => self.push_point(point).is_some(),
            None => false,
        }
    }

    fn hover(&mut self, input: PointerInput) -> bool {
        if self.tools.is_armed() {
            self.set_cursor(CursorHint::Crosshair);
            return false;
        }
        let top = self.find_drawings_at_point(input.position).first().map(|hit| hit.id);

        let mut selected = false;
        if input.modifiers.ctrl
            && self.config.settings.ctrl_hover_select
            && !self.config.settings.eraser_mode
            && let Some(id) = top
            && !self.selection.contains(id)
        {
            selected = self.select_drawing(id, true);
        }

        let cursor = if self.handle_at(input.position).is_some() {
            CursorHint::Grab
        } else if top.is_some() {
            CursorHint::Pointer
        } else {
            CursorHint::Default
        };
        self.set_cursor(cursor);
        selected
    }

    fn finish_marquee(&mut self, marquee: Marquee) {
        self.emit(EngineEvent::FullRedrawRequested);
        if !marquee.is_drag(MIN_MARQUEE_DRAG) {
            return;
        }
        let ids = marquee.drawings_in(&self.drawings, self.mapper.as_ref(), &self.scales);
        debug!("Marquee covers {} drawings", ids.len());
        for id in ids {
            if !self.selection.contains(id) {
                self.select_drawing(id, true);
            }
        }
    }
}
