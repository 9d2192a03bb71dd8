//! Single point handle drags.

use bevy::prelude::*;

use crate::common::Modifiers;
use crate::drawing::{Drawing, DrawingId, HandleDragContext};
use crate::geometry::snap_to_angle;
use crate::history::DrawingSnapshot;
use crate::mapper::{CoordinateMapper, Scales};

#[derive(Debug, Clone)]
pub struct HandleResize {
    pub id: DrawingId,
    pub index: usize,
    pub before: DrawingSnapshot,
    /// The tool participates in Shift angle snapping
    angle_snap: bool,
}

impl HandleResize {
    /// Start dragging `points[index]`. Returns `None` for an index the
    /// drawing does not have.
    pub fn begin(drawing: &mut Drawing, index: usize, angle_snap: bool) -> Option<Self> {
        if index >= drawing.points.len() {
            return None;
        }
        let before = drawing.to_record();
        if let Some(handler) = drawing.shape_mut().point_handles() {
            handler.begin_handle_drag();
        }
        Some(Self {
            id: drawing.id(),
            index,
            before,
            angle_snap,
        })
    }

    /// Point the segment is snapped around: the other point for two-point
    /// drawings, otherwise the previous one.
    fn snap_anchor(&self, drawing: &Drawing) -> Option<usize> {
        match (drawing.points.len(), self.index) {
            (2, i) => Some(1 - i),
            (_, 0) => Some(1),
            (_, i) => Some(i - 1),
        }
    }

    fn constrain(
        &self,
        drawing: &Drawing,
        pointer: Vec2,
        shift: bool,
        mapper: &dyn CoordinateMapper,
        scales: &Scales,
    ) -> Vec2 {
        if !(self.angle_snap && shift) {
            return pointer;
        }
        self.snap_anchor(drawing)
            .and_then(|i| drawing.points.get(i))
            .map_or(pointer, |anchor| snap_to_angle(mapper.data_to_screen(*anchor, scales), pointer))
    }

    /// Move the handle to `pointer`. The shape's own handler gets the first
    /// chance; otherwise `points[index]` takes the pointer position.
    pub fn update(
        &self,
        drawing: &mut Drawing,
        pointer: Vec2,
        modifiers: Modifiers,
        mapper: &dyn CoordinateMapper,
        scales: &Scales,
    ) -> bool {
        let screen_point = self.constrain(drawing, pointer, modifiers.shift, mapper, scales);
        let ctx = HandleDragContext {
            data_point: mapper.screen_to_data(screen_point, scales, true),
            screen_point,
            scales,
            mapper,
            shift_key: modifiers.shift,
            ctrl_key: modifiers.ctrl,
            point_index: Some(self.index),
        };

        let (shape, points) = drawing.shape_and_points();
        let handled = shape
            .point_handles()
            .is_some_and(|handler| handler.on_point_handle_drag(self.index, &ctx, points));
        if !handled {
            let Some(point) = points.get_mut(self.index) else {
                return false;
            };
            *point = ctx.data_point;
        }
        drawing.clear_group();
        true
    }

    pub fn end(&self, drawing: &mut Drawing) {
        if let Some(handler) = drawing.shape_mut().point_handles() {
            handler.end_handle_drag();
        }
    }
}
