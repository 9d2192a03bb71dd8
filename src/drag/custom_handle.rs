//! Role-based handle drags. The role means nothing to the engine; the
//! shape's handler decides what it moves.

use bevy::prelude::*;

use crate::common::Modifiers;
use crate::drawing::{Drawing, DrawingId, HandleDragContext};
use crate::history::DrawingSnapshot;
use crate::mapper::{CoordinateMapper, Scales};

#[derive(Debug, Clone)]
pub struct CustomHandleResize {
    pub id: DrawingId,
    pub role: &'static str,
    pub before: DrawingSnapshot,
}

impl CustomHandleResize {
    /// Returns `None` if the drawing has no custom handles.
    pub fn begin(drawing: &Drawing, role: &'static str) -> Option<Self> {
        drawing.shape().custom_handles()?;
        Some(Self {
            id: drawing.id(),
            role,
            before: drawing.to_record(),
        })
    }

    pub fn update(
        &self,
        drawing: &mut Drawing,
        pointer: Vec2,
        modifiers: Modifiers,
        mapper: &dyn CoordinateMapper,
        scales: &Scales,
    ) -> bool {
        let ctx = HandleDragContext {
            data_point: mapper.screen_to_data(pointer, scales, true),
            screen_point: pointer,
            scales,
            mapper,
            shift_key: modifiers.shift,
            ctrl_key: modifiers.ctrl,
            point_index: None,
        };
        let (shape, points) = drawing.shape_and_points();
        let handled = shape
            .custom_handles_mut()
            .is_some_and(|handler| handler.handle_custom_handle_drag(self.role, &ctx, points));
        if handled {
            drawing.clear_group();
        }
        handled
    }
}
