//! Polymorphic shape contract.
//!
//! Every tool type implements [`Drawable`]. Optional behaviour is expressed
//! as separate capability traits; a shape advertises one by returning
//! `Some(self)` from the matching accessor, so the engine asks the type
//! system instead of probing for methods.

use std::fmt;

use bevy::prelude::*;
use serde_json::Value;

use super::{DataPoint, Style};
use crate::error::EngineResult;
use crate::mapper::{CoordinateMapper, Scales};
use crate::render::Element;

/// What a shape needs to turn data points into screen geometry.
pub struct ShapeContext<'a> {
    pub mapper: &'a dyn CoordinateMapper,
    pub scales: &'a Scales,
    pub style: &'a Style,
}

impl ShapeContext<'_> {
    pub fn to_screen(&self, point: DataPoint) -> Vec2 {
        self.mapper.data_to_screen(point, self.scales)
    }

    /// Screen positions of all points, in order
    pub fn project(&self, points: &[DataPoint]) -> Vec<Vec2> {
        points.iter().map(|p| self.to_screen(*p)).collect()
    }

    /// Pixel position back to data space without bar rounding
    pub fn to_data(&self, position: Vec2) -> DataPoint {
        self.mapper.screen_to_data(position, self.scales, true)
    }
}

/// Context handed to handle-drag handlers. The engine does not interpret
/// roles; it packages the pointer state and lets the shape decide.
pub struct HandleDragContext<'a> {
    pub data_point: DataPoint,
    pub screen_point: Vec2,
    pub scales: &'a Scales,
    pub mapper: &'a dyn CoordinateMapper,
    pub shift_key: bool,
    pub ctrl_key: bool,
    /// Point index for single-point handles, `None` for custom roles
    pub point_index: Option<usize>,
}

impl HandleDragContext<'_> {
    pub fn to_screen(&self, point: DataPoint) -> Vec2 {
        self.mapper.data_to_screen(point, self.scales)
    }

    pub fn to_data(&self, position: Vec2) -> DataPoint {
        self.mapper.screen_to_data(position, self.scales, true)
    }
}

/// A role-tagged handle a shape exposes besides its point handles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CustomHandle {
    pub role: &'static str,
    pub position: Vec2,
}

/// Core shape behaviour. Only the shape itself builds its rendered elements.
pub trait Drawable: fmt::Debug + Send + Sync {
    /// Build screen elements for `points`. `preview` is set while the shape
    /// is still being placed.
    fn render(&self, points: &[DataPoint], ctx: &ShapeContext<'_>, preview: bool) -> Vec<Element>;

    /// Shape-specific state beyond points and style, persisted with the drawing.
    fn payload(&self) -> Value {
        Value::Null
    }

    fn restore_payload(&mut self, _payload: &Value) -> EngineResult<()> {
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn Drawable>;

    fn region(&self) -> Option<&dyn RegionHit> {
        None
    }

    fn point_handles(&mut self) -> Option<&mut dyn PointHandleDrag> {
        None
    }

    fn custom_handles(&self) -> Option<&dyn CustomHandleDrag> {
        None
    }

    fn custom_handles_mut(&mut self) -> Option<&mut dyn CustomHandleDrag> {
        None
    }

    fn content_holder(&self) -> Option<&dyn ContentHolder> {
        None
    }

    fn content_holder_mut(&mut self) -> Option<&mut dyn ContentHolder> {
        None
    }
}

impl Clone for Box<dyn Drawable> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Shapes hit-tested by containment rather than stroke distance.
pub trait RegionHit {
    fn is_point_inside(&self, position: Vec2, points: &[DataPoint], ctx: &ShapeContext<'_>) -> bool;
}

/// Shapes that interpret single-point handle drags themselves.
pub trait PointHandleDrag {
    /// Returns `true` if the drag was handled; otherwise the engine moves
    /// `points[index]` to the pointer.
    fn on_point_handle_drag(
        &mut self,
        index: usize,
        ctx: &HandleDragContext<'_>,
        points: &mut Vec<DataPoint>,
    ) -> bool;

    fn begin_handle_drag(&mut self) {}

    fn end_handle_drag(&mut self) {}
}

/// Shapes parameterized by more than their point coordinates.
pub trait CustomHandleDrag {
    fn handles(&self, points: &[DataPoint], ctx: &ShapeContext<'_>) -> Vec<CustomHandle>;

    fn handle_custom_handle_drag(
        &mut self,
        role: &str,
        ctx: &HandleDragContext<'_>,
        points: &mut Vec<DataPoint>,
    ) -> bool;
}

/// Shapes carrying user content (text, image source, sticker glyph).
pub trait ContentHolder {
    fn content(&self) -> Option<&str>;

    fn set_content(&mut self, content: &str);

    fn has_content(&self) -> bool {
        self.content().is_some_and(|c| !c.trim().is_empty())
    }
}
