//! Closed primitive shapes.

use bevy::prelude::*;

use super::fill_element;
use crate::drawing::{
    CustomHandle, CustomHandleDrag, DataPoint, Drawable, HandleDragContext, PointHandleDrag, ShapeContext,
};
use crate::render::{Element, ElementRole, ElementShape};

/// Corner with x from the second point and y from the first
pub const CORNER_X1_Y0: &str = "corner_x1_y0";
/// Corner with x from the first point and y from the second
pub const CORNER_X0_Y1: &str = "corner_x0_y1";

/// Axis-aligned box between two diagonal corners. The two corners not
/// backed by points are exposed as custom handles.
#[derive(Debug, Clone, Copy, Default)]
pub struct RectangleShape;

impl Drawable for RectangleShape {
    fn render(&self, points: &[DataPoint], ctx: &ShapeContext<'_>, _preview: bool) -> Vec<Element> {
        let [a, b] = match ctx.project(points).as_slice() {
            [a, b, ..] => [*a, *b],
            _ => return Vec::new(),
        };
        let rect = Rect::from_corners(a, b);
        let mut elements = Vec::with_capacity(2);
        elements.extend(fill_element(ctx.style, ElementShape::Rect(rect)));
        elements.push(Element::new(ElementShape::Rect(rect), ElementRole::Stroke, ctx.style.stroke_width));
        elements
    }

    fn clone_box(&self) -> Box<dyn Drawable> {
        Box::new(*self)
    }

    fn custom_handles(&self) -> Option<&dyn CustomHandleDrag> {
        Some(self)
    }

    fn custom_handles_mut(&mut self) -> Option<&mut dyn CustomHandleDrag> {
        Some(self)
    }
}

impl CustomHandleDrag for RectangleShape {
    fn handles(&self, points: &[DataPoint], ctx: &ShapeContext<'_>) -> Vec<CustomHandle> {
        let [a, b] = match ctx.project(points).as_slice() {
            [a, b, ..] => [*a, *b],
            _ => return Vec::new(),
        };
        vec![
            CustomHandle {
                role: CORNER_X1_Y0,
                position: Vec2::new(b.x, a.y),
            },
            CustomHandle {
                role: CORNER_X0_Y1,
                position: Vec2::new(a.x, b.y),
            },
        ]
    }

    fn handle_custom_handle_drag(
        &mut self,
        role: &str,
        ctx: &HandleDragContext<'_>,
        points: &mut Vec<DataPoint>,
    ) -> bool {
        if points.len() < 2 {
            return false;
        }
        let target = ctx.data_point;
        match role {
            CORNER_X1_Y0 => {
                points[1].x = target.x;
                points[0].y = target.y;
                true
            }
            CORNER_X0_Y1 => {
                points[0].x = target.x;
                points[1].y = target.y;
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TriangleShape;

impl Drawable for TriangleShape {
    fn render(&self, points: &[DataPoint], ctx: &ShapeContext<'_>, _preview: bool) -> Vec<Element> {
        let screen = ctx.project(points);
        let width = ctx.style.stroke_width;
        match screen.len() {
            0 => Vec::new(),
            1 | 2 => vec![Element::new(ElementShape::Path(screen), ElementRole::Stroke, width)],
            _ => {
                let corners = screen[..3].to_vec();
                let mut elements = Vec::with_capacity(2);
                elements.extend(fill_element(ctx.style, ElementShape::Polygon(corners.clone())));
                elements.push(Element::new(ElementShape::Polygon(corners), ElementRole::Stroke, width));
                elements
            }
        }
    }

    fn clone_box(&self) -> Box<dyn Drawable> {
        Box::new(*self)
    }
}

/// Circle from a centre point and a rim point. Dragging the centre handle
/// moves the whole circle.
#[derive(Debug, Clone, Copy, Default)]
pub struct CircleShape;

impl Drawable for CircleShape {
    fn render(&self, points: &[DataPoint], ctx: &ShapeContext<'_>, _preview: bool) -> Vec<Element> {
        let [center, rim] = match ctx.project(points).as_slice() {
            [c, r, ..] => [*c, *r],
            _ => return Vec::new(),
        };
        let radius = center.distance(rim);
        let mut elements = Vec::with_capacity(2);
        elements.extend(fill_element(ctx.style, ElementShape::Circle { center, radius }));
        elements.push(Element::new(
            ElementShape::Circle { center, radius },
            ElementRole::Stroke,
            ctx.style.stroke_width,
        ));
        elements
    }

    fn clone_box(&self) -> Box<dyn Drawable> {
        Box::new(*self)
    }

    fn point_handles(&mut self) -> Option<&mut dyn PointHandleDrag> {
        Some(self)
    }
}

impl PointHandleDrag for CircleShape {
    fn on_point_handle_drag(
        &mut self,
        index: usize,
        ctx: &HandleDragContext<'_>,
        points: &mut Vec<DataPoint>,
    ) -> bool {
        if index != 0 || points.len() < 2 {
            return false;
        }
        let delta = ctx.data_point - points[0];
        points[0] = ctx.data_point;
        points[1] = points[1] + delta;
        true
    }
}

/// Ellipse inscribed in the box between two corners.
#[derive(Debug, Clone, Copy, Default)]
pub struct EllipseShape;

impl Drawable for EllipseShape {
    fn render(&self, points: &[DataPoint], ctx: &ShapeContext<'_>, _preview: bool) -> Vec<Element> {
        let [a, b] = match ctx.project(points).as_slice() {
            [a, b, ..] => [*a, *b],
            _ => return Vec::new(),
        };
        let center = (a + b) / 2.0;
        let radii = (b - a).abs() / 2.0;
        let mut elements = Vec::with_capacity(2);
        elements.extend(fill_element(ctx.style, ElementShape::Ellipse { center, radii }));
        elements.push(Element::new(
            ElementShape::Ellipse { center, radii },
            ElementRole::Stroke,
            ctx.style.stroke_width,
        ));
        elements
    }

    fn clone_box(&self) -> Box<dyn Drawable> {
        Box::new(*self)
    }
}
