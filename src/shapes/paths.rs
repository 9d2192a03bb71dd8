//! Multi-point strokes.

use bevy::prelude::*;

use crate::drawing::{DataPoint, Drawable, ShapeContext};
use crate::geometry::EPS_LEN;
use crate::render::{Element, ElementRole, ElementShape};

const ARROW_HEAD_LEN: f32 = 10.0;

/// Point-by-point polyline, optionally with an arrow head on the last segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolylineShape {
    arrow_head: bool,
}

impl PolylineShape {
    pub fn open() -> Self {
        Self { arrow_head: false }
    }

    pub fn arrowed() -> Self {
        Self { arrow_head: true }
    }
}

impl Drawable for PolylineShape {
    fn render(&self, points: &[DataPoint], ctx: &ShapeContext<'_>, _preview: bool) -> Vec<Element> {
        let screen = ctx.project(points);
        if screen.is_empty() {
            return Vec::new();
        }
        let width = ctx.style.stroke_width;
        let mut elements = Vec::with_capacity(3);

        if self.arrow_head
            && let [.., from, tip] = screen.as_slice()
        {
            let dir = (*tip - *from).normalize_or_zero();
            if dir.length_squared() > EPS_LEN {
                let back = -dir * ARROW_HEAD_LEN;
                let side = Vec2::new(-dir.y, dir.x) * ARROW_HEAD_LEN * 0.5;
                elements.push(Element::line(*tip, *tip + back + side, width));
                elements.push(Element::line(*tip, *tip + back - side, width));
            }
        }

        elements.insert(0, Element::new(ElementShape::Path(screen), ElementRole::Stroke, width));
        elements
    }

    fn clone_box(&self) -> Box<dyn Drawable> {
        Box::new(*self)
    }
}

/// Freehand stroke. The highlighter draws a much wider stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreehandShape {
    highlighter: bool,
}

const HIGHLIGHTER_WIDTH_FACTOR: f32 = 4.0;

impl FreehandShape {
    pub fn brush() -> Self {
        Self { highlighter: false }
    }

    pub fn highlighter() -> Self {
        Self { highlighter: true }
    }
}

impl Drawable for FreehandShape {
    fn render(&self, points: &[DataPoint], ctx: &ShapeContext<'_>, _preview: bool) -> Vec<Element> {
        let screen = ctx.project(points);
        if screen.is_empty() {
            return Vec::new();
        }
        let width = if self.highlighter {
            ctx.style.stroke_width * HIGHLIGHTER_WIDTH_FACTOR
        } else {
            ctx.style.stroke_width
        };
        vec![Element::new(ElementShape::Path(screen), ElementRole::Stroke, width)]
    }

    fn clone_box(&self) -> Box<dyn Drawable> {
        Box::new(*self)
    }
}
