//! Straight-line tools.

use bevy::prelude::*;

use crate::drawing::{DataPoint, Drawable, ShapeContext};
use crate::geometry::{extend_line, EPS_LEN};
use crate::render::{Element, ElementRole, ElementShape};

/// Two-point line, optionally extended to the pane edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineShape {
    extend_start: bool,
    extend_end: bool,
}

impl LineShape {
    pub fn segment() -> Self {
        Self {
            extend_start: false,
            extend_end: false,
        }
    }

    pub fn ray() -> Self {
        Self {
            extend_start: false,
            extend_end: true,
        }
    }

    pub fn extended() -> Self {
        Self {
            extend_start: true,
            extend_end: true,
        }
    }
}

impl Drawable for LineShape {
    fn render(&self, points: &[DataPoint], ctx: &ShapeContext<'_>, _preview: bool) -> Vec<Element> {
        let [a, b] = match ctx.project(points).as_slice() {
            [a, b, ..] => [*a, *b],
            _ => return Vec::new(),
        };
        let (a, b) = extend_line(a, b, ctx.scales.bounds(), self.extend_start, self.extend_end);
        vec![Element::line(a, b, ctx.style.stroke_width)]
    }

    fn clone_box(&self) -> Box<dyn Drawable> {
        Box::new(*self)
    }
}

/// Full-width line at one price.
#[derive(Debug, Clone, Copy, Default)]
pub struct HorizontalLine;

impl Drawable for HorizontalLine {
    fn render(&self, points: &[DataPoint], ctx: &ShapeContext<'_>, _preview: bool) -> Vec<Element> {
        let Some(point) = points.first() else {
            return Vec::new();
        };
        let y = ctx.to_screen(*point).y;
        vec![Element::line(
            Vec2::new(0.0, y),
            Vec2::new(ctx.scales.width, y),
            ctx.style.stroke_width,
        )]
    }

    fn clone_box(&self) -> Box<dyn Drawable> {
        Box::new(*self)
    }
}

/// Full-height line at one bar.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerticalLine;

impl Drawable for VerticalLine {
    fn render(&self, points: &[DataPoint], ctx: &ShapeContext<'_>, _preview: bool) -> Vec<Element> {
        let Some(point) = points.first() else {
            return Vec::new();
        };
        let x = ctx.to_screen(*point).x;
        vec![Element::line(
            Vec2::new(x, 0.0),
            Vec2::new(x, ctx.scales.height),
            ctx.style.stroke_width,
        )]
    }

    fn clone_box(&self) -> Box<dyn Drawable> {
        Box::new(*self)
    }
}

/// Measuring line with a label box at its end.
#[derive(Debug, Clone, Copy, Default)]
pub struct RulerShape;

const RULER_LABEL_SIZE: Vec2 = Vec2::new(90.0, 36.0);

impl Drawable for RulerShape {
    fn render(&self, points: &[DataPoint], ctx: &ShapeContext<'_>, _preview: bool) -> Vec<Element> {
        let [a, b] = match ctx.project(points).as_slice() {
            [a, b, ..] => [*a, *b],
            _ => return Vec::new(),
        };
        let label = Rect::from_corners(b + Vec2::new(8.0, 8.0), b + Vec2::new(8.0, 8.0) + RULER_LABEL_SIZE);
        vec![
            Element::line(a, b, ctx.style.stroke_width),
            Element::new(ElementShape::Region(label), ElementRole::Label, 0.0),
        ]
    }

    fn clone_box(&self) -> Box<dyn Drawable> {
        Box::new(*self)
    }
}

/// Filled arrow from the first point to the second.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrowShape;

impl ArrowShape {
    /// Closed outline of shaft plus head
    pub fn outline(a: Vec2, b: Vec2, stroke_width: f32) -> Vec<Vec2> {
        let along = b - a;
        let length = along.length();
        if length < EPS_LEN {
            return Vec::new();
        }
        let dir = along / length;
        let perp = Vec2::new(-dir.y, dir.x);

        let head_len = (12.0 + stroke_width * 2.0).min(length * 0.5);
        let head_half = head_len * 0.6;
        let shaft_half = (stroke_width / 2.0).max(1.0);
        let base = b - dir * head_len;

        vec![
            a + perp * shaft_half,
            base + perp * shaft_half,
            base + perp * head_half,
            b,
            base - perp * head_half,
            base - perp * shaft_half,
            a - perp * shaft_half,
        ]
    }
}

impl Drawable for ArrowShape {
    fn render(&self, points: &[DataPoint], ctx: &ShapeContext<'_>, _preview: bool) -> Vec<Element> {
        let [a, b] = match ctx.project(points).as_slice() {
            [a, b, ..] => [*a, *b],
            _ => return Vec::new(),
        };
        let outline = Self::outline(a, b, ctx.style.stroke_width);
        if outline.is_empty() {
            return vec![Element::line(a, b, ctx.style.stroke_width)];
        }
        vec![Element::new(
            ElementShape::Polygon(outline),
            ElementRole::Stroke,
            1.0,
        )]
    }

    fn clone_box(&self) -> Box<dyn Drawable> {
        Box::new(*self)
    }
}
