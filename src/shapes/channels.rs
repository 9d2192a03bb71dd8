//! Three-point channels.

use bevy::prelude::*;

use super::fill_element;
use crate::drawing::{DataPoint, Drawable, ShapeContext};
use crate::render::{Element, ElementRole, ElementShape};

/// Baseline plus a parallel line through the third point, with a midline.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelChannel;

impl Drawable for ParallelChannel {
    fn render(&self, points: &[DataPoint], ctx: &ShapeContext<'_>, _preview: bool) -> Vec<Element> {
        let screen = ctx.project(points);
        let width = ctx.style.stroke_width;
        match screen.as_slice() {
            [a, b] => vec![Element::line(*a, *b, width)],
            [a, b, c, ..] => {
                let offset = *c - *a;
                let mut elements = Vec::with_capacity(4);
                elements.extend(fill_element(
                    ctx.style,
                    ElementShape::Polygon(vec![*a, *b, *b + offset, *a + offset]),
                ));
                elements.push(Element::line(*a, *b, width));
                elements.push(Element::line(*a + offset, *b + offset, width));
                elements.push(
                    Element::line(*a + offset / 2.0, *b + offset / 2.0, (width / 2.0).max(1.0))
                        .with_role(ElementRole::Level),
                );
                elements
            }
            _ => Vec::new(),
        }
    }

    fn clone_box(&self) -> Box<dyn Drawable> {
        Box::new(*self)
    }
}

/// Trend line plus a flat line at the third point's price.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatTopBottom;

impl Drawable for FlatTopBottom {
    fn render(&self, points: &[DataPoint], ctx: &ShapeContext<'_>, _preview: bool) -> Vec<Element> {
        let screen = ctx.project(points);
        let width = ctx.style.stroke_width;
        match screen.as_slice() {
            [a, b] => vec![Element::line(*a, *b, width)],
            [a, b, c, ..] => {
                let flat_a = Vec2::new(a.x, c.y);
                let flat_b = Vec2::new(b.x, c.y);
                let mut elements = Vec::with_capacity(3);
                elements.extend(fill_element(ctx.style, ElementShape::Polygon(vec![*a, *b, flat_b, flat_a])));
                elements.push(Element::line(*a, *b, width));
                elements.push(Element::line(flat_a, flat_b, width));
                elements
            }
            _ => Vec::new(),
        }
    }

    fn clone_box(&self) -> Box<dyn Drawable> {
        Box::new(*self)
    }
}

/// Trend line plus a second line starting at the third point with the
/// mirrored slope.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisjointChannel;

impl Drawable for DisjointChannel {
    fn render(&self, points: &[DataPoint], ctx: &ShapeContext<'_>, _preview: bool) -> Vec<Element> {
        let screen = ctx.project(points);
        let width = ctx.style.stroke_width;
        match screen.as_slice() {
            [a, b] => vec![Element::line(*a, *b, width)],
            [a, b, c, ..] => {
                let mirrored = Vec2::new(b.x, c.y - (b.y - a.y));
                let mut elements = Vec::with_capacity(3);
                elements.extend(fill_element(ctx.style, ElementShape::Polygon(vec![*a, *b, mirrored, *c])));
                elements.push(Element::line(*a, *b, width));
                elements.push(Element::line(*c, mirrored, width));
                elements
            }
            _ => Vec::new(),
        }
    }

    fn clone_box(&self) -> Box<dyn Drawable> {
        Box::new(*self)
    }
}
