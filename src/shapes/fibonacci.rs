//! Fibonacci retracement.

use bevy::prelude::*;

use crate::drawing::{DataPoint, Drawable, ShapeContext};
use crate::render::{Element, ElementRole};

/// Retracement ratios drawn as level lines
pub const FIB_LEVELS: [f64; 7] = [0.0, 0.236, 0.382, 0.5, 0.618, 0.786, 1.0];

/// Level lines between the two anchor bars, 0 at the second point and 1 at
/// the first, plus a thin trend line joining the anchors.
#[derive(Debug, Clone, Copy, Default)]
pub struct FibRetracement;

impl FibRetracement {
    pub fn level_price(start: DataPoint, end: DataPoint, level: f64) -> f64 {
        end.y + (start.y - end.y) * level
    }
}

impl Drawable for FibRetracement {
    fn render(&self, points: &[DataPoint], ctx: &ShapeContext<'_>, _preview: bool) -> Vec<Element> {
        let [start, end] = match points {
            [s, e, ..] => [*s, *e],
            _ => return Vec::new(),
        };
        let a = ctx.to_screen(start);
        let b = ctx.to_screen(end);
        let (left, right) = (a.x.min(b.x), a.x.max(b.x));

        let mut elements = Vec::with_capacity(FIB_LEVELS.len() + 1);
        elements.push(Element::line(a, b, 1.0));
        for level in FIB_LEVELS {
            let y = ctx.to_screen(DataPoint::new(start.x, Self::level_price(start, end, level))).y;
            elements.push(
                Element::line(Vec2::new(left, y), Vec2::new(right, y), ctx.style.stroke_width)
                    .with_role(ElementRole::Level),
            );
        }
        elements
    }

    fn clone_box(&self) -> Box<dyn Drawable> {
        Box::new(*self)
    }
}
