//! Harmonic XABCD pattern.

use bevy::prelude::*;

use crate::drawing::{DataPoint, Drawable, RegionHit, ShapeContext};
use crate::geometry::{effective_tolerance, point_in_polygon, polyline_distance};
use crate::render::{Element, ElementRole, ElementShape};

/// Hits on the legs use the default stroke tolerance
const LEG_TOLERANCE: f32 = 3.0;

/// Five-point zig-zag with the XAB and BCD triangles shaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct XabcdPattern;

impl XabcdPattern {
    fn triangles(screen: &[Vec2]) -> Vec<Vec<Vec2>> {
        let mut triangles = Vec::with_capacity(2);
        if screen.len() >= 3 {
            triangles.push(screen[0..3].to_vec());
        }
        if screen.len() >= 5 {
            triangles.push(screen[2..5].to_vec());
        }
        triangles
    }
}

impl Drawable for XabcdPattern {
    fn render(&self, points: &[DataPoint], ctx: &ShapeContext<'_>, _preview: bool) -> Vec<Element> {
        let screen = ctx.project(points);
        if screen.is_empty() {
            return Vec::new();
        }
        let mut elements: Vec<Element> = Self::triangles(&screen)
            .into_iter()
            .map(|tri| Element::new(ElementShape::Polygon(tri), ElementRole::Fill, 0.0))
            .collect();
        elements.push(Element::new(
            ElementShape::Path(screen),
            ElementRole::Stroke,
            ctx.style.stroke_width,
        ));
        elements
    }

    fn clone_box(&self) -> Box<dyn Drawable> {
        Box::new(*self)
    }

    fn region(&self) -> Option<&dyn RegionHit> {
        Some(self)
    }
}

impl RegionHit for XabcdPattern {
    fn is_point_inside(&self, position: Vec2, points: &[DataPoint], ctx: &ShapeContext<'_>) -> bool {
        let screen = ctx.project(points);
        if Self::triangles(&screen).iter().any(|tri| point_in_polygon(position, tri)) {
            return true;
        }
        let tolerance = effective_tolerance(LEG_TOLERANCE, ctx.style.stroke_width, None);
        polyline_distance(position, &screen, false) <= tolerance
    }
}
