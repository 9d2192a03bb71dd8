//! Drawing-level hit testing.

use std::cmp::Ordering;

use bevy::prelude::*;

use super::HitContext;
use crate::drawing::{Drawing, DrawingId};
use crate::geometry::{
    circle_border_distance, effective_tolerance, ellipse_border_distance, point_in_polygon,
    point_to_line_distance, polyline_distance, rect_border_distance,
};
use crate::render::{Element, ElementRole, ElementShape, RenderedGroup};
use crate::tools::ToolFamily;

/// Distances closer than this count as a tie
const DISTANCE_TIE_EPS: f32 = 1e-3;

/// One drawing under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub id: DrawingId,
    /// Render order position; higher is drawn on top
    pub z: usize,
    pub distance: f32,
    pub family: ToolFamily,
}

/// Distance from `point` to a stroked element, if within tolerance.
///
/// Fill, label, handle and region elements never hit.
pub fn element_distance(element: &Element, point: Vec2, family: ToolFamily, ctx: &HitContext<'_>) -> Option<f32> {
    if !matches!(element.role, ElementRole::Stroke | ElementRole::Level) {
        return None;
    }
    let configured = ctx.settings.hit_tolerance;
    let width = element.stroke_width;

    let (distance, tolerance) = match &element.shape {
        ElementShape::Line { a, b } => (
            point_to_line_distance(point, *a, *b),
            effective_tolerance(configured, width, None),
        ),
        ElementShape::Rect(rect) => {
            let half = rect.size() / 2.0;
            (
                rect_border_distance(point, *rect),
                effective_tolerance(configured, width, Some(half.x.max(half.y))),
            )
        }
        ElementShape::Circle { center, radius } => (
            circle_border_distance(point, *center, *radius),
            effective_tolerance(configured, width, Some(*radius)),
        ),
        ElementShape::Ellipse { center, radii } => (
            ellipse_border_distance(point, *center, *radii),
            effective_tolerance(configured, width, Some(radii.x.abs().min(radii.y.abs()))),
        ),
        ElementShape::Path(points) => {
            let tolerance = effective_tolerance(configured, width, None);
            let stroke = polyline_distance(point, points, false);
            if stroke <= tolerance {
                return Some(stroke);
            }
            if family == ToolFamily::Path {
                let vertex = points
                    .iter()
                    .map(|v| v.distance(point))
                    .fold(f32::INFINITY, f32::min);
                if vertex <= tolerance * ctx.settings.vertex_tolerance_factor {
                    return Some(vertex);
                }
            }
            return None;
        }
        ElementShape::Polygon(points) => {
            if family == ToolFamily::Arrow && point_in_polygon(point, points) {
                return Some(0.0);
            }
            (
                polyline_distance(point, points, true),
                effective_tolerance(configured, width, None),
            )
        }
        ElementShape::Region(_) => return None,
    };

    (distance.is_finite() && distance <= tolerance).then_some(distance)
}

/// Minimum hit distance across a drawing's elements, or `None` if the
/// pointer misses it. Hidden drawings never hit.
pub fn drawing_distance(drawing: &Drawing, point: Vec2, ctx: &HitContext<'_>) -> Option<f32> {
    if !drawing.is_renderable() {
        return None;
    }
    let family = ctx.registry.family_of(drawing.tool());

    if family == ToolFamily::Region
        && let Some(region) = drawing.shape().region()
    {
        let shape_ctx = drawing.shape_context(ctx.mapper, ctx.scales);
        return region
            .is_point_inside(point, &drawing.points, &shape_ctx)
            .then_some(0.0);
    }

    let built;
    let group: &RenderedGroup = match drawing.group() {
        Some(group) => group,
        None => {
            built = drawing.build_group(ctx.mapper, ctx.scales, false, false);
            &built
        }
    };

    let best = group
        .elements
        .iter()
        .filter_map(|e| element_distance(e, point, family, ctx))
        .reduce(f32::min)?;

    // Filled arrows count as a direct hit
    Some(if family == ToolFamily::Arrow { 0.0 } else { best })
}

/// Equal-distance ordering.
///
/// Two shapes, or a line against a circle/ellipse, prefer the lower z so
/// occluded objects stay grabbable. Otherwise lines beat shapes, and the
/// topmost drawing wins.
fn tie_break(a: &Hit, b: &Hit) -> Ordering {
    let both_shapes = a.family.is_shape() && b.family.is_shape();
    let line_vs_round = (a.family.is_line() && b.family.is_round()) || (a.family.is_round() && b.family.is_line());
    if both_shapes || line_vs_round {
        return a.z.cmp(&b.z);
    }
    match (a.family.is_line(), b.family.is_line()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => b.z.cmp(&a.z),
    }
}

fn compare_hits(a: &Hit, b: &Hit) -> Ordering {
    if (a.distance - b.distance).abs() > DISTANCE_TIE_EPS {
        return a.distance.total_cmp(&b.distance);
    }
    tie_break(a, b)
}

/// All drawings whose stroke is under `point`, nearest first.
///
/// The tie rules are not a total order across mixed families, so this uses
/// an insertion sort rather than `sort_by`, which may panic on inconsistent
/// comparators.
pub fn find_drawings_at_point(drawings: &[Drawing], point: Vec2, ctx: &HitContext<'_>) -> Vec<Hit> {
    let mut hits: Vec<Hit> = drawings
        .iter()
        .enumerate()
        .filter_map(|(z, drawing)| {
            drawing_distance(drawing, point, ctx).map(|distance| Hit {
                id: drawing.id(),
                z,
                distance,
                family: ctx.registry.family_of(drawing.tool()),
            })
        })
        .collect();

    for i in 1..hits.len() {
        let mut j = i;
        while j > 0 && compare_hits(&hits[j], &hits[j - 1]) == Ordering::Less {
            hits.swap(j, j - 1);
            j -= 1;
        }
    }
    hits
}
