//! Stacked-line detection: many strokes through nearly the same point.

use bevy::prelude::*;

use super::pick::element_distance;
use super::HitContext;
use crate::drawing::{Drawing, DrawingId};
use crate::render::{ElementRole, ElementShape, RenderedGroup};
use crate::tools::ToolFamily;

/// One stroked element under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineHit {
    pub id: DrawingId,
    pub role: ElementRole,
    /// Position of the element within its drawing's group
    pub element_index: usize,
    pub distance: f32,
    /// Screen y of the element near the pointer, for top-to-bottom ordering
    pub screen_y: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StackedLines {
    pub is_stacked: bool,
    pub count: usize,
    pub lines: Vec<LineHit>,
    /// Owning drawings, deduplicated, top to bottom
    pub drawings: Vec<DrawingId>,
}

fn nearest_y(shape: &ElementShape, point: Vec2) -> f32 {
    match shape {
        ElementShape::Line { a, b } => {
            let d = *b - *a;
            let len_sq = d.length_squared();
            if len_sq <= f32::EPSILON {
                return a.y;
            }
            let t = ((point - *a).dot(d) / len_sq).clamp(0.0, 1.0);
            a.y + d.y * t
        }
        ElementShape::Path(points) | ElementShape::Polygon(points) => points
            .iter()
            .min_by(|p, q| p.distance_squared(point).total_cmp(&q.distance_squared(point)))
            .map_or(point.y, |p| p.y),
        _ => point.y,
    }
}

/// Straight and polyline strokes. Rectangle, circle and ellipse borders
/// never count toward a stack.
fn is_line_stroke(shape: &ElementShape) -> bool {
    matches!(shape, ElementShape::Line { .. } | ElementShape::Path(_))
}

/// Every line stroke near `point`, across all visible drawings.
pub fn find_lines_at_point(drawings: &[Drawing], point: Vec2, ctx: &HitContext<'_>) -> Vec<LineHit> {
    let mut lines = Vec::new();
    for drawing in drawings.iter().filter(|d| d.is_renderable()) {
        let built;
        let group: &RenderedGroup = match drawing.group() {
            Some(group) => group,
            None => {
                built = drawing.build_group(ctx.mapper, ctx.scales, false, false);
                &built
            }
        };
        for (element_index, element) in group.elements.iter().enumerate() {
            if !is_line_stroke(&element.shape) {
                continue;
            }
            if let Some(distance) = element_distance(element, point, ToolFamily::Line, ctx) {
                lines.push(LineHit {
                    id: drawing.id(),
                    role: element.role,
                    element_index,
                    distance,
                    screen_y: nearest_y(&element.shape, point),
                });
            }
        }
    }
    lines
}

/// Lines under `point`, flagged as stacked when there are more than `threshold`.
pub fn find_stacked_lines(drawings: &[Drawing], point: Vec2, threshold: usize, ctx: &HitContext<'_>) -> StackedLines {
    let lines = find_lines_at_point(drawings, point, ctx);

    let mut owners: Vec<(DrawingId, f32)> = Vec::new();
    for line in &lines {
        match owners.iter_mut().find(|(id, _)| *id == line.id) {
            Some((_, y)) => *y = y.min(line.screen_y),
            None => owners.push((line.id, line.screen_y)),
        }
    }
    owners.sort_by(|a, b| a.1.total_cmp(&b.1));

    StackedLines {
        is_stacked: lines.len() > threshold,
        count: lines.len(),
        drawings: owners.into_iter().map(|(id, _)| id).collect(),
        lines,
    }
}
