//! Closed-form distances from a point to the border of each primitive.

use bevy::prelude::*;

use super::{EPS_LEN, EPS_RADIUS};

/// Distance from `point` to the segment `a`-`b`, clamped to the endpoints.
pub fn point_to_line_distance(point: Vec2, a: Vec2, b: Vec2) -> f32 {
    let line_vec = b - a;
    let line_len_sq = line_vec.length_squared();

    if line_len_sq < EPS_LEN {
        // Segment is essentially a point
        return point.distance(a);
    }

    // Project point onto line, clamped to segment
    let t = ((point - a).dot(line_vec) / line_len_sq).clamp(0.0, 1.0);
    let projection = a + line_vec * t;

    point.distance(projection)
}

/// Minimum distance to the edges of an open or closed chain of points.
///
/// Returns `f32::INFINITY` for an empty chain.
pub fn polyline_distance(point: Vec2, points: &[Vec2], closed: bool) -> f32 {
    match points {
        [] => f32::INFINITY,
        [only] => point.distance(*only),
        _ => {
            let mut best = points
                .windows(2)
                .map(|w| point_to_line_distance(point, w[0], w[1]))
                .fold(f32::INFINITY, f32::min);
            if closed && points.len() > 2 {
                let closing = point_to_line_distance(point, points[points.len() - 1], points[0]);
                best = best.min(closing);
            }
            best
        }
    }
}

/// Distance to the nearest edge of an axis-aligned rectangle.
pub fn rect_border_distance(point: Vec2, rect: Rect) -> f32 {
    let corners = [
        rect.min,
        Vec2::new(rect.max.x, rect.min.y),
        rect.max,
        Vec2::new(rect.min.x, rect.max.y),
    ];
    polyline_distance(point, &corners, true)
}

/// `|distance_from_center - radius|`
pub fn circle_border_distance(point: Vec2, center: Vec2, radius: f32) -> f32 {
    (point.distance(center) - radius.max(0.0)).abs()
}

/// Approximate distance to an ellipse border.
///
/// Measured in the ellipse's normalized space (where it is a unit circle) and
/// scaled back by the smaller radius, so it matches the circle case when
/// both radii agree.
pub fn ellipse_border_distance(point: Vec2, center: Vec2, radii: Vec2) -> f32 {
    let rx = radii.x.abs().max(EPS_RADIUS);
    let ry = radii.y.abs().max(EPS_RADIUS);
    let offset = point - center;
    let normalized = Vec2::new(offset.x / rx, offset.y / ry).length();
    (normalized - 1.0).abs() * rx.min(ry)
}

/// Even-odd point in polygon test.
pub fn point_in_polygon(point: Vec2, polygon: &[Vec2]) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (pi, pj) = (polygon[i], polygon[j]);
        if (pi.y > point.y) != (pj.y > point.y) {
            let x_cross = (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x;
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Hit tolerance for a stroke: `max(configured, stroke_width / 2 + 0.5)`.
///
/// When the primitive has a radius (circles, ellipses, small rects) the
/// tolerance is clamped to it, so a tiny shape's whole interior never counts
/// as "near the border".
pub fn effective_tolerance(configured: f32, stroke_width: f32, radius_cap: Option<f32>) -> f32 {
    let tolerance = configured.max(stroke_width / 2.0 + 0.5);
    match radius_cap {
        Some(cap) => tolerance.min(cap.max(EPS_RADIUS)),
        None => tolerance,
    }
}

/// Strict rectangle-rectangle overlap on both axes.
pub fn rects_overlap(a: Rect, b: Rect) -> bool {
    a.min.x < b.max.x && a.max.x > b.min.x && a.min.y < b.max.y && a.max.y > b.min.y
}
