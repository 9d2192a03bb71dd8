//! Angle snapping and other point constraints in screen space.

use std::f32::consts::FRAC_PI_4;

use bevy::prelude::*;

use super::EPS_LEN;

/// Angle snap increment (45 degrees)
pub const ANGLE_SNAP_STEP: f32 = FRAC_PI_4;

/// Snap `target` so the segment from `reference` lies on the nearest 45° ray,
/// keeping the segment length.
pub fn snap_to_angle(reference: Vec2, target: Vec2) -> Vec2 {
    let offset = target - reference;
    let distance = offset.length();
    if distance < EPS_LEN {
        return target;
    }

    let angle = offset.y.atan2(offset.x);
    let snapped = (angle / ANGLE_SNAP_STEP).round() * ANGLE_SNAP_STEP;
    reference + Vec2::new(snapped.cos(), snapped.sin()) * distance
}

/// Place `pointer` on the line through `p0` perpendicular to `p0`-`p1`.
///
/// The free coordinate is the signed distance of the pointer's offset from
/// `p0` along the perpendicular unit vector. A degenerate baseline leaves the
/// pointer unchanged.
pub fn project_onto_perpendicular(p0: Vec2, p1: Vec2, pointer: Vec2) -> Vec2 {
    let base = p1 - p0;
    let len = base.length();
    if len < EPS_LEN {
        return pointer;
    }
    let dir = base / len;
    let perp = Vec2::new(-dir.y, dir.x);
    let signed = (pointer - p0).dot(perp);
    p0 + perp * signed
}

/// Extend the segment `a`-`b` to the edges of `bounds`.
///
/// `extend_start` pushes `a` backwards, `extend_end` pushes `b` forwards.
/// Lines that miss `bounds` entirely are returned unchanged.
pub fn extend_line(a: Vec2, b: Vec2, bounds: Rect, extend_start: bool, extend_end: bool) -> (Vec2, Vec2) {
    let d = b - a;
    if d.length_squared() < EPS_LEN {
        return (a, b);
    }

    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;
    for (origin, delta, lo, hi) in [
        (a.x, d.x, bounds.min.x, bounds.max.x),
        (a.y, d.y, bounds.min.y, bounds.max.y),
    ] {
        if delta.abs() < EPS_LEN {
            continue;
        }
        let t1 = (lo - origin) / delta;
        let t2 = (hi - origin) / delta;
        t_min = t_min.max(t1.min(t2));
        t_max = t_max.min(t1.max(t2));
    }

    if !t_min.is_finite() || !t_max.is_finite() || t_min > t_max {
        return (a, b);
    }

    let start = if extend_start && t_min < 0.0 { a + d * t_min } else { a };
    let end = if extend_end && t_max > 1.0 { a + d * t_max } else { b };
    (start, end)
}
