//! Rectangle (marquee) selection.

use bevy::prelude::*;

use crate::drawing::{Drawing, DrawingId};
use crate::geometry::rects_overlap;
use crate::mapper::{CoordinateMapper, Scales};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marquee {
    pub origin: Vec2,
    pub current: Vec2,
}

impl Marquee {
    pub fn new(origin: Vec2) -> Self {
        Self {
            origin,
            current: origin,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_corners(self.origin, self.current)
    }

    /// Shorter drags are clicks, not selections
    pub fn is_drag(&self, min_distance: f32) -> bool {
        self.origin.distance(self.current) >= min_distance
    }

    /// Visible drawings whose bounding box overlaps the rectangle.
    pub fn drawings_in(&self, drawings: &[Drawing], mapper: &dyn CoordinateMapper, scales: &Scales) -> Vec<DrawingId> {
        let area = self.rect();
        drawings
            .iter()
            .filter(|d| d.is_renderable())
            .filter(|d| d.bounding_box(mapper, scales).is_some_and(|b| overlaps(area, b)))
            .map(Drawing::id)
            .collect()
    }
}

/// Strict overlap, except that zero-thickness boxes (horizontal or vertical
/// lines) still count when they cross the area.
fn overlaps(area: Rect, bounds: Rect) -> bool {
    let inflated = Rect::from_corners(bounds.min - Vec2::splat(0.5), bounds.max + Vec2::splat(0.5));
    rects_overlap(area, inflated)
}
