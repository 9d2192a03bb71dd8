//! Long and short position markers.
//!
//! Points are `[entry, stop, target]`. The entry point fixes the left edge;
//! stop and target share the right edge.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::drawing::{
    CustomHandle, CustomHandleDrag, DataPoint, Drawable, HandleDragContext, PointHandleDrag, RegionHit,
    ShapeContext,
};
use crate::render::{Element, ElementRole, ElementShape};

pub const ROLE_STOP: &str = "stop";
pub const ROLE_TARGET: &str = "target";
pub const ROLE_WIDTH: &str = "width";

/// Narrowest position in bars
const MIN_WIDTH_BARS: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionSide {
    Long,
    Short,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionShape {
    side: PositionSide,
}

impl PositionShape {
    pub fn long() -> Self {
        Self { side: PositionSide::Long }
    }

    pub fn short() -> Self {
        Self { side: PositionSide::Short }
    }

    pub fn side(&self) -> PositionSide {
        self.side
    }

    /// Whether `price` is a valid stop (below entry for longs, above for shorts)
    fn valid_stop(&self, entry: f64, price: f64) -> bool {
        match self.side {
            PositionSide::Long => price < entry,
            PositionSide::Short => price > entry,
        }
    }

    fn valid_target(&self, entry: f64, price: f64) -> bool {
        match self.side {
            PositionSide::Long => price > entry,
            PositionSide::Short => price < entry,
        }
    }

    fn zones(points: &[DataPoint], ctx: &ShapeContext<'_>) -> Option<(Rect, Rect)> {
        let [entry, stop, target] = match points {
            [e, s, t, ..] => [*e, *s, *t],
            _ => return None,
        };
        let e = ctx.to_screen(entry);
        let s = ctx.to_screen(stop);
        let t = ctx.to_screen(target);
        Some((
            Rect::from_corners(e, Vec2::new(s.x, s.y)),
            Rect::from_corners(e, Vec2::new(t.x, t.y)),
        ))
    }

    fn set_right_edge(points: &mut [DataPoint], x: f64) {
        let right = x.max(points[0].x + MIN_WIDTH_BARS);
        points[1].x = right;
        points[2].x = right;
    }

    fn set_price(&self, points: &mut [DataPoint], index: usize, price: f64) {
        let entry = points[0].y;
        let valid = match index {
            1 => self.valid_stop(entry, price),
            _ => self.valid_target(entry, price),
        };
        if valid {
            points[index].y = price;
        }
    }
}

impl Drawable for PositionShape {
    fn render(&self, points: &[DataPoint], ctx: &ShapeContext<'_>, _preview: bool) -> Vec<Element> {
        let Some((stop_zone, target_zone)) = Self::zones(points, ctx) else {
            return Vec::new();
        };
        let width = ctx.style.stroke_width;
        let entry_y = ctx.to_screen(points[0]).y;
        let (left, right) = (stop_zone.min.x, stop_zone.max.x);
        let stop_y = ctx.to_screen(points[1]).y;
        let target_y = ctx.to_screen(points[2]).y;

        let level = |y: f32| Element::line(Vec2::new(left, y), Vec2::new(right, y), width).with_role(ElementRole::Level);
        vec![
            Element::new(ElementShape::Rect(stop_zone), ElementRole::Fill, 0.0),
            Element::new(ElementShape::Rect(target_zone), ElementRole::Fill, 0.0),
            level(entry_y),
            level(stop_y),
            level(target_y),
        ]
    }

    fn clone_box(&self) -> Box<dyn Drawable> {
        Box::new(*self)
    }

    fn region(&self) -> Option<&dyn RegionHit> {
        Some(self)
    }

    fn point_handles(&mut self) -> Option<&mut dyn PointHandleDrag> {
        Some(self)
    }

    fn custom_handles(&self) -> Option<&dyn CustomHandleDrag> {
        Some(self)
    }

    fn custom_handles_mut(&mut self) -> Option<&mut dyn CustomHandleDrag> {
        Some(self)
    }
}

impl RegionHit for PositionShape {
    fn is_point_inside(&self, position: Vec2, points: &[DataPoint], ctx: &ShapeContext<'_>) -> bool {
        Self::zones(points, ctx).is_some_and(|(stop, target)| stop.contains(position) || target.contains(position))
    }
}

impl PointHandleDrag for PositionShape {
    /// Entry moves the left edge and entry price; stop and target handles
    /// move the right edge and their own price.
    fn on_point_handle_drag(
        &mut self,
        index: usize,
        ctx: &HandleDragContext<'_>,
        points: &mut Vec<DataPoint>,
    ) -> bool {
        if points.len() < 3 {
            return false;
        }
        let target = ctx.data_point;
        match index {
            0 => {
                let right = points[1].x;
                let entry = DataPoint::new(target.x.min(right - MIN_WIDTH_BARS), target.y);
                if self.valid_stop(entry.y, points[1].y) && self.valid_target(entry.y, points[2].y) {
                    points[0] = entry;
                }
            }
            1 | 2 => {
                Self::set_right_edge(points, target.x);
                self.set_price(points, index, target.y);
            }
            _ => return false,
        }
        true
    }
}

impl CustomHandleDrag for PositionShape {
    fn handles(&self, points: &[DataPoint], ctx: &ShapeContext<'_>) -> Vec<CustomHandle> {
        let [entry, stop, target] = match points {
            [e, s, t, ..] => [*e, *s, *t],
            _ => return Vec::new(),
        };
        let left = ctx.to_screen(entry).x;
        vec![
            CustomHandle {
                role: ROLE_STOP,
                position: Vec2::new(left, ctx.to_screen(stop).y),
            },
            CustomHandle {
                role: ROLE_TARGET,
                position: Vec2::new(left, ctx.to_screen(target).y),
            },
            CustomHandle {
                role: ROLE_WIDTH,
                position: Vec2::new(ctx.to_screen(stop).x, ctx.to_screen(entry).y),
            },
        ]
    }

    fn handle_custom_handle_drag(
        &mut self,
        role: &str,
        ctx: &HandleDragContext<'_>,
        points: &mut Vec<DataPoint>,
    ) -> bool {
        if points.len() < 3 {
            return false;
        }
        let target = ctx.data_point;
        match role {
            ROLE_STOP => self.set_price(points, 1, target.y),
            ROLE_TARGET => self.set_price(points, 2, target.y),
            ROLE_WIDTH => Self::set_right_edge(points, target.x),
            _ => return false,
        }
        true
    }
}
