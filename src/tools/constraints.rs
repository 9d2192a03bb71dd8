//! Point constraints applied to a point before it is added.

use bevy::prelude::*;

use super::registry::{PointConstraint, ToolSpec};
use crate::config::EngineSettings;
use crate::drawing::DataPoint;
use crate::geometry::{project_onto_perpendicular, snap_to_angle};
use crate::mapper::Scales;
use crate::shapes::PositionSide;

/// Constrain `pointer` given the screen positions already collected.
///
/// - Angle-snap tools with Shift held snap the segment from the previous
///   point to the nearest 45°.
/// - The third point of a parallel channel is projected onto the
///   perpendicular through point 0.
/// - The third point of flat-top/bottom and disjoint channels keeps point 0's X.
pub fn constrain_point(spec: &ToolSpec, collected: &[Vec2], pointer: Vec2, shift: bool) -> Vec2 {
    if collected.len() == 2 {
        match spec.constraint {
            PointConstraint::Perpendicular => {
                return project_onto_perpendicular(collected[0], collected[1], pointer);
            }
            PointConstraint::PinnedX => return Vec2::new(collected[0].x, pointer.y),
            PointConstraint::None => {}
        }
    }

    match collected.last() {
        Some(previous) if spec.angle_snap && shift => snap_to_angle(*previous, pointer),
        _ => pointer,
    }
}

/// Default entry / stop / target layout for a new position marker.
///
/// The stop sits `risk_percent` of the visible price range away from the
/// entry (or `price_increment` when the range is unusable) and the target
/// `reward_ratio` times further on the other side.
pub fn synthesize_position(
    entry: DataPoint,
    side: PositionSide,
    scales: &Scales,
    settings: &EngineSettings,
) -> [DataPoint; 3] {
    let mut offset = (scales.price_high - scales.price_low).abs() * settings.risk_percent;
    if !offset.is_finite() || offset <= 0.0 {
        offset = settings.price_increment.abs();
    }
    let direction = match side {
        PositionSide::Long => 1.0,
        PositionSide::Short => -1.0,
    };
    let right = entry.x + settings.position_width_bars;
    let stop = DataPoint::new(right, entry.y - direction * offset);
    let target = DataPoint::new(right, entry.y + direction * offset * settings.reward_ratio);
    [entry, stop, target]
}
