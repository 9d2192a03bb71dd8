//! Whole-drawing moves.
//!
//! The data-space delta is recomputed from the total pixel offset since the
//! press, re-projected through the mapper at the lead drawing's first point.
//! Summing per-event deltas would drift with mapper rounding.

use bevy::prelude::*;

use crate::drawing::{DataPoint, Drawing, DrawingId};
use crate::history::DrawingSnapshot;
use crate::mapper::{CoordinateMapper, Scales};

/// One drawing taking part in a move.
#[derive(Debug, Clone)]
pub struct MoveTarget {
    pub id: DrawingId,
    pub start_points: Vec<DataPoint>,
    pub before: DrawingSnapshot,
}

#[derive(Debug, Clone)]
pub struct DirectMove {
    /// Pointer position at the press
    origin: Vec2,
    /// Screen position of the lead drawing's first point at the press
    anchor_screen: Vec2,
    anchor_data: DataPoint,
    pub targets: Vec<MoveTarget>,
}

impl DirectMove {
    /// Start moving `group`, anchored on `lead`. Locked members stay put.
    /// Returns `None` if the lead has no points.
    pub fn begin<'a>(
        lead: &Drawing,
        group: impl IntoIterator<Item = &'a Drawing>,
        origin: Vec2,
        mapper: &dyn CoordinateMapper,
        scales: &Scales,
    ) -> Option<Self> {
        let anchor_data = *lead.points.first()?;
        let targets = group
            .into_iter()
            .filter(|d| !d.locked)
            .map(|d| MoveTarget {
                id: d.id(),
                start_points: d.points.clone(),
                before: d.to_record(),
            })
            .collect();
        Some(Self {
            origin,
            anchor_screen: mapper.data_to_screen(anchor_data, scales),
            anchor_data,
            targets,
        })
    }

    pub fn ids(&self) -> impl Iterator<Item = DrawingId> + '_ {
        self.targets.iter().map(|t| t.id)
    }

    /// Data-space offset for the pointer at `pointer`
    pub fn delta(&self, pointer: Vec2, mapper: &dyn CoordinateMapper, scales: &Scales) -> DataPoint {
        let moved = self.anchor_screen + (pointer - self.origin);
        mapper.screen_to_data(moved, scales, true) - self.anchor_data
    }

    /// Move every live target by the same delta. Returns the ids updated;
    /// targets deleted mid-drag are skipped.
    pub fn update(
        &self,
        drawings: &mut [Drawing],
        pointer: Vec2,
        mapper: &dyn CoordinateMapper,
        scales: &Scales,
    ) -> Vec<DrawingId> {
        let delta = self.delta(pointer, mapper, scales);
        self.targets
            .iter()
            .filter_map(|target| {
                let drawing = drawings.iter_mut().find(|d| d.id() == target.id)?;
                drawing.translate(&target.start_points, delta);
                drawing.clear_group();
                Some(target.id)
            })
            .collect()
    }

    /// Put every live target back where it started.
    pub fn revert(&self, drawings: &mut [Drawing]) {
        for target in &self.targets {
            if let Some(drawing) = drawings.iter_mut().find(|d| d.id() == target.id) {
                drawing.points = target.start_points.clone();
                drawing.clear_group();
            }
        }
    }
}
