//! Floating toolbar coupling: shown only for exactly one selected drawing.

use bevy::prelude::*;

use super::SelectionState;
use crate::drawing::{Drawing, DrawingId};
use crate::mapper::{CoordinateMapper, Scales};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ToolbarState {
    #[default]
    Hidden,
    Shown {
        id: DrawingId,
        /// Screen bounding box of the selected drawing
        anchor: Rect,
    },
}

impl ToolbarState {
    pub fn for_selection(
        selection: &SelectionState,
        drawings: &[Drawing],
        mapper: &dyn CoordinateMapper,
        scales: &Scales,
    ) -> Self {
        let [id] = selection.ids() else {
            return Self::Hidden;
        };
        drawings
            .iter()
            .find(|d| d.id() == *id)
            .and_then(|d| d.bounding_box(mapper, scales))
            .map_or(Self::Hidden, |anchor| Self::Shown { id: *id, anchor })
    }

    pub fn is_shown(&self) -> bool {
        matches!(self, Self::Shown { .. })
    }
}
