//! Selection state: the ordered selection set and its primary member.
//!
//! ## Module Structure
//!
//! - [`marquee`] - Rectangle selection
//! - [`toolbar`] - Floating toolbar visibility and anchor

mod marquee;
mod toolbar;

#[cfg(test)]
mod tests;

pub use marquee::Marquee;
pub use toolbar::ToolbarState;

use bevy::prelude::*;

use crate::drawing::{Drawing, DrawingId};

/// What a selection request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Selected,
    /// Toggled out of a multi-selection
    Deselected,
    /// Locked, or no longer part of the chart
    Ignored,
    /// Eraser mode: the caller deletes the drawing instead
    Erase,
}

/// Result of [`SelectionState::deselect_all`]
#[derive(Debug, Default)]
pub struct DeselectSweep {
    pub deselected: Vec<DrawingId>,
    /// Placeholders destroyed by the sweep, with their former index
    pub removed: Vec<(usize, Drawing)>,
}

/// Selection set in insertion order. The primary selection is the most
/// recently added member, so the set always contains it.
#[derive(Debug, Default, Clone)]
pub struct SelectionState {
    members: Vec<DrawingId>,
}

impl SelectionState {
    pub fn primary(&self) -> Option<DrawingId> {
        self.members.last().copied()
    }

    pub fn ids(&self) -> &[DrawingId] {
        &self.members
    }

    pub fn contains(&self, id: DrawingId) -> bool {
        self.members.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Select `id`. Without `add_to_selection` it replaces the set; with it,
    /// membership is toggled.
    pub fn select(
        &mut self,
        drawings: &mut [Drawing],
        id: DrawingId,
        add_to_selection: bool,
        eraser_mode: bool,
    ) -> SelectOutcome {
        let Some(target) = drawings.iter().position(|d| d.id() == id) else {
            debug!("Ignoring selection of stale drawing {}", id);
            self.remove(id);
            return SelectOutcome::Ignored;
        };
        if drawings[target].locked {
            return SelectOutcome::Ignored;
        }
        if eraser_mode {
            return SelectOutcome::Erase;
        }

        if !add_to_selection {
            for drawing in drawings.iter_mut() {
                drawing.selected = false;
            }
            self.members.clear();
            self.members.push(id);
            drawings[target].selected = true;
            return SelectOutcome::Selected;
        }

        if self.contains(id) {
            self.remove(id);
            drawings[target].selected = false;
            SelectOutcome::Deselected
        } else {
            self.members.push(id);
            drawings[target].selected = true;
            SelectOutcome::Selected
        }
    }

    /// Drop `id` from the set without touching the drawing.
    pub fn remove(&mut self, id: DrawingId) -> bool {
        let before = self.members.len();
        self.members.retain(|m| *m != id);
        self.members.len() != before
    }

    /// Clear the selection. Selected placeholders that never received
    /// content and were never pinned are destroyed first.
    pub fn deselect_all(&mut self, drawings: &mut Vec<Drawing>) -> DeselectSweep {
        let mut sweep = DeselectSweep::default();

        for id in &self.members {
            if let Some(index) = drawings.iter().position(|d| d.id() == *id)
                && drawings[index].is_disposable_placeholder()
            {
                let removed = drawings.remove(index);
                info!("Discarding empty {} placeholder {}", removed.tool(), removed.id());
                sweep.removed.push((index, removed));
            }
        }

        for drawing in drawings.iter_mut().filter(|d| d.selected) {
            drawing.selected = false;
            sweep.deselected.push(drawing.id());
        }
        self.members.clear();
        sweep
    }
}
