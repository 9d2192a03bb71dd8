//! Serializable undo/redo state.

use serde::{Deserialize, Serialize};

use crate::drawing::{DrawingId, DrawingRecord};

/// Full copy of a drawing's state at a commit point.
pub type DrawingSnapshot = DrawingRecord;

/// A reversible edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HistoryEntry {
    /// A drawing was created at `index`
    Add { snapshot: DrawingSnapshot, index: usize },
    /// A drawing changed from `before` to `after`
    Modify {
        before: DrawingSnapshot,
        after: DrawingSnapshot,
    },
    /// A drawing was deleted from `index`
    Delete { snapshot: DrawingSnapshot, index: usize },
}

impl HistoryEntry {
    pub fn drawing_id(&self) -> DrawingId {
        match self {
            Self::Add { snapshot, .. } | Self::Delete { snapshot, .. } => snapshot.id,
            Self::Modify { after, .. } => after.id,
        }
    }
}
