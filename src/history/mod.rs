//! Undo/redo for drawing edits.
//!
//! The engine hands snapshots to an [`UndoRedo`] collaborator at commit
//! points and replays the entries it gets back.
//!
//! ## Usage
//!
//! - **Ctrl+Z**: Undo the last edit
//! - **Ctrl+Y** or **Ctrl+Shift+Z**: Redo the last undone edit
//!
//! ## Module Structure
//!
//! - [`entries`] - Snapshot and history entry types
//! - [`command_history`] - Bounded stack implementation

mod command_history;
mod entries;


pub use command_history::CommandHistory;
pub use entries::{DrawingSnapshot, HistoryEntry};

use crate::drawing::{Drawing, DrawingId};

/// Receives snapshots at commit points and yields entries to replay.
pub trait UndoRedo: Send + Sync {
    fn capture_state(&self, drawing: &Drawing) -> DrawingSnapshot {
        drawing.to_record()
    }

    fn record_add(&mut self, drawing: &Drawing, index: usize);

    /// Record a change from `before` to the drawing's current state. No-op
    /// changes are dropped.
    fn record_modify(&mut self, drawing: &Drawing, before: DrawingSnapshot);

    fn record_delete(&mut self, before: DrawingSnapshot, index: usize);

    /// Drop every entry about `id`. Used when a drawing is destroyed as if
    /// it had never been created.
    fn discard(&mut self, id: DrawingId);

    /// Next entry to revert; it moves to the redo side.
    fn undo(&mut self) -> Option<HistoryEntry>;

    /// Next entry to re-apply; it moves back to the undo side.
    fn redo(&mut self) -> Option<HistoryEntry>;

    /// Set while the engine replays an entry, so side channels can skip work.
    fn is_performing_undo_redo(&self) -> bool;

    fn set_performing_undo_redo(&mut self, active: bool);

    fn can_undo(&self) -> bool;

    fn can_redo(&self) -> bool;

    fn clear(&mut self);
}
