//! Bounded undo/redo stacks.

use bevy::prelude::*;

use super::{DrawingSnapshot, HistoryEntry, UndoRedo};
use crate::constants::MAX_HISTORY_SIZE;
use crate::drawing::{Drawing, DrawingId};

/// Default [`UndoRedo`] collaborator
#[derive(Debug, Default)]
pub struct CommandHistory {
    /// Entries that can be undone (most recent last)
    undo_stack: Vec<HistoryEntry>,
    /// Entries that can be redone (most recent last)
    redo_stack: Vec<HistoryEntry>,
    performing: bool,
}

impl CommandHistory {
    /// Push a new entry to the history
    pub fn push(&mut self, entry: HistoryEntry) {
        // Clear redo stack when a new edit is recorded
        self.redo_stack.clear();

        self.undo_stack.push(entry);

        // Trim history if it exceeds max size
        if self.undo_stack.len() > MAX_HISTORY_SIZE {
            let excess = self.undo_stack.len() - MAX_HISTORY_SIZE;
            self.undo_stack.drain(..excess);
        }
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    fn recording(&self) -> bool {
        if self.performing {
            debug!("Skipping history record during undo/redo");
        }
        !self.performing
    }
}

impl UndoRedo for CommandHistory {
    fn record_add(&mut self, drawing: &Drawing, index: usize) {
        if self.recording() {
            self.push(HistoryEntry::Add {
                snapshot: self.capture_state(drawing),
                index,
            });
        }
    }

    fn record_modify(&mut self, drawing: &Drawing, before: DrawingSnapshot) {
        if !self.recording() {
            return;
        }
        let after = self.capture_state(drawing);
        if before.same_content(&after) {
            return;
        }
        self.push(HistoryEntry::Modify { before, after });
    }

    fn record_delete(&mut self, before: DrawingSnapshot, index: usize) {
        if self.recording() {
            self.push(HistoryEntry::Delete { snapshot: before, index });
        }
    }

    fn discard(&mut self, id: DrawingId) {
        self.undo_stack.retain(|entry| entry.drawing_id() != id);
        self.redo_stack.retain(|entry| entry.drawing_id() != id);
    }

    fn undo(&mut self) -> Option<HistoryEntry> {
        let entry = self.undo_stack.pop()?;
        self.redo_stack.push(entry.clone());
        Some(entry)
    }

    fn redo(&mut self) -> Option<HistoryEntry> {
        let entry = self.redo_stack.pop()?;
        self.undo_stack.push(entry.clone());
        Some(entry)
    }

    fn is_performing_undo_redo(&self) -> bool {
        self.performing
    }

    fn set_performing_undo_redo(&mut self, active: bool) {
        self.performing = active;
    }

    fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
