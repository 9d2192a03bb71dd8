//! Drawing lifecycle: arming tools, finalizing, selection, deletion,
//! undo/redo replay, style edits, clipboard and persistence.

use bevy::prelude::*;

use super::{DrawingEngine, EngineEvent, PendingStyleEdit};
use crate::broadcast::BroadcastEvent;
use crate::clipboard::Clipboard;
use crate::common::CursorHint;
use crate::drag::Gesture;
use crate::drawing::{now_ms, DataPoint, Drawing, DrawingId, DrawingRecord, Placeholder, Style};
use crate::error::{EngineError, EngineResult};
use crate::history::{DrawingSnapshot, HistoryEntry};
use crate::selection::SelectOutcome;
use crate::tools::{synthesize_position, AddPointOutcome, CreationBehavior};

impl DrawingEngine {
    /// Style a new drawing of `tool` starts with
    pub(super) fn style_for(&self, tool: &str) -> Style {
        self.config.saved_style(tool).cloned().unwrap_or_default()
    }

    /// Arm `name`, discarding any sequence in progress and clearing the
    /// selection. Unknown tools, and the sticker tool before a sticker is
    /// chosen, are logged and leave everything unchanged.
    pub fn set_tool(&mut self, name: &str) -> bool {
        self.flush_style_edit();
        self.abandon_gesture();
        if let Err(e) = self.tools.set_tool(&self.config.registry, name) {
            warn!("Cannot arm tool: {}", e);
            return false;
        }
        self.cancel_text_entry();
        self.preview_point = None;
        self.deselect_all();
        self.set_fill_interaction(false);
        self.set_cursor(CursorHint::Crosshair);
        self.emit(EngineEvent::ToolChanged(Some(name.to_string())));
        debug!("Armed tool {}", name);
        true
    }

    pub fn clear_tool(&mut self) {
        if !self.tools.is_armed() {
            return;
        }
        self.abandon_gesture();
        self.tools.clear_tool();
        self.preview_point = None;
        self.set_fill_interaction(true);
        self.set_cursor(CursorHint::Default);
        self.emit(EngineEvent::ToolChanged(None));
    }

    /// Choose the glyph the sticker tool places.
    pub fn set_sticker(&mut self, glyph: Option<&str>) {
        self.tools.set_sticker(glyph.map(str::to_string));
    }

    /// Add a data-space point to the armed tool. Completing a fixed-count
    /// sequence finalizes the drawing. Position tools finalize on their first
    /// point with a synthesized stop and target.
    pub fn add_point(&mut self, point: DataPoint) -> Option<AddPointOutcome> {
        self.push_point(point).map(|(outcome, _)| outcome)
    }

    /// [`Self::add_point`], also returning the drawing it committed
    pub(super) fn push_point(&mut self, point: DataPoint) -> Option<(AddPointOutcome, Option<DrawingId>)> {
        let Some(tool) = self.tools.active_tool().map(str::to_string) else {
            warn!("Cannot add point: {}", EngineError::NoToolArmed);
            return None;
        };
        let spec = self.config.registry.get(&tool)?;
        let (behavior, continuous) = (spec.behavior, spec.is_continuous());

        if let CreationBehavior::RiskReward(side) = behavior {
            let points = synthesize_position(point, side, &self.scales, &self.config.settings);
            let placed = self.finalize(tool, points.to_vec(), true);
            let outcome = AddPointOutcome {
                is_complete: true,
                count: 1,
            };
            return Some((outcome, placed));
        }

        let outcome = match self.tools.add_point(&self.config.registry, point) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Cannot add point: {}", e);
                return None;
            }
        };
        if outcome.is_complete {
            let placed = self.finalize_drawing();
            return Some((outcome, placed));
        }
        if self.gesture.is_idle() {
            self.gesture = Gesture::Collecting { continuous };
        }
        Some((outcome, None))
    }

    /// Finalize a complete sequence.
    pub fn finalize_drawing(&mut self) -> Option<DrawingId> {
        let (tool, points) = self.tools.take_completed()?;
        self.finalize(tool, points, true)
    }

    /// Terminator for continuous and point-by-point tools. Too short a
    /// sequence is cancelled instead.
    pub fn terminate_drawing(&mut self) -> Option<DrawingId> {
        if !self.tools.is_collecting() {
            return None;
        }
        let completed = self.tools.terminate(&self.config.registry);
        self.end_collecting();
        match completed {
            Some((tool, points)) => self.finalize(tool, points, true),
            None => {
                debug!("Too few points to finish the drawing; sequence cancelled");
                None
            }
        }
    }

    /// Discard the pending sequence; the tool stays armed.
    pub fn cancel_drawing(&mut self) -> bool {
        if !self.tools.is_collecting() {
            return false;
        }
        self.tools.cancel();
        self.end_collecting();
        true
    }

    fn end_collecting(&mut self) {
        if matches!(self.gesture, Gesture::Collecting { .. }) {
            self.gesture = Gesture::None;
        }
        self.preview_point = None;
        self.emit(EngineEvent::FullRedrawRequested);
    }

    /// Create a drawing directly from data-space points, as if it had just
    /// been drawn with `tool`. The armed tool is left alone.
    pub fn place_drawing(&mut self, tool: &str, points: Vec<DataPoint>) -> Option<DrawingId> {
        self.finalize(tool.to_string(), points, false)
    }

    fn finalize(&mut self, tool: String, points: Vec<DataPoint>, from_tool: bool) -> Option<DrawingId> {
        self.flush_style_edit();
        self.end_collecting();

        let (behavior, persistent) = match self.config.registry.spec(&tool) {
            Ok(spec) => (spec.behavior, spec.persistent),
            Err(e) => {
                warn!("Cannot finalize drawing: {}", e);
                return None;
            }
        };
        let mut drawing = match self.config.registry.create(&tool, points, self.style_for(&tool)) {
            Ok(drawing) => drawing,
            Err(e) => {
                warn!("Cannot finalize drawing: {}", e);
                return None;
            }
        };

        let committed = match behavior {
            CreationBehavior::DeferredText => {
                let anchor = drawing
                    .points
                    .first()
                    .map(|p| self.mapper.data_to_screen(*p, &self.scales))
                    .unwrap_or_default();
                self.pending_text = Some(drawing);
                self.emit(EngineEvent::TextEntryRequested { tool, anchor });
                None
            }
            CreationBehavior::Sticker => {
                if let Some(glyph) = self.tools.sticker()
                    && let Some(holder) = drawing.shape_mut().content_holder_mut()
                {
                    holder.set_content(glyph);
                }
                Some(self.commit_new(drawing))
            }
            CreationBehavior::ImagePlaceholder => {
                drawing.placeholder = Placeholder::Speculative;
                Some(self.commit_new(drawing))
            }
            CreationBehavior::Immediate | CreationBehavior::RiskReward(_) => Some(self.commit_new(drawing)),
        };

        if from_tool && !(self.config.settings.keep_drawing_mode || persistent) {
            self.clear_tool();
        }
        committed
    }

    /// Supply the text of a pending text or note drawing. Blank text
    /// discards it.
    pub fn submit_text(&mut self, text: &str) -> Option<DrawingId> {
        let mut drawing = self.pending_text.take()?;
        if text.trim().is_empty() {
            debug!("Discarding {} drawing without text", drawing.tool());
            return None;
        }
        if let Some(holder) = drawing.shape_mut().content_holder_mut() {
            holder.set_content(text);
        }
        Some(self.commit_new(drawing))
    }

    pub fn cancel_text_entry(&mut self) -> bool {
        self.pending_text.take().is_some()
    }

    /// Add a new drawing on top, recording and broadcasting it. Returns its
    /// index.
    fn insert_new(&mut self, mut drawing: Drawing) -> usize {
        drawing.recalculate_timestamps(&self.candles);
        let id = drawing.id();
        let index = self.drawings.len();
        info!("Created {} drawing {}", drawing.tool(), id);

        self.history.record_add(&drawing, index);
        let record = drawing.to_record();
        self.drawings.push(drawing);
        self.schedule(id);
        self.broadcast(BroadcastEvent::Add { record, index });
        index
    }

    /// Insert, select and persist a finished drawing.
    fn commit_new(&mut self, drawing: Drawing) -> DrawingId {
        let id = drawing.id();
        self.insert_new(drawing);
        self.select_drawing(id, false);
        self.persist();
        id
    }

    /// Select `id`, replacing the selection or toggling it into a
    /// multi-selection. In eraser mode the drawing is deleted instead.
    pub fn select_drawing(&mut self, id: DrawingId, add_to_selection: bool) -> bool {
        let previous = self.selection.ids().to_vec();
        let eraser = self.config.settings.eraser_mode;
        match self.selection.select(&mut self.drawings, id, add_to_selection, eraser) {
            SelectOutcome::Erase => return self.delete_drawing(id),
            SelectOutcome::Ignored => return false,
            SelectOutcome::Selected | SelectOutcome::Deselected => {}
        }
        for member in previous {
            self.schedule(member);
        }
        self.schedule(id);
        self.refresh_toolbar();
        true
    }

    /// Clear the selection, first destroying selected placeholders that
    /// never got content.
    pub fn deselect_all(&mut self) {
        let sweep = self.selection.deselect_all(&mut self.drawings);
        let removed_any = !sweep.removed.is_empty();
        for (index, removed) in sweep.removed {
            let id = removed.id();
            self.forget(id);
            self.history.discard(id);
            self.broadcast(BroadcastEvent::Remove { id, index });
        }
        for id in sweep.deselected {
            self.schedule(id);
        }
        if removed_any {
            self.persist();
        }
        self.refresh_toolbar();
        self.emit(EngineEvent::FullRedrawRequested);
    }

    /// Drop every engine-side reference to a removed drawing.
    fn forget(&mut self, id: DrawingId) {
        self.selection.remove(id);
        self.scheduler.cancel(id);
        if let Some(handle) = self.geometry.remove_drawing(id) {
            self.render_sink.remove(handle);
        }
        if self.pending_style.as_ref().is_some_and(|p| p.id == id) {
            self.pending_style = None;
        }
    }

    /// Delete a drawing by id. Locks only guard the selection and click
    /// paths, so a locked drawing can still be deleted here.
    pub fn delete_drawing(&mut self, id: DrawingId) -> bool {
        self.flush_style_edit();
        let Some(index) = self.position_of(id) else {
            debug!("Ignoring delete of stale drawing {}", id);
            return false;
        };

        let drawing = self.drawings.remove(index);
        self.forget(id);
        let snapshot = self.history.capture_state(&drawing);
        self.history.record_delete(snapshot, index);
        info!("Deleted {} drawing {}", drawing.tool(), id);

        self.broadcast(BroadcastEvent::Remove { id, index });
        self.refresh_toolbar();
        self.persist();
        true
    }

    /// Delete every selected, unlocked drawing. Returns how many went.
    pub fn delete_selected(&mut self) -> usize {
        let unlocked: Vec<DrawingId> = self
            .selection
            .ids()
            .iter()
            .copied()
            .filter(|id| self.drawing(*id).is_some_and(|d| !d.locked))
            .collect();
        unlocked.into_iter().filter(|id| self.delete_drawing(*id)).count()
    }

    /// Remove every drawing. Each removal is recorded so the clear can be
    /// undone one drawing at a time.
    pub fn clear_all(&mut self) {
        self.abandon_gesture();
        self.flush_style_edit();
        let drawings = std::mem::take(&mut self.drawings);
        for (index, drawing) in drawings.iter().enumerate().rev() {
            let snapshot = self.history.capture_state(drawing);
            self.history.record_delete(snapshot, index);
        }

        self.selection = Default::default();
        self.geometry.clear();
        self.render_sink.clear();
        self.scheduler.take_pending();
        info!("Cleared {} drawings", drawings.len());

        self.broadcast(BroadcastEvent::Clear);
        self.refresh_toolbar();
        self.emit(EngineEvent::FullRedrawRequested);
        self.persist();
    }

    /// Commit the gesture's changes: every drawing whose state differs from
    /// its `before` snapshot gets an undo entry and a broadcast. Returns how
    /// many drawings changed.
    pub(super) fn commit_changes(&mut self, befores: Vec<DrawingSnapshot>) -> usize {
        let mut committed = 0;
        for before in befores {
            let Some(index) = self.position_of(before.id) else {
                continue;
            };
            self.schedule(before.id);
            if self.drawings[index].to_record().same_content(&before) {
                continue;
            }
            let drawing = &mut self.drawings[index];
            drawing.recalculate_timestamps(&self.candles);
            drawing.touch();
            self.history.record_modify(&self.drawings[index], before);

            let record = self.drawings[index].to_record();
            self.broadcast(BroadcastEvent::Update { record, index });
            committed += 1;
        }
        if committed > 0 {
            self.persist();
        }
        self.refresh_toolbar();
        committed
    }

    /// Put a drawing back to `before`.
    pub(super) fn revert_to(&mut self, before: &DrawingSnapshot) {
        let Some(index) = self.position_of(before.id) else {
            return;
        };
        if let Err(e) = self.drawings[index].apply_record(before) {
            warn!("Failed to revert drawing {}: {}", before.id, e);
        }
        self.schedule(before.id);
    }

    pub fn undo(&mut self) -> bool {
        self.flush_style_edit();
        self.abandon_gesture();
        let Some(entry) = self.history.undo() else {
            return false;
        };
        self.replay(entry, true);
        true
    }

    pub fn redo(&mut self) -> bool {
        self.flush_style_edit();
        self.abandon_gesture();
        let Some(entry) = self.history.redo() else {
            return false;
        };
        self.replay(entry, false);
        true
    }

    /// Apply `entry` backwards (`revert`) or forwards.
    fn replay(&mut self, entry: HistoryEntry, revert: bool) {
        self.history.set_performing_undo_redo(true);
        let result = match (entry, revert) {
            (HistoryEntry::Add { snapshot, .. }, true) | (HistoryEntry::Delete { snapshot, .. }, false) => {
                self.remove_for_replay(snapshot.id)
            }
            (HistoryEntry::Add { snapshot, index }, false) | (HistoryEntry::Delete { snapshot, index }, true) => {
                self.restore_for_replay(&snapshot, index)
            }
            (HistoryEntry::Modify { before, .. }, true) => self.apply_for_replay(&before),
            (HistoryEntry::Modify { after, .. }, false) => self.apply_for_replay(&after),
        };
        self.history.set_performing_undo_redo(false);

        if let Err(e) = result {
            warn!("Undo/redo replay failed: {}", e);
        }
        self.refresh_toolbar();
        self.persist();
    }

    fn remove_for_replay(&mut self, id: DrawingId) -> EngineResult<()> {
        let index = self.position_of(id).ok_or(EngineError::StaleDrawing(id))?;
        self.drawings.remove(index);
        self.forget(id);
        self.broadcast(BroadcastEvent::Remove { id, index });
        Ok(())
    }

    fn restore_for_replay(&mut self, snapshot: &DrawingRecord, index: usize) -> EngineResult<()> {
        let drawing = self.config.registry.from_record(snapshot)?;
        let index = index.min(self.drawings.len());
        self.drawings.insert(index, drawing);
        self.schedule(snapshot.id);
        self.broadcast(BroadcastEvent::Add {
            record: snapshot.clone(),
            index,
        });
        Ok(())
    }

    fn apply_for_replay(&mut self, record: &DrawingRecord) -> EngineResult<()> {
        let index = self.position_of(record.id).ok_or(EngineError::StaleDrawing(record.id))?;
        self.drawings[index].apply_record(record)?;
        self.schedule(record.id);
        self.broadcast(BroadcastEvent::Update {
            record: record.clone(),
            index,
        });
        Ok(())
    }

    /// Replace a drawing's style. Edits to the same drawing closer together
    /// than the debounce window share one undo entry.
    pub fn set_style(&mut self, id: DrawingId, style: Style) -> bool {
        self.set_style_at(id, style, now_ms())
    }

    /// [`Self::set_style`] with an explicit timestamp in milliseconds.
    pub fn set_style_at(&mut self, id: DrawingId, style: Style, time_ms: i64) -> bool {
        let Some(index) = self.position_of(id) else {
            debug!("Ignoring style edit of stale drawing {}", id);
            return false;
        };
        if self.drawings[index].locked {
            return false;
        }

        let debounce = self.config.settings.style_debounce_ms;
        let coalesce = self
            .pending_style
            .as_ref()
            .is_some_and(|p| p.id == id && time_ms - p.last_ms <= debounce);
        if coalesce {
            if let Some(pending) = self.pending_style.as_mut() {
                pending.last_ms = time_ms;
            }
        } else {
            self.flush_style_edit();
            self.pending_style = Some(PendingStyleEdit {
                id,
                before: self.drawings[index].to_record(),
                last_ms: time_ms,
            });
        }

        let drawing = &mut self.drawings[index];
        drawing.style = style;
        drawing.clear_group();
        drawing.touch();
        self.config.remember_style(drawing.tool(), &drawing.style);

        let record = self.drawings[index].to_record();
        self.schedule(id);
        self.broadcast(BroadcastEvent::Update { record, index });
        true
    }

    /// Record the pending style edit, if any. Returns whether one was flushed.
    pub fn flush_style_edit(&mut self) -> bool {
        let Some(pending) = self.pending_style.take() else {
            return false;
        };
        let Some(drawing) = self.drawings.iter().find(|d| d.id() == pending.id) else {
            return false;
        };
        self.history.record_modify(drawing, pending.before);
        self.persist();
        true
    }

    /// Flush the pending style edit once the debounce window has passed.
    pub fn poll_style_debounce(&mut self, now_ms: i64) -> bool {
        let expired = self
            .pending_style
            .as_ref()
            .is_some_and(|p| now_ms - p.last_ms > self.config.settings.style_debounce_ms);
        expired && self.flush_style_edit()
    }

    /// Apply a recorded edit to one drawing.
    fn modify(&mut self, id: DrawingId, edit: impl FnOnce(&mut Drawing) -> EngineResult<()>) -> bool {
        self.flush_style_edit();
        let Some(index) = self.position_of(id) else {
            debug!("Ignoring edit of stale drawing {}", id);
            return false;
        };
        let before = self.drawings[index].to_record();
        if let Err(e) = edit(&mut self.drawings[index]) {
            warn!("Edit rejected: {}", e);
            return false;
        }
        self.drawings[index].clear_group();
        self.drawings[index].touch();
        self.history.record_modify(&self.drawings[index], before);

        let record = self.drawings[index].to_record();
        self.schedule(id);
        self.broadcast(BroadcastEvent::Update { record, index });
        self.refresh_toolbar();
        self.persist();
        true
    }

    pub fn set_locked(&mut self, id: DrawingId, locked: bool) -> bool {
        self.modify(id, |drawing| {
            drawing.locked = locked;
            Ok(())
        })
    }

    /// Hide or show a drawing. Hidden drawings leave the selection.
    pub fn set_hidden(&mut self, id: DrawingId, hidden: bool) -> bool {
        let changed = self.modify(id, |drawing| {
            drawing.hidden = hidden;
            if hidden {
                drawing.selected = false;
            }
            Ok(())
        });
        if changed && hidden && self.selection.remove(id) {
            self.refresh_toolbar();
        }
        changed
    }

    /// Set the text, image source or glyph of a content-holding drawing.
    pub fn set_text(&mut self, id: DrawingId, text: &str) -> bool {
        self.modify(id, |drawing| {
            if drawing.locked {
                return Err(EngineError::DrawingLocked(id));
            }
            let holder = drawing
                .shape_mut()
                .content_holder_mut()
                .ok_or(EngineError::NoContent(id))?;
            holder.set_content(text);
            Ok(())
        })
    }

    /// Open a drawing's settings. A speculative placeholder becomes pinned
    /// and survives deselection.
    pub fn open_settings(&mut self, id: DrawingId) -> bool {
        let Some(index) = self.position_of(id) else {
            return false;
        };
        let drawing = &mut self.drawings[index];
        if drawing.placeholder == Placeholder::Speculative {
            drawing.placeholder = Placeholder::Pinned;
        }
        self.emit(EngineEvent::OpenEditor(id));
        true
    }

    /// Copy the selected drawings. Returns how many were copied.
    pub fn copy_selection(&mut self) -> usize {
        let selection = &self.selection;
        self.clipboard
            .copy(self.drawings.iter().filter(|d| selection.contains(d.id())))
    }

    /// Paste the clipboard on top and select the copies.
    pub fn paste(&mut self) -> Vec<DrawingId> {
        let pasted = self.clipboard.paste(&self.config.registry);
        self.commit_copies(pasted)
    }

    /// Copy and paste one drawing without touching the clipboard.
    pub fn duplicate_drawing(&mut self, id: DrawingId) -> Option<DrawingId> {
        let drawing = self.drawing(id)?;
        let mut scratch = Clipboard::default();
        scratch.copy([drawing]);
        let pasted = scratch.paste(&self.config.registry);
        self.commit_copies(pasted).into_iter().next()
    }

    fn commit_copies(&mut self, copies: Vec<Drawing>) -> Vec<DrawingId> {
        if copies.is_empty() {
            return Vec::new();
        }
        self.flush_style_edit();
        let ids: Vec<DrawingId> = copies.iter().map(Drawing::id).collect();
        for drawing in copies {
            self.insert_new(drawing);
        }
        for (i, id) in ids.iter().enumerate() {
            self.select_drawing(*id, i > 0);
        }
        self.persist();
        ids
    }

    /// Replace the collection with what the store holds for `key`. Records
    /// that no longer parse are skipped. Returns the number loaded.
    pub fn load_session(&mut self, key: &str) -> usize {
        self.abandon_gesture();
        self.flush_style_edit();
        self.session_key = key.to_string();

        let records = match self.store.as_ref().map(|store| store.load(key)) {
            Some(Ok(records)) => records,
            Some(Err(e)) => {
                error!("Failed to load drawings for {}: {}", key, e);
                return 0;
            }
            None => return 0,
        };

        let mut loaded = Vec::with_capacity(records.len());
        for record in &records {
            match self.config.registry.from_record(record) {
                Ok(mut drawing) => {
                    if !self.candles.is_empty() {
                        drawing.reproject_timestamps(&self.candles);
                    }
                    loaded.push(drawing);
                }
                Err(e) => warn!("Skipping saved drawing {}: {}", record.id, e),
            }
        }

        self.drawings = loaded;
        self.selection = Default::default();
        self.pending_text = None;
        self.geometry.clear();
        self.render_sink.clear();
        self.scheduler.take_pending();
        self.history.clear();
        self.schedule_all();
        self.refresh_toolbar();
        info!("Loaded {} drawings for {}", self.drawings.len(), key);
        self.drawings.len()
    }

    /// Save settings (including remembered tool styles) if they changed.
    pub fn save_settings(&mut self) {
        self.config.save();
    }
}
