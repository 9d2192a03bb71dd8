//! Coalesces re-render requests onto the next frame.

use std::collections::HashSet;

use crate::drawing::DrawingId;

/// Pending-render set plus a single frame request.
#[derive(Debug, Default)]
pub struct RenderScheduler {
    /// Request order; may hold cancelled ids until the next drain
    order: Vec<DrawingId>,
    pending: HashSet<DrawingId>,
    frame_requested: bool,
}

impl RenderScheduler {
    /// Queue `id`. Returns `true` if this call requested a new frame.
    pub fn schedule(&mut self, id: DrawingId) -> bool {
        if self.pending.insert(id) {
            self.order.push(id);
        }
        let newly_requested = !self.frame_requested;
        self.frame_requested = true;
        newly_requested
    }

    pub fn cancel(&mut self, id: DrawingId) {
        self.pending.remove(&id);
    }

    pub fn is_frame_requested(&self) -> bool {
        self.frame_requested
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Drain the pending set in request order and clear the frame request.
    pub fn take_pending(&mut self) -> Vec<DrawingId> {
        self.frame_requested = false;
        let mut pending = std::mem::take(&mut self.pending);
        let mut order = std::mem::take(&mut self.order);
        order.retain(|id| pending.remove(id));
        order
    }
}
