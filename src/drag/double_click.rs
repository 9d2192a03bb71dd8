//! Double activation on a handle.

use crate::drawing::DrawingId;
use crate::render::HandleTag;

#[derive(Debug, Default, Clone)]
pub struct DoubleClickDetector {
    last: Option<(DrawingId, HandleTag, i64)>,
}

impl DoubleClickDetector {
    /// Register a press on a handle. Returns `true` when it completes a
    /// double click: same handle, no later than `window_ms` after the first
    /// press and no sooner than `min_ms` (faster repeats are contact bounce
    /// and are ignored).
    pub fn register(&mut self, id: DrawingId, tag: HandleTag, time_ms: i64, window_ms: i64, min_ms: i64) -> bool {
        if let Some((last_id, last_tag, last_time)) = self.last
            && last_id == id
            && last_tag == tag
        {
            let elapsed = time_ms - last_time;
            if elapsed < min_ms {
                return false;
            }
            if elapsed <= window_ms {
                self.last = None;
                return true;
            }
        }
        self.last = Some((id, tag, time_ms));
        false
    }
}
