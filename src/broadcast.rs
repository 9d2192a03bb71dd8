//! Notifications for other chart panels showing the same drawings.

use std::sync::{Arc, Mutex};

use crate::drawing::{DrawingId, DrawingRecord};

/// A committed change to the drawing collection.
#[derive(Debug, Clone, PartialEq)]
pub enum BroadcastEvent {
    Add { record: DrawingRecord, index: usize },
    Update { record: DrawingRecord, index: usize },
    /// `index` is where the drawing sat before removal
    Remove { id: DrawingId, index: usize },
    Clear,
}

impl BroadcastEvent {
    pub fn drawing_id(&self) -> Option<DrawingId> {
        match self {
            Self::Add { record, .. } | Self::Update { record, .. } => Some(record.id),
            Self::Remove { id, .. } => Some(*id),
            Self::Clear => None,
        }
    }
}

/// Receiver of broadcast events, one per synchronized panel.
pub trait BroadcastSink: Send + Sync {
    fn notify(&mut self, event: &BroadcastEvent);
}

/// Keeps every event; used by hosts that poll and by tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub events: Vec<BroadcastEvent>,
}

impl BroadcastSink for RecordingSink {
    fn notify(&mut self, event: &BroadcastEvent) {
        self.events.push(event.clone());
    }
}

/// Lets a host keep a handle on a sink it gave to the engine.
impl<T: BroadcastSink> BroadcastSink for Arc<Mutex<T>> {
    fn notify(&mut self, event: &BroadcastEvent) {
        if let Ok(mut sink) = self.lock() {
            sink.notify(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_keeps_order() {
        let mut sink = RecordingSink::default();
        let id = DrawingId::new();
        sink.notify(&BroadcastEvent::Remove { id, index: 2 });
        sink.notify(&BroadcastEvent::Clear);
        assert_eq!(sink.events.len(), 2);
        assert_eq!(sink.events[0].drawing_id(), Some(id));
        assert_eq!(sink.events[1].drawing_id(), None);
    }

    #[test]
    fn test_shared_sink_forwards() {
        let shared = Arc::new(Mutex::new(RecordingSink::default()));
        let mut handle = shared.clone();
        handle.notify(&BroadcastEvent::Clear);
        assert_eq!(shared.lock().unwrap().events, vec![BroadcastEvent::Clear]);
    }
}
