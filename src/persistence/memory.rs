//! In-process store, used by tests and hosts that persist elsewhere.

use std::collections::HashMap;

use super::DrawingStore;
use crate::drawing::DrawingRecord;
use crate::error::EngineResult;

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    sessions: HashMap<String, Vec<DrawingRecord>>,
    /// Number of successful saves
    pub save_count: usize,
}

impl DrawingStore for MemoryStore {
    fn save(&mut self, key: &str, records: &[DrawingRecord]) -> EngineResult<()> {
        self.sessions.insert(key.to_string(), records.to_vec());
        self.save_count += 1;
        Ok(())
    }

    fn load(&self, key: &str) -> EngineResult<Vec<DrawingRecord>> {
        Ok(self.sessions.get(key).cloned().unwrap_or_default())
    }

    fn remove(&mut self, key: &str) -> EngineResult<()> {
        self.sessions.remove(key);
        Ok(())
    }
}
