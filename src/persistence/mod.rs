//! Drawing persistence keyed by chart session (symbol, layout, ...).
//!
//! The in-memory drawing collection is authoritative; stores only mirror it.
//!
//! ## Module Structure
//!
//! - [`memory`] - In-process store
//! - [`json_file`] - One pretty JSON file per session key

mod json_file;
mod memory;


pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use serde::{Deserialize, Serialize};

use crate::drawing::DrawingRecord;
use crate::error::EngineResult;

/// Current on-disk format version
pub const SAVE_FORMAT_VERSION: u32 = 1;

/// Saved drawings for one session key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedDrawings {
    #[serde(default = "default_version")]
    pub version: u32,
    pub drawings: Vec<DrawingRecord>,
}

fn default_version() -> u32 {
    SAVE_FORMAT_VERSION
}

impl SavedDrawings {
    pub fn new(drawings: Vec<DrawingRecord>) -> Self {
        Self {
            version: SAVE_FORMAT_VERSION,
            drawings,
        }
    }
}

/// Storage backend for drawing records.
pub trait DrawingStore: Send + Sync {
    /// Replace everything stored under `key` with `records`.
    fn save(&mut self, key: &str, records: &[DrawingRecord]) -> EngineResult<()>;

    /// Records stored under `key`; an unknown key yields an empty list.
    fn load(&self, key: &str) -> EngineResult<Vec<DrawingRecord>>;

    fn remove(&mut self, key: &str) -> EngineResult<()>;
}
