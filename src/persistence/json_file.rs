//! File-backed store: `{dir}/{key}.json`.

use std::path::{Path, PathBuf};

use bevy::prelude::*;

use super::{DrawingStore, SavedDrawings, SAVE_FORMAT_VERSION};
use crate::drawing::DrawingRecord;
use crate::error::EngineResult;

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl Default for JsonFileStore {
    fn default() -> Self {
        Self::new(crate::paths::drawings_dir())
    }
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File for `key`, with characters unsafe in file names replaced
    pub fn file_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') { c } else { '_' })
            .collect();
        let safe = if safe.is_empty() { "default".to_string() } else { safe };
        self.dir.join(format!("{}.json", safe))
    }
}

impl DrawingStore for JsonFileStore {
    fn save(&mut self, key: &str, records: &[DrawingRecord]) -> EngineResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.file_for(key);
        let json = serde_json::to_string_pretty(&SavedDrawings::new(records.to_vec()))?;
        std::fs::write(&path, json)?;
        debug!("Saved {} drawings to {:?}", records.len(), path);
        Ok(())
    }

    fn load(&self, key: &str) -> EngineResult<Vec<DrawingRecord>> {
        let path = self.file_for(key);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let json = std::fs::read_to_string(&path)?;
        let saved: SavedDrawings = serde_json::from_str(&json)?;
        if saved.version > SAVE_FORMAT_VERSION {
            warn!(
                "Drawings file {:?} has newer format version {} (supported: {})",
                path, saved.version, SAVE_FORMAT_VERSION
            );
        }
        Ok(saved.drawings)
    }

    fn remove(&mut self, key: &str) -> EngineResult<()> {
        let path = self.file_for(key);
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}
