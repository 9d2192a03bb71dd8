//! Lookup from host group handles to the owning drawing.

use std::collections::HashMap;

use super::GroupHandle;
use crate::drawing::DrawingId;

/// Maintained on every present/remove so pointer-captured events can be
/// resolved to a drawing directly.
#[derive(Debug, Default)]
pub struct GeometryIndex {
    owners: HashMap<GroupHandle, DrawingId>,
    handles: HashMap<DrawingId, GroupHandle>,
}

impl GeometryIndex {
    /// Record that `handle` now shows `id`. Returns the handle it replaced.
    pub fn insert(&mut self, handle: GroupHandle, id: DrawingId) -> Option<GroupHandle> {
        let previous = self.handles.insert(id, handle);
        if let Some(old) = previous {
            self.owners.remove(&old);
        }
        self.owners.insert(handle, id);
        previous.filter(|old| *old != handle)
    }

    pub fn remove_drawing(&mut self, id: DrawingId) -> Option<GroupHandle> {
        let handle = self.handles.remove(&id)?;
        self.owners.remove(&handle);
        Some(handle)
    }

    pub fn owner(&self, handle: GroupHandle) -> Option<DrawingId> {
        self.owners.get(&handle).copied()
    }

    pub fn handle_of(&self, id: DrawingId) -> Option<GroupHandle> {
        self.handles.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    pub fn clear(&mut self) {
        self.owners.clear();
        self.handles.clear();
    }
}
