//! Copy and paste of drawings.
//!
//! Copies are stored as records, so later edits to the originals do not leak
//! into the clipboard. Pasted drawings get fresh ids and are shifted right by
//! [`PASTE_OFFSET_BARS`] per paste, so repeated pastes do not stack exactly.

use bevy::prelude::*;

use crate::constants::PASTE_OFFSET_BARS;
use crate::drawing::{DataPoint, Drawing, DrawingId, DrawingMeta, DrawingRecord};
use crate::tools::ToolRegistry;

#[derive(Debug, Default, Clone)]
pub struct Clipboard {
    records: Vec<DrawingRecord>,
    /// Number of pastes since the last copy
    pastes: u32,
}

impl Clipboard {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Replace the clipboard with the given drawings, in render order.
    pub fn copy<'a>(&mut self, drawings: impl IntoIterator<Item = &'a Drawing>) -> usize {
        self.records = drawings.into_iter().map(Drawing::to_record).collect();
        self.pastes = 0;
        self.records.len()
    }

    /// Build fresh drawings from the clipboard. Records whose tool is no
    /// longer registered are skipped.
    pub fn paste(&mut self, registry: &ToolRegistry) -> Vec<Drawing> {
        if self.records.is_empty() {
            return Vec::new();
        }
        self.pastes += 1;
        let shift = DataPoint::new(PASTE_OFFSET_BARS * f64::from(self.pastes), 0.0);

        self.records
            .iter()
            .filter_map(|record| {
                let mut record = record.clone();
                record.id = DrawingId::new();
                record.meta = DrawingMeta::now();
                record.locked = false;
                record.timestamp_points = None;
                for point in &mut record.points {
                    *point = *point + shift;
                }
                match registry.from_record(&record) {
                    Ok(drawing) => Some(drawing),
                    Err(e) => {
                        warn!("Skipping pasted {}: {}", record.tool, e);
                        None
                    }
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::Style;

    fn trendline(registry: &ToolRegistry) -> Drawing {
        registry
            .create(
                "trendline",
                vec![DataPoint::new(0.0, 10.0), DataPoint::new(4.0, 20.0)],
                Style::default(),
            )
            .unwrap()
    }

    #[test]
    fn test_paste_mints_ids_and_offsets() {
        let registry = ToolRegistry::with_builtin_tools();
        let original = trendline(&registry);
        let mut clipboard = Clipboard::default();
        assert_eq!(clipboard.copy([&original]), 1);

        let first = clipboard.paste(&registry);
        assert_eq!(first.len(), 1);
        assert_ne!(first[0].id(), original.id());
        assert_eq!(first[0].points[0], DataPoint::new(PASTE_OFFSET_BARS, 10.0));

        let second = clipboard.paste(&registry);
        assert_ne!(second[0].id(), first[0].id());
        assert_eq!(second[0].points[0], DataPoint::new(2.0 * PASTE_OFFSET_BARS, 10.0));
    }

    #[test]
    fn test_copy_is_a_snapshot() {
        let registry = ToolRegistry::with_builtin_tools();
        let mut original = trendline(&registry);
        let mut clipboard = Clipboard::default();
        clipboard.copy([&original]);
        original.points[0] = DataPoint::new(50.0, 50.0);

        let pasted = clipboard.paste(&registry);
        assert_eq!(pasted[0].points[0], DataPoint::new(PASTE_OFFSET_BARS, 10.0));
    }

    #[test]
    fn test_paste_unlocks_copies() {
        let registry = ToolRegistry::with_builtin_tools();
        let mut original = trendline(&registry);
        original.locked = true;
        let mut clipboard = Clipboard::default();
        clipboard.copy([&original]);
        assert!(!clipboard.paste(&registry)[0].locked);
    }

    #[test]
    fn test_empty_clipboard_pastes_nothing() {
        let registry = ToolRegistry::with_builtin_tools();
        assert!(Clipboard::default().paste(&registry).is_empty());
    }
}
