//! Mutable style attributes of a drawing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Style attribute bag. Common attributes are typed; tool-specific ones
/// (level colors, label toggles, ...) live in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Style {
    pub stroke_color: String,
    pub stroke_width: f32,
    pub fill_color: Option<String>,
    pub font_size: f32,
    pub opacity: f32,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            stroke_color: "#2962ff".to_string(),
            stroke_width: 2.0,
            fill_color: None,
            font_size: 14.0,
            opacity: 1.0,
            extra: BTreeMap::new(),
        }
    }
}

impl Style {
    /// Overlay `other` on top of `self`: typed fields are replaced, extra
    /// attributes are merged key by key.
    pub fn merge(&mut self, other: &Style) {
        self.stroke_color = other.stroke_color.clone();
        self.stroke_width = other.stroke_width;
        self.fill_color = other.fill_color.clone();
        self.font_size = other.font_size;
        self.opacity = other.opacity;
        for (key, value) in &other.extra {
            self.extra.insert(key.clone(), value.clone());
        }
    }

    pub fn with_stroke_width(mut self, width: f32) -> Self {
        self.stroke_width = width;
        self
    }

    pub fn with_fill(mut self, color: &str) -> Self {
        self.fill_color = Some(color.to_string());
        self
    }
}
