//! Serializable form of a drawing, used for persistence, undo snapshots and
//! the clipboard.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{DataPoint, DrawingId, DrawingMeta, Style, TimestampPoint};

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingRecord {
    pub id: DrawingId,
    #[serde(rename = "type")]
    pub tool: String,
    pub points: Vec<DataPoint>,
    #[serde(default)]
    pub style: Style,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_points: Option<Vec<TimestampPoint>>,
    #[serde(default)]
    pub meta: DrawingMeta,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub payload: Value,
}

impl DrawingRecord {
    /// Equal in everything a user can change, ignoring metadata timestamps.
    /// Used to skip undo entries for no-op gestures.
    pub fn same_content(&self, other: &DrawingRecord) -> bool {
        self.id == other.id
            && self.points == other.points
            && self.style == other.style
            && self.locked == other.locked
            && self.hidden == other.hidden
            && self.visible == other.visible
            && self.payload == other.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> DrawingRecord {
        DrawingRecord {
            id: DrawingId::new(),
            tool: "trendline".into(),
            points: vec![DataPoint::new(0.0, 100.0), DataPoint::new(5.0, 110.0)],
            style: Style::default(),
            locked: false,
            hidden: false,
            visible: true,
            timestamp_points: None,
            meta: DrawingMeta::default(),
            payload: Value::Null,
        }
    }

    #[test]
    fn test_record_json_uses_type_key() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["type"], "trendline");
        assert!(json.get("timestampPoints").is_none());
        assert!(json.get("payload").is_none());
    }

    #[test]
    fn test_record_defaults_when_fields_missing() {
        let id = DrawingId::new();
        let json = format!(
            r#"{{"id":"{id}","type":"ray","points":[{{"x":1.0,"y":2.0}}]}}"#
        );
        let parsed: DrawingRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, id);
        assert!(parsed.visible);
        assert!(!parsed.locked);
    }

    #[test]
    fn test_same_content_ignores_meta() {
        let a = record();
        let mut b = a.clone();
        b.meta.updated_at += 1_000;
        assert!(a.same_content(&b));
        b.points[0].x += 1.0;
        assert!(!a.same_content(&b));
    }
}
