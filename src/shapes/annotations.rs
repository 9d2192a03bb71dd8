//! Content-carrying annotations: text, notes, images and stickers.

use bevy::prelude::*;
use serde_json::{json, Value};

use crate::drawing::{ContentHolder, DataPoint, Drawable, RegionHit, ShapeContext};
use crate::error::{EngineError, EngineResult};
use crate::render::{Element, ElementRole, ElementShape};

/// Text box size estimate: characters times half the font size, with minimums
fn text_box(anchor: Vec2, content: &str, font_size: f32) -> Rect {
    let longest = content.lines().map(|l| l.chars().count()).max().unwrap_or(0);
    let lines = content.lines().count().max(1);
    let width = (longest as f32 * font_size * 0.5).max(40.0);
    let height = (lines as f32 * font_size * 1.4).max(20.0);
    Rect::from_corners(anchor, anchor + Vec2::new(width, height))
}

fn read_string(payload: &Value, key: &str) -> EngineResult<Option<String>> {
    match payload.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(EngineError::InvalidRecord(format!("`{}` must be a string, got {}", key, other))),
    }
}

/// Text label or pinned note anchored at one point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextShape {
    note: bool,
    text: Option<String>,
}

impl TextShape {
    pub fn text() -> Self {
        Self::default()
    }

    pub fn note() -> Self {
        Self { note: true, text: None }
    }

    fn bounds(&self, points: &[DataPoint], ctx: &ShapeContext<'_>) -> Option<Rect> {
        let anchor = ctx.to_screen(*points.first()?);
        Some(text_box(anchor, self.text.as_deref().unwrap_or(""), ctx.style.font_size))
    }
}

impl Drawable for TextShape {
    fn render(&self, points: &[DataPoint], ctx: &ShapeContext<'_>, _preview: bool) -> Vec<Element> {
        let Some(rect) = self.bounds(points, ctx) else {
            return Vec::new();
        };
        let mut elements = vec![Element::new(ElementShape::Region(rect), ElementRole::Label, 0.0)];
        if self.note {
            elements.push(Element::new(
                ElementShape::Circle {
                    center: rect.min,
                    radius: 5.0,
                },
                ElementRole::Fill,
                0.0,
            ));
        }
        elements
    }

    fn payload(&self) -> Value {
        match &self.text {
            Some(text) => json!({ "text": text }),
            None => Value::Null,
        }
    }

    fn restore_payload(&mut self, payload: &Value) -> EngineResult<()> {
        self.text = read_string(payload, "text")?;
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn Drawable> {
        Box::new(self.clone())
    }

    fn region(&self) -> Option<&dyn RegionHit> {
        Some(self)
    }

    fn content_holder(&self) -> Option<&dyn ContentHolder> {
        Some(self)
    }

    fn content_holder_mut(&mut self) -> Option<&mut dyn ContentHolder> {
        Some(self)
    }
}

impl RegionHit for TextShape {
    fn is_point_inside(&self, position: Vec2, points: &[DataPoint], ctx: &ShapeContext<'_>) -> bool {
        self.bounds(points, ctx).is_some_and(|r| r.contains(position))
    }
}

impl ContentHolder for TextShape {
    fn content(&self) -> Option<&str> {
        self.text.as_deref()
    }

    fn set_content(&mut self, content: &str) {
        self.text = Some(content.to_string());
    }
}

/// Image spanning two corners. Created before the image is chosen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageShape {
    source: Option<String>,
}

impl ImageShape {
    fn bounds(points: &[DataPoint], ctx: &ShapeContext<'_>) -> Option<Rect> {
        match points {
            [a, b, ..] => Some(Rect::from_corners(ctx.to_screen(*a), ctx.to_screen(*b))),
            _ => None,
        }
    }
}

impl Drawable for ImageShape {
    fn render(&self, points: &[DataPoint], ctx: &ShapeContext<'_>, _preview: bool) -> Vec<Element> {
        let Some(rect) = Self::bounds(points, ctx) else {
            return Vec::new();
        };
        vec![
            Element::new(ElementShape::Region(rect), ElementRole::Fill, 0.0),
            Element::new(ElementShape::Rect(rect), ElementRole::Label, 1.0),
        ]
    }

    fn payload(&self) -> Value {
        match &self.source {
            Some(source) => json!({ "source": source }),
            None => Value::Null,
        }
    }

    fn restore_payload(&mut self, payload: &Value) -> EngineResult<()> {
        self.source = read_string(payload, "source")?;
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn Drawable> {
        Box::new(self.clone())
    }

    fn region(&self) -> Option<&dyn RegionHit> {
        Some(self)
    }

    fn content_holder(&self) -> Option<&dyn ContentHolder> {
        Some(self)
    }

    fn content_holder_mut(&mut self) -> Option<&mut dyn ContentHolder> {
        Some(self)
    }
}

impl RegionHit for ImageShape {
    fn is_point_inside(&self, position: Vec2, points: &[DataPoint], ctx: &ShapeContext<'_>) -> bool {
        Self::bounds(points, ctx).is_some_and(|r| r.contains(position))
    }
}

impl ContentHolder for ImageShape {
    fn content(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn set_content(&mut self, content: &str) {
        self.source = Some(content.to_string());
    }
}

/// Emoji or glyph centred on one point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StickerShape {
    glyph: String,
}

impl StickerShape {
    fn bounds(points: &[DataPoint], ctx: &ShapeContext<'_>) -> Option<Rect> {
        let center = ctx.to_screen(*points.first()?);
        Some(Rect::from_center_half_size(center, Vec2::splat(ctx.style.font_size)))
    }
}

impl Drawable for StickerShape {
    fn render(&self, points: &[DataPoint], ctx: &ShapeContext<'_>, _preview: bool) -> Vec<Element> {
        Self::bounds(points, ctx)
            .map(|rect| vec![Element::new(ElementShape::Region(rect), ElementRole::Label, 0.0)])
            .unwrap_or_default()
    }

    fn payload(&self) -> Value {
        json!({ "glyph": self.glyph })
    }

    fn restore_payload(&mut self, payload: &Value) -> EngineResult<()> {
        self.glyph = read_string(payload, "glyph")?.unwrap_or_default();
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn Drawable> {
        Box::new(self.clone())
    }

    fn region(&self) -> Option<&dyn RegionHit> {
        Some(self)
    }

    fn content_holder(&self) -> Option<&dyn ContentHolder> {
        Some(self)
    }

    fn content_holder_mut(&mut self) -> Option<&mut dyn ContentHolder> {
        Some(self)
    }
}

impl RegionHit for StickerShape {
    fn is_point_inside(&self, position: Vec2, points: &[DataPoint], ctx: &ShapeContext<'_>) -> bool {
        Self::bounds(points, ctx).is_some_and(|r| r.contains(position))
    }
}

impl ContentHolder for StickerShape {
    fn content(&self) -> Option<&str> {
        (!self.glyph.is_empty()).then_some(self.glyph.as_str())
    }

    fn set_content(&mut self, content: &str) {
        self.glyph = content.to_string();
    }
}
