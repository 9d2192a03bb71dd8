//! The drawing entity and its data-space model.
//!
//! ## Module Structure
//!
//! - [`style`] - Mutable style attribute bag
//! - [`drawable`] - Shape contract and capability traits
//! - [`record`] - Serializable drawing record

mod drawable;
mod record;
mod style;

use std::fmt;
use std::ops::{Add, Sub};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use drawable::{
    ContentHolder, CustomHandle, CustomHandleDrag, Drawable, HandleDragContext, PointHandleDrag,
    RegionHit, ShapeContext,
};
pub use record::DrawingRecord;
pub use style::Style;

use crate::error::EngineResult;
use crate::mapper::{CandleSeries, CoordinateMapper, Scales};
use crate::render::{Element, HandleTag, RenderedGroup};

/// Radius of drawn handle markers in pixels
pub const HANDLE_DRAW_RADIUS: f32 = 4.0;

/// A point in data space: `x` is a (possibly fractional) candle index.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
}

impl DataPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for DataPoint {
    type Output = DataPoint;

    fn add(self, rhs: DataPoint) -> DataPoint {
        DataPoint::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for DataPoint {
    type Output = DataPoint;

    fn sub(self, rhs: DataPoint) -> DataPoint {
        DataPoint::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A point expressed in absolute time, used to survive timeframe changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimestampPoint {
    /// Milliseconds since the epoch
    pub time: i64,
    pub price: f64,
}

/// Stable drawing identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrawingId(Uuid);

impl DrawingId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DrawingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DrawingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Creation and modification times in milliseconds since the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingMeta {
    pub created_at: i64,
    pub updated_at: i64,
}

impl DrawingMeta {
    pub fn now() -> Self {
        let now = now_ms();
        Self {
            created_at: now,
            updated_at: now,
        }
    }
}

pub(crate) fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Lifecycle of speculatively created drawings (image placeholders).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placeholder {
    #[default]
    None,
    /// Removed on deselect unless content arrives first
    Speculative,
    /// The user opened its settings; kept even without content
    Pinned,
}

/// One placed annotation.
#[derive(Debug, Clone)]
pub struct Drawing {
    id: DrawingId,
    tool: String,
    pub points: Vec<DataPoint>,
    pub style: Style,
    pub selected: bool,
    pub locked: bool,
    pub hidden: bool,
    pub visible: bool,
    pub timestamp_points: Option<Vec<TimestampPoint>>,
    pub meta: DrawingMeta,
    pub placeholder: Placeholder,
    shape: Box<dyn Drawable>,
    group: Option<RenderedGroup>,
}

impl Drawing {
    pub fn new(id: DrawingId, tool: &str, points: Vec<DataPoint>, style: Style, shape: Box<dyn Drawable>) -> Self {
        Self {
            id,
            tool: tool.to_string(),
            points,
            style,
            selected: false,
            locked: false,
            hidden: false,
            visible: true,
            timestamp_points: None,
            meta: DrawingMeta::now(),
            placeholder: Placeholder::None,
            shape,
            group: None,
        }
    }

    pub fn id(&self) -> DrawingId {
        self.id
    }

    pub fn tool(&self) -> &str {
        &self.tool
    }

    pub fn shape(&self) -> &dyn Drawable {
        self.shape.as_ref()
    }

    pub fn shape_mut(&mut self) -> &mut dyn Drawable {
        self.shape.as_mut()
    }

    /// Split borrow for handle drags: the shape handler mutates points directly.
    pub(crate) fn shape_and_points(&mut self) -> (&mut dyn Drawable, &mut Vec<DataPoint>) {
        (self.shape.as_mut(), &mut self.points)
    }

    /// Hidden drawings and drawings switched off for the current view are
    /// neither rendered nor hit-tested.
    pub fn is_renderable(&self) -> bool {
        !self.hidden && self.visible
    }

    pub fn has_content(&self) -> bool {
        self.shape.content_holder().is_none_or(|c| c.has_content())
    }

    /// Speculative placeholder never given content
    pub fn is_disposable_placeholder(&self) -> bool {
        self.placeholder == Placeholder::Speculative && !self.has_content()
    }

    /// Mark a mutation.
    pub fn touch(&mut self) {
        self.meta.updated_at = now_ms();
    }

    pub fn shape_context<'a>(&'a self, mapper: &'a dyn CoordinateMapper, scales: &'a Scales) -> ShapeContext<'a> {
        ShapeContext {
            mapper,
            scales,
            style: &self.style,
        }
    }

    /// Build the drawing's geometry. Handles are attached only when selected
    /// and `with_handles` is set.
    pub fn build_group(
        &self,
        mapper: &dyn CoordinateMapper,
        scales: &Scales,
        with_handles: bool,
        preview: bool,
    ) -> RenderedGroup {
        let ctx = self.shape_context(mapper, scales);
        let mut elements = self.shape.render(&self.points, &ctx, preview);

        let attach = with_handles && self.selected && !preview;
        if attach {
            for (index, point) in self.points.iter().enumerate() {
                elements.push(Element::handle(ctx.to_screen(*point), HANDLE_DRAW_RADIUS, HandleTag::Point(index)));
            }
            if let Some(custom) = self.shape.custom_handles() {
                for handle in custom.handles(&self.points, &ctx) {
                    elements.push(Element::handle(handle.position, HANDLE_DRAW_RADIUS, HandleTag::Custom(handle.role)));
                }
            }
        }

        RenderedGroup {
            elements,
            preview,
            with_handles: attach,
        }
    }

    /// Render and keep the result as the drawing's current group.
    pub fn render(&mut self, mapper: &dyn CoordinateMapper, scales: &Scales, with_handles: bool) -> &RenderedGroup {
        let group = self.build_group(mapper, scales, with_handles, false);
        self.group.insert(group)
    }

    pub fn group(&self) -> Option<&RenderedGroup> {
        self.group.as_ref()
    }

    /// Current geometry, rendered on the fly if not cached.
    pub fn geometry(&self, mapper: &dyn CoordinateMapper, scales: &Scales) -> RenderedGroup {
        match &self.group {
            Some(group) => group.clone(),
            None => self.build_group(mapper, scales, true, false),
        }
    }

    /// Screen bounding box of the visible geometry (handles excluded)
    pub fn bounding_box(&self, mapper: &dyn CoordinateMapper, scales: &Scales) -> Option<Rect> {
        self.geometry(mapper, scales).bounds()
    }

    /// Refresh the absolute-time shadow of `points`.
    pub fn recalculate_timestamps(&mut self, series: &CandleSeries) {
        if series.is_empty() {
            return;
        }
        let stamped: Option<Vec<TimestampPoint>> = self
            .points
            .iter()
            .map(|p| series.time_at(p.x).map(|time| TimestampPoint { time, price: p.y }))
            .collect();
        if stamped.is_some() {
            self.timestamp_points = stamped;
        }
    }

    /// Re-project `points` from the timestamp shadow onto `series`.
    /// Returns `true` if the points changed.
    pub fn reproject_timestamps(&mut self, series: &CandleSeries) -> bool {
        let Some(stamps) = &self.timestamp_points else {
            return false;
        };
        if stamps.len() != self.points.len() {
            return false;
        }
        let projected: Option<Vec<DataPoint>> = stamps
            .iter()
            .map(|t| series.index_at(t.time).map(|x| DataPoint::new(x, t.price)))
            .collect();
        match projected {
            Some(points) if points != self.points => {
                self.points = points;
                self.group = None;
                true
            }
            _ => false,
        }
    }

    pub fn to_record(&self) -> DrawingRecord {
        DrawingRecord {
            id: self.id,
            tool: self.tool.clone(),
            points: self.points.clone(),
            style: self.style.clone(),
            locked: self.locked,
            hidden: self.hidden,
            visible: self.visible,
            timestamp_points: self.timestamp_points.clone(),
            meta: self.meta,
            payload: self.shape.payload(),
        }
    }

    /// Restore state from a snapshot of this same drawing.
    pub fn apply_record(&mut self, record: &DrawingRecord) -> EngineResult<()> {
        self.shape.restore_payload(&record.payload)?;
        self.points = record.points.clone();
        self.style = record.style.clone();
        self.locked = record.locked;
        self.hidden = record.hidden;
        self.visible = record.visible;
        self.timestamp_points = record.timestamp_points.clone();
        self.meta = record.meta;
        self.group = None;
        Ok(())
    }

    /// Copy with a freshly minted id, deselected and unrendered.
    pub fn duplicate(&self) -> Drawing {
        let mut copy = self.clone();
        copy.id = DrawingId::new();
        copy.selected = false;
        copy.group = None;
        copy.meta = DrawingMeta::now();
        copy
    }

    /// Re-render-free point translation
    pub fn translate(&mut self, start: &[DataPoint], delta: DataPoint) {
        self.points = start.iter().map(|p| *p + delta).collect();
    }

    pub(crate) fn clear_group(&mut self) {
        self.group = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::{Candle, LinearMapper};

    #[derive(Debug, Clone)]
    struct Segment;

    impl Drawable for Segment {
        fn render(&self, points: &[DataPoint], ctx: &ShapeContext<'_>, _preview: bool) -> Vec<Element> {
            let screen = ctx.project(points);
            match screen.as_slice() {
                [a, b, ..] => vec![Element::line(*a, *b, ctx.style.stroke_width)],
                _ => Vec::new(),
            }
        }

        fn clone_box(&self) -> Box<dyn Drawable> {
            Box::new(self.clone())
        }
    }

    fn segment() -> Drawing {
        Drawing::new(
            DrawingId::new(),
            "trendline",
            vec![DataPoint::new(0.0, 100.0), DataPoint::new(5.0, 90.0)],
            Style::default(),
            Box::new(Segment),
        )
    }

    #[test]
    fn test_handles_only_when_selected() {
        let mut drawing = segment();
        let group = drawing.build_group(&LinearMapper, &Scales::default(), true, false);
        assert_eq!(group.handle_count(), 0);

        drawing.selected = true;
        let group = drawing.build_group(&LinearMapper, &Scales::default(), true, false);
        assert_eq!(group.handle_count(), 2);

        let group = drawing.build_group(&LinearMapper, &Scales::default(), false, false);
        assert_eq!(group.handle_count(), 0);
    }

    #[test]
    fn test_duplicate_mints_new_id() {
        let mut drawing = segment();
        drawing.selected = true;
        let copy = drawing.duplicate();
        assert_ne!(copy.id(), drawing.id());
        assert_eq!(copy.points, drawing.points);
        assert!(!copy.selected);
    }

    #[test]
    fn test_record_round_trip_restores_points() {
        let mut drawing = segment();
        let before = drawing.to_record();
        drawing.points[1] = DataPoint::new(9.0, 50.0);
        drawing.apply_record(&before).unwrap();
        assert_eq!(drawing.points, before.points);
    }

    #[test]
    fn test_timestamps_survive_timeframe_change() {
        let minute = |i: i64| Candle {
            time: i * 60_000,
            open: 1.0,
            high: 1.0,
            low: 1.0,
            close: 1.0,
        };
        let one_minute = CandleSeries::new((0..100).map(minute).collect());
        let five_minute = CandleSeries::new((0..20).map(|i| minute(i * 5)).collect());

        let mut drawing = segment();
        drawing.points = vec![DataPoint::new(10.0, 1.0), DataPoint::new(20.0, 2.0)];
        drawing.recalculate_timestamps(&one_minute);

        assert!(drawing.reproject_timestamps(&five_minute));
        assert_eq!(drawing.points, vec![DataPoint::new(2.0, 1.0), DataPoint::new(4.0, 2.0)]);
    }

    #[test]
    fn test_bounding_box_covers_points() {
        let drawing = segment();
        let bounds = drawing.bounding_box(&LinearMapper, &Scales::default()).unwrap();
        assert_eq!(bounds.min, Vec2::new(0.0, 0.0));
        assert_eq!(bounds.max, Vec2::new(40.0, 40.0));
    }
}
