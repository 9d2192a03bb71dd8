//! Tool registry: identifier to constructor, point count and behaviour flags.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::drawing::{DataPoint, Drawable, Drawing, DrawingId, DrawingRecord, Style};
use crate::error::{EngineError, EngineResult};
use crate::shapes::PositionSide;

/// How many points a tool collects before it is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointCount {
    Fixed(usize),
    /// Freehand: every move with the primary button held adds a point,
    /// release terminates
    Continuous,
    /// Polyline: points until an explicit terminator
    PointByPoint,
}

impl PointCount {
    /// Decode the wire form: positive counts, `-1` continuous, `-2` point-by-point
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            -1 => Some(Self::Continuous),
            -2 => Some(Self::PointByPoint),
            n if n > 0 => Some(Self::Fixed(n as usize)),
            _ => None,
        }
    }

    pub fn as_raw(&self) -> i32 {
        match self {
            Self::Fixed(n) => *n as i32,
            Self::Continuous => -1,
            Self::PointByPoint => -2,
        }
    }

    /// Minimum points for a terminated sequence to become a drawing
    pub fn minimum(&self) -> usize {
        match self {
            Self::Fixed(n) => *n,
            Self::Continuous | Self::PointByPoint => 2,
        }
    }
}

/// Geometric family, used by hit-test ordering and drag filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolFamily {
    Line,
    Rect,
    Triangle,
    Circle,
    Ellipse,
    /// Filled arrow: any hit on it counts as distance zero
    Arrow,
    /// Polyline / freehand: vertices get an enlarged tolerance
    Path,
    /// Hit through the shape's own containment test
    Region,
}

impl ToolFamily {
    pub fn is_line(&self) -> bool {
        matches!(self, Self::Line | Self::Path | Self::Arrow)
    }

    pub fn is_shape(&self) -> bool {
        matches!(self, Self::Rect | Self::Triangle | Self::Circle | Self::Ellipse)
    }

    /// Circle and ellipse: interior is never draggable
    pub fn is_round(&self) -> bool {
        matches!(self, Self::Circle | Self::Ellipse)
    }
}

/// What finalizing a completed point sequence does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationBehavior {
    /// Commit immediately
    Immediate,
    /// Commit only once non-empty text is supplied
    DeferredText,
    /// Commit speculatively; removed on deselect if never given content
    ImagePlaceholder,
    /// Needs a chosen sticker before the tool can be armed
    Sticker,
    /// Synthesizes a stop/target layout from the first point
    RiskReward(PositionSide),
}

/// Constraint applied to the third point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointConstraint {
    None,
    /// Projected onto the perpendicular of the baseline through point 0
    Perpendicular,
    /// X pinned to point 0, only Y follows the pointer
    PinnedX,
}

pub type ShapeFactory = fn() -> Box<dyn Drawable>;

#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub id: String,
    pub point_count: PointCount,
    pub family: ToolFamily,
    pub behavior: CreationBehavior,
    pub constraint: PointConstraint,
    /// Takes part in Shift 45° snapping
    pub angle_snap: bool,
    /// Stays armed after each drawing (brush, highlighter)
    pub persistent: bool,
    pub factory: ShapeFactory,
}

impl ToolSpec {
    pub fn new(id: &str, point_count: PointCount, family: ToolFamily, factory: ShapeFactory) -> Self {
        Self {
            id: id.to_string(),
            point_count,
            family,
            behavior: CreationBehavior::Immediate,
            constraint: PointConstraint::None,
            angle_snap: false,
            persistent: false,
            factory,
        }
    }

    pub fn with_behavior(mut self, behavior: CreationBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn with_constraint(mut self, constraint: PointConstraint) -> Self {
        self.constraint = constraint;
        self
    }

    pub fn angle_snapping(mut self) -> Self {
        self.angle_snap = true;
        self
    }

    pub fn persistent(mut self) -> Self {
        self.persistent = true;
        self
    }

    pub fn is_continuous(&self) -> bool {
        self.point_count == PointCount::Continuous
    }

    pub fn is_point_by_point(&self) -> bool {
        self.point_count == PointCount::PointByPoint
    }
}

/// Per-instance tool table.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, ToolSpec>,
}

impl ToolRegistry {
    pub fn with_builtin_tools() -> Self {
        let mut registry = Self::default();
        for spec in super::builtin::builtin_tools() {
            registry.register(spec);
        }
        registry
    }

    /// Add or replace a tool. Returns the spec it replaced.
    pub fn register(&mut self, spec: ToolSpec) -> Option<ToolSpec> {
        self.tools.insert(spec.id.clone(), spec)
    }

    pub fn get(&self, id: &str) -> Option<&ToolSpec> {
        self.tools.get(id)
    }

    pub fn spec(&self, id: &str) -> EngineResult<&ToolSpec> {
        self.get(id).ok_or_else(|| EngineError::UnknownTool(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tools.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }

    /// Family of a tool; unregistered tools are treated as lines.
    pub fn family_of(&self, id: &str) -> ToolFamily {
        self.get(id).map_or(ToolFamily::Line, |spec| spec.family)
    }

    /// Construct a new drawing of type `tool`.
    pub fn create(&self, tool: &str, points: Vec<DataPoint>, style: Style) -> EngineResult<Drawing> {
        let spec = self.spec(tool)?;
        Ok(Drawing::new(DrawingId::new(), tool, points, style, (spec.factory)()))
    }

    /// Re-hydrate a drawing from its record, keeping its id.
    pub fn from_record(&self, record: &DrawingRecord) -> EngineResult<Drawing> {
        let spec = self.spec(&record.tool)?;

        if record.points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(EngineError::InvalidRecord(format!("{} has non-finite points", record.id)));
        }
        let count_ok = match spec.point_count {
            PointCount::Fixed(n) => record.points.len() == n,
            PointCount::Continuous | PointCount::PointByPoint => !record.points.is_empty(),
        };
        if !count_ok {
            return Err(EngineError::InvalidRecord(format!(
                "{} has {} points for tool `{}`",
                record.id,
                record.points.len(),
                record.tool
            )));
        }

        let mut drawing = Drawing::new(
            record.id,
            &record.tool,
            record.points.clone(),
            record.style.clone(),
            (spec.factory)(),
        );
        drawing.apply_record(record)?;
        debug!("Restored {} drawing {}", record.tool, record.id);
        Ok(drawing)
    }
}
