//! Render contract between drawings and the host.
//!
//! Drawings describe their geometry as a [`RenderedGroup`] of primitive
//! [`Element`]s; the host draws them through a [`RenderSink`].
//!
//! ## Module Structure
//!
//! - [`index`] - Host group handle to drawing id lookup
//! - [`scheduler`] - Pending-render set flushed once per frame

mod index;
mod scheduler;

use bevy::prelude::*;

pub use index::GeometryIndex;
pub use scheduler::RenderScheduler;

use crate::drawing::DrawingId;

/// Identifies a handle element on a drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleTag {
    /// Moves `points[index]`
    Point(usize),
    /// Interpreted by the shape's custom handle handler
    Custom(&'static str),
}

/// What an element is for. Only `Stroke` and `Level` elements are hit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRole {
    Stroke,
    /// One line of a multi-level study (Fibonacci levels, position zones)
    Level,
    Fill,
    Label,
    Handle(HandleTag),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementShape {
    Line { a: Vec2, b: Vec2 },
    Rect(Rect),
    Circle { center: Vec2, radius: f32 },
    Ellipse { center: Vec2, radii: Vec2 },
    /// Open polyline
    Path(Vec<Vec2>),
    /// Closed polygon
    Polygon(Vec<Vec2>),
    /// Non-stroked area (text boxes, images, stickers)
    Region(Rect),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub shape: ElementShape,
    pub role: ElementRole,
    pub stroke_width: f32,
}

impl Element {
    pub fn new(shape: ElementShape, role: ElementRole, stroke_width: f32) -> Self {
        Self {
            shape,
            role,
            stroke_width,
        }
    }

    pub fn line(a: Vec2, b: Vec2, stroke_width: f32) -> Self {
        Self::new(ElementShape::Line { a, b }, ElementRole::Stroke, stroke_width)
    }

    pub fn handle(center: Vec2, radius: f32, tag: HandleTag) -> Self {
        Self::new(ElementShape::Circle { center, radius }, ElementRole::Handle(tag), 1.0)
    }

    pub fn with_role(mut self, role: ElementRole) -> Self {
        self.role = role;
        self
    }

    pub fn is_handle(&self) -> bool {
        matches!(self.role, ElementRole::Handle(_))
    }

    pub fn bounds(&self) -> Option<Rect> {
        match &self.shape {
            ElementShape::Line { a, b } => Some(Rect::from_corners(*a, *b)),
            ElementShape::Rect(rect) | ElementShape::Region(rect) => Some(*rect),
            ElementShape::Circle { center, radius } => {
                Some(Rect::from_center_half_size(*center, Vec2::splat(radius.abs())))
            }
            ElementShape::Ellipse { center, radii } => Some(Rect::from_center_half_size(*center, radii.abs())),
            ElementShape::Path(points) | ElementShape::Polygon(points) => {
                let (first, rest) = points.split_first()?;
                let rect = rest
                    .iter()
                    .fold(Rect::from_corners(*first, *first), |acc, p| acc.union_point(*p));
                Some(rect)
            }
        }
    }
}

/// A drawing's on-screen geometry, owned by the drawing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedGroup {
    pub elements: Vec<Element>,
    pub preview: bool,
    pub with_handles: bool,
}

impl RenderedGroup {
    /// Union of the non-handle element bounds
    pub fn bounds(&self) -> Option<Rect> {
        self.elements
            .iter()
            .filter(|e| !e.is_handle())
            .filter_map(Element::bounds)
            .reduce(|acc, r| acc.union(r))
    }

    pub fn handles(&self) -> impl Iterator<Item = (HandleTag, &Element)> {
        self.elements.iter().filter_map(|e| match e.role {
            ElementRole::Handle(tag) => Some((tag, e)),
            _ => None,
        })
    }

    pub fn handle_count(&self) -> usize {
        self.handles().count()
    }
}

/// Opaque host-side identifier for a presented group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupHandle(pub u64);

/// Host drawing surface.
pub trait RenderSink: Send + Sync {
    /// Show `group` for drawing `id`, replacing whatever was shown for it.
    fn present(&mut self, id: DrawingId, group: &RenderedGroup) -> GroupHandle;

    fn remove(&mut self, handle: GroupHandle);

    /// Toggle pointer interaction on fill regions of all drawings.
    fn set_fill_interaction(&mut self, enabled: bool);

    fn clear(&mut self);
}

/// Sink that draws nothing; hands out sequential handles.
#[derive(Debug, Default)]
pub struct NullRenderSink {
    next_handle: u64,
    pub presented: usize,
    pub fill_interaction_disabled: bool,
}

impl RenderSink for NullRenderSink {
    fn present(&mut self, _id: DrawingId, _group: &RenderedGroup) -> GroupHandle {
        self.next_handle += 1;
        self.presented += 1;
        GroupHandle(self.next_handle)
    }

    fn remove(&mut self, _handle: GroupHandle) {}

    fn set_fill_interaction(&mut self, enabled: bool) {
        self.fill_interaction_disabled = !enabled;
    }

    fn clear(&mut self) {}
}
