//! Built-in drawing shapes.
//!
//! Each shape only turns data points into screen [`Element`](crate::render::Element)s
//! and, where it needs to, answers handle drags or containment queries.
//! Appearance beyond geometry and stroke width is left to the host.
//!
//! ## Module Structure
//!
//! - [`lines`] - Segments, rays, horizontal/vertical lines, ruler, arrow
//! - [`boxes`] - Rectangle, triangle, circle, ellipse
//! - [`channels`] - Parallel, flat-top/bottom and disjoint channels
//! - [`fibonacci`] - Fibonacci retracement
//! - [`paths`] - Polylines and freehand strokes
//! - [`annotations`] - Text, notes, images, stickers
//! - [`position`] - Long/short position markers
//! - [`patterns`] - XABCD harmonic pattern

mod annotations;
mod boxes;
mod channels;
mod fibonacci;
mod lines;
mod paths;
mod patterns;
mod position;


pub use annotations::{ImageShape, StickerShape, TextShape};
pub use boxes::{CircleShape, EllipseShape, RectangleShape, TriangleShape};
pub use channels::{DisjointChannel, FlatTopBottom, ParallelChannel};
pub use fibonacci::{FibRetracement, FIB_LEVELS};
pub use lines::{ArrowShape, HorizontalLine, LineShape, RulerShape, VerticalLine};
pub use paths::{FreehandShape, PolylineShape};
pub use patterns::XabcdPattern;
pub use position::{PositionShape, PositionSide};

use crate::drawing::Style;
use crate::render::{Element, ElementRole, ElementShape};

/// Fill element for a closed shape, if the style has a fill color
fn fill_element(style: &Style, shape: ElementShape) -> Option<Element> {
    style
        .fill_color
        .as_ref()
        .map(|_| Element::new(shape, ElementRole::Fill, 0.0))
}
