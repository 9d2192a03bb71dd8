//! Stroke-only, z-aware hit testing.
//!
//! Fills are never hit targets: a drawing is hit only when the pointer is
//! within tolerance of one of its stroked elements, or inside it for tools
//! that test containment themselves.
//!
//! ## Module Structure
//!
//! - [`pick`] - Per-drawing distances and ordered drawing hits
//! - [`stacked`] - Per-element line enumeration and stack detection

mod pick;
mod stacked;


pub use pick::{drawing_distance, element_distance, find_drawings_at_point, Hit};
pub use stacked::{find_lines_at_point, find_stacked_lines, LineHit, StackedLines};

use crate::config::EngineSettings;
use crate::mapper::{CoordinateMapper, Scales};
use crate::tools::ToolRegistry;

/// Everything a hit test reads besides the drawings themselves.
#[derive(Clone, Copy)]
pub struct HitContext<'a> {
    pub mapper: &'a dyn CoordinateMapper,
    pub scales: &'a Scales,
    pub registry: &'a ToolRegistry,
    pub settings: &'a EngineSettings,
}
