//! Drag and resize gestures.
//!
//! Exactly one [`Gesture`] is active at a time. Every mutating gesture
//! follows start, update, commit: it keeps a snapshot of each affected
//! drawing from the start so the commit can record an undo entry (or skip
//! it for a zero-displacement drag) and an abandoned gesture can be
//! reverted.
//!
//! ## Module Structure
//!
//! - [`direct_move`] - Whole-drawing moves, including multi-selection
//! - [`handle_resize`] - Single point handles
//! - [`custom_handle`] - Role-based handles interpreted by the shape
//! - [`double_click`] - Double activation on a handle

mod custom_handle;
mod direct_move;
mod double_click;
mod handle_resize;

#[cfg(test)]
mod tests;

pub use custom_handle::CustomHandleResize;
pub use direct_move::{DirectMove, MoveTarget};
pub use double_click::DoubleClickDetector;
pub use handle_resize::HandleResize;

use bevy::prelude::*;

use crate::drawing::{Drawing, DrawingId};
use crate::error::{EngineError, EngineResult};
use crate::hit_testing::{drawing_distance, HitContext};
use crate::selection::Marquee;

/// The one interaction in progress.
#[derive(Debug, Default)]
pub enum Gesture {
    #[default]
    None,
    /// A tool is collecting points. `continuous` tools sample while the
    /// primary button is held.
    Collecting { continuous: bool },
    DirectMove(DirectMove),
    HandleResize(HandleResize),
    CustomHandleResize(CustomHandleResize),
    Marquee(Marquee),
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::None)
    }

    /// Drawings are being mutated by the pointer
    pub fn is_drag(&self) -> bool {
        matches!(
            self,
            Gesture::DirectMove(_) | Gesture::HandleResize(_) | Gesture::CustomHandleResize(_)
        )
    }

    /// Gestures that only make sense while the primary button is down
    pub fn needs_primary_held(&self) -> bool {
        match self {
            Gesture::Collecting { continuous } => *continuous,
            Gesture::None => false,
            _ => true,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Gesture::None => "none",
            Gesture::Collecting { .. } => "collecting",
            Gesture::DirectMove(_) => "direct move",
            Gesture::HandleResize(_) => "handle resize",
            Gesture::CustomHandleResize(_) => "custom handle resize",
            Gesture::Marquee(_) => "marquee",
        }
    }
}

/// Check that drawing `id` may be dragged from `point` and return its index.
///
/// Both pointer-captured drags and drags started from a hit test go through
/// here: the drawing must still be live and unlocked, and circles and
/// ellipses only move when grabbed by their border.
pub fn check_drag_target(
    drawings: &[Drawing],
    id: DrawingId,
    point: Vec2,
    ctx: &HitContext<'_>,
) -> EngineResult<usize> {
    let index = drawings
        .iter()
        .position(|d| d.id() == id)
        .ok_or(EngineError::StaleDrawing(id))?;
    let drawing = &drawings[index];
    if drawing.locked {
        return Err(EngineError::DrawingLocked(id));
    }
    if ctx.registry.family_of(drawing.tool()).is_round() && drawing_distance(drawing, point, ctx).is_none() {
        return Err(EngineError::InteriorGrab(id));
    }
    Ok(index)
}
