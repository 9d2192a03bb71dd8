//! Tool activation and point collection.
//!
//! ## Module Structure
//!
//! - [`registry`] - Tool identifier to constructor and behaviour flags
//! - [`builtin`] - The built-in tool set
//! - [`state`] - Idle / Armed / Collecting state machine
//! - [`constraints`] - Per-tool point constraints applied before a point is added

mod builtin;
mod constraints;
mod registry;
mod state;


pub use constraints::{constrain_point, synthesize_position};
pub use registry::{
    CreationBehavior, PointConstraint, PointCount, ShapeFactory, ToolFamily, ToolRegistry, ToolSpec,
};
pub use state::{AddPointOutcome, DrawingStateMachine, ToolState};
