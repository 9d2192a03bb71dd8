//! Pixel-space geometry shared by hit testing, point constraints and rendering.
//!
//! Everything here works on `Vec2` screen coordinates (y grows downward).
//!
//! ## Module Structure
//!
//! - [`distance`] - Point-to-primitive distances and effective tolerances
//! - [`snapping`] - Angle snap, perpendicular projection, line extension

mod distance;
mod snapping;

pub use distance::{
    circle_border_distance, effective_tolerance, ellipse_border_distance, point_in_polygon,
    point_to_line_distance, polyline_distance, rect_border_distance, rects_overlap,
};
pub use snapping::{extend_line, project_onto_perpendicular, snap_to_angle, ANGLE_SNAP_STEP};

/// Vectors shorter than this are treated as zero length
pub const EPS_LEN: f32 = 1e-6;

/// Radii are floored to this before dividing
pub const EPS_RADIUS: f32 = 1e-3;
