//! The built-in tool set.

use super::registry::{CreationBehavior, PointConstraint, PointCount, ToolFamily, ToolSpec};
use crate::shapes::{
    ArrowShape, CircleShape, DisjointChannel, EllipseShape, FibRetracement, FlatTopBottom,
    FreehandShape, HorizontalLine, ImageShape, LineShape, ParallelChannel, PolylineShape,
    PositionShape, PositionSide, RectangleShape, RulerShape, StickerShape, TextShape,
    TriangleShape, VerticalLine, XabcdPattern,
};

use PointCount::{Continuous, Fixed, PointByPoint};

pub(super) fn builtin_tools() -> Vec<ToolSpec> {
    vec![
        // Lines
        ToolSpec::new("trendline", Fixed(2), ToolFamily::Line, || Box::new(LineShape::segment())).angle_snapping(),
        ToolSpec::new("ray", Fixed(2), ToolFamily::Line, || Box::new(LineShape::ray())).angle_snapping(),
        ToolSpec::new("extended_line", Fixed(2), ToolFamily::Line, || Box::new(LineShape::extended()))
            .angle_snapping(),
        ToolSpec::new("ruler", Fixed(2), ToolFamily::Line, || Box::new(RulerShape)).angle_snapping(),
        ToolSpec::new("arrow", Fixed(2), ToolFamily::Arrow, || Box::new(ArrowShape)).angle_snapping(),
        ToolSpec::new("horizontal_line", Fixed(1), ToolFamily::Line, || Box::new(HorizontalLine)),
        ToolSpec::new("vertical_line", Fixed(1), ToolFamily::Line, || Box::new(VerticalLine)),
        // Studies and channels
        ToolSpec::new("fib_retracement", Fixed(2), ToolFamily::Line, || Box::new(FibRetracement)).angle_snapping(),
        ToolSpec::new("parallel_channel", Fixed(3), ToolFamily::Line, || Box::new(ParallelChannel))
            .with_constraint(PointConstraint::Perpendicular),
        ToolSpec::new("flat_top_bottom", Fixed(3), ToolFamily::Line, || Box::new(FlatTopBottom))
            .with_constraint(PointConstraint::PinnedX),
        ToolSpec::new("disjoint_channel", Fixed(3), ToolFamily::Line, || Box::new(DisjointChannel))
            .with_constraint(PointConstraint::PinnedX),
        // Shapes
        ToolSpec::new("rectangle", Fixed(2), ToolFamily::Rect, || Box::new(RectangleShape)),
        ToolSpec::new("triangle", Fixed(3), ToolFamily::Triangle, || Box::new(TriangleShape)),
        ToolSpec::new("circle", Fixed(2), ToolFamily::Circle, || Box::new(CircleShape)),
        ToolSpec::new("ellipse", Fixed(2), ToolFamily::Ellipse, || Box::new(EllipseShape)),
        // Paths
        ToolSpec::new("polyline", PointByPoint, ToolFamily::Path, || Box::new(PolylineShape::open()))
            .angle_snapping(),
        ToolSpec::new("path", PointByPoint, ToolFamily::Path, || Box::new(PolylineShape::arrowed())),
        ToolSpec::new("brush", Continuous, ToolFamily::Path, || Box::new(FreehandShape::brush())).persistent(),
        ToolSpec::new("highlighter", Continuous, ToolFamily::Path, || Box::new(FreehandShape::highlighter()))
        .persistent(),
        // Annotations
        ToolSpec::new("text", Fixed(1), ToolFamily::Region, || Box::new(TextShape::text()))
            .with_behavior(CreationBehavior::DeferredText),
        ToolSpec::new("note", Fixed(1), ToolFamily::Region, || Box::new(TextShape::note()))
            .with_behavior(CreationBehavior::DeferredText),
        ToolSpec::new("image", Fixed(2), ToolFamily::Region, || Box::new(ImageShape::default()))
            .with_behavior(CreationBehavior::ImagePlaceholder),
        ToolSpec::new("sticker", Fixed(1), ToolFamily::Region, || Box::new(StickerShape::default()))
            .with_behavior(CreationBehavior::Sticker),
        // Positions and patterns
        ToolSpec::new("long_position", Fixed(3), ToolFamily::Region, || Box::new(PositionShape::long()))
        .with_behavior(CreationBehavior::RiskReward(PositionSide::Long)),
        ToolSpec::new("short_position", Fixed(3), ToolFamily::Region, || Box::new(PositionShape::short()))
        .with_behavior(CreationBehavior::RiskReward(PositionSide::Short)),
        ToolSpec::new("xabcd_pattern", Fixed(5), ToolFamily::Region, || Box::new(XabcdPattern)),
    ]
}
