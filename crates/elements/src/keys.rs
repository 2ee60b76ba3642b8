//! View-state keys read by the shapes

pub const X: &str = "x";
pub const Y: &str = "y";
pub const BASE: &str = "base";
pub const WIDTH: &str = "width";
pub const RADIUS: &str = "radius";
pub const HIT_RADIUS: &str = "hitRadius";
pub const START_ANGLE: &str = "startAngle";
pub const END_ANGLE: &str = "endAngle";
pub const INNER_RADIUS: &str = "innerRadius";
pub const OUTER_RADIUS: &str = "outerRadius";
pub const TENSION: &str = "tension";
pub const SKIP: &str = "skip";
pub const FILL: &str = "fill";
/// Pixel an open line's fill extends to
pub const SCALE_ZERO: &str = "scaleZero";

pub const BACKGROUND_COLOR: &str = "backgroundColor";
pub const BORDER_COLOR: &str = "borderColor";
pub const BORDER_WIDTH: &str = "borderWidth";

pub const CONTROL_POINT_PREVIOUS_X: &str = "controlPointPreviousX";
pub const CONTROL_POINT_PREVIOUS_Y: &str = "controlPointPreviousY";
pub const CONTROL_POINT_NEXT_X: &str = "controlPointNextX";
pub const CONTROL_POINT_NEXT_Y: &str = "controlPointNextY";

/// Fill and stroke used when an element has no color of its own
pub const DEFAULT_COLOR: &str = "rgba(0,0,0,0.1)";
