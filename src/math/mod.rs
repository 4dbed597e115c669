pub mod arc_2d;

/// Tolerance used for bulge-zero tests and mirror-involution checks.
pub const EPSILON: f64 = 1e-9;

/// Tolerance used by the segment connector's collinearity test, in
/// millimeters.
pub const COLLINEARITY_EPSILON: f64 = 0.01;

/// Default endpoint-proximity tolerance for the segment connector, in
/// millimeters.
pub const DEFAULT_CONNECTION_TOLERANCE: f64 = 0.1;
