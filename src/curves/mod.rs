//! Tone curves: control-point editing, Catmull-Rom interpolation and 256-entry LUTs.

/// Control points and edit operations.
pub mod points;
/// Interpolation and lookup tables.
pub mod spline;
