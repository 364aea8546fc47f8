//! Effect definitions and the built-in effect library.

/// Calibration effects.
pub mod calibration;
/// Color effects.
pub mod color;
/// Intensity effects.
pub mod intensity;
/// Registry and definition types.
pub mod registry;
/// Geometric effects.
pub mod shape;
