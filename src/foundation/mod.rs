//! Shared primitives: points and frames, time contexts, errors and color/coordinate math.

/// Points, frames and time contexts.
pub mod core;
/// Error taxonomy.
pub mod error;
/// Color conversions, clamps and hardware coordinate conversions.
pub mod math;
