//! Chain execution: compiling a chain for one frame time and mapping point frames through it.

/// Compiled chains and the frame entry point.
pub mod executor;
/// Render options and per-frame statistics.
pub mod stats;
