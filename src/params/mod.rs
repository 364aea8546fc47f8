//! Effect parameters: declared specs, modulators and per-frame/per-point resolution.

/// Time and spatial modulators.
pub mod modulator;
/// Binding resolution into typed values.
pub mod resolve;
/// Parameter kinds, specs and stored values.
pub mod spec;
