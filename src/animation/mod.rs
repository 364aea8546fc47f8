//! Keyframe timelines for effect instances.

/// Keyframe modulator evaluation and edits.
pub mod keyframes;
