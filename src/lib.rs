//! laserfx is the effects pipeline of a laser show controller.
//!
//! A frame is an ordered list of [`Point`]s in normalized coordinates. Effect chains built
//! from [`EffectInstance`]s (optionally nested in groups) map each frame at a given show time
//! and tempo:
//!
//! - Declare effects in an [`EffectRegistry`] (the built-ins cover color, shape, intensity and
//!   projector calibration)
//! - Bind parameters statically, through modulators or through keyframe timelines
//! - Call [`render_frame`] once per output frame, or [`compile_chain`] to reuse the resolved
//!   chain across several frames at the same instant
//!
//! Rendering never fails: unknown effects and failing instances pass their input through.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Keyframe timelines.
pub mod animation;
/// Chain tree, selection and storage.
pub mod chain;
/// Tone curves and LUTs.
pub mod curves;
/// Effect registry and built-in effects.
pub mod effects;
/// Points, time, errors and math.
pub mod foundation;
/// Parameter specs, modulators and resolution.
pub mod params;
/// Chain execution and frame statistics.
pub mod render;

pub use crate::animation::keyframes::{Keyframe, KeyframeModulator, LoopMode};
pub use crate::chain::instance::{Animation, ChainLeaf, EffectInstance, PresetInstance};
pub use crate::chain::selection::{Selection, normalize_selected_paths, range_select};
pub use crate::chain::store::{ChainDocument, ChainDomain, ChainKey, ChainSnapshot, ChainStore};
pub use crate::chain::tree::{ChainGroup, ChainNode, DropPosition, NodePath};
pub use crate::curves::points::CurvePoint;
pub use crate::curves::spline::{Lut, build_lut, interpolate_at};
pub use crate::effects::registry::{
    EffectApply, EffectCategory, EffectDef, EffectRegistry, FrameFn, PointFn, TimingClass,
};
pub use crate::foundation::core::{DEFAULT_BPM, Frame, Point, PointCtx, TimeCtx};
pub use crate::foundation::error::{FxError, FxResult};
pub use crate::params::modulator::{Modulator, TimeUnit, Waveform};
pub use crate::params::resolve::{ParamBinding, ParamMap, ResolvedParams, ResolvedValue};
pub use crate::params::spec::{ParamKind, ParamSpec, ParamValue};
pub use crate::render::executor::{CompiledChain, compile_chain, render_frame};
pub use crate::render::stats::{FrameStats, FrameTiming, RenderOpts, render_frame_with_stats};
