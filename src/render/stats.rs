use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::chain::instance::EffectInstance;
use crate::chain::tree::ChainNode;
use crate::effects::registry::EffectRegistry;
use crate::foundation::core::{Frame, Point, TimeCtx};
use crate::foundation::error::{FxError, FxResult};
use crate::render::executor::compile_chain;

/// Render-loop options. Missing fields in a JSON file take their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOpts {
    /// Tempo used when the caller's BPM is missing or not positive.
    pub default_bpm: f64,
    /// Measure chain time for [`FrameStats::effects_time_us`].
    pub collect_stats: bool,
    /// Warn when applying a chain takes longer than this many microseconds.
    pub slow_chain_warn_us: Option<u64>,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            default_bpm: 120.0,
            collect_stats: true,
            slow_chain_warn_us: Some(5_000),
        }
    }
}

impl RenderOpts {
    /// Reject unusable option values.
    pub fn validate(&self) -> FxResult<()> {
        if !self.default_bpm.is_finite() || self.default_bpm <= 0.0 {
            return Err(FxError::validation("default_bpm must be finite and > 0"));
        }
        if self.slow_chain_warn_us == Some(0) {
            return Err(FxError::validation("slow_chain_warn_us must be > 0 when set"));
        }
        Ok(())
    }

    /// Time context for a frame, substituting [`RenderOpts::default_bpm`] for unusable tempos.
    pub fn time_ctx(&self, time_ms: f64, bpm: f64) -> TimeCtx {
        let bpm = if bpm.is_finite() && bpm > 0.0 {
            bpm
        } else {
            self.default_bpm
        };
        TimeCtx::new(time_ms, bpm)
    }
}

/// What one chain application cost.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameStats {
    /// Wall time spent compiling and applying the chain; `0` when stats are off.
    pub effects_time_us: u64,
    /// Stages that ran.
    pub effect_count: usize,
    /// Points in the output frame.
    pub point_count: usize,
    /// Enabled instances that passed their input through (unknown, unresolvable or failed).
    pub passthrough_count: usize,
}

/// Per-frame timing split between base generation and the effect chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameTiming {
    /// Time the caller spent producing the base points.
    pub base_time_us: u64,
    /// Time spent in the effect chain.
    pub effects_time_us: u64,
}

impl FrameTiming {
    /// Combine a caller-measured base time with chain stats.
    pub fn new(base_time_us: u64, stats: &FrameStats) -> Self {
        Self {
            base_time_us,
            effects_time_us: stats.effects_time_us,
        }
    }

    /// Whole frame generation time.
    pub fn total_us(&self) -> u64 {
        self.base_time_us.saturating_add(self.effects_time_us)
    }
}

/// [`render_frame`](crate::render_frame) plus timing and passthrough counts.
#[tracing::instrument(skip_all, fields(points = base.len(), time_ms = time_ms))]
pub fn render_frame_with_stats(
    registry: &EffectRegistry,
    nodes: &[ChainNode<EffectInstance>],
    base: &[Point],
    time_ms: f64,
    bpm: f64,
    opts: &RenderOpts,
) -> (Frame, FrameStats) {
    let started = opts.collect_stats.then(Instant::now);

    let chain = compile_chain(registry, nodes, opts.time_ctx(time_ms, bpm));
    let (out, bypassed) = chain.apply_counted(base);

    let effects_time_us = started
        .map(|t| u64::try_from(t.elapsed().as_micros()).unwrap_or(u64::MAX))
        .unwrap_or(0);
    let stats = FrameStats {
        effects_time_us,
        effect_count: chain.len(),
        point_count: out.len(),
        passthrough_count: chain.skipped() + bypassed,
    };

    tracing::debug!(
        effects_time_us = stats.effects_time_us,
        effects = stats.effect_count,
        points = stats.point_count,
        passthrough = stats.passthrough_count,
        "effect chain applied"
    );
    if opts.collect_stats
        && let Some(limit) = opts.slow_chain_warn_us
        && stats.effects_time_us > limit
    {
        tracing::warn!(
            effects_time_us = stats.effects_time_us,
            limit_us = limit,
            "effect chain is running slow"
        );
    }

    (out, stats)
}

#[cfg(test)]
#[path = "../../tests/unit/render/stats.rs"]
mod tests;
