use std::f64::consts::{SQRT_2, TAU};

use serde::{Deserialize, Serialize};

use crate::foundation::core::{Point, PointCtx, TimeCtx};

/// Clock a modulator or keyframe timeline runs on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    /// Wall-clock seconds.
    #[default]
    Seconds,
    /// Musical beats at the current tempo.
    Beats,
}

impl TimeUnit {
    /// Elapsed time in this unit.
    pub fn elapsed(self, time: TimeCtx) -> f64 {
        match self {
            Self::Seconds => time.seconds(),
            Self::Beats => time.beats(),
        }
    }
}

/// Shape of a modulator.
///
/// The first group depends on time only and is evaluated once per frame. The spatial group
/// also reads the point being processed and forces per-point resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Waveform {
    /// Smooth oscillation starting at the midpoint.
    Sine,
    /// Linear up then down.
    Triangle,
    /// `max` for the first half of each cycle, `min` for the second.
    Square,
    /// Ramp from `min` to `max`.
    Sawtooth,
    /// Ramp from `max` to `min`.
    ReverseSawtooth,
    /// A new pseudo-random level every cycle.
    Random,
    /// Follows the point's horizontal position.
    PositionX,
    /// Follows the point's vertical position.
    PositionY,
    /// Follows the point's distance from the origin.
    Radial,
    /// Follows the point's angle around the origin.
    Angle,
    /// Follows the point's index within the frame.
    PointIndex,
    /// Sine wave travelling horizontally across the frame over time.
    SpatialWave,
}

impl Waveform {
    /// Return `true` when evaluation needs the point's position or index.
    pub fn is_spatial(self) -> bool {
        matches!(
            self,
            Self::PositionX
                | Self::PositionY
                | Self::Radial
                | Self::Angle
                | Self::PointIndex
                | Self::SpatialWave
        )
    }
}

/// Time- or position-driven replacement for a static parameter value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Modulator {
    /// Inactive modulators resolve to [`Modulator::fallback`].
    #[serde(default = "default_active")]
    pub active: bool,
    /// Wave shape.
    pub waveform: Waveform,
    /// Output at the bottom of the wave.
    pub min: f64,
    /// Output at the top of the wave.
    pub max: f64,
    /// Cycle length in [`Modulator::unit`]s.
    #[serde(default = "default_period")]
    pub period: f64,
    /// Clock the period is measured on.
    #[serde(default)]
    pub unit: TimeUnit,
    /// Cycle offset in `[0, 1)`.
    #[serde(default)]
    pub phase: f64,
    /// Last static value, used while inactive.
    #[serde(default)]
    pub fallback: f64,
}

fn default_active() -> bool {
    true
}

fn default_period() -> f64 {
    1.0
}

impl Modulator {
    /// Active modulator sweeping `[min, max]` once per `period`.
    pub fn new(waveform: Waveform, min: f64, max: f64, period: f64, unit: TimeUnit) -> Self {
        Self {
            active: true,
            waveform,
            min,
            max,
            period,
            unit,
            phase: 0.0,
            fallback: min,
        }
    }

    /// Return `true` when this modulator must be evaluated per point.
    pub fn requires_spatial(&self) -> bool {
        self.active && self.waveform.is_spatial()
    }

    /// Completed cycles (fractional) at `time`. A non-positive period freezes the wave.
    pub fn cycles(&self, time: TimeCtx) -> f64 {
        if !(self.period.is_finite() && self.period > 0.0) {
            return self.phase;
        }
        self.unit.elapsed(time) / self.period + self.phase
    }

    /// Frame-level value. Spatial shapes are sampled at the origin.
    pub fn eval_global(&self, time: TimeCtx) -> f64 {
        if !self.active {
            return self.fallback;
        }
        let origin = Point::default();
        let ctx = PointCtx {
            index: 0,
            count: 1,
            time,
        };
        self.scale(self.level(&origin, &ctx))
    }

    /// Point-level value.
    pub fn eval_point(&self, point: &Point, ctx: &PointCtx) -> f64 {
        if !self.active {
            return self.fallback;
        }
        self.scale(self.level(point, ctx))
    }

    fn scale(&self, n: f64) -> f64 {
        self.min + (self.max - self.min) * n
    }

    /// Normalized wave level in `[0, 1]`.
    fn level(&self, point: &Point, ctx: &PointCtx) -> f64 {
        let cycles = self.cycles(ctx.time);
        let ph = cycles.rem_euclid(1.0);
        let n = match self.waveform {
            Waveform::Sine => 0.5 + 0.5 * (TAU * ph).sin(),
            Waveform::Triangle => 1.0 - (2.0 * ph - 1.0).abs(),
            Waveform::Square => {
                if ph < 0.5 {
                    1.0
                } else {
                    0.0
                }
            }
            Waveform::Sawtooth => ph,
            Waveform::ReverseSawtooth => 1.0 - ph,
            Waveform::Random => unit_hash(cycles.floor() as i64),
            Waveform::PositionX => (point.x + 1.0) * 0.5,
            Waveform::PositionY => (point.y + 1.0) * 0.5,
            Waveform::Radial => point.x.hypot(point.y) / SQRT_2,
            Waveform::Angle => (point.y.atan2(point.x) / TAU).rem_euclid(1.0),
            Waveform::PointIndex => ctx.progress(),
            Waveform::SpatialWave => 0.5 + 0.5 * (TAU * ((point.x + 1.0) * 0.5 + cycles)).sin(),
        };
        n.clamp(0.0, 1.0)
    }
}

/// Deterministic hash of a cycle index into `[0, 1)` (SplitMix64 finalizer).
fn unit_hash(cycle: i64) -> f64 {
    let mut z = (cycle as u64).wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^= z >> 31;
    ((z >> 11) as f64) / ((1u64 << 53) as f64)
}

#[cfg(test)]
#[path = "../../tests/unit/params/modulator.rs"]
mod tests;
