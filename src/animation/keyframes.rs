use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::foundation::core::TimeCtx;
use crate::foundation::error::{FxError, FxResult};
use crate::foundation::math::{clamp01, lerp};
use crate::params::modulator::TimeUnit;
use crate::params::spec::ParamValue;

/// How the timeline behaves once a full period has elapsed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopMode {
    /// Wrap back to the start.
    #[default]
    Loop,
    /// Play once and hold the final keyframe.
    Once,
    /// Alternate forward and backward traversals.
    PingPong,
}

/// Parameter values pinned at one position of the timeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Position in `[0, 1]`.
    pub position: f64,
    /// Parameter values by key.
    pub values: BTreeMap<String, ParamValue>,
}

impl Keyframe {
    /// Keyframe at `position` (clamped into `[0, 1]`).
    pub fn new(position: f64, values: BTreeMap<String, ParamValue>) -> Self {
        Self {
            position: clamp01(position),
            values,
        }
    }
}

/// Interpolates every parameter of an effect instance along a timeline.
///
/// Always holds at least one keyframe, sorted by position, and a positive period.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "KeyframeModulatorDef")]
pub struct KeyframeModulator {
    period: f64,
    unit: TimeUnit,
    loop_mode: LoopMode,
    keyframes: Vec<Keyframe>,
}

#[derive(Deserialize)]
struct KeyframeModulatorDef {
    period: f64,
    #[serde(default)]
    unit: TimeUnit,
    #[serde(default)]
    loop_mode: LoopMode,
    keyframes: Vec<Keyframe>,
}

impl TryFrom<KeyframeModulatorDef> for KeyframeModulator {
    type Error = FxError;

    fn try_from(def: KeyframeModulatorDef) -> FxResult<Self> {
        Self::new(def.period, def.unit, def.loop_mode, def.keyframes)
    }
}

/// Period given to timelines created from a static snapshot, in seconds.
pub const DEFAULT_KEYFRAME_PERIOD: f64 = 4.0;

impl KeyframeModulator {
    /// Build a timeline. Positions are clamped and keyframes sorted.
    pub fn new(
        period: f64,
        unit: TimeUnit,
        loop_mode: LoopMode,
        keyframes: Vec<Keyframe>,
    ) -> FxResult<Self> {
        if keyframes.is_empty() {
            return Err(FxError::keyframe("a keyframe timeline needs at least one keyframe"));
        }
        check_period(period)?;
        let mut keyframes: Vec<Keyframe> = keyframes
            .into_iter()
            .map(|k| Keyframe::new(k.position, k.values))
            .collect();
        keyframes.sort_by(|a, b| a.position.total_cmp(&b.position));
        Ok(Self {
            period,
            unit,
            loop_mode,
            keyframes,
        })
    }

    /// Two identical keyframes at `0` and `1` holding `values`.
    pub fn from_values(values: BTreeMap<String, ParamValue>) -> Self {
        Self {
            period: DEFAULT_KEYFRAME_PERIOD,
            unit: TimeUnit::Seconds,
            loop_mode: LoopMode::Loop,
            keyframes: vec![Keyframe::new(0.0, values.clone()), Keyframe::new(1.0, values)],
        }
    }

    /// Keyframes in position order.
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Timeline length in [`KeyframeModulator::unit`]s.
    pub fn period(&self) -> f64 {
        self.period
    }

    /// Clock the period is measured on.
    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Behavior past the end of the timeline.
    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    /// Change the period. Non-positive periods are rejected.
    pub fn set_period(&mut self, period: f64) -> FxResult<()> {
        check_period(period)?;
        self.period = period;
        Ok(())
    }

    /// Change the clock.
    pub fn set_unit(&mut self, unit: TimeUnit) {
        self.unit = unit;
    }

    /// Change the loop behavior.
    pub fn set_loop_mode(&mut self, loop_mode: LoopMode) {
        self.loop_mode = loop_mode;
    }

    /// Timeline position in `[0, 1]` at `time`.
    pub fn phase(&self, time: TimeCtx) -> f64 {
        let t = self.unit.elapsed(time) / self.period;
        match self.loop_mode {
            LoopMode::Loop => t.rem_euclid(1.0),
            LoopMode::Once => clamp01(t),
            LoopMode::PingPong => {
                let p = t.rem_euclid(2.0);
                if p > 1.0 { 2.0 - p } else { p }
            }
        }
    }

    /// Interpolated values at `time`.
    pub fn values_at(&self, time: TimeCtx) -> BTreeMap<String, ParamValue> {
        self.values_at_phase(self.phase(time))
    }

    /// Interpolated values at a timeline position.
    ///
    /// Numbers are interpolated linearly between the bracketing keyframes; any other value
    /// snaps to the nearer keyframe.
    pub fn values_at_phase(&self, phase: f64) -> BTreeMap<String, ParamValue> {
        let phase = clamp01(phase);
        let upper = self.keyframes.partition_point(|k| k.position <= phase);
        if upper == 0 {
            return self.keyframes[0].values.clone();
        }
        if upper == self.keyframes.len() {
            return self.keyframes[upper - 1].values.clone();
        }
        let a = &self.keyframes[upper - 1];
        let b = &self.keyframes[upper];
        let span = b.position - a.position;
        let t = if span > 0.0 {
            (phase - a.position) / span
        } else {
            1.0
        };
        blend(&a.values, &b.values, t)
    }

    /// Insert a keyframe and return its index after sorting.
    ///
    /// Without explicit values the keyframe takes the timeline's interpolated values at that
    /// position.
    pub fn add_keyframe(
        &mut self,
        position: f64,
        values: Option<BTreeMap<String, ParamValue>>,
    ) -> usize {
        let position = clamp01(position);
        let values = values.unwrap_or_else(|| self.values_at_phase(position));
        let index = self.keyframes.partition_point(|k| k.position <= position);
        self.keyframes.insert(index, Keyframe::new(position, values));
        index
    }

    /// Move a keyframe and return the new index of the `selected` keyframe.
    ///
    /// Out-of-range indices leave the timeline unchanged.
    pub fn move_keyframe(
        &mut self,
        index: usize,
        position: f64,
        selected: Option<usize>,
    ) -> Option<usize> {
        if index >= self.keyframes.len() {
            return selected;
        }
        let mut tagged: Vec<(usize, Keyframe)> =
            std::mem::take(&mut self.keyframes).into_iter().enumerate().collect();
        tagged[index].1.position = clamp01(position);
        tagged.sort_by(|a, b| a.1.position.total_cmp(&b.1.position));
        let reselected = selected.and_then(|s| tagged.iter().position(|(orig, _)| *orig == s));
        self.keyframes = tagged.into_iter().map(|(_, k)| k).collect();
        reselected
    }

    /// Delete a keyframe and return `selected` clamped into the remaining range.
    ///
    /// The last remaining keyframe is never deleted; out-of-range indices are a no-op.
    pub fn delete_keyframe(&mut self, index: usize, selected: Option<usize>) -> Option<usize> {
        if self.keyframes.len() > 1 && index < self.keyframes.len() {
            self.keyframes.remove(index);
        }
        selected.map(|s| s.min(self.keyframes.len() - 1))
    }

    /// Set one parameter of one keyframe. Returns `false` for an out-of-range index.
    pub fn set_keyframe_value(&mut self, index: usize, key: &str, value: ParamValue) -> bool {
        match self.keyframes.get_mut(index) {
            Some(k) => {
                k.values.insert(key.to_owned(), value);
                true
            }
            None => false,
        }
    }
}

fn check_period(period: f64) -> FxResult<()> {
    if period.is_finite() && period > 0.0 {
        Ok(())
    } else {
        Err(FxError::keyframe(format!("period must be > 0, got {period}")))
    }
}

fn blend(
    a: &BTreeMap<String, ParamValue>,
    b: &BTreeMap<String, ParamValue>,
    t: f64,
) -> BTreeMap<String, ParamValue> {
    let mut out = a.clone();
    for (key, vb) in b {
        let v = match (a.get(key), vb) {
            (Some(ParamValue::Number(x)), ParamValue::Number(y)) => {
                ParamValue::Number(lerp(*x, *y, t))
            }
            (Some(va), _) if t < 0.5 => va.clone(),
            _ => vb.clone(),
        };
        out.insert(key.clone(), v);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/animation/keyframes.rs"]
mod tests;
