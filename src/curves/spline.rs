use std::sync::Arc;

use crate::curves::points::{CurvePoint, validate_control_points};
use crate::foundation::error::{FxError, FxResult};

/// Number of entries in a channel lookup table.
pub const LUT_SIZE: usize = 256;

/// Evaluate a curve at `x`.
///
/// `points` must be sorted by `x`. One point yields a constant, two points a clamped linear
/// ramp, three or more a uniform Catmull-Rom spline (tension 0.5) through every point. An empty
/// list is the identity curve.
pub fn interpolate_at(points: &[CurvePoint], x: f64) -> f64 {
    match points {
        [] => x,
        [only] => only.y,
        [a, b] => {
            let span = b.x - a.x;
            if span.abs() <= f64::EPSILON {
                return b.y;
            }
            let t = ((x - a.x) / span).clamp(0.0, 1.0);
            if t >= 1.0 {
                return b.y;
            }
            a.y + (b.y - a.y) * t
        }
        _ => catmull_rom_at(points, x),
    }
}

fn catmull_rom_at(points: &[CurvePoint], x: f64) -> f64 {
    let last_segment = points.len() - 2;
    let seg = (0..=last_segment)
        .find(|&i| x <= points[i + 1].x)
        .unwrap_or(last_segment);

    let p1 = points[seg];
    let p2 = points[seg + 1];
    let p0 = if seg == 0 { p1 } else { points[seg - 1] };
    let p3 = points.get(seg + 2).copied().unwrap_or(p2);

    let span = p2.x - p1.x;
    if span.abs() <= f64::EPSILON {
        return p2.y;
    }
    let t = ((x - p1.x) / span).clamp(0.0, 1.0);
    // Exact at the knots so LUT endpoints match the control points bit for bit.
    if t <= 0.0 {
        return p1.y;
    }
    if t >= 1.0 {
        return p2.y;
    }
    let t2 = t * t;
    let t3 = t2 * t;

    0.5 * ((2.0 * p1.y)
        + (-p0.y + p2.y) * t
        + (2.0 * p0.y - 5.0 * p1.y + 4.0 * p2.y - p3.y) * t2
        + (-p0.y + 3.0 * p1.y - 3.0 * p2.y + p3.y) * t3)
}

/// Sample a curve at `resolution` evenly spaced inputs across `[0, 1]`.
///
/// Samples are clamped into `[0, 1]` to absorb spline overshoot. `resolution` must be at
/// least 2.
pub fn build_lut(points: &[CurvePoint], resolution: usize) -> FxResult<Vec<f64>> {
    if resolution < 2 {
        return Err(FxError::curve("LUT resolution must be >= 2"));
    }
    Ok(sample_curve(points, resolution))
}

fn sample_curve(points: &[CurvePoint], resolution: usize) -> Vec<f64> {
    let denom = (resolution - 1) as f64;
    (0..resolution)
        .map(|i| interpolate_at(points, (i as f64) / denom).clamp(0.0, 1.0))
        .collect()
}

/// A 256-entry channel remap table derived from curve control points.
#[derive(Clone, Debug, PartialEq)]
pub struct Lut {
    values: Arc<[f64]>,
}

impl Lut {
    /// Repair `points` and build the table. Never fails: degenerate input falls back to the
    /// identity curve.
    pub fn from_points(points: &[CurvePoint]) -> Self {
        let points = validate_control_points(points);
        Self {
            values: sample_curve(&points, LUT_SIZE).into(),
        }
    }

    /// The identity table.
    pub fn identity() -> Self {
        Self::from_points(&[])
    }

    /// Look up a normalized channel value.
    pub fn sample(&self, v: f64) -> f64 {
        let last = self.values.len() - 1;
        let v = if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        let idx = (v * last as f64).round() as usize;
        self.values[idx.min(last)]
    }

    /// Raw table entries.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

#[cfg(test)]
#[path = "../../tests/unit/curves/spline.rs"]
mod tests;
