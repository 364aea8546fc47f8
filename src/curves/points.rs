use serde::{Deserialize, Serialize};

/// Smallest horizontal spacing kept between neighbouring control points.
pub const MIN_X_GAP: f64 = 1e-3;

/// One curve control point in the unit square.
///
/// Serialized as a plain `[x, y]` pair; `{ "x": .., "y": .. }` objects are accepted on input.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(into = "[f64; 2]")]
pub struct CurvePoint {
    /// Input value in `[0, 1]`.
    pub x: f64,
    /// Output value in `[0, 1]`.
    pub y: f64,
}

impl CurvePoint {
    /// Build a control point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<CurvePoint> for [f64; 2] {
    fn from(p: CurvePoint) -> Self {
        [p.x, p.y]
    }
}

impl<'de> Deserialize<'de> for CurvePoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Arr([f64; 2]),
            Obj { x: f64, y: f64 },
        }

        match Repr::deserialize(deserializer)? {
            Repr::Arr([x, y]) => Ok(Self { x, y }),
            Repr::Obj { x, y } => Ok(Self { x, y }),
        }
    }
}

/// The straight `y = x` curve.
pub fn identity_curve() -> Vec<CurvePoint> {
    vec![CurvePoint::new(0.0, 0.0), CurvePoint::new(1.0, 1.0)]
}

/// Repair an arbitrary control-point list into a valid curve.
///
/// Non-finite points are dropped, coordinates are clamped into the unit square, points are
/// sorted by `x` (the later of two points sharing an `x` wins), and the first/last points are
/// pinned to `x = 0` and `x = 1` by inserting a point carrying the nearest `y` when missing.
/// An empty result falls back to [`identity_curve`].
pub fn validate_control_points(points: &[CurvePoint]) -> Vec<CurvePoint> {
    let mut out: Vec<CurvePoint> = points
        .iter()
        .filter(|p| p.x.is_finite() && p.y.is_finite())
        .map(|p| CurvePoint::new(p.x.clamp(0.0, 1.0), p.y.clamp(0.0, 1.0)))
        .collect();
    if out.is_empty() {
        return identity_curve();
    }

    // sort_by is stable: among equal x the later input point wins.
    out.sort_by(|a, b| a.x.total_cmp(&b.x));
    let mut deduped: Vec<CurvePoint> = Vec::with_capacity(out.len() + 2);
    for p in out {
        match deduped.last_mut() {
            Some(last) if last.x == p.x => *last = p,
            _ => deduped.push(p),
        }
    }

    if let Some(first) = deduped.first().copied()
        && first.x > 0.0
    {
        deduped.insert(0, CurvePoint::new(0.0, first.y));
    }
    if let Some(last) = deduped.last().copied()
        && last.x < 1.0
    {
        deduped.push(CurvePoint::new(1.0, last.y));
    }
    deduped
}

/// Return `true` when `index` addresses the first or last point.
pub fn is_corner(points: &[CurvePoint], index: usize) -> bool {
    index == 0 || index + 1 == points.len()
}

/// Insert a point, keeping the list sorted by `x`.
///
/// Returns the new list and the index of the inserted point. A point that would land within
/// [`MIN_X_GAP`] of an existing point (corners included) is refused: the input comes back
/// unchanged with `None`.
pub fn add_point(points: &[CurvePoint], x: f64, y: f64) -> (Vec<CurvePoint>, Option<usize>) {
    if !x.is_finite() || !y.is_finite() {
        return (points.to_vec(), None);
    }
    let x = x.clamp(0.0, 1.0);
    let y = y.clamp(0.0, 1.0);
    if points.iter().any(|p| (p.x - x).abs() < MIN_X_GAP) {
        return (points.to_vec(), None);
    }

    let idx = points.partition_point(|p| p.x < x);
    let mut out = points.to_vec();
    out.insert(idx, CurvePoint::new(x, y));
    (out, Some(idx))
}

/// Move the point at `index`.
///
/// Corners keep their `x` and only take the new `y`. Interior points have `x` clamped between
/// their neighbours so the sort order never changes. Out-of-range indices are a no-op.
pub fn update_point(points: &[CurvePoint], index: usize, x: f64, y: f64) -> Vec<CurvePoint> {
    let mut out = points.to_vec();
    let Some(current) = out.get(index).copied() else {
        return out;
    };
    let y = if y.is_finite() {
        y.clamp(0.0, 1.0)
    } else {
        current.y
    };

    let x = if is_corner(points, index) || !x.is_finite() {
        current.x
    } else {
        let lo = points[index - 1].x + MIN_X_GAP;
        let hi = points[index + 1].x - MIN_X_GAP;
        if lo > hi { current.x } else { x.clamp(lo, hi) }
    };

    out[index] = CurvePoint::new(x, y);
    out
}

/// Remove the point at `index`. Corners and out-of-range indices are refused (no-op).
pub fn remove_point(points: &[CurvePoint], index: usize) -> Vec<CurvePoint> {
    let mut out = points.to_vec();
    if index < points.len() && !is_corner(points, index) {
        out.remove(index);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/curves/points.rs"]
mod tests;
