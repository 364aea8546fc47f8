//! Per-projector correction effects, normally placed at the end of a projector chain.

use kurbo::Affine;

use crate::effects::registry::{EffectCategory, EffectDef, PointFn, TimingClass};
use crate::foundation::core::{Point, PointCtx};
use crate::foundation::error::FxResult;
use crate::foundation::math::{clamp01, kelvin_to_rgb};
use crate::params::resolve::ResolvedParams;
use crate::params::spec::ParamSpec;

const MATRIX_KEYS: [[&str; 3]; 3] = [
    ["m00", "m01", "m02"],
    ["m10", "m11", "m12"],
    ["m20", "m21", "m22"],
];

/// Built-in calibration effect definitions.
pub fn definitions() -> Vec<EffectDef> {
    let mut matrix_params = Vec::with_capacity(12);
    for (row, keys) in MATRIX_KEYS.iter().enumerate() {
        for (col, key) in keys.iter().enumerate() {
            let identity = if row == col { 1.0 } else { 0.0 };
            matrix_params.push(ParamSpec::float(key, identity, -2.0, 2.0));
        }
    }
    for key in ["offset_r", "offset_g", "offset_b"] {
        matrix_params.push(ParamSpec::float(key, 0.0, -1.0, 1.0));
    }

    vec![
        def("rgb-gain", "RGB Gain", rgb_params(1.0, 0.0, 2.0), rgb_gain),
        def("rgb-gamma", "RGB Gamma", rgb_params(1.0, 0.1, 5.0), rgb_gamma),
        def(
            "color-temperature",
            "Color Temperature",
            vec![ParamSpec::float("kelvin", 6600.0, 1000.0, 40000.0)],
            color_temperature,
        ),
        def("color-matrix", "Color Matrix", matrix_params, color_matrix),
        def(
            "white-balance",
            "White Balance",
            rgb_params(1.0, 0.0, 1.0),
            white_balance,
        ),
        def(
            "axis-flip",
            "Axis Flip",
            vec![ParamSpec::bool("flip_x", false), ParamSpec::bool("flip_y", false)],
            axis_flip,
        ),
        def(
            "rotation-offset",
            "Rotation Offset",
            vec![ParamSpec::float("angle", 0.0, -180.0, 180.0)],
            rotation_offset,
        ),
    ]
}

fn def(id: &str, name: &str, params: Vec<ParamSpec>, apply: PointFn) -> EffectDef {
    EffectDef::point(id, name, EffectCategory::Calibration, TimingClass::Static, params, apply)
}

fn rgb_params(default: f64, min: f64, max: f64) -> Vec<ParamSpec> {
    ["r", "g", "b"]
        .into_iter()
        .map(|k| ParamSpec::float(k, default, min, max))
        .collect()
}

fn rgb(params: &ResolvedParams) -> FxResult<[f64; 3]> {
    Ok([params.f64("r")?, params.f64("g")?, params.f64("b")?])
}

fn multiplied(p: Point, [r, g, b]: [f64; 3]) -> Point {
    p.with_rgb(clamp01(p.r * r), clamp01(p.g * g), clamp01(p.b * b))
}

fn rgb_gain(p: Point, params: &ResolvedParams, _ctx: &PointCtx) -> FxResult<Point> {
    Ok(multiplied(p, rgb(params)?))
}

/// Per-channel `c^gamma`, compensating a diode's non-linear response.
fn rgb_gamma(p: Point, params: &ResolvedParams, _ctx: &PointCtx) -> FxResult<Point> {
    let [gr, gg, gb] = rgb(params)?;
    Ok(p.with_rgb(
        clamp01(p.r).powf(gr),
        clamp01(p.g).powf(gg),
        clamp01(p.b).powf(gb),
    ))
}

fn color_temperature(p: Point, params: &ResolvedParams, _ctx: &PointCtx) -> FxResult<Point> {
    Ok(multiplied(p, kelvin_to_rgb(params.f64("kelvin")?)))
}

fn color_matrix(p: Point, params: &ResolvedParams, _ctx: &PointCtx) -> FxResult<Point> {
    let input = p.rgb();
    let offsets = [
        params.f64("offset_r")?,
        params.f64("offset_g")?,
        params.f64("offset_b")?,
    ];
    let mut out = [0.0; 3];
    for (row, keys) in MATRIX_KEYS.iter().enumerate() {
        let mut acc = offsets[row];
        for (col, key) in keys.iter().enumerate() {
            acc += params.f64(key)? * input[col];
        }
        out[row] = clamp01(acc);
    }
    Ok(p.with_rgb(out[0], out[1], out[2]))
}

/// Scale channels by their ratio to the strongest one, so the brightest channel stays at full
/// output.
fn white_balance(p: Point, params: &ResolvedParams, _ctx: &PointCtx) -> FxResult<Point> {
    let [r, g, b] = rgb(params)?;
    let max = r.max(g).max(b);
    if max <= 0.0 {
        return Ok(p);
    }
    Ok(multiplied(p, [r / max, g / max, b / max]))
}

fn axis_flip(p: Point, params: &ResolvedParams, _ctx: &PointCtx) -> FxResult<Point> {
    let x = if params.bool("flip_x")? { -p.x } else { p.x };
    let y = if params.bool("flip_y")? { -p.y } else { p.y };
    Ok(p.with_xy(x, y))
}

/// Compensates the projector's mount angle; counter-clockwise about the origin.
fn rotation_offset(p: Point, params: &ResolvedParams, _ctx: &PointCtx) -> FxResult<Point> {
    Ok(p.transformed(Affine::rotate(params.f64("angle")?.to_radians())))
}

#[cfg(test)]
#[path = "../../tests/unit/effects/calibration.rs"]
mod tests;
