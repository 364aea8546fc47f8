//! Color effects: hue, saturation, replacement, filtering and curves.
//!
//! Every output channel is clamped into `[0, 1]`.

use crate::effects::registry::{EffectCategory, EffectDef, PointFn, TimingClass};
use crate::foundation::core::{Point, PointCtx};
use crate::foundation::error::FxResult;
use crate::foundation::math::{clamp01, hsv_to_rgb, rgb_distance, rgb_to_hsv};
use crate::params::resolve::ResolvedParams;
use crate::params::spec::ParamSpec;

/// Built-in color effect definitions.
pub fn definitions() -> Vec<EffectDef> {
    vec![
        def(
            "hue-shift",
            "Hue Shift",
            vec![ParamSpec::float("degrees", 0.0, -180.0, 180.0)],
            hue_shift,
        ),
        def(
            "saturation",
            "Saturation",
            vec![ParamSpec::float("amount", 1.0, 0.0, 2.0)],
            saturation,
        ),
        def(
            "color-replace",
            "Color Replace",
            vec![
                ParamSpec::float("from_r", 1.0, 0.0, 1.0),
                ParamSpec::float("from_g", 0.0, 0.0, 1.0),
                ParamSpec::float("from_b", 0.0, 0.0, 1.0),
                ParamSpec::float("to_r", 0.0, 0.0, 1.0),
                ParamSpec::float("to_g", 0.0, 0.0, 1.0),
                ParamSpec::float("to_b", 1.0, 0.0, 1.0),
                ParamSpec::float("tolerance", 0.1, 0.0, 3.0_f64.sqrt()),
            ],
            color_replace,
        ),
        def(
            "color-filter",
            "Color Filter",
            vec![
                ParamSpec::choice("mode", "rgb", &["rgb", "hsv"]),
                ParamSpec::float("r", 1.0, 0.0, 1.0),
                ParamSpec::float("g", 1.0, 0.0, 1.0),
                ParamSpec::float("b", 1.0, 0.0, 1.0),
                ParamSpec::float("hue_center", 0.0, 0.0, 360.0),
                ParamSpec::float("hue_width", 60.0, 0.0, 360.0),
            ],
            color_filter,
        ),
        def(
            "solid-color",
            "Solid Color",
            vec![
                ParamSpec::float("r", 1.0, 0.0, 1.0),
                ParamSpec::float("g", 1.0, 0.0, 1.0),
                ParamSpec::float("b", 1.0, 0.0, 1.0),
            ],
            solid_color,
        ),
        def(
            "color-curves",
            "Color Curves",
            vec![
                ParamSpec::curve("red"),
                ParamSpec::curve("green"),
                ParamSpec::curve("blue"),
            ],
            color_curves,
        ),
    ]
}

fn def(id: &str, name: &str, params: Vec<ParamSpec>, apply: PointFn) -> EffectDef {
    EffectDef::point(id, name, EffectCategory::Color, TimingClass::Static, params, apply)
}

fn with_rgb_clamped(p: Point, [r, g, b]: [f64; 3]) -> Point {
    p.with_rgb(clamp01(r), clamp01(g), clamp01(b))
}

fn hue_shift(p: Point, params: &ResolvedParams, _ctx: &PointCtx) -> FxResult<Point> {
    let degrees = params.f64("degrees")?;
    let [h, s, v] = rgb_to_hsv(p.r, p.g, p.b);
    Ok(with_rgb_clamped(p, hsv_to_rgb(h + degrees, s, v)))
}

fn saturation(p: Point, params: &ResolvedParams, _ctx: &PointCtx) -> FxResult<Point> {
    let amount = params.f64("amount")?;
    let [h, s, v] = rgb_to_hsv(p.r, p.g, p.b);
    Ok(with_rgb_clamped(p, hsv_to_rgb(h, s * amount, v)))
}

fn color_replace(p: Point, params: &ResolvedParams, _ctx: &PointCtx) -> FxResult<Point> {
    let from = [
        params.f64("from_r")?,
        params.f64("from_g")?,
        params.f64("from_b")?,
    ];
    let tolerance = params.f64("tolerance")?;
    if rgb_distance(p.rgb(), from) > tolerance {
        return Ok(p);
    }
    let to = [params.f64("to_r")?, params.f64("to_g")?, params.f64("to_b")?];
    Ok(with_rgb_clamped(p, to))
}

fn color_filter(p: Point, params: &ResolvedParams, _ctx: &PointCtx) -> FxResult<Point> {
    match params.choice("mode")? {
        "hsv" => {
            if p.is_blanked() {
                return Ok(p);
            }
            let center = params.f64("hue_center")?;
            let half_width = params.f64("hue_width")? * 0.5;
            let [h, _, _] = rgb_to_hsv(p.r, p.g, p.b);
            let diff = (h - center).rem_euclid(360.0);
            let dist = diff.min(360.0 - diff);
            Ok(if dist <= half_width { p } else { p.blanked() })
        }
        _ => {
            let gains = [params.f64("r")?, params.f64("g")?, params.f64("b")?];
            Ok(with_rgb_clamped(
                p,
                [p.r * gains[0], p.g * gains[1], p.b * gains[2]],
            ))
        }
    }
}

fn solid_color(p: Point, params: &ResolvedParams, _ctx: &PointCtx) -> FxResult<Point> {
    if p.is_blanked() {
        return Ok(p);
    }
    Ok(with_rgb_clamped(
        p,
        [params.f64("r")?, params.f64("g")?, params.f64("b")?],
    ))
}

fn color_curves(p: Point, params: &ResolvedParams, _ctx: &PointCtx) -> FxResult<Point> {
    let r = params.lut("red")?.sample(p.r);
    let g = params.lut("green")?.sample(p.g);
    let b = params.lut("blue")?.sample(p.b);
    Ok(p.with_rgb(r, g, b))
}

#[cfg(test)]
#[path = "../../tests/unit/effects/color.rs"]
mod tests;
