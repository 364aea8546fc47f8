//! Brightness effects: scaling, gamma, thresholding, strobing and index fades.

use crate::effects::registry::{EffectCategory, EffectDef, PointFn, TimingClass};
use crate::foundation::core::{Frame, Point, PointCtx, TimeCtx};
use crate::foundation::error::FxResult;
use crate::foundation::math::{clamp01, lerp};
use crate::params::modulator::TimeUnit;
use crate::params::resolve::ResolvedParams;
use crate::params::spec::ParamSpec;

/// Built-in intensity effect definitions.
pub fn definitions() -> Vec<EffectDef> {
    vec![
        def(
            "intensity",
            "Intensity",
            vec![ParamSpec::float("amount", 1.0, 0.0, 2.0)],
            intensity,
        ),
        def(
            "gamma",
            "Gamma",
            vec![ParamSpec::float("gamma", 1.0, 0.1, 5.0)],
            gamma,
        ),
        def(
            "threshold",
            "Threshold",
            vec![ParamSpec::float("level", 0.1, 0.0, 1.0)],
            threshold,
        ),
        EffectDef::frame(
            "strobe",
            "Strobe",
            EffectCategory::Intensity,
            TimingClass::Bpm,
            vec![
                ParamSpec::float("rate", 4.0, 0.0, 50.0),
                ParamSpec::choice("unit", "seconds", &["seconds", "beats"]),
                ParamSpec::float("duty", 0.5, 0.0, 1.0),
                ParamSpec::float("phase", 0.0, 0.0, 1.0),
            ],
            strobe,
        ),
        def(
            "index-fade",
            "Index Fade",
            vec![
                ParamSpec::float("start", 1.0, 0.0, 1.0),
                ParamSpec::float("end", 0.0, 0.0, 1.0),
            ],
            index_fade,
        ),
    ]
}

fn def(id: &str, name: &str, params: Vec<ParamSpec>, apply: PointFn) -> EffectDef {
    EffectDef::point(id, name, EffectCategory::Intensity, TimingClass::Static, params, apply)
}

fn scaled(p: Point, k: f64) -> Point {
    p.with_rgb(clamp01(p.r * k), clamp01(p.g * k), clamp01(p.b * k))
}

fn intensity(p: Point, params: &ResolvedParams, _ctx: &PointCtx) -> FxResult<Point> {
    Ok(scaled(p, params.f64("amount")?))
}

fn gamma(p: Point, params: &ResolvedParams, _ctx: &PointCtx) -> FxResult<Point> {
    let inv = 1.0 / params.f64("gamma")?;
    let ch = |c: f64| clamp01(c).powf(inv);
    Ok(p.with_rgb(ch(p.r), ch(p.g), ch(p.b)))
}

fn threshold(p: Point, params: &ResolvedParams, _ctx: &PointCtx) -> FxResult<Point> {
    let level = params.f64("level")?;
    Ok(if p.r.max(p.g).max(p.b) < level {
        p.blanked()
    } else {
        p
    })
}

/// Whole-frame on/off gate: on for the first `duty` of each cycle.
fn strobe(frame: &[Point], params: &ResolvedParams, time: &TimeCtx) -> FxResult<Frame> {
    let unit = match params.choice("unit")? {
        "beats" => TimeUnit::Beats,
        _ => TimeUnit::Seconds,
    };
    let cycles = unit.elapsed(*time) * params.f64("rate")? + params.f64("phase")?;
    let on = cycles.rem_euclid(1.0) < params.f64("duty")?;
    Ok(if on {
        frame.to_vec()
    } else {
        frame.iter().map(|p| p.blanked()).collect()
    })
}

/// Linear brightness ramp from the first point (`start`) to the last (`end`).
fn index_fade(p: Point, params: &ResolvedParams, ctx: &PointCtx) -> FxResult<Point> {
    let k = lerp(params.f64("start")?, params.f64("end")?, ctx.progress());
    Ok(scaled(p, k))
}

#[cfg(test)]
#[path = "../../tests/unit/effects/intensity.rs"]
mod tests;
