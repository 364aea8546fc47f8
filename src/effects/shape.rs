//! Geometric effects. Positions are not clamped; projectors clip out-of-range coordinates.

use kurbo::Affine;

use crate::effects::registry::{EffectCategory, EffectDef, PointFn, TimingClass};
use crate::foundation::core::{Point, PointCtx};
use crate::foundation::error::FxResult;
use crate::foundation::math::{denormalize_coord, lerp};
use crate::params::resolve::ResolvedParams;
use crate::params::spec::ParamSpec;

/// Built-in shape effect definitions.
pub fn definitions() -> Vec<EffectDef> {
    vec![
        def(
            "scale",
            "Scale",
            vec![
                ParamSpec::float("x", 1.0, -4.0, 4.0),
                ParamSpec::float("y", 1.0, -4.0, 4.0),
            ],
            scale,
        ),
        def(
            "translate",
            "Translate",
            vec![
                ParamSpec::float("x", 0.0, -2.0, 2.0),
                ParamSpec::float("y", 0.0, -2.0, 2.0),
            ],
            translate,
        ),
        def(
            "rotate",
            "Rotate",
            vec![
                ParamSpec::float("angle", 0.0, -360.0, 360.0),
                ParamSpec::float("center_x", 0.0, -1.0, 1.0),
                ParamSpec::float("center_y", 0.0, -1.0, 1.0),
            ],
            rotate,
        ),
        def(
            "viewport",
            "Viewport",
            vec![
                ParamSpec::float("x_min", -1.0, -1.0, 1.0),
                ParamSpec::float("x_max", 1.0, -1.0, 1.0),
                ParamSpec::float("y_min", -1.0, -1.0, 1.0),
                ParamSpec::float("y_max", 1.0, -1.0, 1.0),
            ],
            viewport,
        ),
        def(
            "corner-pin",
            "Corner Pin",
            vec![
                ParamSpec::float("tl_x", -1.0, -2.0, 2.0),
                ParamSpec::float("tl_y", 1.0, -2.0, 2.0),
                ParamSpec::float("tr_x", 1.0, -2.0, 2.0),
                ParamSpec::float("tr_y", 1.0, -2.0, 2.0),
                ParamSpec::float("bl_x", -1.0, -2.0, 2.0),
                ParamSpec::float("bl_y", -1.0, -2.0, 2.0),
                ParamSpec::float("br_x", 1.0, -2.0, 2.0),
                ParamSpec::float("br_y", -1.0, -2.0, 2.0),
            ],
            corner_pin,
        ),
        def(
            "pinch-bulge",
            "Pinch / Bulge",
            vec![ParamSpec::float("amount", 1.0, 0.1, 4.0)],
            pinch_bulge,
        ),
        def(
            "lens-distortion",
            "Lens Distortion",
            vec![
                ParamSpec::float("k1", 0.0, -1.0, 1.0),
                ParamSpec::float("k2", 0.0, -1.0, 1.0),
            ],
            lens_distortion,
        ),
    ]
}

fn def(id: &str, name: &str, params: Vec<ParamSpec>, apply: PointFn) -> EffectDef {
    EffectDef::point(id, name, EffectCategory::Shape, TimingClass::Static, params, apply)
}

fn scale(p: Point, params: &ResolvedParams, _ctx: &PointCtx) -> FxResult<Point> {
    let affine = Affine::scale_non_uniform(params.f64("x")?, params.f64("y")?);
    Ok(p.transformed(affine))
}

fn translate(p: Point, params: &ResolvedParams, _ctx: &PointCtx) -> FxResult<Point> {
    Ok(p.with_xy(p.x + params.f64("x")?, p.y + params.f64("y")?))
}

/// Counter-clockwise rotation by `angle` degrees about `(center_x, center_y)`.
fn rotate(p: Point, params: &ResolvedParams, _ctx: &PointCtx) -> FxResult<Point> {
    let center = kurbo::Point::new(params.f64("center_x")?, params.f64("center_y")?);
    let affine = Affine::rotate_about(params.f64("angle")?.to_radians(), center);
    Ok(p.transformed(affine))
}

/// Squeeze the full `[-1, 1]` square into the given sub-rectangle.
fn viewport(p: Point, params: &ResolvedParams, _ctx: &PointCtx) -> FxResult<Point> {
    let x = denormalize_coord(p.x, params.f64("x_min")?, params.f64("x_max")?);
    let y = denormalize_coord(p.y, params.f64("y_min")?, params.f64("y_max")?);
    Ok(p.with_xy(x, y))
}

/// Bilinear warp of the unit square onto four arbitrary corners.
fn corner_pin(p: Point, params: &ResolvedParams, _ctx: &PointCtx) -> FxResult<Point> {
    let corner =
        |x: &str, y: &str| -> FxResult<(f64, f64)> { Ok((params.f64(x)?, params.f64(y)?)) };
    let tl = corner("tl_x", "tl_y")?;
    let tr = corner("tr_x", "tr_y")?;
    let bl = corner("bl_x", "bl_y")?;
    let br = corner("br_x", "br_y")?;

    let u = (p.x + 1.0) * 0.5;
    let v = (p.y + 1.0) * 0.5;
    let bottom = (lerp(bl.0, br.0, u), lerp(bl.1, br.1, u));
    let top = (lerp(tl.0, tr.0, u), lerp(tl.1, tr.1, u));
    Ok(p.with_xy(lerp(bottom.0, top.0, v), lerp(bottom.1, top.1, v)))
}

/// Remap radius inside the unit circle as `r^amount`: `> 1` pinches, `< 1` bulges.
fn pinch_bulge(p: Point, params: &ResolvedParams, _ctx: &PointCtx) -> FxResult<Point> {
    let amount = params.f64("amount")?;
    let r = p.x.hypot(p.y);
    if r <= 0.0 || r >= 1.0 {
        return Ok(p);
    }
    let k = r.powf(amount) / r;
    Ok(p.with_xy(p.x * k, p.y * k))
}

/// Brown radial model: `factor = 1 + k1 r^2 + k2 r^4`.
fn lens_distortion(p: Point, params: &ResolvedParams, _ctx: &PointCtx) -> FxResult<Point> {
    let k1 = params.f64("k1")?;
    let k2 = params.f64("k2")?;
    let r2 = p.x * p.x + p.y * p.y;
    let factor = 1.0 + k1 * r2 + k2 * r2 * r2;
    Ok(p.with_xy(p.x * factor, p.y * factor))
}

#[cfg(test)]
#[path = "../../tests/unit/effects/shape.rs"]
mod tests;
