use super::*;
use crate::effects::registry::EffectApply;
use crate::foundation::core::TimeCtx;
use crate::params::resolve::{ParamMap, resolve_global};
use crate::params::spec::ParamValue;

fn run(id: &str, values: &[(&str, ParamValue)], p: Point) -> Point {
    let def = definitions().into_iter().find(|d| d.id == id).unwrap();
    let map: ParamMap = values
        .iter()
        .map(|(k, v)| ((*k).to_owned(), v.clone().into()))
        .collect();
    let params = resolve_global(&def.params, &map, TimeCtx::default()).unwrap();
    let ctx = PointCtx {
        index: 0,
        count: 1,
        time: TimeCtx::default(),
    };
    let EffectApply::Point(f) = def.apply else {
        panic!("{id} is not a point effect");
    };
    f(p, &params, &ctx).unwrap()
}

fn close(a: [f64; 3], b: [f64; 3]) -> bool {
    a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-9)
}

#[test]
fn hue_shift_rotates_primaries() {
    let out = run(
        "hue-shift",
        &[("degrees", 120.0.into())],
        Point::new(0.0, 0.0, 1.0, 0.0, 0.0),
    );
    assert!(close(out.rgb(), [0.0, 1.0, 0.0]));
}

#[test]
fn saturation_zero_is_grayscale() {
    let out = run(
        "saturation",
        &[("amount", 0.0.into())],
        Point::new(0.0, 0.0, 0.8, 0.2, 0.4),
    );
    assert!(close(out.rgb(), [0.8, 0.8, 0.8]));
}

#[test]
fn color_replace_maps_within_tolerance_exactly() {
    let values = [
        ("from_r", 1.0.into()),
        ("from_g", 0.0.into()),
        ("from_b", 0.0.into()),
        ("to_r", 0.25.into()),
        ("to_g", 0.5.into()),
        ("to_b", 0.75.into()),
        ("tolerance", 0.2.into()),
    ];
    let near = run("color-replace", &values, Point::new(0.1, 0.2, 0.9, 0.1, 0.0));
    assert_eq!(near.rgb(), [0.25, 0.5, 0.75]);
    assert_eq!((near.x, near.y), (0.1, 0.2));

    let far_in = Point::new(0.0, 0.0, 0.0, 1.0, 0.0);
    assert_eq!(run("color-replace", &values, far_in), far_in);
}

#[test]
fn color_filter_rgb_multiplies() {
    let out = run(
        "color-filter",
        &[("r", 0.5.into()), ("b", 0.0.into())],
        Point::new(0.0, 0.0, 1.0, 1.0, 1.0),
    );
    assert!(close(out.rgb(), [0.5, 1.0, 0.0]));
}

#[test]
fn color_filter_hsv_blanks_outside_hue_band() {
    let values = [
        ("mode", "hsv".into()),
        ("hue_center", 120.0.into()),
        ("hue_width", 60.0.into()),
    ];
    let green = Point::new(0.0, 0.0, 0.0, 1.0, 0.0);
    assert_eq!(run("color-filter", &values, green), green);
    let red = Point::new(0.0, 0.0, 1.0, 0.0, 0.0);
    assert!(run("color-filter", &values, red).is_blanked());
}

#[test]
fn solid_color_keeps_blanking() {
    let values = [("r", 0.0.into()), ("g", 0.5.into()), ("b", 1.0.into())];
    let lit = run("solid-color", &values, Point::new(0.0, 0.0, 1.0, 0.0, 0.0));
    assert_eq!(lit.rgb(), [0.0, 0.5, 1.0]);
    assert!(run("solid-color", &values, Point::blank(0.0, 0.0)).is_blanked());
}

#[test]
fn color_curves_apply_per_channel_tables() {
    let invert = ParamValue::Curve(vec![
        crate::curves::points::CurvePoint::new(0.0, 1.0),
        crate::curves::points::CurvePoint::new(1.0, 0.0),
    ]);
    let out = run(
        "color-curves",
        &[("red", invert)],
        Point::new(0.0, 0.0, 1.0, 1.0, 0.0),
    );
    assert_eq!(out.r, 0.0);
    assert_eq!(out.g, 1.0);
    assert_eq!(out.b, 0.0);
}
