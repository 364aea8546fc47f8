use super::*;
use crate::params::modulator::{TimeUnit, Waveform};

fn specs() -> Vec<ParamSpec> {
    vec![
        ParamSpec::float("amount", 1.0, 0.0, 2.0),
        ParamSpec::int("steps", 4, 1, 16),
        ParamSpec::bool("flip", false),
        ParamSpec::choice("mode", "rgb", &["rgb", "hsv"]),
        ParamSpec::curve("red"),
    ]
}

fn t0() -> TimeCtx {
    TimeCtx::new(0.0, 120.0)
}

#[test]
fn missing_keys_use_defaults_and_unknown_keys_are_ignored() {
    let mut values = ParamMap::new();
    values.insert("bogus".into(), ParamValue::Number(7.0).into());
    let out = resolve_global(&specs(), &values, t0()).unwrap();
    assert_eq!(out.len(), 5);
    assert_eq!(out.f64("amount").unwrap(), 1.0);
    assert_eq!(out.int("steps").unwrap(), 4);
    assert!(!out.bool("flip").unwrap());
    assert_eq!(out.choice("mode").unwrap(), "rgb");
    assert_eq!(out.lut("red").unwrap(), &Lut::identity());
    assert!(out.get("bogus").is_none());
}

#[test]
fn static_values_clamp_and_coerce() {
    let mut values = ParamMap::new();
    values.insert("amount".into(), ParamValue::Number(9.0).into());
    values.insert("steps".into(), ParamValue::Number(2.6).into());
    values.insert("flip".into(), ParamValue::Number(1.0).into());
    values.insert("mode".into(), ParamValue::from("cmyk").into());
    let out = resolve_global(&specs(), &values, t0()).unwrap();
    assert_eq!(out.f64("amount").unwrap(), 2.0);
    assert_eq!(out.int("steps").unwrap(), 3);
    assert!(out.bool("flip").unwrap());
    assert_eq!(out.choice("mode").unwrap(), "rgb");
}

#[test]
fn type_mismatch_is_a_parameter_error() {
    let mut values = ParamMap::new();
    values.insert("amount".into(), ParamValue::from("loud").into());
    let err = resolve_global(&specs(), &values, t0()).unwrap_err();
    assert!(matches!(err, FxError::Parameter(_)));
}

#[test]
fn modulating_a_curve_is_rejected() {
    let mut values = ParamMap::new();
    values.insert(
        "red".into(),
        Modulator::new(Waveform::Sine, 0.0, 1.0, 1.0, TimeUnit::Seconds).into(),
    );
    assert!(resolve_global(&specs(), &values, t0()).is_err());
}

#[test]
fn global_modulator_is_evaluated_once_per_frame() {
    let mut values = ParamMap::new();
    values.insert(
        "amount".into(),
        Modulator::new(Waveform::Sawtooth, 0.0, 2.0, 1.0, TimeUnit::Seconds).into(),
    );
    assert!(!needs_per_point(&specs(), &values));
    let out = resolve_global(&specs(), &values, TimeCtx::new(250.0, 120.0)).unwrap();
    assert!((out.f64("amount").unwrap() - 0.5).abs() < 1e-9);
}

#[test]
fn inactive_modulator_resolves_to_fallback() {
    let mut m = Modulator::new(Waveform::Sawtooth, 0.0, 2.0, 1.0, TimeUnit::Seconds);
    m.active = false;
    m.fallback = 1.5;
    let mut values = ParamMap::new();
    values.insert("amount".into(), m.into());
    let out = resolve_global(&specs(), &values, TimeCtx::new(250.0, 120.0)).unwrap();
    assert_eq!(out.f64("amount").unwrap(), 1.5);
}

#[test]
fn spatial_modulator_forces_per_point_resolution() {
    let mut values = ParamMap::new();
    values.insert(
        "amount".into(),
        Modulator::new(Waveform::PositionX, 0.0, 2.0, 1.0, TimeUnit::Seconds).into(),
    );
    assert!(needs_per_point(&specs(), &values));

    let resolver = PointResolver::new(&specs(), &values, t0()).unwrap();
    assert!(resolver.is_spatial());
    let mut scratch = ResolvedParams::new();
    let ctx = PointCtx {
        index: 0,
        count: 2,
        time: t0(),
    };
    resolver.resolve_into(&mut scratch, &Point::new(1.0, 0.0, 1.0, 1.0, 1.0), &ctx);
    assert_eq!(scratch.f64("amount").unwrap(), 2.0);
    assert_eq!(scratch.int("steps").unwrap(), 4);

    let direct =
        resolve_point(&specs(), &values, &Point::new(-1.0, 0.0, 1.0, 1.0, 1.0), &ctx).unwrap();
    assert_eq!(direct.f64("amount").unwrap(), 0.0);
}

#[test]
fn bindings_deserialize_untagged() {
    let values: ParamMap = serde_json::from_value(serde_json::json!({
        "amount": 0.5,
        "flip": true,
        "steps": {"waveform": "square", "min": 1.0, "max": 8.0}
    }))
    .unwrap();
    assert!(matches!(values["amount"], ParamBinding::Static(ParamValue::Number(_))));
    assert!(matches!(values["steps"], ParamBinding::Modulated(_)));
}

#[test]
fn static_value_flattens_modulators() {
    let spec = ParamSpec::float("amount", 1.0, 0.0, 2.0);
    let m = Modulator::new(Waveform::Sawtooth, 0.0, 4.0, 1.0, TimeUnit::Seconds);
    let binding = ParamBinding::from(m);
    let v = static_value(&spec, Some(&binding), TimeCtx::new(750.0, 120.0));
    assert_eq!(v, ParamValue::Number(2.0));
    assert_eq!(static_value(&spec, None, t0()), ParamValue::Number(1.0));
}

#[test]
fn primed_scratch_only_rewrites_spatial_slots() {
    let mut values = ParamMap::new();
    values.insert(
        "amount".into(),
        Modulator::new(Waveform::PositionX, 0.0, 2.0, 1.0, TimeUnit::Seconds).into(),
    );
    let resolver = PointResolver::new(&specs(), &values, t0()).unwrap();
    let ctx = PointCtx {
        index: 0,
        count: 2,
        time: t0(),
    };
    let mut scratch = ResolvedParams::new();
    resolver.resolve_into(&mut scratch, &Point::new(1.0, 0.0, 1.0, 1.0, 1.0), &ctx);
    resolver.resolve_into(&mut scratch, &Point::new(-1.0, 0.0, 1.0, 1.0, 1.0), &ctx);
    assert_eq!(scratch.f64("amount").unwrap(), 0.0);

    // Keys are shared with the frame-level set rather than copied per point.
    for ((a, _), (b, _)) in scratch.entries.iter().zip(&resolver.base().entries) {
        assert!(Arc::ptr_eq(a, b));
    }
    let changed: Vec<&str> = scratch
        .iter()
        .zip(resolver.base().iter())
        .filter(|(a, b)| a.1 != b.1)
        .map(|(a, _)| a.0)
        .collect();
    assert_eq!(changed, ["amount"]);
}

#[test]
fn scratch_from_another_resolver_is_reset() {
    let mut values = ParamMap::new();
    values.insert(
        "amount".into(),
        Modulator::new(Waveform::PositionX, 0.0, 2.0, 1.0, TimeUnit::Seconds).into(),
    );
    let gain = [ParamSpec::float("gain", 0.5, 0.0, 1.0)];
    let mut scratch = resolve_global(&gain, &ParamMap::new(), t0()).unwrap();
    let resolver = PointResolver::new(&specs(), &values, t0()).unwrap();
    let ctx = PointCtx {
        index: 0,
        count: 1,
        time: t0(),
    };
    resolver.resolve_into(&mut scratch, &Point::new(0.0, 0.0, 1.0, 1.0, 1.0), &ctx);
    assert_eq!(scratch.len(), 5);
    assert!(scratch.get("gain").is_none());
    assert_eq!(scratch.f64("amount").unwrap(), 1.0);
}

#[test]
fn empty_lists_resolve_for_either_list_kind() {
    let specs = vec![ParamSpec::zone_groups("zones"), ParamSpec::curve("red")];
    let values: ParamMap =
        serde_json::from_value(serde_json::json!({"zones": [], "red": []})).unwrap();
    assert!(matches!(
        values["zones"],
        ParamBinding::Static(ParamValue::Curve(_))
    ));
    let out = resolve_global(&specs, &values, t0()).unwrap();
    assert!(out.zone_groups("zones").unwrap().is_empty());
    assert_eq!(out.lut("red").unwrap(), &Lut::identity());

    let groups = resolve_static(
        &specs,
        &BTreeMap::from([("zones".to_owned(), ParamValue::Groups(vec!["left".into()]))]),
    )
    .unwrap();
    assert_eq!(groups.zone_groups("zones").unwrap(), ["left".to_owned()]);
}
