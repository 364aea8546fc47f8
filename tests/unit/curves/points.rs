use super::*;

fn pts(raw: &[(f64, f64)]) -> Vec<CurvePoint> {
    raw.iter().map(|&(x, y)| CurvePoint::new(x, y)).collect()
}

#[test]
fn validate_clamps_sorts_and_pins_corners() {
    let out = validate_control_points(&pts(&[(0.8, 1.4), (0.2, -0.5), (f64::NAN, 0.3)]));
    assert_eq!(
        out,
        pts(&[(0.0, 0.0), (0.2, 0.0), (0.8, 1.0), (1.0, 1.0)])
    );
}

#[test]
fn validate_keeps_last_duplicate_x() {
    let out = validate_control_points(&pts(&[(0.0, 0.0), (0.5, 0.1), (0.5, 0.9), (1.0, 1.0)]));
    assert_eq!(out, pts(&[(0.0, 0.0), (0.5, 0.9), (1.0, 1.0)]));
}

#[test]
fn validate_empty_is_identity() {
    assert_eq!(validate_control_points(&[]), identity_curve());
}

#[test]
fn add_point_inserts_sorted_and_reports_index() {
    let (out, idx) = add_point(&identity_curve(), 0.4, 0.7);
    assert_eq!(idx, Some(1));
    assert_eq!(out, pts(&[(0.0, 0.0), (0.4, 0.7), (1.0, 1.0)]));
}

#[test]
fn add_point_refuses_collisions() {
    let base = identity_curve();
    let (out, idx) = add_point(&base, 0.0, 0.5);
    assert_eq!(idx, None);
    assert_eq!(out, base);
}

#[test]
fn corner_x_is_immutable() {
    let base = pts(&[(0.0, 0.0), (0.5, 0.5), (1.0, 1.0)]);
    let out = update_point(&base, 0, 0.3, 0.4);
    assert_eq!(out[0], CurvePoint::new(0.0, 0.4));
    let out = update_point(&base, 2, 0.1, 0.2);
    assert_eq!(out[2], CurvePoint::new(1.0, 0.2));
}

#[test]
fn interior_update_keeps_sort_order() {
    let base = pts(&[(0.0, 0.0), (0.3, 0.3), (0.6, 0.6), (1.0, 1.0)]);
    let out = update_point(&base, 1, 0.9, 0.5);
    assert!(out.windows(2).all(|w| w[0].x < w[1].x));
    assert!((out[1].x - (0.6 - MIN_X_GAP)).abs() < 1e-12);
    assert_eq!(out[1].y, 0.5);
}

#[test]
fn update_out_of_range_is_noop() {
    let base = identity_curve();
    assert_eq!(update_point(&base, 9, 0.5, 0.5), base);
}

#[test]
fn remove_refuses_corners() {
    let base = pts(&[(0.0, 0.0), (0.5, 0.2), (1.0, 1.0)]);
    assert_eq!(remove_point(&base, 0), base);
    assert_eq!(remove_point(&base, 2), base);
    assert_eq!(remove_point(&base, 7), base);
    assert_eq!(remove_point(&base, 1), identity_curve());
}

#[test]
fn serializes_as_pairs_and_reads_objects() {
    let json = serde_json::to_value(identity_curve()).unwrap();
    assert_eq!(json, serde_json::json!([[0.0, 0.0], [1.0, 1.0]]));
    let back: Vec<CurvePoint> =
        serde_json::from_value(serde_json::json!([{"x": 0.0, "y": 0.5}, [1.0, 0.25]])).unwrap();
    assert_eq!(back, pts(&[(0.0, 0.5), (1.0, 0.25)]));
}
