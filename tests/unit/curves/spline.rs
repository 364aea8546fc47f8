use super::*;

fn pts(raw: &[(f64, f64)]) -> Vec<CurvePoint> {
    raw.iter().map(|&(x, y)| CurvePoint::new(x, y)).collect()
}

#[test]
fn single_point_is_constant() {
    let p = pts(&[(0.3, 0.7)]);
    assert_eq!(interpolate_at(&p, 0.0), 0.7);
    assert_eq!(interpolate_at(&p, 1.0), 0.7);
}

#[test]
fn two_points_clamp_linearly() {
    let p = pts(&[(0.0, 0.2), (1.0, 0.8)]);
    assert!((interpolate_at(&p, 0.5) - 0.5).abs() < 1e-12);
    assert_eq!(interpolate_at(&p, -1.0), 0.2);
    assert_eq!(interpolate_at(&p, 2.0), 0.8);
}

#[test]
fn catmull_rom_passes_through_control_points() {
    let p = pts(&[(0.0, 0.0), (0.25, 0.6), (0.5, 0.2), (1.0, 1.0)]);
    for cp in &p {
        assert!((interpolate_at(&p, cp.x) - cp.y).abs() < 1e-12);
    }
}

#[test]
fn evenly_spaced_collinear_points_stay_linear_between_interior_knots() {
    let p = pts(&[(0.0, 0.0), (0.25, 0.25), (0.5, 0.5), (0.75, 0.75), (1.0, 1.0)]);
    for i in 0..=20 {
        let x = 0.25 + 0.5 * f64::from(i) / 20.0;
        assert!((interpolate_at(&p, x) - x).abs() < 1e-9, "x = {x}");
    }
    // Duplicated endpoints bend the outer segments but keep the knots exact.
    for cp in &p {
        assert_eq!(interpolate_at(&p, cp.x), cp.y);
    }
    assert!((interpolate_at(&p, 0.125) - 0.125).abs() > 1e-6);
}

#[test]
fn lut_is_boundary_exact_and_in_domain() {
    let sets = [
        pts(&[(0.0, 0.1), (1.0, 0.9)]),
        pts(&[(0.0, 0.0), (0.1, 1.0), (0.2, 0.0), (1.0, 1.0)]),
        pts(&[(0.0, 1.0), (0.5, 0.0), (0.6, 1.0), (0.7, 0.0), (1.0, 0.4)]),
    ];
    for set in &sets {
        let lut = build_lut(set, LUT_SIZE).unwrap();
        assert_eq!(lut.len(), LUT_SIZE);
        assert_eq!(lut[0], set[0].y);
        assert_eq!(lut[LUT_SIZE - 1], set[set.len() - 1].y);
        assert!(lut.iter().all(|v| (0.0..=1.0).contains(v)));
    }
}

#[test]
fn lut_rejects_tiny_resolution() {
    assert!(build_lut(&pts(&[(0.0, 0.0), (1.0, 1.0)]), 1).is_err());
}

#[test]
fn lut_struct_repairs_degenerate_input() {
    let lut = Lut::from_points(&[]);
    assert_eq!(lut.values().len(), LUT_SIZE);
    assert_eq!(lut.sample(0.0), 0.0);
    assert_eq!(lut.sample(1.0), 1.0);
    assert!((lut.sample(0.5) - 128.0 / 255.0).abs() < 1e-9);

    // A lone mid point becomes a flat curve once pinned to the corners.
    let flat = Lut::from_points(&pts(&[(0.5, 0.25)]));
    assert!(flat.values().iter().all(|&v| (v - 0.25).abs() < 1e-12));
}

#[test]
fn lut_sample_clamps_input() {
    let lut = Lut::identity();
    assert_eq!(lut.sample(-3.0), 0.0);
    assert_eq!(lut.sample(7.0), 1.0);
    assert_eq!(lut.sample(f64::NAN), 0.0);
}
