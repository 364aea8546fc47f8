use super::*;

#[test]
fn blanked_means_all_channels_zero() {
    assert!(Point::blank(0.3, -0.2).is_blanked());
    assert!(!Point::new(0.0, 0.0, 0.0, 0.01, 0.0).is_blanked());
    let p = Point::new(0.5, 0.5, 1.0, 1.0, 1.0).blanked();
    assert!(p.is_blanked());
    assert_eq!((p.x, p.y), (0.5, 0.5));
}

#[test]
fn time_ctx_sanitizes_tempo_and_time() {
    let t = TimeCtx::new(f64::NAN, -5.0);
    assert_eq!(t.time_ms, 0.0);
    assert_eq!(t.bpm, DEFAULT_BPM);

    let t = TimeCtx::new(2000.0, 120.0);
    assert_eq!(t.seconds(), 2.0);
    assert_eq!(t.beats(), 4.0);
}

#[test]
fn transformed_applies_affine_to_position_only() {
    let p = Point::new(1.0, 0.0, 0.2, 0.4, 0.6).transformed(Affine::translate((0.5, -0.5)));
    assert_eq!((p.x, p.y), (1.5, -0.5));
    assert_eq!(p.rgb(), [0.2, 0.4, 0.6]);
}

#[test]
fn point_ctx_progress_spans_frame() {
    let time = TimeCtx::default();
    assert_eq!(
        PointCtx {
            index: 0,
            count: 1,
            time
        }
        .progress(),
        0.0
    );
    assert_eq!(
        PointCtx {
            index: 4,
            count: 5,
            time
        }
        .progress(),
        1.0
    );
}
