use super::*;
use crate::params::spec::ParamValue;

fn nodes() -> Vec<ChainNode<EffectInstance>> {
    vec![
        ChainNode::Leaf(EffectInstance::new("translate").with_param("x", ParamValue::Number(0.1))),
        ChainNode::Leaf(EffectInstance::new("missing")),
        ChainNode::Leaf(EffectInstance::new("intensity")),
    ]
}

#[test]
fn defaults_are_valid_and_partial_json_loads() {
    assert!(RenderOpts::default().validate().is_ok());
    let opts: RenderOpts = serde_json::from_str(r#"{"default_bpm": 140}"#).unwrap();
    assert_eq!(opts.default_bpm, 140.0);
    assert!(opts.collect_stats);
    assert_eq!(opts.slow_chain_warn_us, Some(5_000));
}

#[test]
fn invalid_opts_are_rejected() {
    let opts = RenderOpts {
        default_bpm: 0.0,
        ..RenderOpts::default()
    };
    assert!(opts.validate().is_err());
    let opts = RenderOpts {
        slow_chain_warn_us: Some(0),
        ..RenderOpts::default()
    };
    assert!(opts.validate().is_err());
}

#[test]
fn unusable_bpm_falls_back_to_the_configured_tempo() {
    let opts = RenderOpts {
        default_bpm: 90.0,
        ..RenderOpts::default()
    };
    assert_eq!(opts.time_ctx(0.0, -1.0).bpm, 90.0);
    assert_eq!(opts.time_ctx(0.0, f64::NAN).bpm, 90.0);
    assert_eq!(opts.time_ctx(0.0, 128.0).bpm, 128.0);
}

#[test]
fn stats_count_stages_points_and_passthroughs() {
    let reg = EffectRegistry::with_builtins();
    let base = vec![Point::new(0.0, 0.0, 1.0, 0.0, 0.0); 4];
    let (out, stats) =
        render_frame_with_stats(&reg, &nodes(), &base, 0.0, 120.0, &RenderOpts::default());
    assert_eq!(out.len(), 4);
    assert!((out[0].x - 0.1).abs() < 1e-9);
    assert_eq!(stats.effect_count, 2);
    assert_eq!(stats.point_count, 4);
    assert_eq!(stats.passthrough_count, 1);
}

#[test]
fn disabled_stats_report_zero_time() {
    let reg = EffectRegistry::with_builtins();
    let opts = RenderOpts {
        collect_stats: false,
        ..RenderOpts::default()
    };
    let (_, stats) = render_frame_with_stats(&reg, &nodes(), &[], 0.0, 120.0, &opts);
    assert_eq!(stats.effects_time_us, 0);
    assert_eq!(stats.point_count, 0);
}

#[test]
fn frame_timing_totals_base_and_chain_time() {
    let stats = FrameStats {
        effects_time_us: 300,
        ..FrameStats::default()
    };
    let timing = FrameTiming::new(1_200, &stats);
    assert_eq!(timing.total_us(), 1_500);
}
