use crate::chain::instance::{Animation, EffectInstance};
use crate::chain::tree::{ChainNode, enabled_leaves};
use crate::effects::registry::{EffectApply, EffectDef, EffectRegistry, FrameFn, PointFn};
use crate::foundation::core::{Frame, Point, PointCtx, TimeCtx};
use crate::foundation::error::{FxError, FxResult};
use crate::params::resolve::{
    PointResolver, ResolvedParams, needs_per_point, resolve_global, resolve_static,
};

/// Parameters of a point stage.
#[derive(Clone, Debug)]
enum StageParams {
    /// Resolved once for the whole frame.
    Global(ResolvedParams),
    /// At least one spatial modulator; re-resolved for each point.
    PerPoint(PointResolver),
}

#[derive(Clone, Debug)]
enum StageKind {
    Point { apply: PointFn, params: StageParams },
    Frame { apply: FrameFn, params: ResolvedParams },
}

#[derive(Clone, Debug)]
struct Stage {
    instance_id: String,
    effect_id: String,
    kind: StageKind,
}

/// A chain resolved for one frame time, ready to map point frames.
///
/// Consecutive point stages are fused into a single pass over the points; frame stages split
/// the pass. A stage that fails while applying is a passthrough for the rest of the frame.
#[derive(Clone, Debug)]
pub struct CompiledChain {
    stages: Vec<Stage>,
    time: TimeCtx,
    skipped: usize,
}

/// Stage failure raised inside a fused point pass.
struct StageFailure {
    stage: usize,
    error: FxError,
}

impl CompiledChain {
    /// Chain with no stages: [`CompiledChain::apply`] copies its input.
    pub fn identity(time: TimeCtx) -> Self {
        Self {
            stages: Vec::new(),
            time,
            skipped: 0,
        }
    }

    /// Frame time the parameters were resolved at.
    pub fn time(&self) -> TimeCtx {
        self.time
    }

    /// Number of stages that will run.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Return `true` when the chain maps every frame to itself.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Enabled instances dropped at compile time (unknown effect or unresolvable parameters).
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Return `true` when every stage maps points independently.
    pub fn is_point_only(&self) -> bool {
        self.stages
            .iter()
            .all(|s| matches!(s.kind, StageKind::Point { .. }))
    }

    /// Map one frame through every stage.
    pub fn apply(&self, points: &[Point]) -> Frame {
        self.apply_counted(points).0
    }

    /// Map one frame, also returning how many stages failed and were bypassed.
    pub fn apply_counted(&self, points: &[Point]) -> (Frame, usize) {
        if self.stages.is_empty() {
            return (points.to_vec(), 0);
        }

        let mut failed = vec![false; self.stages.len()];
        let mut current: Frame = points.to_vec();
        let mut run_start = 0;
        for (i, stage) in self.stages.iter().enumerate() {
            match &stage.kind {
                StageKind::Point { .. } => continue,
                StageKind::Frame { apply, params } => {
                    if run_start < i {
                        current = self.run_point_stages(run_start..i, &current, &mut failed);
                    }
                    match apply(&current, params, &self.time) {
                        Ok(next) => current = next,
                        Err(error) => {
                            warn_passthrough(stage, &error);
                            failed[i] = true;
                        }
                    }
                    run_start = i + 1;
                }
            }
        }
        if run_start < self.stages.len() {
            current = self.run_point_stages(run_start..self.stages.len(), &current, &mut failed);
        }

        let bypassed = failed.iter().filter(|f| **f).count();
        (current, bypassed)
    }

    /// Map a single point through the point stages.
    ///
    /// Frame stages are not applied; use [`CompiledChain::apply`] unless
    /// [`CompiledChain::is_point_only`] holds. A failing stage leaves the point unchanged.
    pub fn apply_point(&self, point: Point, ctx: &PointCtx) -> Point {
        let mut scratch = ResolvedParams::new();
        let mut p = point;
        for stage in &self.stages {
            if let StageKind::Point { apply, params } = &stage.kind {
                match apply_stage(*apply, params, &mut scratch, p, ctx) {
                    Ok(next) => p = next,
                    Err(error) => warn_passthrough(stage, &error),
                }
            }
        }
        p
    }

    fn run_point_stages(
        &self,
        range: std::ops::Range<usize>,
        input: &[Point],
        failed: &mut [bool],
    ) -> Frame {
        loop {
            match self.try_fused(range.clone(), input, failed) {
                Ok(out) => return out,
                Err(StageFailure { stage, error }) => {
                    warn_passthrough(&self.stages[stage], &error);
                    failed[stage] = true;
                }
            }
        }
    }

    /// One pass over `input` applying every non-failed stage in `range` to each point.
    fn try_fused(
        &self,
        range: std::ops::Range<usize>,
        input: &[Point],
        failed: &[bool],
    ) -> Result<Frame, StageFailure> {
        let count = input.len();
        // One primed scratch per stage, so each point only rewrites its spatial slots.
        let mut scratches: Vec<ResolvedParams> = self.stages[range.clone()]
            .iter()
            .map(|stage| match &stage.kind {
                StageKind::Point {
                    params: StageParams::PerPoint(resolver),
                    ..
                } => resolver.base().clone(),
                _ => ResolvedParams::new(),
            })
            .collect();
        let mut out = Vec::with_capacity(count);
        for (index, &point) in input.iter().enumerate() {
            let ctx = PointCtx {
                index,
                count,
                time: self.time,
            };
            let mut p = point;
            for stage_idx in range.clone() {
                if failed[stage_idx] {
                    continue;
                }
                if let StageKind::Point { apply, params } = &self.stages[stage_idx].kind {
                    let scratch = &mut scratches[stage_idx - range.start];
                    p = apply_stage(*apply, params, scratch, p, &ctx).map_err(|error| {
                        StageFailure {
                            stage: stage_idx,
                            error,
                        }
                    })?;
                }
            }
            out.push(p);
        }
        Ok(out)
    }
}

fn apply_stage(
    apply: PointFn,
    params: &StageParams,
    scratch: &mut ResolvedParams,
    p: Point,
    ctx: &PointCtx,
) -> FxResult<Point> {
    match params {
        StageParams::Global(resolved) => apply(p, resolved, ctx),
        StageParams::PerPoint(resolver) => {
            resolver.resolve_into(scratch, &p, ctx);
            apply(p, scratch, ctx)
        }
    }
}

fn warn_passthrough(stage: &Stage, error: &FxError) {
    tracing::warn!(
        instance = %stage.instance_id,
        effect = %stage.effect_id,
        %error,
        "effect failed, passing frame through"
    );
}

/// Resolve every enabled instance of `nodes` at `time`.
///
/// Disabled instances and instances inside disabled groups are skipped. Unknown effect ids
/// and parameters that fail to resolve are logged and the instance is left out.
#[tracing::instrument(skip(registry, nodes), fields(nodes = nodes.len()))]
pub fn compile_chain(
    registry: &EffectRegistry,
    nodes: &[ChainNode<EffectInstance>],
    time: TimeCtx,
) -> CompiledChain {
    let mut chain = CompiledChain::identity(time);
    for inst in enabled_leaves(nodes) {
        let Some(def) = registry.lookup(&inst.effect_id) else {
            tracing::warn!(
                instance = %inst.id,
                effect = %inst.effect_id,
                "unknown effect, passing through"
            );
            chain.skipped += 1;
            continue;
        };
        match compile_stage(def, inst, time) {
            Ok(kind) => chain.stages.push(Stage {
                instance_id: inst.id.clone(),
                effect_id: inst.effect_id.clone(),
                kind,
            }),
            Err(error) => {
                tracing::warn!(
                    instance = %inst.id,
                    effect = %inst.effect_id,
                    %error,
                    "parameters did not resolve, passing through"
                );
                chain.skipped += 1;
            }
        }
    }
    chain
}

fn compile_stage(def: &EffectDef, inst: &EffectInstance, time: TimeCtx) -> FxResult<StageKind> {
    if let Animation::Keyframes { timeline } = &inst.animation {
        let params = resolve_static(&def.params, &timeline.values_at(time))?;
        return Ok(match def.apply {
            EffectApply::Point(apply) => StageKind::Point {
                apply,
                params: StageParams::Global(params),
            },
            EffectApply::Frame(apply) => StageKind::Frame { apply, params },
        });
    }

    Ok(match def.apply {
        EffectApply::Point(apply) if needs_per_point(&def.params, &inst.params) => {
            let resolver = PointResolver::new(&def.params, &inst.params, time)?;
            StageKind::Point {
                apply,
                params: StageParams::PerPoint(resolver),
            }
        }
        EffectApply::Point(apply) => StageKind::Point {
            apply,
            params: StageParams::Global(resolve_global(&def.params, &inst.params, time)?),
        },
        EffectApply::Frame(apply) => StageKind::Frame {
            apply,
            params: resolve_global(&def.params, &inst.params, time)?,
        },
    })
}

/// Apply `nodes` to `base` at `time_ms` and `bpm`.
///
/// Never fails: broken instances pass their input through. A chain with nothing enabled
/// returns `base` unchanged.
#[tracing::instrument(skip_all, fields(points = base.len()))]
pub fn render_frame(
    registry: &EffectRegistry,
    nodes: &[ChainNode<EffectInstance>],
    base: &[Point],
    time_ms: f64,
    bpm: f64,
) -> Frame {
    compile_chain(registry, nodes, TimeCtx::new(time_ms, bpm)).apply(base)
}

#[cfg(test)]
#[path = "../../tests/unit/render/executor.rs"]
mod tests;
