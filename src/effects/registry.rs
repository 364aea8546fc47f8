use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize, Serializer};

use crate::foundation::core::{Frame, Point, PointCtx, TimeCtx};
use crate::foundation::error::{FxError, FxResult};
use crate::params::resolve::ResolvedParams;
use crate::params::spec::ParamSpec;

/// Pure single-point mapping.
pub type PointFn = fn(Point, &ResolvedParams, &PointCtx) -> FxResult<Point>;

/// Pure whole-frame mapping, for effects that need to see every point at once.
pub type FrameFn = fn(&[Point], &ResolvedParams, &TimeCtx) -> FxResult<Frame>;

/// Apply function of an effect definition.
#[derive(Clone, Copy, Debug)]
pub enum EffectApply {
    /// Maps each point independently; consecutive point effects fuse into one pass.
    Point(PointFn),
    /// Maps the whole frame; splits the fused pass.
    Frame(FrameFn),
}

impl EffectApply {
    fn scope_name(&self) -> &'static str {
        match self {
            Self::Point(_) => "point",
            Self::Frame(_) => "frame",
        }
    }
}

/// Effect family, used to group definitions in editors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectCategory {
    /// Hue, saturation and color remapping.
    Color,
    /// Geometric transforms.
    Shape,
    /// Brightness and blanking.
    Intensity,
    /// Per-projector hardware correction.
    Calibration,
}

/// What an effect's output depends on besides its parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingClass {
    /// Output depends on parameters only.
    Static,
    /// Output depends on wall-clock time.
    Seconds,
    /// Output depends on tempo.
    Bpm,
}

/// Registry entry describing one effect.
#[derive(Clone, Debug, Serialize)]
pub struct EffectDef {
    /// Stable id referenced by effect instances.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Family.
    pub category: EffectCategory,
    /// Time dependency.
    pub timing: TimingClass,
    /// Declared parameters, in display order.
    pub params: Vec<ParamSpec>,
    /// Apply function.
    #[serde(rename = "scope", serialize_with = "serialize_scope")]
    pub apply: EffectApply,
}

fn serialize_scope<S: Serializer>(apply: &EffectApply, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(apply.scope_name())
}

impl EffectDef {
    fn new(
        id: &str,
        name: &str,
        category: EffectCategory,
        timing: TimingClass,
        params: Vec<ParamSpec>,
        apply: EffectApply,
    ) -> Self {
        Self {
            id: id.to_owned(),
            name: name.to_owned(),
            category,
            timing,
            params,
            apply,
        }
    }

    /// Point-scoped definition.
    pub fn point(
        id: &str,
        name: &str,
        category: EffectCategory,
        timing: TimingClass,
        params: Vec<ParamSpec>,
        apply: PointFn,
    ) -> Self {
        Self::new(id, name, category, timing, params, EffectApply::Point(apply))
    }

    /// Frame-scoped definition.
    pub fn frame(
        id: &str,
        name: &str,
        category: EffectCategory,
        timing: TimingClass,
        params: Vec<ParamSpec>,
        apply: FrameFn,
    ) -> Self {
        Self::new(id, name, category, timing, params, EffectApply::Frame(apply))
    }

    /// Check the id and every parameter declaration.
    pub fn validate(&self) -> FxResult<()> {
        if self.id.trim().is_empty() {
            return Err(FxError::validation("effect id must be non-empty"));
        }
        let mut seen = BTreeSet::new();
        for spec in &self.params {
            spec.validate()?;
            if !seen.insert(spec.key.as_str()) {
                return Err(FxError::validation(format!(
                    "effect '{}' declares parameter '{}' twice",
                    self.id, spec.key
                )));
            }
        }
        Ok(())
    }
}

/// Map from effect id to definition.
///
/// Built once at startup and passed by reference to the executor.
#[derive(Clone, Debug, Default)]
pub struct EffectRegistry {
    defs: BTreeMap<String, EffectDef>,
}

impl EffectRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in effect.
    pub fn with_builtins() -> Self {
        let mut reg = Self::new();
        let builtins = super::color::definitions()
            .into_iter()
            .chain(super::shape::definitions())
            .chain(super::intensity::definitions())
            .chain(super::calibration::definitions());
        for def in builtins {
            let id = def.id.clone();
            if let Err(err) = reg.register(def) {
                tracing::error!(effect = %id, error = %err, "skipping invalid built-in effect");
            }
        }
        reg
    }

    /// Add or replace a definition. The last registration of an id wins.
    ///
    /// Returns the replaced definition, if any.
    pub fn register(&mut self, def: EffectDef) -> FxResult<Option<EffectDef>> {
        def.validate()?;
        let replaced = self.defs.insert(def.id.clone(), def);
        if let Some(old) = &replaced {
            tracing::debug!(effect = %old.id, "replaced effect definition");
        }
        Ok(replaced)
    }

    /// Definition for `id`.
    pub fn lookup(&self, id: &str) -> Option<&EffectDef> {
        self.defs.get(id)
    }

    /// All definitions, ordered by id.
    pub fn definitions(&self) -> impl Iterator<Item = &EffectDef> {
        self.defs.values()
    }

    /// Definitions in one family, ordered by id.
    pub fn by_category(&self, category: EffectCategory) -> impl Iterator<Item = &EffectDef> {
        self.defs.values().filter(move |d| d.category == category)
    }

    /// Number of registered effects.
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Return `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/registry.rs"]
mod tests;
