use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::curves::spline::Lut;
use crate::foundation::core::{Point, PointCtx, TimeCtx};
use crate::foundation::error::{FxError, FxResult};
use crate::params::modulator::Modulator;
use crate::params::spec::{ParamKind, ParamSpec, ParamValue};

/// How one parameter of an effect instance gets its value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamBinding {
    /// Driven by a modulator.
    Modulated(Modulator),
    /// Fixed value.
    Static(ParamValue),
}

impl From<ParamValue> for ParamBinding {
    fn from(v: ParamValue) -> Self {
        Self::Static(v)
    }
}

impl From<Modulator> for ParamBinding {
    fn from(m: Modulator) -> Self {
        Self::Modulated(m)
    }
}

/// Parameter bindings of one effect instance, by key.
pub type ParamMap = BTreeMap<String, ParamBinding>;

/// A parameter value ready for an apply function.
#[derive(Clone, Debug, PartialEq)]
pub enum ResolvedValue {
    /// Clamped float.
    Float(f64),
    /// Rounded and clamped integer.
    Int(i64),
    /// Flag.
    Bool(bool),
    /// One of the declared choices.
    Choice(Arc<str>),
    /// Lookup table built from curve control points.
    Lut(Lut),
    /// Zone group names.
    ZoneGroups(Arc<[String]>),
}

/// Concrete parameter values for one effect invocation.
///
/// Entries follow the declaration order of the effect's parameter specs. Keys are shared, so
/// cloning a resolved set never copies key text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedParams {
    entries: SmallVec<[(Arc<str>, ResolvedValue); 8]>,
}

impl ResolvedParams {
    /// Empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of resolved entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` when no parameters were resolved.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw lookup.
    pub fn get(&self, key: &str) -> Option<&ResolvedValue> {
        self.entries.iter().find(|(k, _)| &**k == key).map(|(_, v)| v)
    }

    /// Iterate entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResolvedValue)> {
        self.entries.iter().map(|(k, v)| (&**k, v))
    }

    /// Insert or replace an entry.
    pub fn insert(&mut self, key: impl Into<Arc<str>>, value: ResolvedValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    fn shares_layout(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(&other.entries)
                .all(|((a, _), (b, _))| Arc::ptr_eq(a, b))
    }

    fn require(&self, key: &str) -> FxResult<&ResolvedValue> {
        self.get(key)
            .ok_or_else(|| FxError::parameter(format!("missing parameter '{key}'")))
    }

    fn mismatch(key: &str, want: &str) -> FxError {
        FxError::parameter(format!("parameter '{key}' is not a {want}"))
    }

    /// Numeric parameter. Integers widen to `f64`.
    pub fn f64(&self, key: &str) -> FxResult<f64> {
        match self.require(key)? {
            ResolvedValue::Float(v) => Ok(*v),
            ResolvedValue::Int(v) => Ok(*v as f64),
            _ => Err(Self::mismatch(key, "number")),
        }
    }

    /// Integer parameter.
    pub fn int(&self, key: &str) -> FxResult<i64> {
        match self.require(key)? {
            ResolvedValue::Int(v) => Ok(*v),
            _ => Err(Self::mismatch(key, "integer")),
        }
    }

    /// Flag parameter.
    pub fn bool(&self, key: &str) -> FxResult<bool> {
        match self.require(key)? {
            ResolvedValue::Bool(v) => Ok(*v),
            _ => Err(Self::mismatch(key, "flag")),
        }
    }

    /// Choice parameter.
    pub fn choice(&self, key: &str) -> FxResult<&str> {
        match self.require(key)? {
            ResolvedValue::Choice(v) => Ok(v),
            _ => Err(Self::mismatch(key, "choice")),
        }
    }

    /// Curve parameter as a lookup table.
    pub fn lut(&self, key: &str) -> FxResult<&Lut> {
        match self.require(key)? {
            ResolvedValue::Lut(v) => Ok(v),
            _ => Err(Self::mismatch(key, "curve")),
        }
    }

    /// Zone-group parameter.
    pub fn zone_groups(&self, key: &str) -> FxResult<&[String]> {
        match self.require(key)? {
            ResolvedValue::ZoneGroups(v) => Ok(v),
            _ => Err(Self::mismatch(key, "zone group list")),
        }
    }
}

/// Return `true` when any bound modulator must be evaluated per point.
///
/// Only then does the executor pay for per-point resolution.
pub fn needs_per_point(specs: &[ParamSpec], values: &ParamMap) -> bool {
    specs.iter().any(|spec| {
        matches!(
            values.get(&spec.key),
            Some(ParamBinding::Modulated(m)) if m.requires_spatial() && spec.kind.is_numeric()
        )
    })
}

/// Resolve every declared parameter once for the frame at `time`.
///
/// Spatial modulators are sampled at the origin; callers that need their per-point values use
/// [`resolve_point`] or [`PointResolver`].
pub fn resolve_global(
    specs: &[ParamSpec],
    values: &ParamMap,
    time: TimeCtx,
) -> FxResult<ResolvedParams> {
    resolve_with(specs, values, |m| m.eval_global(time))
}

/// Resolve every declared parameter for one point.
pub fn resolve_point(
    specs: &[ParamSpec],
    values: &ParamMap,
    point: &Point,
    ctx: &PointCtx,
) -> FxResult<ResolvedParams> {
    resolve_with(specs, values, |m| m.eval_point(point, ctx))
}

/// Resolve plain stored values, as produced by keyframe interpolation.
pub fn resolve_static(
    specs: &[ParamSpec],
    values: &BTreeMap<String, ParamValue>,
) -> FxResult<ResolvedParams> {
    let mut out = ResolvedParams::new();
    for spec in specs {
        let value = values.get(&spec.key).unwrap_or(&spec.default);
        out.entries.push((Arc::from(spec.key.as_str()), resolve_stored(spec, value)?));
    }
    Ok(out)
}

/// Current value of one binding flattened to a stored value.
///
/// Active modulators are sampled at `time`; missing bindings yield the declared default.
pub fn static_value(spec: &ParamSpec, binding: Option<&ParamBinding>, time: TimeCtx) -> ParamValue {
    match binding {
        None => spec.default.clone(),
        Some(ParamBinding::Static(v)) => v.clone(),
        Some(ParamBinding::Modulated(m)) => {
            let v = m.eval_global(time);
            match spec.kind {
                ParamKind::Bool => ParamValue::Bool(v >= 0.5),
                ParamKind::Int => ParamValue::Number(spec.clamp(v.round())),
                ParamKind::Float => ParamValue::Number(spec.clamp(v)),
                _ => spec.default.clone(),
            }
        }
    }
}

fn resolve_with(
    specs: &[ParamSpec],
    values: &ParamMap,
    mut eval: impl FnMut(&Modulator) -> f64,
) -> FxResult<ResolvedParams> {
    let mut out = ResolvedParams::new();
    for spec in specs {
        let value = match values.get(&spec.key) {
            None => resolve_stored(spec, &spec.default)?,
            Some(ParamBinding::Static(v)) => resolve_stored(spec, v)?,
            Some(ParamBinding::Modulated(m)) => {
                check_modulatable(spec)?;
                numeric_value(spec, eval(m))
            }
        };
        out.entries.push((Arc::from(spec.key.as_str()), value));
    }
    Ok(out)
}

fn check_modulatable(spec: &ParamSpec) -> FxResult<()> {
    if spec.kind.is_numeric() {
        Ok(())
    } else {
        Err(FxError::parameter(format!(
            "parameter '{}' cannot be modulated",
            spec.key
        )))
    }
}

fn numeric_value(spec: &ParamSpec, v: f64) -> ResolvedValue {
    match spec.kind {
        ParamKind::Bool => ResolvedValue::Bool(v >= 0.5),
        ParamKind::Int => ResolvedValue::Int(spec.clamp(v.round()) as i64),
        _ => ResolvedValue::Float(spec.clamp(v)),
    }
}

fn resolve_stored(spec: &ParamSpec, value: &ParamValue) -> FxResult<ResolvedValue> {
    let mismatch = || {
        FxError::parameter(format!(
            "parameter '{}' expects {:?}, got {}",
            spec.key,
            spec.kind,
            value.type_name()
        ))
    };
    Ok(match (spec.kind, value) {
        (ParamKind::Float, v) => {
            ResolvedValue::Float(spec.clamp(v.as_f64().ok_or_else(mismatch)?))
        }
        (ParamKind::Int, v) => {
            let n = v.as_f64().ok_or_else(mismatch)?;
            ResolvedValue::Int(spec.clamp(n.round()) as i64)
        }
        (ParamKind::Bool, ParamValue::Bool(b)) => ResolvedValue::Bool(*b),
        (ParamKind::Bool, ParamValue::Number(n)) => ResolvedValue::Bool(*n != 0.0),
        (ParamKind::Choice, ParamValue::Text(t)) => {
            if spec.choices.iter().any(|c| c == t) {
                ResolvedValue::Choice(Arc::from(t.as_str()))
            } else {
                match &spec.default {
                    ParamValue::Text(d) => ResolvedValue::Choice(Arc::from(d.as_str())),
                    _ => return Err(mismatch()),
                }
            }
        }
        (ParamKind::Curve, ParamValue::Curve(points)) => {
            ResolvedValue::Lut(Lut::from_points(points))
        }
        (ParamKind::ZoneGroups, ParamValue::Groups(groups)) => {
            ResolvedValue::ZoneGroups(Arc::from(groups.as_slice()))
        }
        // `[]` reads back as whichever list variant comes first.
        (ParamKind::Curve, v) if v.is_empty_list() => ResolvedValue::Lut(Lut::identity()),
        (ParamKind::ZoneGroups, v) if v.is_empty_list() => {
            ResolvedValue::ZoneGroups(Arc::from(Vec::<String>::new()))
        }
        _ => return Err(mismatch()),
    })
}

/// Per-point resolution with the frame-constant work done once.
///
/// Holds the globally resolved parameters plus the slots driven by spatial modulators; only
/// those slots are re-evaluated for each point.
#[derive(Clone, Debug)]
pub struct PointResolver {
    base: ResolvedParams,
    spatial: SmallVec<[(usize, Modulator); 4]>,
    specs: SmallVec<[ParamSpec; 4]>,
}

impl PointResolver {
    /// Resolve the frame-constant part of `values`.
    pub fn new(specs: &[ParamSpec], values: &ParamMap, time: TimeCtx) -> FxResult<Self> {
        let base = resolve_global(specs, values, time)?;
        let mut spatial = SmallVec::new();
        let mut spatial_specs = SmallVec::new();
        for (slot, spec) in specs.iter().enumerate() {
            if let Some(ParamBinding::Modulated(m)) = values.get(&spec.key)
                && m.requires_spatial()
            {
                spatial.push((slot, m.clone()));
                spatial_specs.push(spec.clone());
            }
        }
        Ok(Self {
            base,
            spatial,
            specs: spatial_specs,
        })
    }

    /// Parameters shared by every point.
    pub fn base(&self) -> &ResolvedParams {
        &self.base
    }

    /// Return `true` when at least one slot varies per point.
    pub fn is_spatial(&self) -> bool {
        !self.spatial.is_empty()
    }

    /// Fill `scratch` with the parameters for one point.
    ///
    /// A scratch already filled by this resolver only has its spatial slots rewritten; any
    /// other scratch is first reset to [`PointResolver::base`].
    pub fn resolve_into(&self, scratch: &mut ResolvedParams, point: &Point, ctx: &PointCtx) {
        if !scratch.shares_layout(&self.base) {
            scratch.clone_from(&self.base);
        }
        for ((slot, m), spec) in self.spatial.iter().zip(&self.specs) {
            scratch.entries[*slot].1 = numeric_value(spec, m.eval_point(point, ctx));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/params/resolve.rs"]
mod tests;
