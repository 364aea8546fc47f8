use serde::{Deserialize, Serialize};

use crate::curves::points::{CurvePoint, identity_curve};
use crate::foundation::error::{FxError, FxResult};

/// Declared type of an effect parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    /// Real number, clamped to `[min, max]` when bounds exist.
    Float,
    /// Integer, rounded then clamped.
    Int,
    /// On/off flag.
    Bool,
    /// One of a fixed list of strings.
    Choice,
    /// Curve control points, resolved to a lookup table.
    Curve,
    /// Names of zone groups an effect targets.
    ZoneGroups,
}

impl ParamKind {
    /// Return `true` for kinds a modulator may drive.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Float | Self::Int | Self::Bool)
    }
}

/// A plain stored parameter value, as persisted in chains and keyframes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Flag value.
    Bool(bool),
    /// Float or integer value.
    Number(f64),
    /// Choice value.
    Text(String),
    /// Curve control points.
    Curve(Vec<CurvePoint>),
    /// Zone group names.
    Groups(Vec<String>),
}

impl ParamValue {
    /// Numeric view of the value; booleans read as `0`/`1`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Return `true` for `[]`, which reads back as either list variant.
    pub fn is_empty_list(&self) -> bool {
        match self {
            Self::Curve(points) => points.is_empty(),
            Self::Groups(groups) => groups.is_empty(),
            _ => false,
        }
    }

    /// Short type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::Curve(_) => "curve",
            Self::Groups(_) => "zone groups",
        }
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

/// Declaration of one effect parameter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Key used in value maps.
    pub key: String,
    /// Declared type.
    pub kind: ParamKind,
    /// Value used when a chain does not set the key.
    pub default: ParamValue,
    /// Inclusive lower bound for numeric kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Inclusive upper bound for numeric kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Allowed values for [`ParamKind::Choice`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
}

impl ParamSpec {
    fn base(key: &str, kind: ParamKind, default: ParamValue) -> Self {
        Self {
            key: key.to_owned(),
            kind,
            default,
            min: None,
            max: None,
            choices: Vec::new(),
        }
    }

    /// Bounded float parameter.
    pub fn float(key: &str, default: f64, min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            ..Self::base(key, ParamKind::Float, ParamValue::Number(default))
        }
    }

    /// Bounded integer parameter.
    pub fn int(key: &str, default: i64, min: i64, max: i64) -> Self {
        Self {
            min: Some(min as f64),
            max: Some(max as f64),
            ..Self::base(key, ParamKind::Int, ParamValue::Number(default as f64))
        }
    }

    /// Flag parameter.
    pub fn bool(key: &str, default: bool) -> Self {
        Self::base(key, ParamKind::Bool, ParamValue::Bool(default))
    }

    /// Choice parameter; `default` must be one of `choices`.
    pub fn choice(key: &str, default: &str, choices: &[&str]) -> Self {
        Self {
            choices: choices.iter().map(|c| (*c).to_owned()).collect(),
            ..Self::base(key, ParamKind::Choice, ParamValue::from(default))
        }
    }

    /// Curve parameter defaulting to the identity curve.
    pub fn curve(key: &str) -> Self {
        Self::base(key, ParamKind::Curve, ParamValue::Curve(identity_curve()))
    }

    /// Zone-group list parameter defaulting to no groups.
    pub fn zone_groups(key: &str) -> Self {
        Self::base(key, ParamKind::ZoneGroups, ParamValue::Groups(Vec::new()))
    }

    /// Clamp a numeric value into this spec's bounds. NaN maps to the default.
    pub fn clamp(&self, v: f64) -> f64 {
        let v = if v.is_nan() {
            self.default.as_f64().unwrap_or(0.0)
        } else {
            v
        };
        let v = self.min.map_or(v, |lo| v.max(lo));
        self.max.map_or(v, |hi| v.min(hi))
    }

    /// Check the declaration is self-consistent.
    pub fn validate(&self) -> FxResult<()> {
        if self.key.trim().is_empty() {
            return Err(FxError::validation("parameter key must be non-empty"));
        }
        if let (Some(lo), Some(hi)) = (self.min, self.max)
            && (lo > hi || lo.is_nan() || hi.is_nan())
        {
            return Err(FxError::validation(format!(
                "parameter '{}' has min > max",
                self.key
            )));
        }

        let default_ok = match (self.kind, &self.default) {
            (ParamKind::Float | ParamKind::Int, ParamValue::Number(n)) => {
                n.is_finite() && self.clamp(*n) == *n
            }
            (ParamKind::Bool, ParamValue::Bool(_)) => true,
            (ParamKind::Choice, ParamValue::Text(t)) => self.choices.iter().any(|c| c == t),
            (ParamKind::Curve, ParamValue::Curve(_)) => true,
            (ParamKind::ZoneGroups, ParamValue::Groups(_)) => true,
            (ParamKind::Curve | ParamKind::ZoneGroups, v) => v.is_empty_list(),
            _ => false,
        };
        if !default_ok {
            return Err(FxError::validation(format!(
                "parameter '{}' has a default that does not fit its declaration",
                self.key
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/params/spec.rs"]
mod tests;
