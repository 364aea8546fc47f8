use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::animation::keyframes::KeyframeModulator;
use crate::foundation::core::TimeCtx;
use crate::params::resolve::{ParamBinding, ParamMap, static_value};
use crate::params::spec::{ParamSpec, ParamValue};

/// Behavior shared by every leaf a chain tree can hold.
pub trait ChainLeaf {
    /// Durable id.
    fn id(&self) -> &str;
    /// Replace the durable id.
    fn set_id(&mut self, id: String);
    /// Return `true` when the leaf participates in rendering.
    fn is_enabled(&self) -> bool;
    /// Enable or disable the leaf.
    fn set_enabled(&mut self, enabled: bool);
}

/// Fresh durable id for a node.
pub fn new_node_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn default_enabled() -> bool {
    true
}

/// Which animation layer drives an effect instance.
///
/// Per-parameter modulators and keyframes are mutually exclusive; a parked timeline is kept
/// so switching back to keyframes restores it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Animation {
    /// Parameters come from their bindings, modulators included.
    #[default]
    Modulators,
    /// Parameters come from the keyframe timeline.
    Keyframes {
        /// Active timeline.
        timeline: KeyframeModulator,
    },
    /// Parameters come from their bindings; a previously used timeline is kept aside.
    Parked {
        /// Timeline restored by the next [`EffectInstance::enable_keyframes`].
        timeline: KeyframeModulator,
    },
}

/// One configured effect in a chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectInstance {
    /// Durable id.
    pub id: String,
    /// Registry id of the effect.
    pub effect_id: String,
    /// Disabled instances are skipped by the executor.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Parameter bindings by key.
    #[serde(default)]
    pub params: ParamMap,
    /// Animation layer.
    #[serde(default)]
    pub animation: Animation,
}

impl EffectInstance {
    /// Enabled instance of `effect_id` with default parameters and a fresh id.
    pub fn new(effect_id: impl Into<String>) -> Self {
        Self {
            id: new_node_id(),
            effect_id: effect_id.into(),
            enabled: true,
            params: ParamMap::new(),
            animation: Animation::Modulators,
        }
    }

    /// Builder-style [`EffectInstance::set_param`].
    pub fn with_param(mut self, key: &str, binding: impl Into<ParamBinding>) -> Self {
        self.set_param(key, binding);
        self
    }

    /// Bind a parameter. While keyframes drive the instance, a bound modulator is stored
    /// inactive.
    pub fn set_param(&mut self, key: &str, binding: impl Into<ParamBinding>) {
        let mut binding = binding.into();
        if let (Animation::Keyframes { .. }, ParamBinding::Modulated(m)) =
            (&self.animation, &mut binding)
        {
            m.active = false;
        }
        self.params.insert(key.to_owned(), binding);
    }

    /// Active keyframe timeline, if keyframes drive this instance.
    pub fn keyframes(&self) -> Option<&KeyframeModulator> {
        match &self.animation {
            Animation::Keyframes { timeline } => Some(timeline),
            _ => None,
        }
    }

    /// Mutable access to the active keyframe timeline.
    pub fn keyframes_mut(&mut self) -> Option<&mut KeyframeModulator> {
        match &mut self.animation {
            Animation::Keyframes { timeline } => Some(timeline),
            _ => None,
        }
    }

    /// Current value of every declared parameter as a plain stored value.
    pub fn static_snapshot(
        &self,
        specs: &[ParamSpec],
        time: TimeCtx,
    ) -> BTreeMap<String, ParamValue> {
        specs
            .iter()
            .map(|spec| {
                (
                    spec.key.clone(),
                    static_value(spec, self.params.get(&spec.key), time),
                )
            })
            .collect()
    }

    /// Deactivate every modulator, recording its current output as the fallback.
    pub fn deactivate_modulators(&mut self, time: TimeCtx) {
        for binding in self.params.values_mut() {
            if let ParamBinding::Modulated(m) = binding
                && m.active
            {
                m.fallback = m.eval_global(time);
                m.active = false;
            }
        }
    }

    /// Switch to keyframe animation.
    ///
    /// A parked timeline is restored; otherwise a two-keyframe timeline is created from the
    /// current parameter values. Modulators are deactivated, never deleted.
    pub fn enable_keyframes(&mut self, specs: &[ParamSpec], time: TimeCtx) {
        let animation = std::mem::take(&mut self.animation);
        let timeline = match animation {
            Animation::Keyframes { timeline } | Animation::Parked { timeline } => timeline,
            Animation::Modulators => {
                KeyframeModulator::from_values(self.static_snapshot(specs, time))
            }
        };
        self.deactivate_modulators(time);
        self.animation = Animation::Keyframes { timeline };
    }

    /// Switch back to per-parameter bindings, parking the timeline.
    ///
    /// Modulators stay inactive until re-enabled individually.
    pub fn disable_keyframes(&mut self) {
        let animation = std::mem::take(&mut self.animation);
        self.animation = match animation {
            Animation::Keyframes { timeline } | Animation::Parked { timeline } => {
                Animation::Parked { timeline }
            }
            Animation::Modulators => Animation::Modulators,
        };
    }
}

impl ChainLeaf for EffectInstance {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

/// A preset placed in a cue's preset chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PresetInstance {
    /// Durable id.
    pub id: String,
    /// Preset to generate base points from.
    pub preset_id: String,
    /// Disabled presets produce no points.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Preset parameter values by key.
    #[serde(default)]
    pub params: BTreeMap<String, ParamValue>,
}

impl PresetInstance {
    /// Enabled instance of `preset_id` with a fresh id.
    pub fn new(preset_id: impl Into<String>) -> Self {
        Self {
            id: new_node_id(),
            preset_id: preset_id.into(),
            enabled: true,
            params: BTreeMap::new(),
        }
    }
}

impl ChainLeaf for PresetInstance {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/chain/instance.rs"]
mod tests;
