use serde::{Deserialize, Serialize};

use crate::value::property::PropertyValue;

/// One `(time, value, interpolation)` tuple of an animated leaf.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyframe {
    /// Key time in seconds, layer time space.
    pub time: f64,
    /// Value at `time`.
    pub value: PropertyValue,
    /// Interpolation metadata; absent means host defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpolation: Option<KeyframeInterpolation>,
}

impl Keyframe {
    /// Key with host-default interpolation.
    pub fn new(time: f64, value: impl Into<PropertyValue>) -> Self {
        Self {
            time,
            value: value.into(),
            interpolation: None,
        }
    }

    /// Attach interpolation metadata.
    pub fn with_interpolation(mut self, interpolation: KeyframeInterpolation) -> Self {
        self.interpolation = Some(interpolation);
        self
    }

    /// Same key with its value rewritten by `f`.
    pub fn map_value(&self, f: impl FnOnce(&PropertyValue) -> PropertyValue) -> Self {
        Self {
            time: self.time,
            value: f(&self.value),
            interpolation: self.interpolation.clone(),
        }
    }
}

/// Host interpolation type on either side of a key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterpolationType {
    #[default]
    Linear,
    Bezier,
    Hold,
}

/// One dimension of temporal ease.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TemporalEase {
    pub speed: f64,
    pub influence: f64,
}

/// Interpolation metadata carried per key.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyframeInterpolation {
    #[serde(default)]
    pub in_type: InterpolationType,
    #[serde(default)]
    pub out_type: InterpolationType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub in_ease: Vec<TemporalEase>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub out_ease: Vec<TemporalEase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_spatial_tangent: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_spatial_tangent: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub temporal_continuous: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub temporal_auto_bezier: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub spatial_continuous: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub spatial_auto_bezier: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub roving: bool,
}

fn is_false(v: &bool) -> bool {
    !*v
}

#[cfg(test)]
#[path = "../../tests/unit/value/keyframe.rs"]
mod tests;
