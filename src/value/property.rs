use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Structurally typed value held by a leaf, a keyframe, or a metadata attribute.
///
/// Vectors and colors are lists of numbers. Composite host values (text documents, marker
/// values) are records.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Absent or explicitly cleared value.
    #[default]
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Scalar number. Host enums are carried as numbers or names.
    Number(f64),
    /// String value.
    Text(String),
    /// Ordered tuple: vectors, colors, shape vertices.
    List(Vec<PropertyValue>),
    /// Composite value with named fields.
    Record(BTreeMap<String, PropertyValue>),
}

impl PropertyValue {
    /// Build a list of numbers.
    pub fn numbers(values: impl IntoIterator<Item = f64>) -> Self {
        Self::List(values.into_iter().map(Self::Number).collect())
    }

    /// Build a record from `(field, value)` pairs.
    pub fn record<K: Into<String>>(fields: impl IntoIterator<Item = (K, PropertyValue)>) -> Self {
        Self::Record(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Return `true` for [`PropertyValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Return `true` for [`PropertyValue::Record`].
    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record(_))
    }

    /// Borrow the boolean payload.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Borrow the numeric payload.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Borrow the string payload.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow the record payload.
    pub fn as_record(&self) -> Option<&BTreeMap<String, PropertyValue>> {
        match self {
            Self::Record(v) => Some(v),
            _ => None,
        }
    }

    /// Look up a record field. Non-records have no fields.
    pub fn field(&self, name: &str) -> Option<&PropertyValue> {
        self.as_record().and_then(|r| r.get(name))
    }

    /// Merge `incoming` onto `self` field by field.
    ///
    /// Only fields that already exist on `self` are overwritten, and `null` incoming fields are
    /// skipped. Non-record pairs replace wholesale.
    pub fn merged_with(&self, incoming: &PropertyValue) -> PropertyValue {
        match (self, incoming) {
            (Self::Record(current), Self::Record(patch)) => {
                let mut out = current.clone();
                for (key, value) in patch {
                    if value.is_null() {
                        continue;
                    }
                    if let Some(slot) = out.get_mut(key) {
                        *slot = value.clone();
                    }
                }
                Self::Record(out)
            }
            _ => incoming.clone(),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i32> for PropertyValue {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl<const N: usize> From<[f64; N]> for PropertyValue {
    fn from(v: [f64; N]) -> Self {
        Self::numbers(v)
    }
}

impl From<Vec<PropertyValue>> for PropertyValue {
    fn from(v: Vec<PropertyValue>) -> Self {
        Self::List(v)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/value/property.rs"]
mod tests;
