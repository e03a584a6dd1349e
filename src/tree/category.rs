use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::foundation::error::{PropTreeError, PropTreeResult};

/// Layer sub-trees that encode can include or exclude as a whole.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Marker,
    Transform,
    Effect,
    Mask,
    LayerStyles,
    OptionsGroup,
    Audio,
    TimeRemapping,
    TextProperties,
    VectorsGroup,
    Camera,
    Light,
}

impl Category {
    pub const ALL: [Category; 12] = [
        Self::Marker,
        Self::Transform,
        Self::Effect,
        Self::Mask,
        Self::LayerStyles,
        Self::OptionsGroup,
        Self::Audio,
        Self::TimeRemapping,
        Self::TextProperties,
        Self::VectorsGroup,
        Self::Camera,
        Self::Light,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Marker => "Marker",
            Self::Transform => "Transform",
            Self::Effect => "Effect",
            Self::Mask => "Mask",
            Self::LayerStyles => "LayerStyles",
            Self::OptionsGroup => "OptionsGroup",
            Self::Audio => "Audio",
            Self::TimeRemapping => "TimeRemapping",
            Self::TextProperties => "TextProperties",
            Self::VectorsGroup => "VectorsGroup",
            Self::Camera => "Camera",
            Self::Light => "Light",
        }
    }

    /// Match names of the layer children the category covers. Options covers geometry and
    /// material together.
    pub fn match_names(self) -> &'static [&'static str] {
        match self {
            Self::Marker => &["ADBE Marker"],
            Self::Transform => &["ADBE Transform Group"],
            Self::Effect => &["ADBE Effect Parade"],
            Self::Mask => &["ADBE Mask Parade"],
            Self::LayerStyles => &["ADBE Layer Styles"],
            Self::OptionsGroup => &["ADBE Extrsn Options Group", "ADBE Material Options Group"],
            Self::Audio => &["ADBE Audio Group"],
            Self::TimeRemapping => &["ADBE Time Remapping"],
            Self::TextProperties => &["ADBE Text Properties"],
            Self::VectorsGroup => &["ADBE Root Vectors Group"],
            Self::Camera => &["ADBE Camera Options Group"],
            Self::Light => &["ADBE Light Options Group"],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = PropTreeError;

    fn from_str(s: &str) -> PropTreeResult<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| PropTreeError::serde(format!("unknown category '{s}'")))
    }
}

/// Active categories for one encode call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategorySet(BTreeSet<Category>);

impl CategorySet {
    pub fn all() -> Self {
        Self(Category::ALL.into_iter().collect())
    }

    pub fn none() -> Self {
        Self(BTreeSet::new())
    }

    pub fn only(categories: impl IntoIterator<Item = Category>) -> Self {
        Self(categories.into_iter().collect())
    }

    pub fn contains(&self, category: Category) -> bool {
        self.0.contains(&category)
    }

    pub fn with(mut self, category: Category) -> Self {
        self.0.insert(category);
        self
    }

    pub fn without(mut self, category: Category) -> Self {
        self.0.remove(&category);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Category> + '_ {
        self.0.iter().copied()
    }
}

impl Default for CategorySet {
    fn default() -> Self {
        Self::all()
    }
}

/// Comma-separated names, e.g. `"Transform,Effect"`. Blank input is the empty set.
impl FromStr for CategorySet {
    type Err = PropTreeError;

    fn from_str(s: &str) -> PropTreeResult<Self> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(Category::from_str)
            .collect::<PropTreeResult<BTreeSet<_>>>()
            .map(Self)
    }
}

/// Options for one encode call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodeOpts {
    #[serde(default)]
    pub categories: CategorySet,
}

impl EncodeOpts {
    pub fn with_categories(categories: CategorySet) -> Self {
        Self { categories }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tree/category.rs"]
mod tests;
