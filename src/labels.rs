//! Host enum values carried by layer metadata, with the zh-CN labels the host UI shows.
//!
//! Metadata stores these enums by host name (`"SOFT_LIGHT"`). The label lookups let panels
//! that only have the localized menu text recover the value.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    foundation::error::{PropTreeError, PropTreeResult},
    value::property::PropertyValue,
};

/// Layer blending mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlendingMode {
    #[default]
    Normal,
    Dissolve,
    DancingDissolve,
    Darken,
    Multiply,
    ColorBurn,
    ClassicColorBurn,
    LinearBurn,
    DarkerColor,
    Add,
    Lighten,
    Screen,
    ColorDodge,
    ClassicColorDodge,
    LinearDodge,
    LighterColor,
    Overlay,
    SoftLight,
    HardLight,
    LinearLight,
    VividLight,
    PinLight,
    HardMix,
    Difference,
    ClassicDifference,
    Exclusion,
    Subtract,
    Divide,
    Hue,
    Saturation,
    Color,
    Luminosity,
    StencilAlpha,
    StencilLuma,
    // The host spells this one with a single T.
    #[serde(rename = "SILHOUETE_ALPHA")]
    SilhouetteAlpha,
    SilhouetteLuma,
    AlphaAdd,
    LuminescentPremul,
}

const BLENDING_MODES: [(BlendingMode, &str, &str); 38] = [
    (BlendingMode::Normal, "NORMAL", "正常"),
    (BlendingMode::Dissolve, "DISSOLVE", "溶解"),
    (BlendingMode::DancingDissolve, "DANCING_DISSOLVE", "动态抖动溶解"),
    (BlendingMode::Darken, "DARKEN", "变暗"),
    (BlendingMode::Multiply, "MULTIPLY", "相乘"),
    (BlendingMode::ColorBurn, "COLOR_BURN", "颜色加深"),
    (BlendingMode::ClassicColorBurn, "CLASSIC_COLOR_BURN", "经典颜色加深"),
    (BlendingMode::LinearBurn, "LINEAR_BURN", "线性加深"),
    (BlendingMode::DarkerColor, "DARKER_COLOR", "较深的颜色"),
    (BlendingMode::Add, "ADD", "相加"),
    (BlendingMode::Lighten, "LIGHTEN", "变亮"),
    (BlendingMode::Screen, "SCREEN", "屏幕"),
    (BlendingMode::ColorDodge, "COLOR_DODGE", "颜色减淡"),
    (BlendingMode::ClassicColorDodge, "CLASSIC_COLOR_DODGE", "经典颜色减淡"),
    (BlendingMode::LinearDodge, "LINEAR_DODGE", "线性减淡"),
    (BlendingMode::LighterColor, "LIGHTER_COLOR", "较浅的颜色"),
    (BlendingMode::Overlay, "OVERLAY", "叠加"),
    (BlendingMode::SoftLight, "SOFT_LIGHT", "柔光"),
    (BlendingMode::HardLight, "HARD_LIGHT", "强光"),
    (BlendingMode::LinearLight, "LINEAR_LIGHT", "线性光"),
    (BlendingMode::VividLight, "VIVID_LIGHT", "亮光"),
    (BlendingMode::PinLight, "PIN_LIGHT", "点光"),
    (BlendingMode::HardMix, "HARD_MIX", "纯色混合"),
    (BlendingMode::Difference, "DIFFERENCE", "差值"),
    (BlendingMode::ClassicDifference, "CLASSIC_DIFFERENCE", "经典差值"),
    (BlendingMode::Exclusion, "EXCLUSION", "排除"),
    (BlendingMode::Subtract, "SUBTRACT", "相减"),
    (BlendingMode::Divide, "DIVIDE", "相除"),
    (BlendingMode::Hue, "HUE", "色相"),
    (BlendingMode::Saturation, "SATURATION", "饱和度"),
    (BlendingMode::Color, "COLOR", "颜色"),
    (BlendingMode::Luminosity, "LUMINOSITY", "发光度"),
    (BlendingMode::StencilAlpha, "STENCIL_ALPHA", "模板 Alpha"),
    (BlendingMode::StencilLuma, "STENCIL_LUMA", "模板亮度"),
    (BlendingMode::SilhouetteAlpha, "SILHOUETE_ALPHA", "轮廓 Alpha"),
    (BlendingMode::SilhouetteLuma, "SILHOUETTE_LUMA", "轮廓亮度"),
    (BlendingMode::AlphaAdd, "ALPHA_ADD", "Alpha 添加"),
    (BlendingMode::LuminescentPremul, "LUMINESCENT_PREMUL", "冷光预乘"),
];

impl BlendingMode {
    pub const ALL: [BlendingMode; 38] = {
        let mut out = [BlendingMode::Normal; 38];
        let mut i = 0;
        while i < BLENDING_MODES.len() {
            out[i] = BLENDING_MODES[i].0;
            i += 1;
        }
        out
    };

    fn row(self) -> (BlendingMode, &'static str, &'static str) {
        BLENDING_MODES
            .into_iter()
            .find(|(mode, _, _)| *mode == self)
            .unwrap_or(BLENDING_MODES[0])
    }

    /// Enum name as the host scripting API spells it.
    pub fn host_name(self) -> &'static str {
        self.row().1
    }

    /// zh-CN menu label.
    pub fn label(self) -> &'static str {
        self.row().2
    }

    /// Look up a zh-CN menu label. Unknown labels give [`BlendingMode::Normal`].
    pub fn from_label(label: &str) -> Self {
        BLENDING_MODES
            .into_iter()
            .find(|(_, _, l)| *l == label)
            .map_or(Self::Normal, |(mode, _, _)| mode)
    }
}

impl fmt::Display for BlendingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.host_name())
    }
}

impl FromStr for BlendingMode {
    type Err = PropTreeError;

    fn from_str(s: &str) -> PropTreeResult<Self> {
        BLENDING_MODES
            .into_iter()
            .find(|(_, name, _)| *name == s)
            .map(|(mode, _, _)| mode)
            .ok_or_else(|| PropTreeError::serde(format!("unknown blending mode '{s}'")))
    }
}

impl From<BlendingMode> for PropertyValue {
    fn from(mode: BlendingMode) -> Self {
        PropertyValue::Text(mode.host_name().to_string())
    }
}

/// Track matte mode of a layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackMatteType {
    Alpha,
    AlphaInverted,
    Luma,
    LumaInverted,
    #[default]
    NoTrackMatte,
}

const TRACK_MATTES: [(TrackMatteType, &str, &str); 5] = [
    (TrackMatteType::Alpha, "ALPHA", "Alpha 遮罩"),
    (TrackMatteType::AlphaInverted, "ALPHA_INVERTED", "Alpha 反转遮罩"),
    (TrackMatteType::Luma, "LUMA", "亮度遮罩"),
    (TrackMatteType::LumaInverted, "LUMA_INVERTED", "亮度反转遮罩"),
    (TrackMatteType::NoTrackMatte, "NO_TRACK_MATTE", "无"),
];

impl TrackMatteType {
    pub const ALL: [TrackMatteType; 5] = [
        Self::Alpha,
        Self::AlphaInverted,
        Self::Luma,
        Self::LumaInverted,
        Self::NoTrackMatte,
    ];

    fn row(self) -> (TrackMatteType, &'static str, &'static str) {
        TRACK_MATTES
            .into_iter()
            .find(|(matte, _, _)| *matte == self)
            .unwrap_or(TRACK_MATTES[4])
    }

    pub fn host_name(self) -> &'static str {
        self.row().1
    }

    pub fn label(self) -> &'static str {
        self.row().2
    }

    /// Look up a zh-CN menu label. There is no fallback.
    pub fn from_label(label: &str) -> Option<Self> {
        TRACK_MATTES
            .into_iter()
            .find(|(_, _, l)| *l == label)
            .map(|(matte, _, _)| matte)
    }
}

impl fmt::Display for TrackMatteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.host_name())
    }
}

impl FromStr for TrackMatteType {
    type Err = PropTreeError;

    fn from_str(s: &str) -> PropTreeResult<Self> {
        TRACK_MATTES
            .into_iter()
            .find(|(_, name, _)| *name == s)
            .map(|(matte, _, _)| matte)
            .ok_or_else(|| PropTreeError::serde(format!("unknown track matte type '{s}'")))
    }
}

impl From<TrackMatteType> for PropertyValue {
    fn from(matte: TrackMatteType) -> Self {
        PropertyValue::Text(matte.host_name().to_string())
    }
}

#[cfg(test)]
#[path = "../tests/unit/labels.rs"]
mod tests;
