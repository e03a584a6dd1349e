use serde::{Deserialize, Serialize};

/// Self attributes a container node may carry, named as the host names them on the wire.
///
/// Declaration order is the write order used by metadata decode for the generic attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Attribute {
    Enabled,
    Name,
    AutoOrient,
    InPoint,
    OutPoint,
    StartTime,
    Stretch,
    Label,
    Locked,
    Shy,
    Solo,
    AdjustmentLayer,
    AudioEnabled,
    BlendingMode,
    EffectsActive,
    FrameBlendingType,
    TimeRemapEnabled,
    ThreeDLayer,
    ThreeDPerChar,
    GuideLayer,
    MotionBlur,
    PreserveTransparency,
    Quality,
    SamplingQuality,
    TrackMatteType,
    Height,
    Width,
}

impl Attribute {
    /// Every attribute, in declaration order.
    pub const ALL: [Attribute; 27] = [
        Self::Enabled,
        Self::Name,
        Self::AutoOrient,
        Self::InPoint,
        Self::OutPoint,
        Self::StartTime,
        Self::Stretch,
        Self::Label,
        Self::Locked,
        Self::Shy,
        Self::Solo,
        Self::AdjustmentLayer,
        Self::AudioEnabled,
        Self::BlendingMode,
        Self::EffectsActive,
        Self::FrameBlendingType,
        Self::TimeRemapEnabled,
        Self::ThreeDLayer,
        Self::ThreeDPerChar,
        Self::GuideLayer,
        Self::MotionBlur,
        Self::PreserveTransparency,
        Self::Quality,
        Self::SamplingQuality,
        Self::TrackMatteType,
        Self::Height,
        Self::Width,
    ];

    /// Attributes every layer carries.
    pub const BASE_LAYER: [Attribute; 9] = [
        Self::AutoOrient,
        Self::InPoint,
        Self::OutPoint,
        Self::StartTime,
        Self::Stretch,
        Self::Label,
        Self::Locked,
        Self::Shy,
        Self::Solo,
    ];

    /// Extra attributes of raster (AV, text, shape) layers. `threeDPerChar` is text-only and
    /// not listed here.
    pub const AV_LAYER: [Attribute; 15] = [
        Self::AdjustmentLayer,
        Self::AudioEnabled,
        Self::BlendingMode,
        Self::EffectsActive,
        Self::FrameBlendingType,
        Self::TimeRemapEnabled,
        Self::ThreeDLayer,
        Self::GuideLayer,
        Self::MotionBlur,
        Self::PreserveTransparency,
        Self::Quality,
        Self::SamplingQuality,
        Self::TrackMatteType,
        Self::Height,
        Self::Width,
    ];

    /// Timing attributes that must be written before anything else on a layer.
    pub const TIMING: [Attribute; 3] = [Self::StartTime, Self::InPoint, Self::OutPoint];

    /// Wire name of the attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::Name => "name",
            Self::AutoOrient => "autoOrient",
            Self::InPoint => "inPoint",
            Self::OutPoint => "outPoint",
            Self::StartTime => "startTime",
            Self::Stretch => "stretch",
            Self::Label => "label",
            Self::Locked => "locked",
            Self::Shy => "shy",
            Self::Solo => "solo",
            Self::AdjustmentLayer => "adjustmentLayer",
            Self::AudioEnabled => "audioEnabled",
            Self::BlendingMode => "blendingMode",
            Self::EffectsActive => "effectsActive",
            Self::FrameBlendingType => "frameBlendingType",
            Self::TimeRemapEnabled => "timeRemapEnabled",
            Self::ThreeDLayer => "threeDLayer",
            Self::ThreeDPerChar => "threeDPerChar",
            Self::GuideLayer => "guideLayer",
            Self::MotionBlur => "motionBlur",
            Self::PreserveTransparency => "preserveTransparency",
            Self::Quality => "quality",
            Self::SamplingQuality => "samplingQuality",
            Self::TrackMatteType => "trackMatteType",
            Self::Height => "height",
            Self::Width => "width",
        }
    }

    /// Parse a wire name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == name)
    }

    /// Dimensions live on the layer's source item, not on the layer.
    pub fn is_dimension(self) -> bool {
        matches!(self, Self::Height | Self::Width)
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
