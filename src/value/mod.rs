pub(crate) mod keyframe;
pub(crate) mod property;
