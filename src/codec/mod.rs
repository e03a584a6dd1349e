pub(crate) mod key;
pub(crate) mod leaf;
pub(crate) mod metadata;
pub(crate) mod text;
