pub(crate) mod category;
pub(crate) mod fingerprint;
pub(crate) mod structure;
pub(crate) mod walker;
pub(crate) mod writer;
