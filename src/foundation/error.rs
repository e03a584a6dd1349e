/// Convenience result type used across the codec.
pub type PropTreeResult<T> = Result<T, PropTreeError>;

/// Top-level error taxonomy used by encode/decode APIs.
///
/// Decode aborts on the first structural error. Writes that were already applied to the live
/// graph stay applied.
#[derive(thiserror::Error, Debug)]
pub enum PropTreeError {
    /// A sibling index does not fit the 4-digit key budget.
    #[error("invalid index: {0}")]
    InvalidIndex(String),

    /// A serialized key does not follow `<Kind><Index4> <MatchName>`.
    #[error("malformed key: {0}")]
    MalformedKey(String),

    /// The live node resolved for a key is not the kind the key promises.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// The key uses a kind prefix this codec does not understand.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// An operation that needs at least one entry received none.
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// The live graph rejected a write.
    #[error("host error: {0}")]
    Host(String),

    /// Errors when serializing or deserializing the nested structure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PropTreeError {
    /// Build a [`PropTreeError::InvalidIndex`] value.
    pub fn invalid_index(msg: impl Into<String>) -> Self {
        Self::InvalidIndex(msg.into())
    }

    /// Build a [`PropTreeError::MalformedKey`] value.
    pub fn malformed_key(msg: impl Into<String>) -> Self {
        Self::MalformedKey(msg.into())
    }

    /// Build a [`PropTreeError::SchemaMismatch`] value.
    pub fn schema_mismatch(msg: impl Into<String>) -> Self {
        Self::SchemaMismatch(msg.into())
    }

    /// Build a [`PropTreeError::UnsupportedFormat`] value.
    pub fn unsupported_format(msg: impl Into<String>) -> Self {
        Self::UnsupportedFormat(msg.into())
    }

    /// Build a [`PropTreeError::EmptyInput`] value.
    pub fn empty_input(msg: impl Into<String>) -> Self {
        Self::EmptyInput(msg.into())
    }

    /// Build a [`PropTreeError::Host`] value.
    pub fn host(msg: impl Into<String>) -> Self {
        Self::Host(msg.into())
    }

    /// Build a [`PropTreeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for PropTreeError {
    fn from(err: serde_json::Error) -> Self {
        Self::serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
