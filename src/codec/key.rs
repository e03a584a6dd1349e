use std::{cmp::Ordering, fmt, str::FromStr};

use crate::foundation::error::{PropTreeError, PropTreeResult};

/// Largest sibling index the 4-digit key field can carry.
pub const MAX_INDEX: usize = 9999;

/// Match name used by the self-metadata sentinel key.
pub const SELF_NAME: &str = "selfProperty";

/// Serialized form of the self-metadata sentinel.
pub const SELF_KEY: &str = "S0000 selfProperty";

/// Node kind encoded in the first character of a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyKind {
    /// `S`: the owning container's own metadata.
    SelfMeta,
    /// `G`: nested container.
    Group,
    /// `P`: nested leaf.
    Leaf,
}

impl KeyKind {
    pub fn as_char(self) -> char {
        match self {
            Self::SelfMeta => 'S',
            Self::Group => 'G',
            Self::Leaf => 'P',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'S' => Some(Self::SelfMeta),
            'G' => Some(Self::Group),
            'P' => Some(Self::Leaf),
            _ => None,
        }
    }
}

/// Parsed `<Kind><Index4> <MatchName>` key.
///
/// Ordering is canonical: numeric index first, then the full key text.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeKey {
    kind: KeyKind,
    index: u16,
    name: String,
}

impl NodeKey {
    /// Build a key, rejecting indices beyond [`MAX_INDEX`].
    pub fn new(kind: KeyKind, index: usize, name: impl Into<String>) -> PropTreeResult<Self> {
        if index > MAX_INDEX {
            return Err(PropTreeError::invalid_index(format!(
                "{index} exceeds the 4-digit key budget ({MAX_INDEX})"
            )));
        }
        Ok(Self {
            kind,
            index: index as u16,
            name: name.into(),
        })
    }

    /// The `S0000 selfProperty` sentinel.
    pub fn self_meta() -> Self {
        Self {
            kind: KeyKind::SelfMeta,
            index: 0,
            name: SELF_NAME.to_string(),
        }
    }

    pub fn kind(&self) -> KeyKind {
        self.kind
    }

    pub fn index(&self) -> usize {
        usize::from(self.index)
    }

    /// Match name portion.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_self_meta(&self) -> bool {
        self.kind == KeyKind::SelfMeta
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:04} {}", self.kind.as_char(), self.index, self.name)
    }
}

impl FromStr for NodeKey {
    type Err = PropTreeError;

    fn from_str(key: &str) -> PropTreeResult<Self> {
        let bytes = key.as_bytes();
        let kind = bytes
            .first()
            .and_then(|b| KeyKind::from_char(char::from(*b)))
            .ok_or_else(|| PropTreeError::malformed_key(format!("'{key}': unknown kind prefix")))?;

        let digits = bytes.get(1..5).filter(|d| d.iter().all(u8::is_ascii_digit));
        let Some(digits) = digits else {
            return Err(PropTreeError::malformed_key(format!(
                "'{key}': expected 4 index digits after the kind prefix"
            )));
        };
        let index = digits
            .iter()
            .fold(0u16, |acc, d| acc * 10 + u16::from(d - b'0'));

        if bytes.get(5) != Some(&b' ') {
            return Err(PropTreeError::malformed_key(format!(
                "'{key}': expected a space after the index"
            )));
        }

        Ok(Self {
            kind,
            index,
            name: key[6..].to_string(),
        })
    }
}

impl Ord for NodeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index
            .cmp(&other.index)
            .then_with(|| self.kind.as_char().cmp(&other.kind.as_char()))
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl PartialOrd for NodeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Format a key string.
pub fn encode_key(kind: KeyKind, index: usize, match_name: &str) -> PropTreeResult<String> {
    NodeKey::new(kind, index, match_name).map(|k| k.to_string())
}

/// Parse a key string into its parts.
pub fn decode_key(key: &str) -> PropTreeResult<(KeyKind, usize, String)> {
    let parsed: NodeKey = key.parse()?;
    Ok((parsed.kind, parsed.index(), parsed.name))
}

#[cfg(test)]
#[path = "../../tests/unit/codec/key.rs"]
mod tests;
