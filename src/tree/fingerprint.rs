use xxhash_rust::xxh3::Xxh3;

use crate::{
    codec::{key::NodeKey, leaf::LeafRecord, metadata::MetadataRecord},
    tree::structure::{PropertyTree, TreeEntry},
    value::{
        keyframe::{InterpolationType, Keyframe, KeyframeInterpolation, TemporalEase},
        property::PropertyValue,
    },
};

const XXH3_SEED: u64 = 0x51c3_7e0d_a2f4_9b68;

/// Stable 128-bit digest of a [`PropertyTree`].
///
/// Two structures with equal content hash equally regardless of how they were built, since
/// entries are walked in canonical order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TreeFingerprint {
    pub hi: u64,
    pub lo: u64,
}

impl std::fmt::Display for TreeFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

impl PropertyTree {
    pub fn fingerprint(&self) -> TreeFingerprint {
        let mut h = StableHasher::new();
        write_tree(&mut h, self);
        h.finish()
    }
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    // Length-prefixed so adjacent strings cannot alias.
    fn write_str(&mut self, s: &str) {
        self.write_u32(s.len() as u32);
        self.write_bytes(s.as_bytes());
    }

    fn finish(self) -> TreeFingerprint {
        let v = self.inner.digest128();
        TreeFingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

fn write_tree(h: &mut StableHasher, tree: &PropertyTree) {
    h.write_u32(tree.len() as u32);
    for (key, entry) in tree.iter() {
        write_key(h, key);
        match entry {
            TreeEntry::Meta(record) => write_metadata(h, record),
            TreeEntry::Group(nested) => write_tree(h, nested),
            TreeEntry::Leaf(record) => write_leaf(h, record),
        }
    }
}

fn write_key(h: &mut StableHasher, key: &NodeKey) {
    h.write_u8(key.kind().as_char() as u8);
    h.write_u32(key.index() as u32);
    h.write_str(key.name());
}

fn write_metadata(h: &mut StableHasher, record: &MetadataRecord) {
    h.write_u32(record.len() as u32);
    for (attr, value) in record.iter() {
        h.write_str(attr.as_str());
        write_value(h, value);
    }
}

fn write_leaf(h: &mut StableHasher, record: &LeafRecord) {
    write_opt(h, record.name.as_deref(), |h, s| h.write_str(s));
    write_opt(h, record.value.as_ref(), write_value);
    write_opt(h, record.keyframes.as_deref(), |h, keys| {
        h.write_u32(keys.len() as u32);
        for key in keys {
            write_keyframe(h, key);
        }
    });
    write_opt(h, record.expression.as_deref(), |h, s| h.write_str(s));
}

fn write_opt<T>(h: &mut StableHasher, v: Option<T>, write: impl FnOnce(&mut StableHasher, T)) {
    match v {
        None => h.write_u8(0),
        Some(v) => {
            h.write_u8(1);
            write(h, v);
        }
    }
}

fn write_value(h: &mut StableHasher, value: &PropertyValue) {
    match value {
        PropertyValue::Null => h.write_u8(0),
        PropertyValue::Bool(b) => {
            h.write_u8(1);
            h.write_bool(*b);
        }
        PropertyValue::Number(n) => {
            h.write_u8(2);
            h.write_f64(*n);
        }
        PropertyValue::Text(s) => {
            h.write_u8(3);
            h.write_str(s);
        }
        PropertyValue::List(items) => {
            h.write_u8(4);
            h.write_u32(items.len() as u32);
            for item in items {
                write_value(h, item);
            }
        }
        PropertyValue::Record(fields) => {
            h.write_u8(5);
            h.write_u32(fields.len() as u32);
            for (name, field) in fields {
                h.write_str(name);
                write_value(h, field);
            }
        }
    }
}

fn write_keyframe(h: &mut StableHasher, key: &Keyframe) {
    h.write_f64(key.time);
    write_value(h, &key.value);
    write_opt(h, key.interpolation.as_ref(), write_interpolation);
}

fn write_interpolation(h: &mut StableHasher, i: &KeyframeInterpolation) {
    write_interpolation_type(h, i.in_type);
    write_interpolation_type(h, i.out_type);
    write_ease(h, &i.in_ease);
    write_ease(h, &i.out_ease);
    for tangent in [&i.in_spatial_tangent, &i.out_spatial_tangent] {
        write_opt(h, tangent.as_deref(), |h, t| {
            h.write_u32(t.len() as u32);
            for c in t {
                h.write_f64(*c);
            }
        });
    }
    h.write_bool(i.temporal_continuous);
    h.write_bool(i.temporal_auto_bezier);
    h.write_bool(i.spatial_continuous);
    h.write_bool(i.spatial_auto_bezier);
    h.write_bool(i.roving);
}

fn write_interpolation_type(h: &mut StableHasher, t: InterpolationType) {
    h.write_u8(match t {
        InterpolationType::Linear => 0,
        InterpolationType::Bezier => 1,
        InterpolationType::Hold => 2,
    });
}

fn write_ease(h: &mut StableHasher, ease: &[TemporalEase]) {
    h.write_u32(ease.len() as u32);
    for e in ease {
        h.write_f64(e.speed);
        h.write_f64(e.influence);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tree/fingerprint.rs"]
mod tests;
