//! Composite text-document values.
//!
//! A text leaf holds a record with many host fields. Only the writable subset is carried, and
//! fields that are meaningless under the current toggles are left out.

use std::collections::BTreeMap;

use crate::value::property::PropertyValue;

/// Match name of the group holding text content on a text layer.
pub const TEXT_PROPERTIES: &str = "ADBE Text Properties";

/// Match name of the composite text-document leaf.
pub const TEXT_DOCUMENT: &str = "ADBE Text Document";

enum Guard {
    Always,
    When(&'static str),
}

const TEXT_FIELDS: [(&str, Guard); 13] = [
    ("text", Guard::Always),
    ("applyFill", Guard::Always),
    ("applyStroke", Guard::Always),
    ("font", Guard::Always),
    ("fontSize", Guard::Always),
    ("justification", Guard::Always),
    ("leading", Guard::Always),
    ("tracking", Guard::Always),
    ("fillColor", Guard::When("applyFill")),
    ("strokeColor", Guard::When("applyStroke")),
    ("strokeOverFill", Guard::When("applyStroke")),
    ("strokeWidth", Guard::When("applyStroke")),
    ("boxTextSize", Guard::When("boxText")),
];

/// Reduce a host text document to its writable fields.
///
/// Fill color needs `applyFill`, stroke fields need `applyStroke`, and box size needs
/// `boxText`. Non-record values pass through unchanged.
pub fn flatten_text_document(value: &PropertyValue) -> PropertyValue {
    let Some(doc) = value.as_record() else {
        return value.clone();
    };
    let flag = |name: &str| doc.get(name).and_then(PropertyValue::as_bool) == Some(true);

    let out: BTreeMap<String, PropertyValue> = TEXT_FIELDS
        .iter()
        .filter(|(_, guard)| match guard {
            Guard::Always => true,
            Guard::When(toggle) => flag(toggle),
        })
        .filter_map(|(field, _)| doc.get(*field).map(|v| (field.to_string(), v.clone())))
        .collect();
    PropertyValue::Record(out)
}

#[cfg(test)]
#[path = "../../tests/unit/codec/text.rs"]
mod tests;
