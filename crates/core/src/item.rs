//! Collection item model.
//!
//! Items arrive from the content API as loosely shaped JSON records. They are
//! normalized into [`Item`], which promotes the well-known fields to typed
//! members and keeps everything else in an open extension map.

use std::borrow::Cow;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// A single collection record.
///
/// Serializes as one flat object. A promoted key that could not be read as
/// text is emitted with its original value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Item {
    /// Opaque identifier supplied by the remote collection.
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Every other field the API returned, passed through untouched. This
    /// includes `_id`, a raw `id` when the identifier came from `_id`, and any
    /// promoted key whose value was not text.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Item {
    /// Build an item from a raw API record.
    ///
    /// The identifier is read from `_id`, falling back to `id`. Returns `None`
    /// when the record carries neither. Missing name, slug and category default
    /// to the empty string. A key is only moved out of the record once its
    /// value has been taken as text.
    pub fn from_record(mut record: Map<String, Value>) -> Option<Self> {
        let id = match record.get("_id").and_then(scalar_text).map(Cow::into_owned) {
            Some(id) => id,
            None => take_text(&mut record, "id")?,
        };

        let name = take_text(&mut record, "name").unwrap_or_default();
        let slug = take_text(&mut record, "slug").unwrap_or_default();
        let category = take_text(&mut record, "category").unwrap_or_default();
        let description = take_text(&mut record, "description");

        Some(Self { id, name, slug, category, description, fields: record })
    }

    /// Resolve a field to its searchable text.
    ///
    /// Typed fields are looked up by name; anything else comes from the
    /// extension map. Absent, `null` and object values yield `None`.
    pub fn field_text(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "id" => Some(Cow::Borrowed(self.id.as_str())),
            "name" => Some(Cow::Borrowed(self.name.as_str())),
            "slug" => Some(Cow::Borrowed(self.slug.as_str())),
            "category" => Some(Cow::Borrowed(self.category.as_str())),
            "description" => self.description.as_deref().map(Cow::Borrowed),
            other => self.fields.get(other).and_then(value_text),
        }
    }
}

impl Serialize for Item {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("id", &self.id)?;

        for (key, typed) in [("name", &self.name), ("slug", &self.slug), ("category", &self.category)] {
            if !self.fields.contains_key(key) {
                map.serialize_entry(key, typed)?;
            }
        }
        if let Some(description) = &self.description {
            map.serialize_entry("description", description)?;
        }

        for (key, value) in &self.fields {
            if key != "id" {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

fn take_text(record: &mut Map<String, Value>, key: &str) -> Option<String> {
    let text = record.get(key).and_then(scalar_text)?.into_owned();
    record.remove(key);
    Some(text)
}

fn scalar_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        _ => None,
    }
}

fn value_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::Array(values) => {
            let parts: Vec<Cow<'_, str>> = values.iter().filter_map(scalar_text).collect();
            Some(Cow::Owned(parts.join(",")))
        }
        other => scalar_text(other),
    }
}
