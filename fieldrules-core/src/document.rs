//! Documents as seen by the rule engines.
//!
//! The engines only need three operations from a document, captured by the
//! [`Document`] trait. [`InputDocument`] is the implementation used by the
//! CLI and the tests: an ordered map from field name to a multi-valued field
//! with a boost.

use serde::de::{MapAccess, Visitor};
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Boost assigned to fields that do not specify one.
pub const DEFAULT_BOOST: f32 = 1.0;

/// A single field value. Only text values are matched or rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Other(serde_json::Value),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            FieldValue::Other(_) => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::String(s) => FieldValue::Text(s),
            other => FieldValue::Other(other),
        }
    }
}

/// The document operations the engines rely on.
pub trait Document {
    /// All values of `field`, or `None` if the document has no such field.
    fn values(&self, field: &str) -> Option<&[FieldValue]>;

    /// The first value of `field`.
    fn first_value(&self, field: &str) -> Option<&FieldValue> {
        self.values(field).and_then(|values| values.first())
    }

    /// Replaces all values of `field`, keeping the field's boost.
    fn replace_values(&mut self, field: &str, values: Vec<FieldValue>);
}

/// A multi-valued field with its index-time boost.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentField {
    pub values: Vec<FieldValue>,
    pub boost: f32,
}

impl DocumentField {
    pub fn new(values: Vec<FieldValue>) -> Self {
        Self { values, boost: DEFAULT_BOOST }
    }

    pub fn with_boost(values: Vec<FieldValue>, boost: f32) -> Self {
        Self { values, boost }
    }

    fn has_default_boost(&self) -> bool {
        (self.boost - DEFAULT_BOOST).abs() <= f32::EPSILON
    }
}

fn default_boost() -> f32 {
    DEFAULT_BOOST
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawField {
    Weighted {
        values: Vec<FieldValue>,
        #[serde(default = "default_boost")]
        boost: f32,
    },
    Many(Vec<FieldValue>),
    One(FieldValue),
}

impl<'de> Deserialize<'de> for DocumentField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawField::deserialize(deserializer)? {
            RawField::Weighted { values, boost } => DocumentField::with_boost(values, boost),
            RawField::Many(values) => DocumentField::new(values),
            RawField::One(value) => DocumentField::new(vec![value]),
        })
    }
}

impl Serialize for DocumentField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if !self.has_default_boost() {
            let mut state = serializer.serialize_struct("DocumentField", 2)?;
            state.serialize_field("values", &self.values)?;
            state.serialize_field("boost", &self.boost)?;
            state.end()
        } else if self.values.len() == 1 {
            self.values[0].serialize(serializer)
        } else {
            self.values.serialize(serializer)
        }
    }
}

/// An ordered, multi-valued document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputDocument {
    fields: Vec<(String, DocumentField)>,
}

impl InputDocument {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|(n, _)| n == name)
    }

    /// Appends a value to `name`, creating the field if needed.
    pub fn add_value(&mut self, name: &str, value: impl Into<FieldValue>) {
        match self.position(name) {
            Some(i) => self.fields[i].1.values.push(value.into()),
            None => self
                .fields
                .push((name.to_string(), DocumentField::new(vec![value.into()]))),
        }
    }

    /// Sets `name` to `field`, replacing any previous values and boost.
    pub fn set_field(&mut self, name: &str, field: DocumentField) {
        match self.position(name) {
            Some(i) => self.fields[i].1 = field,
            None => self.fields.push((name.to_string(), field)),
        }
    }

    pub fn field(&self, name: &str) -> Option<&DocumentField> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, f)| f)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    /// First text value of `name`, for convenience in callers and tests.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.first_value(name).and_then(FieldValue::as_text)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Document for InputDocument {
    fn values(&self, field: &str) -> Option<&[FieldValue]> {
        self.field(field).map(|f| f.values.as_slice())
    }

    fn replace_values(&mut self, field: &str, values: Vec<FieldValue>) {
        match self.position(field) {
            Some(i) => self.fields[i].1.values = values,
            None => self.fields.push((field.to_string(), DocumentField::new(values))),
        }
    }
}

impl Serialize for InputDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, field) in &self.fields {
            map.serialize_entry(name, field)?;
        }
        map.end()
    }
}

struct InputDocumentVisitor;

impl<'de> Visitor<'de> for InputDocumentVisitor {
    type Value = InputDocument;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a JSON object mapping field names to values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut doc = InputDocument::new();
        while let Some((name, field)) = access.next_entry::<String, DocumentField>()? {
            // Repeated keys append, like adding a field twice.
            match doc.position(&name) {
                Some(i) => doc.fields[i].1.values.extend(field.values),
                None => doc.fields.push((name, field)),
            }
        }
        Ok(doc)
    }
}

impl<'de> Deserialize<'de> for InputDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(InputDocumentVisitor)
    }
}

/// Parses a JSON array of documents or newline-delimited JSON objects.
pub fn parse_documents(input: &str) -> Result<Vec<InputDocument>, serde_json::Error> {
    let trimmed = input.trim_start();
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed);
    }
    serde_json::Deserializer::from_str(input)
        .into_iter::<InputDocument>()
        .collect()
}

impl fmt::Display for InputDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => Err(fmt::Error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn add_value_accumulates_in_order() {
        let mut doc = InputDocument::new();
        doc.add_value("content", "first");
        doc.add_value("content", "second");
        doc.add_value("count", FieldValue::Other(json!(3)));
        let values = doc.values("content").unwrap();
        assert_eq!(values, &[FieldValue::from("first"), FieldValue::from("second")]);
        assert_eq!(doc.field_names().collect::<Vec<_>>(), vec!["content", "count"]);
        assert_eq!(doc.text("count"), None);
    }

    #[test]
    fn replace_values_keeps_boost() {
        let mut doc = InputDocument::new();
        doc.set_field("title", DocumentField::with_boost(vec!["a".into()], 2.5));
        doc.replace_values("title", vec!["b".into()]);
        let field = doc.field("title").unwrap();
        assert_eq!(field.boost, 2.5);
        assert_eq!(doc.text("title"), Some("b"));
    }

    #[test]
    fn deserializes_all_field_shapes() {
        let doc: InputDocument = serde_json::from_str(
            r#"{"id": "doc-1", "tags": ["a", 2], "title": {"values": ["T"], "boost": 3.0}}"#,
        )
        .unwrap();
        assert_eq!(doc.text("id"), Some("doc-1"));
        assert_eq!(
            doc.values("tags").unwrap(),
            &[FieldValue::from("a"), FieldValue::Other(json!(2))]
        );
        assert_eq!(doc.field("title").unwrap().boost, 3.0);
    }

    #[test]
    fn serialization_keeps_field_order() {
        let mut doc = InputDocument::new();
        doc.add_value("zeta", "z");
        doc.add_value("alpha", "a");
        doc.add_value("alpha", "b");
        assert_eq!(doc.to_string(), r#"{"zeta":"z","alpha":["a","b"]}"#);
    }

    #[test]
    fn parse_documents_accepts_array_and_lines() {
        let array = parse_documents(r#"[{"a": "1"}, {"a": "2"}]"#).unwrap();
        assert_eq!(array.len(), 2);
        let lines = parse_documents("{\"a\": \"1\"}\n{\"a\": \"2\"}\n{\"a\": \"3\"}\n").unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2].text("a"), Some("3"));
    }
}
