//! Typed field values produced by the normalizer.
//!
//! Nothing untyped leaves the normalizer: every field of a validated record
//! is one of the [`FieldValue`] variants below, matching its schema kind.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A nested record inside a record-list field.
pub type Record = BTreeMap<String, FieldValue>;

/// A single normalized field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Category(String),
    Integer(i64),
    Text(String),
    TextList(Vec<String>),
    Records(Vec<Record>),
}

impl FieldValue {
    /// Plain JSON rendering (no type tags), as a client or re-validation
    /// would see it.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Category(s) | FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Integer(n) => Value::from(*n),
            FieldValue::TextList(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
            FieldValue::Records(records) => Value::Array(
                records
                    .iter()
                    .map(|record| Value::Object(record_to_json(record)))
                    .collect(),
            ),
        }
    }
}

fn record_to_json(record: &Record) -> Map<String, Value> {
    record
        .iter()
        .map(|(name, value)| (name.clone(), value.to_json()))
        .collect()
}

/// A complete, schema-conformant set of fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidatedFields(BTreeMap<String, FieldValue>);

impl ValidatedFields {
    pub(crate) fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.0.insert(name.into(), value);
    }

    /// Returns a field by name.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    /// Returns a category field's value.
    pub fn category(&self, name: &str) -> Option<&str> {
        match self.0.get(name) {
            Some(FieldValue::Category(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Returns an integer field's value.
    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.0.get(name) {
            Some(FieldValue::Integer(value)) => Some(*value),
            _ => None,
        }
    }

    /// Returns a text field's value.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.0.get(name) {
            Some(FieldValue::Text(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Returns a text-list field's items.
    pub fn text_list(&self, name: &str) -> Option<&[String]> {
        match self.0.get(name) {
            Some(FieldValue::TextList(items)) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Returns a record-list field's records.
    pub fn records(&self, name: &str) -> Option<&[Record]> {
        match self.0.get(name) {
            Some(FieldValue::Records(records)) => Some(records.as_slice()),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }

    /// Plain JSON object of all fields.
    pub fn to_json(&self) -> Value {
        Value::Object(record_to_json(&self.0))
    }
}
