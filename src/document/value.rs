//! The tagged-variant document tree
//!
//! Supported variants:
//! - null
//! - bool
//! - int: 64-bit signed integer
//! - float: 64-bit floating point
//! - text: UTF-8 string
//! - array: ordered list of values
//! - map: key/value pairs in insertion order

use super::path::split_path;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;

/// Root field naming the schema generation a document was written at.
pub const ENTITY_VERSION_FIELD: &str = "entityVersion";

/// An untyped document value.
///
/// This is the sole interchange format between the codec, the migration
/// registry, and the column projector. Maps keep insertion order so that
/// re-encoding a decoded, unmigrated document is byte-stable.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentValue {
    /// Absent / null value
    Null,
    /// Boolean
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point
    Float(f64),
    /// UTF-8 string
    Text(String),
    /// Ordered list of values
    Array(Vec<DocumentValue>),
    /// Ordered key/value pairs (insertion order preserved)
    Map(Vec<(String, DocumentValue)>),
}

impl DocumentValue {
    /// Returns the variant name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            DocumentValue::Null => "null",
            DocumentValue::Bool(_) => "bool",
            DocumentValue::Int(_) => "int",
            DocumentValue::Float(_) => "float",
            DocumentValue::Text(_) => "text",
            DocumentValue::Array(_) => "array",
            DocumentValue::Map(_) => "map",
        }
    }

    /// An empty map, the starting point for building a document
    pub fn empty_map() -> Self {
        DocumentValue::Map(Vec::new())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, DocumentValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DocumentValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            DocumentValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            DocumentValue::Float(f) => Some(*f),
            DocumentValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DocumentValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Direct child lookup on a map value
    pub fn entry(&self, key: &str) -> Option<&DocumentValue> {
        match self {
            DocumentValue::Map(entries) => entries
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// Resolve a dot-separated path.
    ///
    /// Returns `None` when any segment is missing or traverses a non-map.
    /// The empty path resolves to `self`.
    pub fn get(&self, path: &str) -> Option<&DocumentValue> {
        let mut current = self;
        for segment in split_path(path) {
            current = current.entry(segment)?;
        }
        Some(current)
    }

    /// Mutable variant of [`get`](Self::get)
    pub fn get_mut(&mut self, path: &str) -> Option<&mut DocumentValue> {
        let mut current = self;
        for segment in split_path(path) {
            current = match current {
                DocumentValue::Map(entries) => entries
                    .iter_mut()
                    .find(|(k, _)| k == segment)
                    .map(|(_, v)| v)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Set the value at a dot-separated path, creating intermediate maps.
    ///
    /// Overwrites whatever was at the path; a non-map value encountered on
    /// the way down is replaced by a map. A new key lands at the end of its
    /// map, an existing key keeps its position.
    pub fn set(&mut self, path: &str, value: DocumentValue) {
        let segments: Vec<&str> = split_path(path).collect();
        self.set_segments(&segments, value);
    }

    fn set_segments(&mut self, segments: &[&str], value: DocumentValue) {
        let Some((head, rest)) = segments.split_first() else {
            *self = value;
            return;
        };
        if !matches!(self, DocumentValue::Map(_)) {
            *self = DocumentValue::empty_map();
        }
        let DocumentValue::Map(entries) = self else {
            return;
        };
        match entries.iter_mut().find(|(k, _)| k == head) {
            Some((_, child)) => child.set_segments(rest, value),
            None => {
                entries.push((head.to_string(), DocumentValue::Null));
                if let Some((_, child)) = entries.last_mut() {
                    child.set_segments(rest, value);
                }
            }
        }
    }

    /// Remove the value at a path. Returns the removed value, if any.
    pub fn remove(&mut self, path: &str) -> Option<DocumentValue> {
        let segments: Vec<&str> = split_path(path).collect();
        let (last, parents) = segments.split_last()?;
        let mut current = self;
        for segment in parents {
            current = current.get_mut_entry(segment)?;
        }
        match current {
            DocumentValue::Map(entries) => {
                let index = entries.iter().position(|(k, _)| k == last)?;
                Some(entries.remove(index).1)
            }
            _ => None,
        }
    }

    fn get_mut_entry(&mut self, key: &str) -> Option<&mut DocumentValue> {
        match self {
            DocumentValue::Map(entries) => entries
                .iter_mut()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// Read the root `entityVersion` field.
    ///
    /// Returns `None` when the root is not a map, the field is absent, or
    /// the field is not an integer; such a document is malformed.
    pub fn entity_version(&self) -> Option<i64> {
        self.entry(ENTITY_VERSION_FIELD)?.as_int()
    }

    /// Stamp the root `entityVersion` field.
    pub fn set_entity_version(&mut self, version: i64) {
        self.set(ENTITY_VERSION_FIELD, DocumentValue::Int(version));
    }

    /// Build a document value from a JSON value.
    ///
    /// JSON numbers become ints when they are exact integers, floats
    /// otherwise. Map entries keep the order serde_json reports.
    pub fn from_json(json: &serde_json::Value) -> DocumentValue {
        match json {
            serde_json::Value::Null => DocumentValue::Null,
            serde_json::Value::Bool(b) => DocumentValue::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    DocumentValue::Int(i)
                } else {
                    DocumentValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => DocumentValue::Text(s.clone()),
            serde_json::Value::Array(items) => {
                DocumentValue::Array(items.iter().map(DocumentValue::from_json).collect())
            }
            serde_json::Value::Object(entries) => DocumentValue::Map(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), DocumentValue::from_json(v)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for DocumentValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DocumentValue::Null => serializer.serialize_unit(),
            DocumentValue::Bool(b) => serializer.serialize_bool(*b),
            DocumentValue::Int(i) => serializer.serialize_i64(*i),
            DocumentValue::Float(f) => serializer.serialize_f64(*f),
            DocumentValue::Text(s) => serializer.serialize_str(s),
            DocumentValue::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            DocumentValue::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl fmt::Display for DocumentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => write!(f, "<unprintable document>"),
        }
    }
}

impl From<bool> for DocumentValue {
    fn from(b: bool) -> Self {
        DocumentValue::Bool(b)
    }
}

impl From<i64> for DocumentValue {
    fn from(i: i64) -> Self {
        DocumentValue::Int(i)
    }
}

impl From<f64> for DocumentValue {
    fn from(f: f64) -> Self {
        DocumentValue::Float(f)
    }
}

impl From<&str> for DocumentValue {
    fn from(s: &str) -> Self {
        DocumentValue::Text(s.to_string())
    }
}

impl From<String> for DocumentValue {
    fn from(s: String) -> Self {
        DocumentValue::Text(s)
    }
}
