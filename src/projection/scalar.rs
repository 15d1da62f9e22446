//! Flat scalar values for indexed columns

use crate::document::DocumentValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single indexed-column value: the scalar subset of the document tree.
///
/// Arrays and maps do not project; they collapse to `Null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl ScalarValue {
    /// Project a document value down to a scalar. Composite values and
    /// missing values both yield `Null`.
    pub fn from_document(value: Option<&DocumentValue>) -> ScalarValue {
        match value {
            None | Some(DocumentValue::Null) => ScalarValue::Null,
            Some(DocumentValue::Bool(b)) => ScalarValue::Bool(*b),
            Some(DocumentValue::Int(i)) => ScalarValue::Int(*i),
            Some(DocumentValue::Float(f)) => ScalarValue::Float(*f),
            Some(DocumentValue::Text(s)) => ScalarValue::Text(s.clone()),
            Some(DocumentValue::Array(_)) | Some(DocumentValue::Map(_)) => ScalarValue::Null,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ScalarValue::Null)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ScalarValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScalarValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Ordering used by range predicates. Only same-variant comparisons
    /// order; everything else (including any null side) is `None`.
    pub fn partial_cmp_same_type(&self, other: &ScalarValue) -> Option<std::cmp::Ordering> {
        match (self, other) {
            (ScalarValue::Int(a), ScalarValue::Int(b)) => Some(a.cmp(b)),
            (ScalarValue::Float(a), ScalarValue::Float(b)) => a.partial_cmp(b),
            (ScalarValue::Int(a), ScalarValue::Float(b)) => (*a as f64).partial_cmp(b),
            (ScalarValue::Float(a), ScalarValue::Int(b)) => a.partial_cmp(&(*b as f64)),
            (ScalarValue::Text(a), ScalarValue::Text(b)) => Some(a.cmp(b)),
            (ScalarValue::Bool(a), ScalarValue::Bool(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Null => write!(f, "null"),
            ScalarValue::Bool(b) => write!(f, "{}", b),
            ScalarValue::Int(i) => write!(f, "{}", i),
            ScalarValue::Float(fl) => write!(f, "{}", fl),
            ScalarValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for ScalarValue {
    fn from(i: i64) -> Self {
        ScalarValue::Int(i)
    }
}

impl From<f64> for ScalarValue {
    fn from(f: f64) -> Self {
        ScalarValue::Float(f)
    }
}

impl From<bool> for ScalarValue {
    fn from(b: bool) -> Self {
        ScalarValue::Bool(b)
    }
}

impl From<&str> for ScalarValue {
    fn from(s: &str) -> Self {
        ScalarValue::Text(s.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(s: String) -> Self {
        ScalarValue::Text(s)
    }
}
