//! FILENAME: core/model/src/value.rs
//! PURPOSE: The shared scalar/record model every engine crate operates on.
//! CONTEXT: Source tables, the ambient record, runtime parameters, dataset
//! rows, and expression results are all built from `Value`. The enum is
//! deliberately JSON-shaped and serializes untagged, so a stored template or
//! a fetched source table round-trips ordinary JSON without any framing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A flat record: field name -> value. BTreeMap keeps field order stable
/// across runs, which keeps serialized documents and test output stable.
pub type Record = BTreeMap<String, Value>;

/// A JSON-shaped runtime value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Array(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Returns true for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Attempts to coerce the value to a number.
    /// Text coercion strips thousands separators ("1,250" -> 1250.0).
    /// Returns None if coercion is not possible.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Text(s) => parse_numeric_text(s),
            _ => None,
        }
    }

    /// JS-style truthiness: Null, false, 0, NaN, and "" are falsy;
    /// everything else (including empty arrays/maps) is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Text(s) => !s.is_empty(),
            Value::Array(_) | Value::Map(_) => true,
        }
    }

    /// Converts the value to its plain display string.
    /// Numbers drop a trailing ".0"; Null renders empty; arrays join their
    /// members with commas. Locale-aware formatting (grouping, yes/no words)
    /// is layered on top by the binding crate, not here.
    pub fn display_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => {
                if *b {
                    "true".to_string()
                } else {
                    "false".to_string()
                }
            }
            Value::Number(n) => format_plain_number(*n),
            Value::Text(s) => s.clone(),
            Value::Array(items) => items
                .iter()
                .map(|v| v.display_text())
                .collect::<Vec<_>>()
                .join(","),
            // A nested map has no meaningful scalar rendering.
            Value::Map(_) => String::new(),
        }
    }

    /// Resolves a dotted path ("customer.name", "rows.0.total") inside this
    /// value. Map segments look up by key; array segments accept numeric
    /// indices. Any missing hop yields None, never an error.
    pub fn path(&self, path: &str) -> Option<&Value> {
        let mut current = self;
        for segment in path.split('.') {
            current = match current {
                Value::Map(map) => map.get(segment)?,
                Value::Array(items) => {
                    let index: usize = segment.parse().ok()?;
                    items.get(index)?
                }
                _ => return None,
            };
        }
        Some(current)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// Resolves a dotted path against a record. An exact field match wins first
/// (grouped rows store dotted group keys as flat fields); otherwise the first
/// segment looks up a record field and the rest descend into nested
/// maps/arrays (joined rows are attached as nested maps, so "customer.name"
/// reaches joined fields). Returns None when any hop is absent.
pub fn lookup_path<'a>(record: &'a Record, path: &str) -> Option<&'a Value> {
    if let Some(value) = record.get(path) {
        return Some(value);
    }
    let (head, rest) = path.split_once('.')?;
    record.get(head)?.path(rest)
}

/// Parses numeric text after stripping thousands separators.
/// " 1,250.75 " -> Some(1250.75). Empty or non-numeric text -> None.
pub fn parse_numeric_text(text: &str) -> Option<f64> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// Formats a number without unnecessary decimal places.
/// Integer-valued floats render without a fraction ("120" not "120.0").
pub fn format_plain_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
