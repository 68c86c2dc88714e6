//! Priority values read from a route field, and their total order.

use serde_json::Value;
use std::cmp::Ordering;

/// A comparable priority. Only numbers and strings are comparable; any other
/// route value is treated as if the field were missing.
#[derive(Debug, Clone, PartialEq)]
pub enum Priority {
    Number(f64),
    Text(String),
}

impl Priority {
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().map(Priority::Number),
            Value::String(s) => Some(Priority::Text(s.clone())),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Priority::Number(_) => 0,
            Priority::Text(_) => 1,
        }
    }
}

impl From<f64> for Priority {
    fn from(n: f64) -> Self {
        Priority::Number(n)
    }
}

impl From<&str> for Priority {
    fn from(s: &str) -> Self {
        Priority::Text(s.to_string())
    }
}

/// Ascending order used by the catalog: numbers (IEEE total order), then
/// strings (lexicographic), then absent or non-comparable values last.
pub fn compare(a: Option<&Priority>, b: Option<&Priority>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(Priority::Number(x)), Some(Priority::Number(y))) => x.total_cmp(y),
        (Some(Priority::Text(x)), Some(Priority::Text(y))) => x.cmp(y),
        (Some(x), Some(y)) => x.rank().cmp(&y.rank()),
    }
}
