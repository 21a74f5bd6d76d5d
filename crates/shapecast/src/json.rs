// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bridge between the value tree and `serde_json`.
//!
//! JSON has no tuple type: tuples become arrays and come back as
//! sequences, which compare equal. Non-finite floats become `null`.

use crate::error::Result;
use crate::marshal::{self, Marshal};
use crate::value::Value;

/// Convert a value tree to JSON.
pub fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(i) => serde_json::Value::Number((*i).into()),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Seq(items) | Value::Tuple(items) => {
            serde_json::Value::Array(items.iter().map(value_to_json).collect())
        }
        Value::Map(map) => serde_json::Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), value_to_json(v)))
                .collect(),
        ),
    }
}

/// Convert JSON to a value tree.
pub fn json_to_value(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::String(n.to_string())
            }
        }
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(arr) => Value::Seq(arr.into_iter().map(json_to_value).collect()),
        serde_json::Value::Object(map) => Value::Map(
            map.into_iter()
                .map(|(k, v)| (k, json_to_value(v)))
                .collect(),
        ),
    }
}

impl Value {
    /// Build from JSON.
    pub fn from_json(json: serde_json::Value) -> Self {
        json_to_value(json)
    }

    /// Render as JSON.
    pub fn to_json(&self) -> serde_json::Value {
        value_to_json(self)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        json_to_value(json)
    }
}

/// Decode JSON into `T`.
pub fn from_json<T: Marshal>(json: serde_json::Value) -> Result<T> {
    marshal::from_value(&json_to_value(json))
}

/// Encode `value` as JSON.
pub fn to_json<T: Marshal>(value: &T) -> Result<serde_json::Value> {
    marshal::to_value(value).map(|v| value_to_json(&v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_numbers_keep_kind() {
        let value = Value::from_json(json!({"integer": 42, "float": 2.75, "negative": -100}));
        assert_eq!(value.get("integer"), Some(&Value::Int(42)));
        assert_eq!(value.get("negative"), Some(&Value::Int(-100)));
        assert_eq!(value.get("float"), Some(&Value::Float(2.75)));
    }

    #[test]
    fn test_tuple_becomes_array() {
        let value = Value::Tuple(vec![Value::Int(1), Value::from("a")]);
        assert_eq!(value.to_json(), json!([1, "a"]));
        assert_eq!(Value::from_json(json!([1, "a"])), value);
    }

    #[test]
    fn test_non_finite_float_is_null() {
        assert_eq!(Value::Float(f64::NAN).to_json(), serde_json::Value::Null);
    }

    #[test]
    fn test_typed_helpers() {
        let pairs: Vec<(i64, String)> = from_json(json!([[1, "a"], [2, "b"]])).unwrap();
        assert_eq!(pairs, vec![(1, "a".to_string()), (2, "b".to_string())]);
        assert_eq!(to_json(&pairs).unwrap(), json!([[1, "a"], [2, "b"]]));
    }
}
