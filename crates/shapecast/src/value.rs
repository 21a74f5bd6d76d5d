// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The value tree.

use crate::config;
use indexmap::IndexMap;

/// Ordered mapping of string keys, as found in a [`Value::Map`].
pub type Map = IndexMap<String, Value>;

/// An untyped tree of maps, sequences and scalars.
///
/// All typing is supplied externally by a
/// [`TypeDescriptor`](crate::TypeDescriptor). `Seq` and `Tuple` are both
/// ordered sequences: the encoder keeps the distinction, but the two compare
/// equal when their elements do.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Seq(Vec<Value>),
    Tuple(Vec<Value>),
    Map(Map),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Seq(a) | Self::Tuple(a), Self::Seq(b) | Self::Tuple(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    /// Create an empty map.
    pub fn map() -> Self {
        Self::Map(Map::new())
    }

    /// Check if value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// True for strings, numbers, booleans and null.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Self::Seq(_) | Self::Tuple(_) | Self::Map(_))
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Elements of a sequence or tuple.
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Self::Seq(v) | Self::Tuple(v) => Some(v),
            _ => None,
        }
    }

    /// Entries of a map.
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Get a map entry.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map()?.get(key)
    }

    /// Insert a map entry; returns false when `self` is not a map.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> bool {
        match self {
            Self::Map(m) => {
                m.insert(key.into(), value.into());
                true
            }
            _ => false,
        }
    }

    /// Builtin type key of this value's kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => config::NULL_TYPE_KEY,
            Self::Bool(_) => config::BOOL_TYPE_KEY,
            Self::Int(_) => config::INT_TYPE_KEY,
            Self::Float(_) => config::FLOAT_TYPE_KEY,
            Self::String(_) => config::STRING_TYPE_KEY,
            Self::Seq(_) => config::LIST_TYPE_KEY,
            Self::Tuple(_) => config::TUPLE_TYPE_KEY,
            Self::Map(_) => config::DICT_TYPE_KEY,
        }
    }

    /// Text of a scalar used as a mapping key: strings verbatim, numbers
    /// and booleans rendered. `None` for null and containers.
    pub fn key_text(&self) -> Option<String> {
        match self {
            Self::String(v) => Some(v.clone()),
            Self::Int(v) => Some(v.to_string()),
            Self::Float(v) => Some(v.to_string()),
            Self::Bool(v) => Some(v.to_string()),
            _ => None,
        }
    }

    /// Short human description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bool(v) => format!("bool {}", v),
            Self::Int(v) => format!("int {}", v),
            Self::Float(v) => format!("float {}", v),
            Self::String(v) if v.chars().count() > 32 => {
                format!("str {:?}...", v.chars().take(32).collect::<String>())
            }
            Self::String(v) => format!("str {:?}", v),
            Self::Seq(v) => format!("list of {} elements", v.len()),
            Self::Tuple(v) => format!("tuple of {} elements", v.len()),
            Self::Map(m) => format!("dict with {} keys", m.len()),
        }
    }
}

// Conversion traits
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Self::Map(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::Seq(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::Map(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
