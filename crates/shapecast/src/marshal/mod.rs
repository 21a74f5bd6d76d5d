// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed layer: binding Rust types to descriptors.
//!
//! A type implementing [`Marshal`] knows its static [`TypeDescriptor`] and
//! how to move between itself and an [`Instance`]. Implementations exist
//! for the standard scalar and collection types; user records, enums and
//! aliases get theirs from `#[derive(Marshal)]`.
//!
//! # Example
//!
//! ```rust
//! use shapecast::{from_value, to_value, Marshal, Value};
//!
//! #[derive(Debug, PartialEq, Marshal)]
//! struct Card {
//!     rank: i64,
//!     suit: String,
//! }
//!
//! let value: Value = [("rank", Value::from(2)), ("suit", Value::from("h"))]
//!     .into_iter()
//!     .collect();
//! let card: Card = from_value(&value).unwrap();
//! assert_eq!(card, Card { rank: 2, suit: "h".into() });
//! assert_eq!(to_value(&card).unwrap(), value);
//! ```

#[cfg(feature = "datetime")]
mod datetime;
mod std_impls;

use crate::descriptor::TypeDescriptor;
use crate::error::Result;
use crate::instance::Instance;
use crate::options::{DecodeOptions, EncodeOptions};
use crate::registry::Registry;
use crate::value::Value;
use crate::error::{FieldPath, UnionAttempt};
use crate::{Decoder, Encoder, Error};
use std::sync::Arc;

/// A Rust type with a static shape.
pub trait Marshal: Sized {
    /// Descriptor of the type.
    fn descriptor() -> Arc<TypeDescriptor>;

    /// Build `Self` from a decoded instance.
    fn from_instance(instance: Instance) -> Result<Self>;

    /// Describe `self` as an instance.
    fn to_instance(&self) -> Result<Instance>;
}

/// Decode `value` into `T` with default options.
pub fn from_value<T: Marshal>(value: &Value) -> Result<T> {
    from_value_with(value, &DecodeOptions::default())
}

/// Decode `value` into `T`.
pub fn from_value_with<T: Marshal>(value: &Value, options: &DecodeOptions) -> Result<T> {
    let instance = Decoder::new(Registry::global())
        .with_options(options.clone())
        .decode(value, &T::descriptor())?;
    T::from_instance(instance)
}

/// Encode `value` with default options.
pub fn to_value<T: Marshal>(value: &T) -> Result<Value> {
    to_value_with(value, &EncodeOptions::default())
}

/// Encode `value`, starting from its static type.
pub fn to_value_with<T: Marshal>(value: &T, options: &EncodeOptions) -> Result<Value> {
    let instance = value.to_instance()?;
    Encoder::new(Registry::global())
        .with_options(options.clone())
        .encode_as(&instance, &T::descriptor())
}

/// Mismatch between an instance and the Rust type asked for.
pub fn unexpected(expected: &str, found: &Instance) -> Error {
    Error::type_mismatch(expected, found.describe())
}

/// Instance of a record whose runtime type is `name`.
///
/// Used by derived code; records of any other type are rejected, which is
/// what lets derived unions recover the variant from the runtime type.
pub fn expect_record(instance: Instance, name: &str) -> Result<crate::RecordInstance> {
    match instance {
        Instance::Record(record) if record.type_name() == name => Ok(record),
        other => Err(unexpected(name, &other)),
    }
}

/// Member of the enumeration `name`, by variant name.
pub fn expect_variant(instance: &Instance, name: &str) -> Result<String> {
    match instance {
        Instance::Enum(member) if member.type_name() == name => Ok(member.variant().to_string()),
        other => Err(unexpected(name, other)),
    }
}

/// No variant of the derived union `union` accepted `found`.
pub fn union_mismatch(union: &str, found: &Instance, attempts: Vec<UnionAttempt>) -> Error {
    Error::UnionMismatch {
        path: FieldPath::root(),
        union: union.to_string(),
        found: found.describe(),
        attempts,
    }
}
