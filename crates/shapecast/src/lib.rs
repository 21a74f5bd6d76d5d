// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # shapecast - structural marshalling
//!
//! Converts between an untyped tree of maps, sequences and scalars (the
//! [`Value`] tree, as produced by a JSON or YAML parser) and strongly typed
//! records, driven entirely by the declared shape of the target type.
//!
//! ## Quick Start
//!
//! ```rust
//! use shapecast::{from_value, to_value, Marshal, Result, Value};
//!
//! #[derive(Debug, PartialEq, Marshal)]
//! enum Suit {
//!     #[marshal(value = "h")]
//!     Heart,
//!     #[marshal(value = "s")]
//!     Spade,
//! }
//!
//! #[derive(Debug, PartialEq, Marshal)]
//! struct Card {
//!     rank: u8,
//!     suit: Suit,
//! }
//!
//! fn main() -> Result<()> {
//!     let value: Value = [("rank", Value::from(12)), ("suit", Value::from("s"))]
//!         .into_iter()
//!         .collect();
//!     let card: Card = from_value(&value)?;
//!     assert_eq!(card, Card { rank: 12, suit: Suit::Spade });
//!     assert_eq!(to_value(&card)?, value);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |                            Typed layer                              |
//! |   Marshal trait | #[derive(Marshal)] | std / chrono impls           |
//! +---------------------------------------------------------------------+
//! |                             Engine                                  |
//! |   Decoder (type-directed) | Encoder (runtime dispatch) | Classifier |
//! +---------------------------------------------------------------------+
//! |                           Data model                                |
//! |   TypeDescriptor | Value | Instance | Registry                     |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`TypeDescriptor`] | Runtime shape of a conversion target |
//! | [`Value`] | Untyped value tree |
//! | [`Instance`] | Typed result of a decode, input of an encode |
//! | [`Registry`] | Custom codecs keyed by type name |
//! | [`Marshal`] | Binding between a Rust type and its descriptor |
//!
//! ## Features
//!
//! - `datetime` (default): ISO-8601 codecs for `chrono` dates and times
//! - `json` (default): [`Value`] <-> `serde_json::Value` bridge
//! - `serde`: `Serialize`/`Deserialize` for [`DecodeOptions`] and [`EncodeOptions`]

// Allow the derive macro to work inside this crate's tests
extern crate self as shapecast;

/// Type classifier (shape categories and dispatch order).
pub mod classify;
/// Global constants (limits, prefixes, builtin type keys).
pub mod config;
/// Decoder: value tree to typed instance.
pub mod decode;
/// Type descriptors and their builders.
pub mod descriptor;
/// Encoder: typed instance to value tree.
pub mod encode;
/// Conversion errors and field paths.
pub mod error;
/// Typed instances.
pub mod instance;
/// `serde_json` bridge.
#[cfg(feature = "json")]
pub mod json;
/// Typed layer.
pub mod marshal;
/// Decoder and encoder options.
pub mod options;
/// Extension registry.
pub mod registry;
/// Untyped value tree.
pub mod value;

pub use decode::Decoder;
pub use descriptor::{
    EnumBuilder, EnumVariant, FieldDefault, FieldDescriptor, PrimitiveKind, RecordBuilder,
    TypeDescriptor, TypeKind,
};
pub use encode::Encoder;
pub use error::{Error, ErrorKind, FieldPath, PathSegment, Result, UnionAttempt};
pub use instance::{EnumInstance, Instance, Opaque, RecordInstance, SerializeValue};
pub use marshal::{from_value, from_value_with, to_value, to_value_with, Marshal};
pub use options::{DecodeOptions, EncodeOptions};
pub use registry::Registry;
pub use value::{Map, Value};

// Derive macro (for #[derive(shapecast::Marshal)])
pub use shapecast_codegen::Marshal;

use std::sync::Arc;

/// Decode `value` as `ty` with the global registry and default options.
pub fn decode(value: &Value, ty: &Arc<TypeDescriptor>) -> Result<Instance> {
    Decoder::new(Registry::global()).decode(value, ty)
}

/// Decode `value` as `ty` with the global registry.
pub fn decode_with(
    value: &Value,
    ty: &Arc<TypeDescriptor>,
    options: &DecodeOptions,
) -> Result<Instance> {
    Decoder::new(Registry::global())
        .with_options(options.clone())
        .decode(value, ty)
}

/// Encode `instance` by its runtime type with the global registry.
pub fn encode(instance: &Instance) -> Result<Value> {
    Encoder::new(Registry::global()).encode(instance)
}

/// Encode `instance` viewed as `ty` with the global registry.
pub fn encode_as(instance: &Instance, ty: &TypeDescriptor) -> Result<Value> {
    Encoder::new(Registry::global()).encode_as(instance, ty)
}

/// Encode `instance` by its runtime type with the global registry.
pub fn encode_with(instance: &Instance, options: &EncodeOptions) -> Result<Value> {
    Encoder::new(Registry::global())
        .with_options(options.clone())
        .encode(instance)
}

/// Register a decoder in the global registry.
pub fn register_decoder<F>(key: impl Into<String>, f: F)
where
    F: Fn(&Value) -> Result<Instance> + Send + Sync + 'static,
{
    Registry::global().register_decoder(key, f);
}

/// Register an encoder in the global registry.
pub fn register_encoder<F>(key: impl Into<String>, f: F)
where
    F: Fn(&Instance) -> Result<Value> + Send + Sync + 'static,
{
    Registry::global().register_encoder(key, f);
}

#[cfg(test)]
mod tests;
