// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors.
//!
//! A [`TypeDescriptor`] is the runtime description of a conversion target:
//! records, containers, unions, enumerations, aliases and opaque leaf types.
//! Descriptors are immutable once built and shared behind `Arc`.
//!
//! # Example
//!
//! ```rust
//! use shapecast::{RecordBuilder, PrimitiveKind, TypeDescriptor};
//! use std::sync::Arc;
//!
//! let card = Arc::new(
//!     RecordBuilder::new("Card")
//!         .field("rank", PrimitiveKind::Int)
//!         .string_field("suit")
//!         .build(),
//! );
//! let hand = RecordBuilder::new("Hand").list_field("cards", card).build();
//! assert_eq!(hand.field("cards").unwrap().type_desc.name, "list[Card]");
//! ```

mod builder;
mod hooks;
mod type_descriptor;

pub use builder::{EnumBuilder, RecordBuilder};
pub use hooks::{DecodeHook, DefaultHook, EncodeHook, TypeHooks, ValidateHook};
pub use type_descriptor::{
    DeferredDescriptor, EnumDescriptor, EnumVariant, FieldDefault, FieldDescriptor,
    LiteralDescriptor, MappingDescriptor, PrimitiveKind, RecordDescriptor, SequenceDescriptor,
    SequenceKind, TupleDescriptor, TypeDescriptor, TypeKind, UnionDescriptor,
};
