// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for TypeDescriptor.

use crate::descriptor::{
    EnumVariant, FieldDescriptor, PrimitiveKind, RecordDescriptor, TypeDescriptor, TypeKind,
    ValidateHook,
};
use crate::{RecordInstance, Value};
use std::sync::Arc;

/// Builder for record types.
#[derive(Debug)]
pub struct RecordBuilder {
    name: String,
    fields: Vec<FieldDescriptor>,
    validator: Option<ValidateHook>,
}

impl RecordBuilder {
    /// Create a new builder for a record type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            validator: None,
        }
    }

    /// Add a required primitive field.
    pub fn field(self, name: impl Into<String>, kind: PrimitiveKind) -> Self {
        self.field_with_type(name, Arc::new(TypeDescriptor::primitive(kind)))
    }

    /// Add a required field with a type descriptor.
    pub fn field_with_type(
        mut self,
        name: impl Into<String>,
        type_desc: Arc<TypeDescriptor>,
    ) -> Self {
        self.fields.push(FieldDescriptor::new(name, type_desc));
        self
    }

    /// Add a string field.
    pub fn string_field(self, name: impl Into<String>) -> Self {
        self.field(name, PrimitiveKind::String)
    }

    /// Add an `Optional[T]` field defaulting to null.
    pub fn optional_field(mut self, name: impl Into<String>, type_desc: Arc<TypeDescriptor>) -> Self {
        let optional = Arc::new(TypeDescriptor::optional(type_desc));
        self.fields
            .push(FieldDescriptor::new(name, optional).with_default(crate::Instance::Null));
        self
    }

    /// Add a list field.
    pub fn list_field(self, name: impl Into<String>, element_type: Arc<TypeDescriptor>) -> Self {
        self.field_with_type(name, Arc::new(TypeDescriptor::list_of(element_type)))
    }

    /// Add a fully configured field.
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Set the constructor-side check.
    pub fn validate<F>(mut self, f: F) -> Self
    where
        F: Fn(&RecordInstance) -> std::result::Result<(), String> + Send + Sync + 'static,
    {
        self.validator = Some(ValidateHook::new(f));
        self
    }

    /// Build the TypeDescriptor.
    pub fn build(self) -> TypeDescriptor {
        let record = RecordDescriptor {
            fields: self.fields,
            validator: self.validator,
        };
        TypeDescriptor::new(self.name, TypeKind::Record(record))
    }
}

/// Builder for enum types.
#[derive(Debug)]
pub struct EnumBuilder {
    name: String,
    variants: Vec<EnumVariant>,
    next_value: i64,
}

impl EnumBuilder {
    /// Create a new enum builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variants: Vec::new(),
            next_value: 1,
        }
    }

    /// Add a variant with auto-incrementing integer value.
    pub fn variant(mut self, name: impl Into<String>) -> Self {
        self.variants.push(EnumVariant::new(name, self.next_value));
        self.next_value += 1;
        self
    }

    /// Add a variant with explicit raw value.
    pub fn variant_value(mut self, name: impl Into<String>, raw: impl Into<Value>) -> Self {
        let raw = raw.into();
        if let Value::Int(n) = raw {
            self.next_value = n + 1;
        }
        self.variants.push(EnumVariant::new(name, raw));
        self
    }

    /// Build the TypeDescriptor.
    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor::enumeration(self.name, self.variants)
    }
}
