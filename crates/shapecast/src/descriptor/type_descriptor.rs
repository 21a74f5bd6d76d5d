// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors: the static shape of a conversion target.

use crate::config;
use crate::descriptor::{DecodeHook, DefaultHook, EncodeHook, TypeHooks, ValidateHook};
use crate::{Instance, RecordInstance, Result, Value};
use std::fmt;
use std::sync::Arc;

/// Primitive type kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Null,
    Bool,
    Int,
    Float,
    String,
}

impl PrimitiveKind {
    /// Builtin type key.
    pub fn type_key(&self) -> &'static str {
        match self {
            Self::Null => config::NULL_TYPE_KEY,
            Self::Bool => config::BOOL_TYPE_KEY,
            Self::Int => config::INT_TYPE_KEY,
            Self::Float => config::FLOAT_TYPE_KEY,
            Self::String => config::STRING_TYPE_KEY,
        }
    }

    /// Exact kind match, no coercion.
    pub fn matches(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Self::Null, Value::Null)
                | (Self::Bool, Value::Bool(_))
                | (Self::Int, Value::Int(_))
                | (Self::Float, Value::Float(_))
                | (Self::String, Value::String(_))
        )
    }
}

/// Type kind enumeration.
#[derive(Debug, Clone)]
pub enum TypeKind {
    /// Fully open: any value is accepted verbatim.
    Any,
    /// Primitive type.
    Primitive(PrimitiveKind),
    /// Record with named fields.
    Record(RecordDescriptor),
    /// Sequence (dynamic length).
    Sequence(SequenceDescriptor),
    /// Fixed tuple, or variadic tuple of one element type.
    Tuple(TupleDescriptor),
    /// Mapping from keys to values.
    Mapping(MappingDescriptor),
    /// Ordered set of alternatives.
    Union(UnionDescriptor),
    /// Closed set of named raw values.
    Enum(EnumDescriptor),
    /// Closed set of raw values returned as-is.
    Literal(LiteralDescriptor),
    /// Distinct name over an underlying type.
    Alias(Arc<TypeDescriptor>),
    /// User-extended type; only hooks can convert it.
    Opaque,
    /// Lazily resolved descriptor, for self-referential schemas.
    Deferred(DeferredDescriptor),
}

/// A complete type descriptor.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    /// Type name, also the registry key.
    pub name: String,
    /// Type kind.
    pub kind: TypeKind,
    /// Codec carried by the type itself.
    pub hooks: TypeHooks,
}

impl TypeDescriptor {
    /// Create a new type descriptor.
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            hooks: TypeHooks::default(),
        }
    }

    /// The fully open type.
    pub fn any() -> Self {
        Self::new(config::ANY_TYPE_KEY, TypeKind::Any)
    }

    /// Create a primitive type descriptor.
    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self::new(kind.type_key(), TypeKind::Primitive(kind))
    }

    pub fn null() -> Self {
        Self::primitive(PrimitiveKind::Null)
    }

    pub fn bool() -> Self {
        Self::primitive(PrimitiveKind::Bool)
    }

    pub fn int() -> Self {
        Self::primitive(PrimitiveKind::Int)
    }

    pub fn float() -> Self {
        Self::primitive(PrimitiveKind::Float)
    }

    pub fn string() -> Self {
        Self::primitive(PrimitiveKind::String)
    }

    /// Create a record type descriptor.
    pub fn record(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self::new(name, TypeKind::Record(RecordDescriptor::new(fields)))
    }

    /// Sequence of `element`.
    pub fn list_of(element: Arc<TypeDescriptor>) -> Self {
        let name = format!("list[{}]", element.name);
        Self::new(name, TypeKind::Sequence(SequenceDescriptor::list(element)))
    }

    /// Set of `element`: decoding drops duplicates.
    pub fn set_of(element: Arc<TypeDescriptor>) -> Self {
        let name = format!("set[{}]", element.name);
        Self::new(name, TypeKind::Sequence(SequenceDescriptor::set(element)))
    }

    /// Bare list: a sequence of anything.
    pub fn list() -> Self {
        Self::new(
            config::LIST_TYPE_KEY,
            TypeKind::Sequence(SequenceDescriptor::list(Arc::new(Self::any()))),
        )
    }

    /// Fixed tuple of positional element types.
    pub fn tuple(elements: Vec<Arc<TypeDescriptor>>) -> Self {
        let names: Vec<&str> = elements.iter().map(|e| e.name.as_str()).collect();
        let name = format!("tuple[{}]", names.join(", "));
        Self::new(name, TypeKind::Tuple(TupleDescriptor::fixed(elements)))
    }

    /// Variadic tuple: any number of `element`.
    pub fn variadic(element: Arc<TypeDescriptor>) -> Self {
        let name = format!("tuple[{}, ...]", element.name);
        Self::new(name, TypeKind::Tuple(TupleDescriptor::variadic(element)))
    }

    /// Mapping from `key` to `value`.
    pub fn mapping(key: Arc<TypeDescriptor>, value: Arc<TypeDescriptor>) -> Self {
        let name = format!("dict[{}, {}]", key.name, value.name);
        Self::new(name, TypeKind::Mapping(MappingDescriptor::new(key, value)))
    }

    /// Bare dict: a mapping of anything.
    pub fn dict() -> Self {
        Self::new(
            config::DICT_TYPE_KEY,
            TypeKind::Mapping(MappingDescriptor::new(
                Arc::new(Self::any()),
                Arc::new(Self::any()),
            )),
        )
    }

    /// Union of `members`, tried in order.
    pub fn union(members: Vec<Arc<TypeDescriptor>>) -> Self {
        let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
        let name = format!("Union[{}]", names.join(", "));
        Self::new(name, TypeKind::Union(UnionDescriptor::new(members)))
    }

    /// `inner` or null.
    pub fn optional(inner: Arc<TypeDescriptor>) -> Self {
        let name = format!("Optional[{}]", inner.name);
        Self::new(
            name,
            TypeKind::Union(UnionDescriptor::new(vec![inner, Arc::new(Self::null())])),
        )
    }

    /// Enumeration over `variants`.
    pub fn enumeration(name: impl Into<String>, variants: Vec<EnumVariant>) -> Self {
        Self::new(name, TypeKind::Enum(EnumDescriptor::new(variants)))
    }

    /// Literal over `values`.
    pub fn literal(values: Vec<Value>) -> Self {
        let rendered: Vec<String> = values.iter().map(Value::describe).collect();
        let name = format!("Literal[{}]", rendered.join(", "));
        Self::new(name, TypeKind::Literal(LiteralDescriptor::new(values)))
    }

    /// Distinct `name` over `target`.
    pub fn alias(name: impl Into<String>, target: Arc<TypeDescriptor>) -> Self {
        Self::new(name, TypeKind::Alias(target))
    }

    /// User-extended type with no structural rule.
    pub fn opaque(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Opaque)
    }

    /// Descriptor resolved on first use.
    pub fn deferred(resolve: fn() -> Arc<TypeDescriptor>) -> Self {
        Self::new(
            config::DEFERRED_TYPE_KEY,
            TypeKind::Deferred(DeferredDescriptor::new(resolve)),
        )
    }

    /// Attach an intrinsic decoder.
    pub fn with_decode_hook<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Result<Instance> + Send + Sync + 'static,
    {
        self.hooks.decode = Some(DecodeHook::new(f));
        self
    }

    /// Attach an intrinsic encoder.
    pub fn with_encode_hook<F>(mut self, f: F) -> Self
    where
        F: Fn(&Instance) -> Result<Value> + Send + Sync + 'static,
    {
        self.hooks.encode = Some(EncodeHook::new(f));
        self
    }

    /// Attach a constructor-side check. No effect unless this is a record.
    pub fn with_validator<F>(mut self, f: F) -> Self
    where
        F: Fn(&RecordInstance) -> std::result::Result<(), String> + Send + Sync + 'static,
    {
        if let TypeKind::Record(record) = &mut self.kind {
            record.validator = Some(ValidateHook::new(f));
        }
        self
    }

    /// Registry key of this type.
    pub fn type_key(&self) -> &str {
        &self.name
    }

    /// Check if this is a record type.
    pub fn is_record(&self) -> bool {
        matches!(self.kind, TypeKind::Record(_))
    }

    /// Get the record descriptor if this is a record.
    pub fn as_record(&self) -> Option<&RecordDescriptor> {
        match &self.kind {
            TypeKind::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Get fields if this is a record.
    pub fn fields(&self) -> Option<&[FieldDescriptor]> {
        self.as_record().map(|r| r.fields.as_slice())
    }

    /// Get field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.as_record()?.field(name)
    }
}

/// Record type descriptor.
#[derive(Debug, Clone, Default)]
pub struct RecordDescriptor {
    /// Fields in declaration order.
    pub fields: Vec<FieldDescriptor>,
    /// Constructor-side check.
    pub validator: Option<ValidateHook>,
}

impl RecordDescriptor {
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self {
            fields,
            validator: None,
        }
    }

    /// Get field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Get field index by name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// Fallback for an absent field.
#[derive(Debug, Clone)]
pub enum FieldDefault {
    /// Absence is an error.
    Required,
    /// Cloned for each decode.
    Value(Instance),
    /// Called for each decode.
    Factory(DefaultHook),
}

impl FieldDefault {
    /// `None` when the field is required.
    pub fn resolve(&self) -> Option<Result<Instance>> {
        match self {
            Self::Required => None,
            Self::Value(instance) => Some(Ok(instance.clone())),
            Self::Factory(factory) => Some(factory.call()),
        }
    }
}

/// Field descriptor for record members.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Field name.
    pub name: String,
    /// Field type.
    pub type_desc: Arc<TypeDescriptor>,
    /// Fallback when absent from the input.
    pub default: FieldDefault,
    /// Read from the input at construction; false excludes it.
    pub init: bool,
    /// Replaces structural decoding for this field.
    pub decoder: Option<DecodeHook>,
    /// Replaces structural encoding for this field.
    pub encoder: Option<EncodeHook>,
    /// Never emitted by the encoder.
    pub internal: bool,
}

impl FieldDescriptor {
    /// Create a new required field.
    pub fn new(name: impl Into<String>, type_desc: Arc<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            type_desc,
            default: FieldDefault::Required,
            init: true,
            decoder: None,
            encoder: None,
            internal: false,
        }
    }

    /// Set default value.
    pub fn with_default(mut self, default: Instance) -> Self {
        self.default = FieldDefault::Value(default);
        self
    }

    /// Set default factory.
    pub fn with_default_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Result<Instance> + Send + Sync + 'static,
    {
        self.default = FieldDefault::Factory(DefaultHook::new(factory));
        self
    }

    /// Exclude from construction: never read from the input.
    pub fn excluded(mut self) -> Self {
        self.init = false;
        self
    }

    /// Set custom decoder.
    pub fn with_decoder<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Result<Instance> + Send + Sync + 'static,
    {
        self.decoder = Some(DecodeHook::new(f));
        self
    }

    /// Set custom encoder.
    pub fn with_encoder<F>(mut self, f: F) -> Self
    where
        F: Fn(&Instance) -> Result<Value> + Send + Sync + 'static,
    {
        self.encoder = Some(EncodeHook::new(f));
        self
    }

    /// Mark as internal.
    pub fn internal(mut self) -> Self {
        self.internal = true;
        self
    }

    /// Absent input is an error.
    pub fn is_required(&self) -> bool {
        self.init && matches!(self.default, FieldDefault::Required)
    }

    /// Name marks the field private by convention.
    pub fn is_private(&self) -> bool {
        self.name.starts_with(config::PRIVATE_FIELD_PREFIX)
    }
}

/// Sequence flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceKind {
    List,
    Set,
}

/// Sequence type descriptor.
#[derive(Debug, Clone)]
pub struct SequenceDescriptor {
    /// Element type.
    pub element_type: Arc<TypeDescriptor>,
    pub kind: SequenceKind,
}

impl SequenceDescriptor {
    pub fn list(element_type: Arc<TypeDescriptor>) -> Self {
        Self {
            element_type,
            kind: SequenceKind::List,
        }
    }

    pub fn set(element_type: Arc<TypeDescriptor>) -> Self {
        Self {
            element_type,
            kind: SequenceKind::Set,
        }
    }
}

/// Tuple type descriptor.
#[derive(Debug, Clone)]
pub struct TupleDescriptor {
    /// Positional element types; exactly one when variadic.
    pub elements: Vec<Arc<TypeDescriptor>>,
    /// Trailing `...` marker.
    pub variadic: bool,
}

impl TupleDescriptor {
    pub fn fixed(elements: Vec<Arc<TypeDescriptor>>) -> Self {
        Self {
            elements,
            variadic: false,
        }
    }

    pub fn variadic(element: Arc<TypeDescriptor>) -> Self {
        Self {
            elements: vec![element],
            variadic: true,
        }
    }
}

/// Mapping type descriptor.
#[derive(Debug, Clone)]
pub struct MappingDescriptor {
    pub key_type: Arc<TypeDescriptor>,
    pub value_type: Arc<TypeDescriptor>,
}

impl MappingDescriptor {
    pub fn new(key_type: Arc<TypeDescriptor>, value_type: Arc<TypeDescriptor>) -> Self {
        Self {
            key_type,
            value_type,
        }
    }
}

/// Union type descriptor.
#[derive(Debug, Clone)]
pub struct UnionDescriptor {
    /// Members in trial order.
    pub members: Vec<Arc<TypeDescriptor>>,
}

impl UnionDescriptor {
    pub fn new(members: Vec<Arc<TypeDescriptor>>) -> Self {
        Self { members }
    }
}

/// Enumeration type descriptor.
#[derive(Debug, Clone)]
pub struct EnumDescriptor {
    /// Enum variants.
    pub variants: Vec<EnumVariant>,
}

impl EnumDescriptor {
    /// Create enum descriptor.
    pub fn new(variants: Vec<EnumVariant>) -> Self {
        Self { variants }
    }

    /// Get variant by name.
    pub fn variant(&self, name: &str) -> Option<&EnumVariant> {
        self.variants.iter().find(|v| v.name == name)
    }

    /// Get variant by raw value.
    pub fn variant_by_raw(&self, raw: &Value) -> Option<&EnumVariant> {
        self.variants.iter().find(|v| v.raw == *raw)
    }
}

/// Enum variant.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumVariant {
    /// Variant name.
    pub name: String,
    /// Raw value carried in the value tree.
    pub raw: Value,
}

impl EnumVariant {
    /// Create enum variant.
    pub fn new(name: impl Into<String>, raw: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            raw: raw.into(),
        }
    }
}

/// Literal type descriptor.
#[derive(Debug, Clone)]
pub struct LiteralDescriptor {
    pub values: Vec<Value>,
}

impl LiteralDescriptor {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }
}

/// Indirect reference to a descriptor.
#[derive(Clone, Copy)]
pub struct DeferredDescriptor(fn() -> Arc<TypeDescriptor>);

impl DeferredDescriptor {
    pub fn new(resolve: fn() -> Arc<TypeDescriptor>) -> Self {
        Self(resolve)
    }

    /// Produce the referenced descriptor.
    pub fn resolve(&self) -> Arc<TypeDescriptor> {
        (self.0)()
    }
}

impl fmt::Debug for DeferredDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DeferredDescriptor(<fn>)")
    }
}
