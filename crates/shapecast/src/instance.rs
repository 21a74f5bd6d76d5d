// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed instances: the structured side of every conversion.
//!
//! An [`Instance`] is what [`decode`](crate::decode) produces and what
//! [`encode`](crate::encode) consumes. Records and enumeration members carry
//! the descriptor they were built from, which is the runtime type the
//! encoder dispatches on.

use crate::config;
use crate::descriptor::{EnumVariant, TypeDescriptor};
use crate::error::{Error, FieldPath, PathSegment, Result};
use crate::marshal::Marshal;
use crate::value::Value;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A typed dynamic value.
#[derive(Debug, Clone, PartialEq)]
pub enum Instance {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Instance>),
    Tuple(Vec<Instance>),
    /// Ordered key/value pairs; keys keep their decoded type.
    Map(Vec<(Instance, Instance)>),
    Record(RecordInstance),
    Enum(EnumInstance),
    Opaque(Opaque),
}

impl Instance {
    /// Runtime type key: descriptor name for records and enum members,
    /// the registered key for opaque values, a builtin key otherwise.
    pub fn type_key(&self) -> &str {
        match self {
            Self::Record(r) => r.type_name(),
            Self::Enum(e) => e.type_name(),
            Self::Opaque(o) => o.type_key(),
            other => other.builtin_key(),
        }
    }

    /// Builtin key of the instance's structural kind.
    pub fn builtin_key(&self) -> &'static str {
        match self {
            Self::Null => config::NULL_TYPE_KEY,
            Self::Bool(_) => config::BOOL_TYPE_KEY,
            Self::Int(_) => config::INT_TYPE_KEY,
            Self::Float(_) => config::FLOAT_TYPE_KEY,
            Self::String(_) => config::STRING_TYPE_KEY,
            Self::List(_) => config::LIST_TYPE_KEY,
            Self::Tuple(_) => config::TUPLE_TYPE_KEY,
            Self::Map(_) | Self::Record(_) => config::DICT_TYPE_KEY,
            Self::Enum(_) => config::ENUM_KIND,
            Self::Opaque(_) => config::OPAQUE_KIND,
        }
    }

    /// Check if instance is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Elements of a list or tuple.
    pub fn as_list(&self) -> Option<&[Instance]> {
        match self {
            Self::List(v) | Self::Tuple(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&RecordInstance> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumInstance> {
        match self {
            Self::Enum(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_opaque(&self) -> Option<&Opaque> {
        match self {
            Self::Opaque(o) => Some(o),
            _ => None,
        }
    }

    /// Field of a record instance.
    pub fn get(&self, field: &str) -> Option<&Instance> {
        self.as_record()?.get(field)
    }

    /// Untyped copy of a raw value, as produced for `Any`.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(v) => Self::Bool(*v),
            Value::Int(v) => Self::Int(*v),
            Value::Float(v) => Self::Float(*v),
            Value::String(v) => Self::String(v.clone()),
            Value::Seq(items) => Self::List(items.iter().map(Self::from_value).collect()),
            Value::Tuple(items) => Self::Tuple(items.iter().map(Self::from_value).collect()),
            Value::Map(map) => Self::Map(
                map.iter()
                    .map(|(k, v)| (Self::String(k.clone()), Self::from_value(v)))
                    .collect(),
            ),
        }
    }

    /// Short human description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bool(v) => format!("bool {}", v),
            Self::Int(v) => format!("int {}", v),
            Self::Float(v) => format!("float {}", v),
            Self::String(v) => format!("str {:?}", v),
            Self::List(v) => format!("list of {} elements", v.len()),
            Self::Tuple(v) => format!("tuple of {} elements", v.len()),
            Self::Map(v) => format!("dict with {} keys", v.len()),
            Self::Record(r) => format!("{} record", r.type_name()),
            Self::Enum(e) => format!("{}.{}", e.type_name(), e.variant()),
            Self::Opaque(o) => format!("{} value", o.type_key()),
        }
    }
}

impl From<bool> for Instance {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Instance {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Instance {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Instance {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Instance {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Instance {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<RecordInstance> for Instance {
    fn from(v: RecordInstance) -> Self {
        Self::Record(v)
    }
}

impl From<EnumInstance> for Instance {
    fn from(v: EnumInstance) -> Self {
        Self::Enum(v)
    }
}

impl From<Opaque> for Instance {
    fn from(v: Opaque) -> Self {
        Self::Opaque(v)
    }
}

/// A record built from a record descriptor.
///
/// Fields are kept in the order they were pushed, which for decoded records
/// is declaration order.
#[derive(Debug, Clone)]
pub struct RecordInstance {
    descriptor: Arc<TypeDescriptor>,
    fields: Vec<(String, Instance)>,
}

impl RecordInstance {
    /// Create an empty record of the given type.
    pub fn new(descriptor: Arc<TypeDescriptor>) -> Self {
        let capacity = descriptor.fields().map_or(0, <[_]>::len);
        Self {
            descriptor,
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Runtime type of the record.
    pub fn descriptor(&self) -> &Arc<TypeDescriptor> {
        &self.descriptor
    }

    /// Name of the runtime type.
    pub fn type_name(&self) -> &str {
        &self.descriptor.name
    }

    /// Set a field, replacing any previous value.
    pub fn push(&mut self, name: impl Into<String>, value: Instance) {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Builder-style [`push`](Self::push).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Instance>) -> Self {
        self.push(name, value.into());
        self
    }

    /// Get a field by name.
    pub fn get(&self, name: &str) -> Option<&Instance> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Check if a field is set.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Instance)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Remove a field.
    pub fn take(&mut self, name: &str) -> Option<Instance> {
        let index = self.fields.iter().position(|(n, _)| n == name)?;
        Some(self.fields.remove(index).1)
    }

    /// Remove a field and convert it; absence is `MissingField`.
    pub fn take_as<T: Marshal>(&mut self, name: &str) -> Result<T> {
        match self.take(name) {
            Some(instance) => T::from_instance(instance).map_err(|e| e.within(&field_path(name))),
            None => Err(Error::MissingField {
                path: FieldPath::root(),
                record: self.type_name().to_string(),
                field: name.to_string(),
            }),
        }
    }

    /// Remove a field and convert it, or fall back when absent.
    pub fn take_or_else<T: Marshal>(&mut self, name: &str, fallback: impl FnOnce() -> T) -> Result<T> {
        match self.take(name) {
            Some(instance) => T::from_instance(instance).map_err(|e| e.within(&field_path(name))),
            None => Ok(fallback()),
        }
    }
}

/// Records are equal when they have the same runtime type and fields.
impl PartialEq for RecordInstance {
    fn eq(&self, other: &Self) -> bool {
        self.descriptor.name == other.descriptor.name && self.fields == other.fields
    }
}

fn field_path(name: &str) -> FieldPath {
    let mut path = FieldPath::root();
    path.push(PathSegment::Field(name.to_string()));
    path
}

/// A member of an enumeration.
#[derive(Debug, Clone)]
pub struct EnumInstance {
    descriptor: Arc<TypeDescriptor>,
    variant: String,
    raw: Value,
}

impl EnumInstance {
    /// Create a member of `descriptor`.
    pub fn new(descriptor: Arc<TypeDescriptor>, variant: &EnumVariant) -> Self {
        Self {
            descriptor,
            variant: variant.name.clone(),
            raw: variant.raw.clone(),
        }
    }

    /// Member named `name`, if the descriptor is an enumeration declaring it.
    pub fn by_name(descriptor: Arc<TypeDescriptor>, name: &str) -> Option<Self> {
        let variant = match &descriptor.kind {
            crate::TypeKind::Enum(e) => e.variant(name)?.clone(),
            _ => return None,
        };
        Some(Self::new(descriptor, &variant))
    }

    pub fn descriptor(&self) -> &Arc<TypeDescriptor> {
        &self.descriptor
    }

    /// Name of the enumeration.
    pub fn type_name(&self) -> &str {
        &self.descriptor.name
    }

    /// Variant name.
    pub fn variant(&self) -> &str {
        &self.variant
    }

    /// Raw value carried in the value tree.
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

impl PartialEq for EnumInstance {
    fn eq(&self, other: &Self) -> bool {
        self.descriptor.name == other.descriptor.name && self.variant == other.variant
    }
}

/// Encoding capability of an opaque value.
///
/// Implemented by leaf types that know how to render themselves into the
/// value tree without a registered encoder.
pub trait SerializeValue {
    fn serialize_value(&self) -> Result<Value>;
}

type EqFn = fn(&dyn Any, &dyn Any) -> bool;
type DebugFn = fn(&dyn Any, &mut fmt::Formatter<'_>) -> fmt::Result;
type SerializeFn = fn(&dyn Any) -> Result<Value>;

/// A user-extended leaf value.
///
/// The engine has no structural rule for opaque values: they are produced
/// by decode hooks and consumed by encode hooks, or by their own
/// [`SerializeValue`] capability.
#[derive(Clone)]
pub struct Opaque {
    type_key: Arc<str>,
    value: Arc<dyn Any + Send + Sync>,
    eq: EqFn,
    debug: DebugFn,
    serialize: Option<SerializeFn>,
}

impl Opaque {
    /// Wrap `value` under `type_key`.
    pub fn new<T>(type_key: impl Into<Arc<str>>, value: T) -> Self
    where
        T: Any + fmt::Debug + PartialEq + Send + Sync,
    {
        Self {
            type_key: type_key.into(),
            value: Arc::new(value),
            eq: eq_as::<T>,
            debug: debug_as::<T>,
            serialize: None,
        }
    }

    /// Wrap `value`, keeping its [`SerializeValue`] capability.
    pub fn serializable<T>(type_key: impl Into<Arc<str>>, value: T) -> Self
    where
        T: Any + fmt::Debug + PartialEq + SerializeValue + Send + Sync,
    {
        let mut opaque = Self::new(type_key, value);
        opaque.serialize = Some(serialize_as::<T>);
        opaque
    }

    /// Registry key of the value.
    pub fn type_key(&self) -> &str {
        &self.type_key
    }

    /// Borrow the wrapped value.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (*self.value).downcast_ref::<T>()
    }

    /// Render through the capability, if the value has one.
    pub fn serialize(&self) -> Option<Result<Value>> {
        self.serialize.map(|f| f(&*self.value))
    }

    /// True when the value carries a [`SerializeValue`] capability.
    pub fn is_serializable(&self) -> bool {
        self.serialize.is_some()
    }
}

fn eq_as<T: Any + PartialEq>(a: &dyn Any, b: &dyn Any) -> bool {
    match (a.downcast_ref::<T>(), b.downcast_ref::<T>()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn debug_as<T: Any + fmt::Debug>(value: &dyn Any, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value.downcast_ref::<T>() {
        Some(v) => v.fmt(f),
        None => f.write_str("<?>"),
    }
}

fn serialize_as<T: Any + SerializeValue>(value: &dyn Any) -> Result<Value> {
    match value.downcast_ref::<T>() {
        Some(v) => v.serialize_value(),
        None => Err(Error::unsupported(std::any::type_name::<T>())),
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        self.type_key == other.type_key && (self.eq)(&*self.value, &*other.value)
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Opaque<{}>(", self.type_key)?;
        (self.debug)(&*self.value, f)?;
        f.write_str(")")
    }
}
