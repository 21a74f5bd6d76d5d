// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Encoder: typed instance in, value tree out.
//!
//! Dispatch follows the runtime type of each instance, so a record held in
//! a slot declared as its base type still encodes with all of its own
//! fields. [`Encoder::encode_as`] gives the upcast view instead.

use crate::descriptor::{EncodeHook, TypeDescriptor, TypeKind};
use crate::error::{Error, FieldPath, PathSegment, Result};
use crate::instance::{Instance, RecordInstance};
use crate::options::EncodeOptions;
use crate::registry::{Entries, Registry};
use crate::value::{Map, Value};
use std::sync::Arc;

/// Encoder bound to a registry and a set of options.
#[derive(Debug, Clone)]
pub struct Encoder<'r> {
    registry: &'r Registry,
    options: EncodeOptions,
}

impl<'r> Encoder<'r> {
    /// Create an encoder with default options.
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            options: EncodeOptions::default(),
        }
    }

    /// Replace the options.
    pub fn with_options(mut self, options: EncodeOptions) -> Self {
        self.options = options;
        self
    }

    /// Options in effect.
    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    /// Encode `instance` by its runtime type.
    pub fn encode(&self, instance: &Instance) -> Result<Value> {
        self.context().encode(instance)
    }

    /// Encode `instance` viewed as `ty`.
    ///
    /// Hooks registered for or carried by `ty` apply first. A record
    /// encoded as a record type emits that type's fields only.
    pub fn encode_as(&self, instance: &Instance, ty: &TypeDescriptor) -> Result<Value> {
        self.context().encode_as(instance, ty)
    }

    fn context(&self) -> Context<'_> {
        Context {
            entries: self.registry.snapshot(),
            options: &self.options,
            path: FieldPath::root(),
            depth: 0,
        }
    }
}

struct Context<'a> {
    entries: Arc<Entries>,
    options: &'a EncodeOptions,
    path: FieldPath,
    depth: usize,
}

impl Context<'_> {
    fn enter(&mut self) -> Result<()> {
        if self.depth >= self.options.max_depth {
            return Err(Error::DepthExceeded {
                path: self.path.clone(),
                limit: self.options.max_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn encode(&mut self, instance: &Instance) -> Result<Value> {
        self.enter()?;
        let result = self.encode_runtime(instance);
        self.depth -= 1;
        result
    }

    fn encode_as(&mut self, instance: &Instance, ty: &TypeDescriptor) -> Result<Value> {
        self.enter()?;
        let result = self.encode_static(instance, ty);
        self.depth -= 1;
        result
    }

    fn registered(&self, key: &str) -> Option<EncodeHook> {
        self.entries.get(key).and_then(|h| h.encode.clone())
    }

    fn run_hook(&self, hook: &EncodeHook, instance: &Instance) -> Result<Value> {
        hook.call(instance).map_err(|e| e.within(&self.path))
    }

    fn nested<T>(
        &mut self,
        segment: PathSegment,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        self.path.push(segment);
        let result = f(self);
        self.path.pop();
        result
    }

    fn encode_static(&mut self, instance: &Instance, ty: &TypeDescriptor) -> Result<Value> {
        if let Some(hook) = self.registered(ty.type_key()) {
            return self.run_hook(&hook, instance);
        }
        if let Some(hook) = &ty.hooks.encode {
            return self.run_hook(hook, instance);
        }
        match (&ty.kind, instance) {
            (TypeKind::Alias(target), _) => self.encode_as(instance, target),
            (TypeKind::Deferred(deferred), _) => {
                let resolved = deferred.resolve();
                self.encode_as(instance, &resolved)
            }
            (TypeKind::Record(_), Instance::Record(record)) => self.encode_record(record, ty),
            _ => self.encode_runtime(instance),
        }
    }

    fn encode_runtime(&mut self, instance: &Instance) -> Result<Value> {
        if let Some(hook) = self.registered(instance.type_key()) {
            return self.run_hook(&hook, instance);
        }
        match instance {
            Instance::Record(record) => match &record.descriptor().hooks.encode {
                Some(hook) => self.run_hook(hook, instance),
                None => self.encode_record(record, record.descriptor()),
            },
            Instance::Enum(member) => match &member.descriptor().hooks.encode {
                Some(hook) => self.run_hook(hook, instance),
                None => Ok(member.raw().clone()),
            },
            Instance::Opaque(opaque) => match opaque.serialize() {
                Some(result) => result.map_err(|e| e.within(&self.path)),
                None => {
                    log::debug!(
                        "[Encoder] No encoder for opaque type '{}' at {}",
                        opaque.type_key(),
                        self.path
                    );
                    Err(Error::Unsupported {
                        path: self.path.clone(),
                        type_name: opaque.type_key().to_string(),
                    })
                }
            },
            Instance::List(items) => self.encode_items(items).map(Value::Seq),
            Instance::Tuple(items) => self.encode_items(items).map(Value::Tuple),
            Instance::Map(pairs) => self.encode_map(pairs),
            Instance::Null => Ok(Value::Null),
            Instance::Bool(v) => Ok(Value::Bool(*v)),
            Instance::Int(v) => Ok(Value::Int(*v)),
            Instance::Float(v) => Ok(Value::Float(*v)),
            Instance::String(v) => Ok(Value::String(v.clone())),
        }
    }

    fn encode_items(&mut self, items: &[Instance]) -> Result<Vec<Value>> {
        items
            .iter()
            .enumerate()
            .map(|(index, item)| self.nested(PathSegment::Index(index), |ctx| ctx.encode(item)))
            .collect()
    }

    fn encode_map(&mut self, pairs: &[(Instance, Instance)]) -> Result<Value> {
        let mut out = Map::with_capacity(pairs.len());
        for (key, item) in pairs {
            let encoded = self.encode(key)?;
            let Some(text) = encoded.key_text() else {
                return Err(Error::TypeMismatch {
                    path: self.path.clone(),
                    expected: "scalar mapping key".to_string(),
                    found: encoded.describe(),
                });
            };
            let value = self.nested(PathSegment::Key(text.clone()), |ctx| ctx.encode(item))?;
            out.insert(text, value);
        }
        Ok(Value::Map(out))
    }

    /// Emit `record` through the field list of `view`.
    fn encode_record(&mut self, record: &RecordInstance, view: &TypeDescriptor) -> Result<Value> {
        let Some(fields) = view.fields() else {
            // hand-built record over a non-record descriptor: emit what it holds
            let mut out = Map::with_capacity(record.len());
            for (name, item) in record.fields() {
                let value = self.nested(PathSegment::Field(name.to_string()), |ctx| ctx.encode(item))?;
                out.insert(name.to_string(), value);
            }
            return Ok(Value::Map(out));
        };

        let mut out = Map::with_capacity(fields.len());
        for field in fields {
            if field.internal || (self.options.public_fields_only && field.is_private()) {
                continue;
            }
            let Some(item) = record.get(&field.name) else {
                if !field.init {
                    continue;
                }
                return Err(Error::MissingField {
                    path: self.path.clone(),
                    record: record.type_name().to_string(),
                    field: field.name.clone(),
                });
            };
            let value = self.nested(PathSegment::Field(field.name.clone()), |ctx| {
                match &field.encoder {
                    Some(hook) => ctx.run_hook(hook, item),
                    None => ctx.encode(item),
                }
            })?;
            out.insert(field.name.clone(), value);
        }
        Ok(Value::Map(out))
    }
}
