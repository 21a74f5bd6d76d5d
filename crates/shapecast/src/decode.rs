// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type-directed decoder: value tree in, typed instance out.
//!
//! The target descriptor drives the walk. Each level is classified (see
//! [`classify`](crate::classify)) and handled by the matching rule; errors
//! carry the path of the value that failed.

use crate::classify::{classify, resolve, Shape};
use crate::descriptor::{
    DecodeHook, EnumDescriptor, FieldDescriptor, LiteralDescriptor, MappingDescriptor,
    PrimitiveKind, RecordDescriptor, SequenceDescriptor, SequenceKind, TupleDescriptor,
    TypeDescriptor, TypeKind, UnionDescriptor,
};
use crate::error::{Error, FieldPath, PathSegment, Result, UnionAttempt};
use crate::instance::{EnumInstance, Instance, RecordInstance};
use crate::options::DecodeOptions;
use crate::registry::{Entries, Registry};
use crate::value::{Map, Value};
use std::sync::Arc;

/// Decoder bound to a registry and a set of options.
///
/// Holds no state between calls.
#[derive(Debug, Clone)]
pub struct Decoder<'r> {
    registry: &'r Registry,
    options: DecodeOptions,
}

impl<'r> Decoder<'r> {
    /// Create a decoder with default options.
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            options: DecodeOptions::default(),
        }
    }

    /// Replace the options.
    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    /// Options in effect.
    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decode `value` as an instance of `ty`.
    pub fn decode(&self, value: &Value, ty: &Arc<TypeDescriptor>) -> Result<Instance> {
        let mut ctx = Context {
            entries: self.registry.snapshot(),
            options: &self.options,
            path: FieldPath::root(),
            depth: 0,
        };
        ctx.decode(value, ty)
    }
}

/// Per-call state: registry snapshot, current path and depth.
struct Context<'a> {
    entries: Arc<Entries>,
    options: &'a DecodeOptions,
    path: FieldPath,
    depth: usize,
}

impl Context<'_> {
    fn decode(&mut self, value: &Value, ty: &Arc<TypeDescriptor>) -> Result<Instance> {
        if self.depth >= self.options.max_depth {
            return Err(Error::DepthExceeded {
                path: self.path.clone(),
                limit: self.options.max_depth,
            });
        }
        self.depth += 1;
        let result = self.decode_shape(value, ty);
        self.depth -= 1;
        result
    }

    fn decode_shape(&mut self, value: &Value, ty: &Arc<TypeDescriptor>) -> Result<Instance> {
        match classify(ty, &self.entries) {
            Shape::Registered(hook) => self.run_hook(&hook, value),
            Shape::Intrinsic(hook) => self.run_hook(hook, value),
            Shape::Record(desc, record) => self.decode_record(value, desc, record),
            Shape::Sequence(seq) => self.decode_sequence(value, ty, seq),
            Shape::Tuple(tuple) => self.decode_tuple(value, ty, tuple),
            Shape::Mapping(map) => self.decode_mapping(value, ty, map),
            Shape::Union(desc, union) => self.decode_union(value, desc, union),
            Shape::Enum(desc, e) => self.decode_enum(value, desc, e),
            Shape::Literal(desc, lit) => self.decode_literal(value, desc, lit),
            Shape::Primitive(kind) => self.decode_primitive(value, kind),
            Shape::Any => Ok(Instance::from_value(value)),
            Shape::Deferred(deferred) => {
                let resolved = deferred.resolve();
                self.decode(value, &resolved)
            }
            Shape::Unsupported(desc) => {
                log::debug!("[Decoder] No rule for type '{}' at {}", desc.name, self.path);
                Err(Error::Unsupported {
                    path: self.path.clone(),
                    type_name: desc.name.clone(),
                })
            }
        }
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

    /// Hooks report paths relative to the value they were given.
    fn run_hook(&self, hook: &DecodeHook, value: &Value) -> Result<Instance> {
        hook.call(value).map_err(|e| e.within(&self.path))
    }

    fn mismatch(&self, expected: impl Into<String>, found: &Value) -> Error {
        Error::TypeMismatch {
            path: self.path.clone(),
            expected: expected.into(),
            found: found.describe(),
        }
    }

    fn decode_record(
        &mut self,
        value: &Value,
        desc: &Arc<TypeDescriptor>,
        record: &RecordDescriptor,
    ) -> Result<Instance> {
        let Value::Map(map) = value else {
            return Err(self.mismatch(&desc.name, value));
        };
        let mut instance = RecordInstance::new(Arc::clone(desc));
        for field in &record.fields {
            let raw = if field.init { map.get(&field.name) } else { None };
            let decoded = match raw {
                Some(raw) => {
                    self.nested(PathSegment::Field(field.name.clone()), |ctx| {
                        ctx.decode_field(raw, field)
                    })?
                }
                None => match field.default.resolve() {
                    Some(default) => default.map_err(|e| {
                        let mut path = self.path.clone();
                        path.push(PathSegment::Field(field.name.clone()));
                        e.within(&path)
                    })?,
                    None if !field.init => continue,
                    None => {
                        return Err(Error::MissingField {
                            path: self.path.clone(),
                            record: desc.name.clone(),
                            field: field.name.clone(),
                        })
                    }
                },
            };
            instance.push(field.name.clone(), decoded);
        }
        self.check_extras(map, desc, record)?;

        if let Some(validator) = &record.validator {
            validator
                .call(&instance)
                .map_err(|message| Error::Validation {
                    path: self.path.clone(),
                    message,
                })?;
        }
        Ok(Instance::Record(instance))
    }

    fn check_extras(
        &self,
        map: &Map,
        desc: &TypeDescriptor,
        record: &RecordDescriptor,
    ) -> Result<()> {
        let mut extras = map.keys().filter(|key| record.field(key).is_none());
        if self.options.reject_unexpected_fields {
            if let Some(key) = extras.next() {
                return Err(Error::UnexpectedField {
                    path: self.path.clone(),
                    record: desc.name.clone(),
                    field: key.clone(),
                });
            }
        } else if log::log_enabled!(log::Level::Trace) {
            for key in extras {
                log::trace!(
                    "[Decoder] Ignoring extra field '{}' for {} at {}",
                    key,
                    desc.name,
                    self.path
                );
            }
        }
        Ok(())
    }

    fn decode_field(&mut self, raw: &Value, field: &FieldDescriptor) -> Result<Instance> {
        match &field.decoder {
            Some(hook) => self.run_hook(hook, raw),
            None => self.decode(raw, &field.type_desc),
        }
    }

    fn decode_sequence(
        &mut self,
        value: &Value,
        ty: &TypeDescriptor,
        seq: &SequenceDescriptor,
    ) -> Result<Instance> {
        let Some(items) = value.as_sequence() else {
            return Err(self.mismatch(&ty.name, value));
        };
        let mut out: Vec<Instance> = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let element = self.nested(PathSegment::Index(index), |ctx| {
                ctx.decode(item, &seq.element_type)
            })?;
            if seq.kind == SequenceKind::Set && out.contains(&element) {
                continue;
            }
            out.push(element);
        }
        Ok(Instance::List(out))
    }

    fn decode_tuple(
        &mut self,
        value: &Value,
        ty: &TypeDescriptor,
        tuple: &TupleDescriptor,
    ) -> Result<Instance> {
        let Some(items) = value.as_sequence() else {
            return Err(self.mismatch(&ty.name, value));
        };

        if tuple.variadic {
            let Some(element_type) = tuple.elements.first() else {
                return Err(Error::Unsupported {
                    path: self.path.clone(),
                    type_name: ty.name.clone(),
                });
            };
            let mut out = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                out.push(
                    self.nested(PathSegment::Index(index), |ctx| ctx.decode(item, element_type))?,
                );
            }
            return Ok(Instance::Tuple(out));
        }

        if items.len() != tuple.elements.len() && self.options.strict_tuple_length {
            return Err(self.mismatch(
                format!("{} of {} elements", ty.name, tuple.elements.len()),
                value,
            ));
        }
        let mut out = Vec::with_capacity(tuple.elements.len());
        for (index, (item, element_type)) in items.iter().zip(&tuple.elements).enumerate() {
            out.push(self.nested(PathSegment::Index(index), |ctx| ctx.decode(item, element_type))?);
        }
        Ok(Instance::Tuple(out))
    }

    fn decode_mapping(
        &mut self,
        value: &Value,
        ty: &TypeDescriptor,
        mapping: &MappingDescriptor,
    ) -> Result<Instance> {
        let Value::Map(map) = value else {
            return Err(self.mismatch(&ty.name, value));
        };
        let mut out = Vec::with_capacity(map.len());
        for (key, item) in map {
            let pair = self.nested(PathSegment::Key(key.clone()), |ctx| {
                let key = ctx.decode(&parse_key(key, &mapping.key_type), &mapping.key_type)?;
                let item = ctx.decode(item, &mapping.value_type)?;
                Ok((key, item))
            })?;
            out.push(pair);
        }
        Ok(Instance::Map(out))
    }

    fn decode_union(
        &mut self,
        value: &Value,
        desc: &TypeDescriptor,
        union: &UnionDescriptor,
    ) -> Result<Instance> {
        let mut attempts = Vec::with_capacity(union.members.len());
        for member in &union.members {
            match self.decode(value, member) {
                Ok(instance) => return Ok(instance),
                Err(e @ Error::DepthExceeded { .. }) => return Err(e),
                Err(e) => {
                    log::trace!("[Decoder] {} rejected by '{}': {}", self.path, member.name, e);
                    attempts.push(UnionAttempt {
                        member: member.name.clone(),
                        error: e,
                    });
                }
            }
        }
        Err(Error::UnionMismatch {
            path: self.path.clone(),
            union: desc.name.clone(),
            found: value.describe(),
            attempts,
        })
    }

    fn decode_enum(
        &self,
        value: &Value,
        desc: &Arc<TypeDescriptor>,
        e: &EnumDescriptor,
    ) -> Result<Instance> {
        match e.variant_by_raw(value) {
            Some(variant) => Ok(Instance::Enum(EnumInstance::new(Arc::clone(desc), variant))),
            None => {
                let legal: Vec<String> = e.variants.iter().map(|v| v.raw.describe()).collect();
                Err(self.mismatch(format!("{} (one of {})", desc.name, legal.join(", ")), value))
            }
        }
    }

    fn decode_literal(
        &self,
        value: &Value,
        desc: &TypeDescriptor,
        lit: &LiteralDescriptor,
    ) -> Result<Instance> {
        if lit.values.contains(value) {
            Ok(Instance::from_value(value))
        } else {
            Err(self.mismatch(&desc.name, value))
        }
    }

    fn decode_primitive(&self, value: &Value, kind: PrimitiveKind) -> Result<Instance> {
        if kind.matches(value) {
            Ok(Instance::from_value(value))
        } else {
            Err(self.mismatch(kind.type_key(), value))
        }
    }
}

/// Mapping keys are text in the value tree. Keys typed as numbers,
/// booleans, or enumerations/literals over those, are parsed back first.
/// Text that does not parse is left as is for the key type to reject.
fn parse_key(text: &str, key_type: &Arc<TypeDescriptor>) -> Value {
    parsed_key(text, key_type).unwrap_or_else(|| Value::String(text.to_string()))
}

fn parsed_key(text: &str, key_type: &Arc<TypeDescriptor>) -> Option<Value> {
    match &resolve(key_type).kind {
        TypeKind::Primitive(PrimitiveKind::Int) => text.parse().ok().map(Value::Int),
        TypeKind::Primitive(PrimitiveKind::Float) => text.parse().ok().map(Value::Float),
        TypeKind::Primitive(PrimitiveKind::Bool) => text.parse().ok().map(Value::Bool),
        TypeKind::Enum(e) => raw_for_key(text, e.variants.iter().map(|v| &v.raw)),
        TypeKind::Literal(lit) => raw_for_key(text, lit.values.iter()),
        // first member that reads the text wins, in member order
        TypeKind::Union(union) => union.members.iter().find_map(|m| parsed_key(text, m)),
        _ => None,
    }
}

fn raw_for_key<'a>(text: &str, mut raws: impl Iterator<Item = &'a Value>) -> Option<Value> {
    raws.find(|raw| raw.key_text().as_deref() == Some(text))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{EnumVariant, RecordBuilder};
    use crate::error::ErrorKind;

    fn decode(value: &Value, ty: &Arc<TypeDescriptor>) -> Result<Instance> {
        let registry = Registry::new();
        Decoder::new(&registry).decode(value, ty)
    }

    fn int() -> Arc<TypeDescriptor> {
        Arc::new(TypeDescriptor::int())
    }

    fn suit() -> Arc<TypeDescriptor> {
        Arc::new(TypeDescriptor::enumeration(
            "Suit",
            vec![
                EnumVariant::new("heart", "h"),
                EnumVariant::new("spade", "s"),
                EnumVariant::new("club", "c"),
                EnumVariant::new("diamond", "d"),
            ],
        ))
    }

    fn card() -> Arc<TypeDescriptor> {
        Arc::new(
            RecordBuilder::new("Card")
                .field_with_type("rank", int())
                .field_with_type("suit", suit())
                .build(),
        )
    }

    fn card_value(rank: i64, suit: &str) -> Value {
        [("rank", Value::Int(rank)), ("suit", Value::from(suit))].into_iter().collect()
    }

    #[test]
    fn test_decode_record() {
        let instance = decode(&card_value(2, "h"), &card()).expect("decode");
        let record = instance.as_record().expect("record");
        assert_eq!(record.type_name(), "Card");
        assert_eq!(record.get("rank"), Some(&Instance::Int(2)));
        assert_eq!(
            record.get("suit").and_then(Instance::as_enum).map(|e| e.variant()),
            Some("heart")
        );
    }

    #[test]
    fn test_missing_field() {
        let value: Value = [("rank", 2)].into_iter().collect();
        let err = decode(&value, &card()).unwrap_err();
        assert!(matches!(err, Error::MissingField { ref field, ref record, .. }
            if field == "suit" && record == "Card"));
    }

    #[test]
    fn test_extra_fields_policy() {
        let mut value = card_value(2, "h");
        value.insert("joker", true);
        assert!(decode(&value, &card()).is_ok());

        let registry = Registry::new();
        let strict = Decoder::new(&registry)
            .with_options(DecodeOptions::new().with_reject_unexpected_fields(true));
        let err = strict.decode(&value, &card()).unwrap_err();
        assert!(matches!(err, Error::UnexpectedField { ref field, .. } if field == "joker"));
    }

    #[test]
    fn test_declared_fields_fail_before_extras() {
        let registry = Registry::new();
        let strict = Decoder::new(&registry)
            .with_options(DecodeOptions::new().with_reject_unexpected_fields(true));

        let mut value: Value = [("rank", "two"), ("suit", "h")].into_iter().collect();
        value.insert("joker", 1);
        let err = strict.decode(&value, &card()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.path().to_string(), "$.rank");

        let mut value: Value = [("rank", 2)].into_iter().collect();
        value.insert("joker", 1);
        let err = strict.decode(&value, &card()).unwrap_err();
        assert!(matches!(err, Error::MissingField { ref field, .. } if field == "suit"));
    }

    #[test]
    fn test_enum_rejects_unknown_raw() {
        let err = decode(&card_value(2, "x"), &card()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.path().to_string(), "$.suit");
    }

    #[test]
    fn test_primitive_strictness() {
        let err = decode(&Value::Float(2.5), &int()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        let err = decode(&Value::Int(2), &Arc::new(TypeDescriptor::float())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        let err = decode(&Value::Bool(true), &int()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_sequence_error_path() {
        let hand = Arc::new(TypeDescriptor::list_of(card()));
        let value = Value::Seq(vec![card_value(2, "h"), card_value(3, "x")]);
        let err = decode(&value, &hand).unwrap_err();
        assert_eq!(err.path().to_string(), "$[1].suit");
    }

    #[test]
    fn test_set_drops_duplicates() {
        let ty = Arc::new(TypeDescriptor::set_of(int()));
        let value = Value::from(vec![3, 1, 3, 2, 1]);
        assert_eq!(
            decode(&value, &ty).unwrap(),
            Instance::List(vec![Instance::Int(3), Instance::Int(1), Instance::Int(2)])
        );
    }

    #[test]
    fn test_tuple_arity() {
        let ty = Arc::new(TypeDescriptor::tuple(vec![int(), int()]));
        let err = decode(&Value::from(vec![1, 2, 3]), &ty).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);

        let registry = Registry::new();
        let lax = Decoder::new(&registry)
            .with_options(DecodeOptions::new().with_strict_tuple_length(false));
        assert_eq!(
            lax.decode(&Value::from(vec![1, 2, 3]), &ty).unwrap(),
            Instance::Tuple(vec![Instance::Int(1), Instance::Int(2)])
        );
    }

    #[test]
    fn test_variadic_tuple() {
        let ty = Arc::new(TypeDescriptor::variadic(int()));
        assert_eq!(decode(&Value::Seq(vec![]), &ty).unwrap(), Instance::Tuple(vec![]));
        let err = decode(&Value::Seq(vec![1.into(), "x".into()]), &ty).unwrap_err();
        assert_eq!(err.path().to_string(), "$[1]");
    }

    #[test]
    fn test_mapping_keys_are_parsed() {
        let ty = Arc::new(TypeDescriptor::mapping(int(), Arc::new(TypeDescriptor::string())));
        let value: Value = [("1", "one"), ("2", "two")].into_iter().collect();
        assert_eq!(
            decode(&value, &ty).unwrap(),
            Instance::Map(vec![
                (Instance::Int(1), Instance::from("one")),
                (Instance::Int(2), Instance::from("two")),
            ])
        );

        let bad: Value = [("one", "one")].into_iter().collect();
        let err = decode(&bad, &ty).unwrap_err();
        assert_eq!(err.path().to_string(), "$[\"one\"]");
    }

    #[test]
    fn test_union_mapping_keys_are_parsed() {
        let optional = Arc::new(TypeDescriptor::optional(int()));
        let ty = Arc::new(TypeDescriptor::mapping(optional, Arc::new(TypeDescriptor::string())));
        let value: Value = [("1", "one")].into_iter().collect();
        assert_eq!(
            decode(&value, &ty).unwrap(),
            Instance::Map(vec![(Instance::Int(1), Instance::from("one"))])
        );

        let key = Arc::new(TypeDescriptor::union(vec![
            Arc::new(TypeDescriptor::bool()),
            int(),
            Arc::new(TypeDescriptor::string()),
        ]));
        assert_eq!(parse_key("true", &key), Value::Bool(true));
        assert_eq!(parse_key("7", &key), Value::Int(7));
        assert_eq!(parse_key("seven", &key), Value::from("seven"));
    }

    fn signed_x(name: &str, check: Option<fn(i64) -> bool>) -> Arc<TypeDescriptor> {
        let mut builder = RecordBuilder::new(name).field_with_type("x", int());
        if let Some(check) = check {
            let name = name.to_string();
            builder = builder.validate(move |record| {
                match record.get("x").and_then(Instance::as_i64) {
                    Some(x) if check(x) => Ok(()),
                    _ => Err(format!("x rejected by {}", name)),
                }
            });
        }
        Arc::new(builder.build())
    }

    #[test]
    fn test_union_member_validator_falls_through() {
        let ty = Arc::new(TypeDescriptor::union(vec![
            signed_x("Positive", Some(|x| x > 0)),
            signed_x("Anything", None),
        ]));
        let value: Value = [("x", -1)].into_iter().collect();
        let instance = decode(&value, &ty).unwrap();
        assert_eq!(instance.as_record().map(|r| r.type_name()), Some("Anything"));

        let value: Value = [("x", 1)].into_iter().collect();
        let instance = decode(&value, &ty).unwrap();
        assert_eq!(instance.as_record().map(|r| r.type_name()), Some("Positive"));
    }

    #[test]
    fn test_union_attempts_keep_validator_errors() {
        let ty = Arc::new(TypeDescriptor::union(vec![
            signed_x("Positive", Some(|x| x > 0)),
            signed_x("Even", Some(|x| x % 2 == 0)),
        ]));
        let value: Value = [("x", -1)].into_iter().collect();
        let err = decode(&value, &ty).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnionMismatch);
        let kinds: Vec<_> = err.union_attempts().iter().map(|a| a.error.kind()).collect();
        assert_eq!(kinds, vec![ErrorKind::Validation, ErrorKind::Validation]);
        assert!(err.union_attempts()[1].error.to_string().contains("x rejected by Even"));
    }

    #[test]
    fn test_union_first_match_wins() {
        let ty = Arc::new(TypeDescriptor::union(vec![
            Arc::new(TypeDescriptor::float()),
            Arc::new(TypeDescriptor::any()),
        ]));
        assert_eq!(decode(&Value::Float(1.5), &ty).unwrap(), Instance::Float(1.5));
        assert_eq!(decode(&Value::Int(1), &ty).unwrap(), Instance::Int(1));
    }

    #[test]
    fn test_union_mismatch_collects_attempts() {
        let ty = Arc::new(TypeDescriptor::union(vec![int(), Arc::new(TypeDescriptor::string())]));
        let err = decode(&Value::Float(1.5), &ty).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnionMismatch);
        let members: Vec<_> = err.union_attempts().iter().map(|a| a.member.as_str()).collect();
        assert_eq!(members, vec!["int", "str"]);
    }

    #[test]
    fn test_literal() {
        let ty = Arc::new(TypeDescriptor::literal(vec!["r".into(), "w".into()]));
        assert_eq!(decode(&Value::from("w"), &ty).unwrap(), Instance::from("w"));
        assert!(decode(&Value::from("x"), &ty).is_err());
    }

    #[test]
    fn test_unsupported_opaque() {
        let ty = Arc::new(TypeDescriptor::opaque("Socket"));
        let err = decode(&Value::Null, &ty).unwrap_err();
        assert!(matches!(err, Error::Unsupported { ref type_name, .. } if type_name == "Socket"));
    }

    #[test]
    fn test_depth_limit() {
        let mut value = Value::Int(0);
        for _ in 0..10 {
            value = Value::Seq(vec![value]);
        }
        let registry = Registry::new();
        let decoder =
            Decoder::new(&registry).with_options(DecodeOptions::new().with_max_depth(5));
        // `Any` elements are copied verbatim, whatever their depth
        assert!(decoder.decode(&value, &Arc::new(TypeDescriptor::list())).is_ok());

        fn nested() -> Arc<TypeDescriptor> {
            Arc::new(TypeDescriptor::list_of(Arc::new(TypeDescriptor::deferred(nested))))
        }
        let err = decoder.decode(&value, &nested()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DepthExceeded);
    }

    #[test]
    fn test_registered_decoder_overrides_structure() {
        let registry = Registry::new();
        registry.register_decoder("Card", |v| {
            let text = v.as_str().ok_or_else(|| Error::type_mismatch("str", v.describe()))?;
            Ok(Instance::String(text.to_uppercase()))
        });
        let decoder = Decoder::new(&registry);
        assert_eq!(
            decoder.decode(&Value::from("2h"), &card()).unwrap(),
            Instance::from("2H")
        );
        let err = decoder
            .decode(&Value::Seq(vec![Value::Int(1)]), &Arc::new(TypeDescriptor::list_of(card())))
            .unwrap_err();
        assert_eq!(err.path().to_string(), "$[0]");
    }
}
