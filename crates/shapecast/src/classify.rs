// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type classifier.
//!
//! Maps a descriptor to the shape category the decoder acts on. The order
//! of the checks is the dispatch table:
//!
//! 1. hook registered for the descriptor name
//! 2. intrinsic hook carried by the descriptor
//! 3. record
//! 4. named alias (unwrapped, then classified again)
//! 5. sequence, tuple, mapping
//! 6. union
//! 7. enumeration, literal
//! 8. primitive, any
//! 9. unsupported

use crate::descriptor::{
    DecodeHook, DeferredDescriptor, EnumDescriptor, LiteralDescriptor, MappingDescriptor,
    PrimitiveKind, RecordDescriptor, SequenceDescriptor, TupleDescriptor, TypeDescriptor,
    TypeKind, UnionDescriptor,
};
use crate::registry::{Entries, Registry};
use std::sync::Arc;

/// Shape category of a descriptor.
#[derive(Debug)]
pub enum Shape<'a> {
    /// Decoder registered for the type key.
    Registered(DecodeHook),
    /// Decoder carried by the descriptor.
    Intrinsic(&'a DecodeHook),
    Record(&'a Arc<TypeDescriptor>, &'a RecordDescriptor),
    Sequence(&'a SequenceDescriptor),
    Tuple(&'a TupleDescriptor),
    Mapping(&'a MappingDescriptor),
    Union(&'a TypeDescriptor, &'a UnionDescriptor),
    Enum(&'a Arc<TypeDescriptor>, &'a EnumDescriptor),
    Literal(&'a TypeDescriptor, &'a LiteralDescriptor),
    Primitive(PrimitiveKind),
    Any,
    /// Reference to resolve before classifying again.
    Deferred(&'a DeferredDescriptor),
    /// No rule applies.
    Unsupported(&'a TypeDescriptor),
}

impl Shape<'_> {
    /// Category name, for logs.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Registered(_) => "registered",
            Self::Intrinsic(_) => "intrinsic",
            Self::Record(..) => "record",
            Self::Sequence(_) => "sequence",
            Self::Tuple(_) => "tuple",
            Self::Mapping(_) => "mapping",
            Self::Union(..) => "union",
            Self::Enum(..) => "enumeration",
            Self::Literal(..) => "literal",
            Self::Primitive(_) => "primitive",
            Self::Any => "any",
            Self::Deferred(_) => "deferred",
            Self::Unsupported(_) => "unsupported",
        }
    }
}

/// Shape category of `ty` given the hooks in `registry`.
pub fn shape_of<'a>(ty: &'a Arc<TypeDescriptor>, registry: &Registry) -> Shape<'a> {
    classify(ty, &registry.snapshot())
}

/// Classify `ty` against a registry snapshot.
pub(crate) fn classify<'a>(ty: &'a Arc<TypeDescriptor>, registry: &Entries) -> Shape<'a> {
    if let Some(hook) = registry.get(ty.type_key()).and_then(|h| h.decode.clone()) {
        return Shape::Registered(hook);
    }
    if let Some(hook) = &ty.hooks.decode {
        return Shape::Intrinsic(hook);
    }
    match &ty.kind {
        TypeKind::Record(record) => Shape::Record(ty, record),
        TypeKind::Alias(target) => classify(target, registry),
        TypeKind::Sequence(seq) => Shape::Sequence(seq),
        TypeKind::Tuple(tuple) => Shape::Tuple(tuple),
        TypeKind::Mapping(map) => Shape::Mapping(map),
        TypeKind::Union(union) => Shape::Union(ty, union),
        TypeKind::Enum(e) => Shape::Enum(ty, e),
        TypeKind::Literal(lit) => Shape::Literal(ty, lit),
        TypeKind::Primitive(kind) => Shape::Primitive(*kind),
        TypeKind::Any => Shape::Any,
        TypeKind::Deferred(deferred) => Shape::Deferred(deferred),
        TypeKind::Opaque => Shape::Unsupported(ty),
    }
}

/// Strip aliases and deferred references down to the structural type.
pub(crate) fn resolve(ty: &Arc<TypeDescriptor>) -> Arc<TypeDescriptor> {
    let mut current = Arc::clone(ty);
    loop {
        let next = match &current.kind {
            TypeKind::Alias(target) => Arc::clone(target),
            TypeKind::Deferred(deferred) => deferred.resolve(),
            _ => return current,
        };
        current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{EnumVariant, FieldDescriptor, TypeHooks};
    use crate::Instance;

    fn entries() -> Arc<Entries> {
        Registry::new().snapshot()
    }

    #[test]
    fn test_structural_categories() {
        let reg = entries();
        let int = Arc::new(TypeDescriptor::int());
        let cases: Vec<(TypeDescriptor, &str)> = vec![
            (TypeDescriptor::record("Card", vec![]), "record"),
            (TypeDescriptor::list_of(int.clone()), "sequence"),
            (TypeDescriptor::variadic(int.clone()), "tuple"),
            (TypeDescriptor::dict(), "mapping"),
            (TypeDescriptor::optional(int.clone()), "union"),
            (
                TypeDescriptor::enumeration("Suit", vec![EnumVariant::new("heart", "h")]),
                "enumeration",
            ),
            (TypeDescriptor::literal(vec![1.into()]), "literal"),
            (TypeDescriptor::float(), "primitive"),
            (TypeDescriptor::any(), "any"),
            (TypeDescriptor::opaque("Socket"), "unsupported"),
        ];
        for (ty, expected) in cases {
            let ty = Arc::new(ty);
            assert_eq!(classify(&ty, &reg).category(), expected, "{}", ty.name);
        }
    }

    #[test]
    fn test_alias_unwraps_to_target() {
        let reg = entries();
        let ty = Arc::new(TypeDescriptor::alias("UserId", Arc::new(TypeDescriptor::int())));
        assert!(matches!(classify(&ty, &reg), Shape::Primitive(PrimitiveKind::Int)));
    }

    #[test]
    fn test_registered_hook_wins_over_alias_target() {
        let registry = Registry::new();
        registry.register_decoder("UserId", |_| Ok(Instance::Int(0)));
        let reg = registry.snapshot();

        let alias = Arc::new(TypeDescriptor::alias("UserId", Arc::new(TypeDescriptor::int())));
        assert_eq!(classify(&alias, &reg).category(), "registered");
        // the target itself keeps its structural rule
        let int = Arc::new(TypeDescriptor::int());
        assert_eq!(classify(&int, &reg).category(), "primitive");
    }

    #[test]
    fn test_registered_beats_intrinsic_beats_record() {
        let record = TypeDescriptor::record(
            "Stamp",
            vec![FieldDescriptor::new("at", Arc::new(TypeDescriptor::string()))],
        )
        .with_decode_hook(|_| Ok(Instance::Null));
        let record = Arc::new(record);

        assert_eq!(classify(&record, &entries()).category(), "intrinsic");

        let registry = Registry::new();
        registry.register_decoder("Stamp", |_| Ok(Instance::Null));
        assert_eq!(classify(&record, &registry.snapshot()).category(), "registered");
    }

    #[test]
    fn test_encoder_only_registration_does_not_claim_decode() {
        let registry = Registry::new();
        registry.register_encoder("Card", |_| Ok(crate::Value::Null));
        let card = Arc::new(TypeDescriptor::record("Card", vec![]));
        assert_eq!(classify(&card, &registry.snapshot()).category(), "record");
        assert!(TypeHooks::default().is_empty());
    }

    #[test]
    fn test_resolve_strips_alias_and_deferred() {
        fn target() -> Arc<TypeDescriptor> {
            Arc::new(TypeDescriptor::alias("Name", Arc::new(TypeDescriptor::string())))
        }
        let deferred = Arc::new(TypeDescriptor::deferred(target));
        assert_eq!(resolve(&deferred).name, "str");
    }
}
