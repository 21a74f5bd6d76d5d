// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Global constants - single source of truth.
//!
//! Every limit, prefix and built-in type key used by the engine lives here.
//! **Never hardcode them elsewhere!**
//!
//! Runtime behaviour is tuned per call through
//! [`DecodeOptions`](crate::DecodeOptions) and
//! [`EncodeOptions`](crate::EncodeOptions); their defaults come from this
//! module.

// =======================================================================
// Recursion limits
// =======================================================================

/// Default maximum nesting depth for a single decode or encode call.
///
/// Each record, container or union level counts as one step, as does
/// resolving a deferred descriptor. Self-referential schemas fed with
/// pathological input stop here with [`Error::DepthExceeded`](crate::Error).
pub const DEFAULT_MAX_DEPTH: usize = 128;

// =======================================================================
// Field visibility
// =======================================================================

/// Field names starting with this prefix are private by convention.
///
/// They are dropped by the encoder when
/// [`EncodeOptions::public_fields_only`](crate::EncodeOptions) is set.
pub const PRIVATE_FIELD_PREFIX: &str = "_";

// =======================================================================
// Built-in type keys
// =======================================================================
//
// Registry keys used for descriptors and instances that have no user
// supplied name. Registering a hook under one of these keys overrides the
// structural rule for every value of that shape.

/// Key of the null type (`None` / `()`).
pub const NULL_TYPE_KEY: &str = "null";
/// Key of the boolean primitive.
pub const BOOL_TYPE_KEY: &str = "bool";
/// Key of the integer primitive.
pub const INT_TYPE_KEY: &str = "int";
/// Key of the float primitive.
pub const FLOAT_TYPE_KEY: &str = "float";
/// Key of the string primitive.
pub const STRING_TYPE_KEY: &str = "str";
/// Key of ordered sequences.
pub const LIST_TYPE_KEY: &str = "list";
/// Key of fixed tuples.
pub const TUPLE_TYPE_KEY: &str = "tuple";
/// Key of mappings.
pub const DICT_TYPE_KEY: &str = "dict";
/// Key of the fully open type.
pub const ANY_TYPE_KEY: &str = "any";
/// Structural kind of enumeration members (never a registry key).
pub const ENUM_KIND: &str = "enum";
/// Structural kind of opaque values (never a registry key).
pub const OPAQUE_KIND: &str = "opaque";

// =======================================================================
// Date and time type keys (feature `datetime`)
// =======================================================================

/// Key of calendar dates (`2020-01-15`).
pub const DATE_TYPE_KEY: &str = "date";
/// Key of naive date-times (`2020-01-15T10:30:00`).
pub const DATETIME_TYPE_KEY: &str = "datetime";
/// Key of date-times with a fixed UTC offset.
pub const DATETIME_OFFSET_TYPE_KEY: &str = "datetime[offset]";
/// Key of UTC date-times.
pub const DATETIME_UTC_TYPE_KEY: &str = "datetime[utc]";

/// Name given to deferred descriptor nodes.
///
/// Deferred nodes are never looked up in the registry: the descriptor they
/// resolve to carries the real key.
pub const DEFERRED_TYPE_KEY: &str = "<deferred>";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_keys_are_distinct() {
        let keys = [
            NULL_TYPE_KEY,
            BOOL_TYPE_KEY,
            INT_TYPE_KEY,
            FLOAT_TYPE_KEY,
            STRING_TYPE_KEY,
            LIST_TYPE_KEY,
            TUPLE_TYPE_KEY,
            DICT_TYPE_KEY,
            ANY_TYPE_KEY,
            ENUM_KIND,
            OPAQUE_KIND,
            DEFERRED_TYPE_KEY,
        ];
        for (i, a) in keys.iter().enumerate() {
            for b in &keys[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_depth_limit_is_sane() {
        assert!(DEFAULT_MAX_DEPTH >= 32);
    }
}
