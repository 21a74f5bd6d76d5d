// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Extension registry: custom codecs keyed by type name.
//!
//! The registry is consulted before any structural rule, so a codec
//! registered for a key overrides both the type's intrinsic hooks and the
//! generic record/container handling.
//!
//! Reads load an atomic snapshot and never block. Registration copies the
//! table and swaps it in; conversions already running keep the snapshot
//! they started with.
//!
//! # Example
//!
//! ```rust
//! use shapecast::{Instance, Registry, Value};
//!
//! let registry = Registry::new();
//! registry.register_decoder("Celsius", |v: &Value| {
//!     Ok(Instance::Float(v.as_f64().unwrap_or_default()))
//! });
//! assert!(registry.contains("Celsius"));
//! ```

use crate::descriptor::{DecodeHook, EncodeHook, TypeHooks};
use crate::{Instance, Result, Value};
use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Registry key: the name of a type descriptor, an opaque type key, or one
/// of the builtin keys in [`config`](crate::config).
pub type TypeKey = String;

pub(crate) type Entries = HashMap<TypeKey, TypeHooks>;

/// Mapping from type key to custom decode/encode functions.
pub struct Registry {
    entries: ArcSwap<Entries>,
}

impl Registry {
    /// Create an empty, isolated registry.
    pub fn new() -> Self {
        Self {
            entries: ArcSwap::from_pointee(HashMap::new()),
        }
    }

    /// Get the process-wide registry.
    pub fn global() -> &'static Registry {
        static REGISTRY: OnceLock<Registry> = OnceLock::new();
        REGISTRY.get_or_init(Registry::new)
    }

    /// Register a custom decoder for `key`, replacing any previous one.
    pub fn register_decoder<F>(&self, key: impl Into<TypeKey>, f: F)
    where
        F: Fn(&Value) -> Result<Instance> + Send + Sync + 'static,
    {
        let hook = DecodeHook::new(f);
        self.update(key.into(), |hooks| hooks.decode.replace(hook.clone()).is_some());
    }

    /// Register a custom encoder for `key`, replacing any previous one.
    pub fn register_encoder<F>(&self, key: impl Into<TypeKey>, f: F)
    where
        F: Fn(&Instance) -> Result<Value> + Send + Sync + 'static,
    {
        let hook = EncodeHook::new(f);
        self.update(key.into(), |hooks| hooks.encode.replace(hook.clone()).is_some());
    }

    /// Register both directions for `key`.
    pub fn register_codec<D, E>(&self, key: impl Into<TypeKey>, decode: D, encode: E)
    where
        D: Fn(&Value) -> Result<Instance> + Send + Sync + 'static,
        E: Fn(&Instance) -> Result<Value> + Send + Sync + 'static,
    {
        let key = key.into();
        self.register_decoder(key.clone(), decode);
        self.register_encoder(key, encode);
    }

    fn update(&self, key: TypeKey, apply: impl Fn(&mut TypeHooks) -> bool) {
        let mut replaced = false;
        self.entries.rcu(|current| {
            let mut next = Entries::clone(current);
            replaced = apply(next.entry(key.clone()).or_default());
            next
        });
        if replaced {
            log::debug!("[Registry] Replaced hook for type key '{}'", key);
        } else {
            log::debug!("[Registry] Registered hook for type key '{}'", key);
        }
    }

    /// Decoder registered for `key`.
    pub fn decoder(&self, key: &str) -> Option<DecodeHook> {
        self.entries.load().get(key).and_then(|h| h.decode.clone())
    }

    /// Encoder registered for `key`.
    pub fn encoder(&self, key: &str) -> Option<EncodeHook> {
        self.entries.load().get(key).and_then(|h| h.encode.clone())
    }

    /// True when any hook is registered for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.load().contains_key(key)
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.load().is_empty()
    }

    /// Consistent view for the duration of one conversion.
    pub(crate) fn snapshot(&self) -> Arc<Entries> {
        self.entries.load_full()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = self.entries.load();
        let mut keys: Vec<&String> = entries.keys().collect();
        keys.sort();
        f.debug_struct("Registry").field("keys", &keys).finish()
    }
}
