// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Function hooks attached to descriptors, fields and the registry.

use crate::{Instance, RecordInstance, Result, Value};
use std::fmt;
use std::sync::Arc;

/// Custom decode function: raw value in, typed instance out.
#[derive(Clone)]
pub struct DecodeHook(Arc<dyn Fn(&Value) -> Result<Instance> + Send + Sync>);

impl DecodeHook {
    /// Wrap a decode function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Result<Instance> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Run the hook.
    pub fn call(&self, value: &Value) -> Result<Instance> {
        (self.0)(value)
    }
}

impl fmt::Debug for DecodeHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DecodeHook(<fn>)")
    }
}

/// Custom encode function: typed instance in, raw value out.
#[derive(Clone)]
pub struct EncodeHook(Arc<dyn Fn(&Instance) -> Result<Value> + Send + Sync>);

impl EncodeHook {
    /// Wrap an encode function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Instance) -> Result<Value> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Run the hook.
    pub fn call(&self, instance: &Instance) -> Result<Value> {
        (self.0)(instance)
    }
}

impl fmt::Debug for EncodeHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncodeHook(<fn>)")
    }
}

/// Record constructor check, run once all fields are collected.
///
/// An `Err` message becomes [`Error::Validation`](crate::Error).
#[derive(Clone)]
pub struct ValidateHook(Arc<dyn Fn(&RecordInstance) -> std::result::Result<(), String> + Send + Sync>);

impl ValidateHook {
    /// Wrap a validator.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&RecordInstance) -> std::result::Result<(), String> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Run the validator.
    pub fn call(&self, record: &RecordInstance) -> std::result::Result<(), String> {
        (self.0)(record)
    }
}

impl fmt::Debug for ValidateHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValidateHook(<fn>)")
    }
}

/// Default factory for an absent record field.
#[derive(Clone)]
pub struct DefaultHook(Arc<dyn Fn() -> Result<Instance> + Send + Sync>);

impl DefaultHook {
    /// Wrap a factory.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> Result<Instance> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Produce a fresh default.
    pub fn call(&self) -> Result<Instance> {
        (self.0)()
    }
}

impl fmt::Debug for DefaultHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DefaultHook(<fn>)")
    }
}

/// Codec a type carries itself.
///
/// Ranked below registry hooks and above every structural rule.
#[derive(Debug, Clone, Default)]
pub struct TypeHooks {
    pub decode: Option<DecodeHook>,
    pub encode: Option<EncodeHook>,
}

impl TypeHooks {
    /// True when neither direction is set.
    pub fn is_empty(&self) -> bool {
        self.decode.is_none() && self.encode.is_none()
    }
}
