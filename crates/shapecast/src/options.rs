// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Conversion options.
//!
//! Both option sets are plain data with builder-style setters. With the
//! `serde` feature they can be loaded from configuration files; absent keys
//! take the defaults below.

use crate::config;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Decoder options.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DecodeOptions {
    /// Fail on input keys that match no declared field.
    #[cfg_attr(feature = "serde", serde(default))]
    pub reject_unexpected_fields: bool,

    /// Fail when a sequence's length differs from a fixed tuple's arity.
    /// When false, the shorter of the two wins.
    #[cfg_attr(feature = "serde", serde(default = "default_true"))]
    pub strict_tuple_length: bool,

    /// Maximum nesting depth.
    #[cfg_attr(feature = "serde", serde(default = "default_max_depth"))]
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            reject_unexpected_fields: false,
            strict_tuple_length: true,
            max_depth: config::DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject input keys that match no declared field.
    pub fn with_reject_unexpected_fields(mut self, reject: bool) -> Self {
        self.reject_unexpected_fields = reject;
        self
    }

    /// Require exact arity for fixed tuples.
    pub fn with_strict_tuple_length(mut self, strict: bool) -> Self {
        self.strict_tuple_length = strict;
        self
    }

    /// Set maximum nesting depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Encoder options.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EncodeOptions {
    /// Drop record fields whose name starts with `_`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub public_fields_only: bool,

    /// Maximum nesting depth.
    #[cfg_attr(feature = "serde", serde(default = "default_max_depth"))]
    pub max_depth: usize,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            public_fields_only: false,
            max_depth: config::DEFAULT_MAX_DEPTH,
        }
    }
}

impl EncodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit only public (non `_`-prefixed) fields.
    pub fn with_public_fields_only(mut self, public_only: bool) -> Self {
        self.public_fields_only = public_only;
        self
    }

    /// Set maximum nesting depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

#[cfg(feature = "serde")]
fn default_true() -> bool {
    true
}

#[cfg(feature = "serde")]
fn default_max_depth() -> usize {
    config::DEFAULT_MAX_DEPTH
}
