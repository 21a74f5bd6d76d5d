// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Conversion errors.
//!
//! Every error records the [`FieldPath`] at which it was raised, so a failure
//! deep inside a nested record reads as `$.players["John"].cards[1].rank`.

use std::fmt;
use thiserror::Error;

/// Result type of every conversion.
pub type Result<T> = std::result::Result<T, Error>;

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Record field.
    Field(String),
    /// Sequence or tuple position.
    Index(usize),
    /// Mapping key.
    Key(String),
}

/// Location of a value inside the tree being converted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// The root path (`$`).
    pub fn root() -> Self {
        Self::default()
    }

    /// True for the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segments from the root down.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub(crate) fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    pub(crate) fn pop(&mut self) {
        self.segments.pop();
    }

    /// `self` followed by `suffix`.
    pub fn join(&self, suffix: &FieldPath) -> FieldPath {
        let mut segments = self.segments.clone();
        segments.extend(suffix.segments.iter().cloned());
        FieldPath { segments }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.segments {
            match segment {
                PathSegment::Field(name) => write!(f, ".{}", name)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
                PathSegment::Key(key) => write!(f, "[{:?}]", key)?,
            }
        }
        Ok(())
    }
}

/// A union member that rejected the value, with its reason.
#[derive(Debug, Clone)]
pub struct UnionAttempt {
    /// Type key of the member.
    pub member: String,
    /// Why the member rejected the value.
    pub error: Error,
}

/// Discriminant of [`Error`], for matching without destructuring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    TypeMismatch,
    MissingField,
    UnexpectedField,
    UnionMismatch,
    Validation,
    Unsupported,
    DepthExceeded,
}

/// Conversion error.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The runtime shape of a value disagrees with the declared type.
    #[error("type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: FieldPath,
        expected: String,
        found: String,
    },

    /// A required record field is absent from the input mapping.
    #[error("missing field `{field}` required by {record} at {path}")]
    MissingField {
        path: FieldPath,
        record: String,
        field: String,
    },

    /// An input key matches no declared field while extras are rejected.
    #[error("unexpected field `{field}` for {record} at {path}")]
    UnexpectedField {
        path: FieldPath,
        record: String,
        field: String,
    },

    /// No member of a union accepted the value.
    #[error("{found} at {path} matched no member of {union}{}", render_attempts(.attempts))]
    UnionMismatch {
        path: FieldPath,
        union: String,
        found: String,
        attempts: Vec<UnionAttempt>,
    },

    /// A constructor, validator or custom codec rejected the value.
    #[error("validation failed at {path}: {message}")]
    Validation { path: FieldPath, message: String },

    /// No rule exists for the type.
    #[error("unsupported type `{type_name}` at {path}")]
    Unsupported { path: FieldPath, type_name: String },

    /// The nesting depth limit was reached.
    #[error("maximum nesting depth {limit} exceeded at {path}")]
    DepthExceeded { path: FieldPath, limit: usize },
}

fn render_attempts(attempts: &[UnionAttempt]) -> String {
    let mut out = String::new();
    for attempt in attempts {
        out.push_str(&format!("\n  - {}: {}", attempt.member, attempt.error));
    }
    out
}

impl Error {
    /// Validation failure raised by user code (validators, custom codecs).
    ///
    /// The path is filled in by the engine when the error surfaces.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            path: FieldPath::root(),
            message: message.into(),
        }
    }

    /// Shape mismatch raised by user code.
    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            path: FieldPath::root(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Unsupported type raised by user code.
    pub fn unsupported(type_name: impl Into<String>) -> Self {
        Self::Unsupported {
            path: FieldPath::root(),
            type_name: type_name.into(),
        }
    }

    /// Error discriminant.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Self::MissingField { .. } => ErrorKind::MissingField,
            Self::UnexpectedField { .. } => ErrorKind::UnexpectedField,
            Self::UnionMismatch { .. } => ErrorKind::UnionMismatch,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Unsupported { .. } => ErrorKind::Unsupported,
            Self::DepthExceeded { .. } => ErrorKind::DepthExceeded,
        }
    }

    /// Where the error was raised.
    pub fn path(&self) -> &FieldPath {
        match self {
            Self::TypeMismatch { path, .. }
            | Self::MissingField { path, .. }
            | Self::UnexpectedField { path, .. }
            | Self::UnionMismatch { path, .. }
            | Self::Validation { path, .. }
            | Self::Unsupported { path, .. }
            | Self::DepthExceeded { path, .. } => path,
        }
    }

    fn path_mut(&mut self) -> &mut FieldPath {
        match self {
            Self::TypeMismatch { path, .. }
            | Self::MissingField { path, .. }
            | Self::UnexpectedField { path, .. }
            | Self::UnionMismatch { path, .. }
            | Self::Validation { path, .. }
            | Self::Unsupported { path, .. }
            | Self::DepthExceeded { path, .. } => path,
        }
    }

    /// Re-root an error produced by a nested call under `prefix`.
    pub(crate) fn within(mut self, prefix: &FieldPath) -> Self {
        if !prefix.is_root() {
            let path = self.path_mut();
            *path = prefix.join(path);
        }
        self
    }

    /// Member errors of a [`Error::UnionMismatch`], empty otherwise.
    pub fn union_attempts(&self) -> &[UnionAttempt] {
        match self {
            Self::UnionMismatch { attempts, .. } => attempts,
            _ => &[],
        }
    }
}
