// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! ISO-8601 codecs for chrono date and time types.
//!
//! Dates and times are opaque leaf types: their descriptors carry an
//! intrinsic codec that parses ISO-8601 text, and their instances render
//! back to the same text through [`SerializeValue`].

use super::{unexpected, Marshal};
use crate::config;
use crate::descriptor::TypeDescriptor;
use crate::error::{Error, Result};
use crate::instance::{Instance, Opaque, SerializeValue};
use crate::value::Value;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

/// A chrono type with an ISO-8601 text form.
trait IsoFormat: Any + Debug + PartialEq + Clone + Send + Sync {
    const TYPE_KEY: &'static str;

    fn parse_iso(text: &str) -> std::result::Result<Self, chrono::ParseError>;

    fn to_iso(&self) -> String;
}

impl IsoFormat for NaiveDate {
    const TYPE_KEY: &'static str = config::DATE_TYPE_KEY;

    fn parse_iso(text: &str) -> std::result::Result<Self, chrono::ParseError> {
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
    }

    fn to_iso(&self) -> String {
        self.format("%Y-%m-%d").to_string()
    }
}

impl IsoFormat for NaiveDateTime {
    const TYPE_KEY: &'static str = config::DATETIME_TYPE_KEY;

    fn parse_iso(text: &str) -> std::result::Result<Self, chrono::ParseError> {
        NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
    }

    fn to_iso(&self) -> String {
        self.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
    }
}

impl IsoFormat for DateTime<FixedOffset> {
    const TYPE_KEY: &'static str = config::DATETIME_OFFSET_TYPE_KEY;

    fn parse_iso(text: &str) -> std::result::Result<Self, chrono::ParseError> {
        DateTime::parse_from_rfc3339(text)
    }

    fn to_iso(&self) -> String {
        self.to_rfc3339_opts(SecondsFormat::AutoSi, false)
    }
}

impl IsoFormat for DateTime<Utc> {
    const TYPE_KEY: &'static str = config::DATETIME_UTC_TYPE_KEY;

    fn parse_iso(text: &str) -> std::result::Result<Self, chrono::ParseError> {
        DateTime::parse_from_rfc3339(text).map(|dt| dt.with_timezone(&Utc))
    }

    fn to_iso(&self) -> String {
        self.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}

fn decode_iso<T: IsoFormat>(value: &Value) -> Result<Instance> {
    let Some(text) = value.as_str() else {
        return Err(Error::type_mismatch(T::TYPE_KEY, value.describe()));
    };
    let parsed = T::parse_iso(text).map_err(|e| {
        Error::validation(format!("invalid ISO-8601 {} {:?}: {}", T::TYPE_KEY, text, e))
    })?;
    Ok(Instance::Opaque(Opaque::serializable(T::TYPE_KEY, IsoValue(parsed))))
}

fn encode_iso<T: IsoFormat>(instance: &Instance) -> Result<Value> {
    let value: T = take_iso(instance.clone())?;
    Ok(Value::String(value.to_iso()))
}

fn take_iso<T: IsoFormat>(instance: Instance) -> Result<T> {
    match &instance {
        Instance::Opaque(opaque) => match opaque.downcast_ref::<IsoValue<T>>() {
            Some(IsoValue(v)) => Ok(v.clone()),
            None => Err(unexpected(T::TYPE_KEY, &instance)),
        },
        // text reaching here came through an untyped path
        Instance::String(text) => T::parse_iso(text).map_err(|e| {
            Error::validation(format!("invalid ISO-8601 {} {:?}: {}", T::TYPE_KEY, text, e))
        }),
        _ => Err(unexpected(T::TYPE_KEY, &instance)),
    }
}

/// Opaque payload wrapping a chrono value.
#[derive(Debug, Clone, PartialEq)]
struct IsoValue<T>(T);

impl<T: IsoFormat> SerializeValue for IsoValue<T> {
    fn serialize_value(&self) -> Result<Value> {
        Ok(Value::String(self.0.to_iso()))
    }
}

macro_rules! impl_marshal_iso {
    ($($t:ty),* $(,)?) => {
        $(
            impl Marshal for $t {
                fn descriptor() -> Arc<TypeDescriptor> {
                    Arc::new(
                        TypeDescriptor::opaque(<$t as IsoFormat>::TYPE_KEY)
                            .with_decode_hook(decode_iso::<$t>)
                            .with_encode_hook(encode_iso::<$t>),
                    )
                }

                fn from_instance(instance: Instance) -> Result<Self> {
                    take_iso(instance)
                }

                fn to_instance(&self) -> Result<Instance> {
                    Ok(Instance::Opaque(Opaque::serializable(
                        <$t as IsoFormat>::TYPE_KEY,
                        IsoValue(self.clone()),
                    )))
                }
            }
        )*
    };
}

impl_marshal_iso!(NaiveDate, NaiveDateTime, DateTime<FixedOffset>, DateTime<Utc>);
