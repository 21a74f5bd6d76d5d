// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Extension point tests: global registry codecs, per-field codecs,
//! opaque leaf types and date/time support.

#![cfg(all(feature = "json", feature = "datetime"))]

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde_json::json;
use shapecast::json::{from_json, to_json};
use shapecast::{
    EnumBuilder, ErrorKind, Instance, Marshal, Opaque, RecordBuilder, Result, TypeDescriptor, Value,
};
use std::sync::Arc;

fn seq_to_date(value: &Value) -> Result<NaiveDate> {
    let (year, month, day): (i32, u32, u32) = shapecast::from_value(value)?;
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| shapecast::Error::validation(format!("{}-{}-{} is not a date", year, month, day)))
}

fn date_to_seq(date: &NaiveDate) -> Result<Value> {
    Ok(Value::Tuple(vec![
        Value::Int(i64::from(date.year())),
        Value::Int(i64::from(date.month())),
        Value::Int(i64::from(date.day())),
    ]))
}

#[derive(Debug, PartialEq, Marshal)]
struct Person {
    name: String,
    #[marshal(decode_with = "seq_to_date", encode_with = "date_to_seq")]
    dob: NaiveDate,
}

#[test]
fn test_multipart_field_roundtrip() {
    let data = json!({"name": "Alice", "dob": [2020, 1, 15]});
    let alice: Person = from_json(data.clone()).unwrap();
    assert_eq!(alice.dob, NaiveDate::from_ymd_opt(2020, 1, 15).unwrap());
    assert_eq!(to_json(&alice).unwrap(), data);

    let err = from_json::<Person>(json!({"name": "Bob", "dob": [2020, 2, 30]})).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.path().to_string(), "$.dob");
}

#[derive(Debug, PartialEq, Marshal)]
struct Birthday {
    name: String,
    dob: NaiveDate,
}

#[test]
fn test_iso_date_field() {
    let data = json!({"name": "Bob", "dob": "2020-01-01"});
    let bob: Birthday = from_json(data.clone()).unwrap();
    assert_eq!(bob.dob, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
    assert_eq!(to_json(&bob).unwrap(), data);
}

#[derive(Debug, PartialEq, Marshal)]
struct Event {
    at: DateTime<Utc>,
}

#[test]
fn test_datetime_to_from_value() {
    let event: Event = from_json(json!({"at": "1994-11-05T13:15:30Z"})).unwrap();
    assert_eq!(event.at.year(), 1994);
    let back = to_json(&event).unwrap();
    assert!(back["at"].as_str().unwrap().starts_with("1994-11-05T13:15:30"));
}

/// A leaf type the engine has no rule for.
#[derive(Debug, Clone, PartialEq)]
struct Complex {
    re: f64,
    im: f64,
}

impl Marshal for Complex {
    fn descriptor() -> Arc<TypeDescriptor> {
        Arc::new(TypeDescriptor::opaque("complex"))
    }

    fn from_instance(instance: Instance) -> Result<Self> {
        match instance.as_opaque().and_then(|o| o.downcast_ref::<Complex>()) {
            Some(c) => Ok(c.clone()),
            None => Err(shapecast::marshal::unexpected("complex", &instance)),
        }
    }

    fn to_instance(&self) -> Result<Instance> {
        Ok(Instance::Opaque(Opaque::new("complex", self.clone())))
    }
}

#[derive(Debug, PartialEq, Marshal)]
struct Signal {
    var: Complex,
}

#[test]
fn test_unsupported_type_both_ways() {
    let err = from_json::<Signal>(json!({"var": [0, 0]})).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unsupported);
    assert_eq!(err.path().to_string(), "$.var");

    let err = to_json(&Signal { var: Complex { re: 0.0, im: 0.0 } }).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unsupported);
}

/// Leaf type whose codec lives in the global registry.
#[derive(Debug, Clone, PartialEq)]
struct Phasor {
    re: f64,
    im: f64,
}

impl Marshal for Phasor {
    fn descriptor() -> Arc<TypeDescriptor> {
        Arc::new(TypeDescriptor::opaque("phasor"))
    }

    fn from_instance(instance: Instance) -> Result<Self> {
        match instance.as_opaque().and_then(|o| o.downcast_ref::<Phasor>()) {
            Some(p) => Ok(p.clone()),
            None => Err(shapecast::marshal::unexpected("phasor", &instance)),
        }
    }

    fn to_instance(&self) -> Result<Instance> {
        Ok(Instance::Opaque(Opaque::new("phasor", self.clone())))
    }
}

#[derive(Debug, PartialEq, Marshal)]
struct Wave {
    amplitude: Phasor,
}

#[test]
fn test_global_codec_for_opaque_type() {
    // no other test in this binary touches "phasor"
    shapecast::register_decoder("phasor", |value| {
        let (re, im): (f64, f64) = shapecast::from_value(value)?;
        Ok(Instance::Opaque(Opaque::new("phasor", Phasor { re, im })))
    });
    shapecast::register_encoder("phasor", |instance| {
        let p = Phasor::from_instance(instance.clone())?;
        Ok(Value::Tuple(vec![Value::Float(p.re), Value::Float(p.im)]))
    });

    let data = json!({"amplitude": [1.5, -0.5]});
    let wave: Wave = from_json(data.clone()).unwrap();
    assert_eq!(wave.amplitude, Phasor { re: 1.5, im: -0.5 });
    assert_eq!(to_json(&wave).unwrap(), data);
}

#[test]
fn test_dynamic_descriptors_without_derive() {
    let suit = Arc::new(
        EnumBuilder::new("Suit")
            .variant_value("heart", "h")
            .variant_value("spade", "s")
            .build(),
    );
    let card = Arc::new(
        RecordBuilder::new("Card")
            .field_with_type("rank", Arc::new(TypeDescriptor::int()))
            .field_with_type("suit", suit)
            .validate(|record| match record.get("rank").and_then(Instance::as_i64) {
                Some(rank) if (1..=13).contains(&rank) => Ok(()),
                _ => Err("rank out of range".to_string()),
            })
            .build(),
    );
    let hand = Arc::new(
        RecordBuilder::new("Hand")
            .list_field("cards", card)
            .optional_field("owner", Arc::new(TypeDescriptor::string()))
            .build(),
    );

    let data = Value::from_json(json!({"cards": [{"rank": 3, "suit": "s"}]}));
    let instance = shapecast::decode(&data, &hand).unwrap();
    let cards = instance.get("cards").and_then(Instance::as_list).unwrap();
    assert_eq!(cards[0].get("suit").and_then(Instance::as_enum).unwrap().variant(), "spade");
    assert_eq!(
        shapecast::encode(&instance).unwrap().to_json(),
        json!({"cards": [{"rank": 3, "suit": "s"}], "owner": null})
    );

    let bad = Value::from_json(json!({"cards": [{"rank": 30, "suit": "s"}]}));
    let err = shapecast::decode(&bad, &hand).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.path().to_string(), "$.cards[0]");
}
