// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Crate-level tests: derived types through the full decode/encode pipeline.

use crate::{
    decode, encode, from_value, from_value_with, to_value, to_value_with, DecodeOptions, Decoder,
    EncodeOptions, Encoder, ErrorKind, Instance, Map, Marshal, Registry, Result, TypeKind, Value,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Marshal)]
enum Suit {
    #[marshal(value = "h")]
    Heart,
    #[marshal(value = "s")]
    Spade,
    #[marshal(value = "c")]
    Club,
    #[marshal(value = "d")]
    Diamond,
}

const SUITS: [&str; 4] = ["h", "s", "c", "d"];

#[derive(Debug, Clone, PartialEq, Marshal)]
struct Card {
    rank: u8,
    suit: Suit,
}

#[derive(Debug, PartialEq, Marshal)]
struct Hand {
    cards: Vec<Card>,
    #[marshal(default)]
    owner: Option<String>,
}

fn card(rank: i64, suit: &str) -> Value {
    [("rank", Value::Int(rank)), ("suit", Value::from(suit))]
        .into_iter()
        .collect()
}

fn hand(cards: Vec<Value>) -> Value {
    let mut value = Value::map();
    value.insert("cards", Value::Seq(cards));
    value
}

#[test]
fn test_derived_record_roundtrip() {
    let value = hand(vec![card(12, "h"), card(1, "s")]);
    let decoded: Hand = from_value(&value).unwrap();
    assert_eq!(
        decoded.cards,
        vec![
            Card { rank: 12, suit: Suit::Heart },
            Card { rank: 1, suit: Suit::Spade },
        ]
    );
    assert_eq!(decoded.owner, None);

    // the absent null default comes back as an explicit null
    let mut expected = value.clone();
    expected.insert("owner", Value::Null);
    assert_eq!(to_value(&decoded).unwrap(), expected);
}

#[test]
fn test_error_path_points_into_nested_record() {
    let mut bad = Value::map();
    bad.insert("suit", "h");
    let err = from_value::<Hand>(&hand(vec![card(2, "c"), bad])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingField);
    assert_eq!(err.path().to_string(), "$.cards[1]");

    let err = from_value::<Hand>(&hand(vec![card(2, "x")])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert_eq!(err.path().to_string(), "$.cards[0].suit");
}

#[test]
fn test_out_of_range_rank() {
    let err = from_value::<Card>(&card(300, "h")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert_eq!(err.path().to_string(), "$.rank");
}

#[test]
fn test_dynamic_and_typed_paths_agree() {
    let value = card(7, "d");
    let instance = decode(&value, &Card::descriptor()).unwrap();
    assert_eq!(instance.type_key(), "Card");
    assert_eq!(encode(&instance).unwrap(), value);

    let typed = Card::from_instance(instance).unwrap();
    assert_eq!(typed, Card { rank: 7, suit: Suit::Diamond });
}

#[test]
fn test_reject_unexpected_fields() {
    let mut value = card(3, "h");
    value.insert("joker", true);
    assert!(from_value::<Card>(&value).is_ok());

    let options = DecodeOptions::new().with_reject_unexpected_fields(true);
    let err = from_value_with::<Card>(&value, &options).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedField);
}

#[test]
fn test_seeded_random_hands_roundtrip() {
    let mut rng = fastrand::Rng::with_seed(0x5eed);
    for _ in 0..64 {
        let cards = (0..rng.usize(0..8))
            .map(|_| card(rng.i64(1..=13), SUITS[rng.usize(0..SUITS.len())]))
            .collect();
        let mut value = hand(cards);
        if rng.bool() {
            value.insert("owner", format!("player-{}", rng.u32(..)));
        } else {
            value.insert("owner", Value::Null);
        }

        let decoded: Hand = from_value(&value).unwrap();
        assert_eq!(to_value(&decoded).unwrap(), value);
    }
}

#[derive(Debug, PartialEq, Marshal)]
struct Account {
    name: String,
    #[marshal(rename = "_balance")]
    balance: i64,
    #[marshal(internal, default)]
    token: String,
    #[marshal(skip)]
    lookups: u32,
}

#[test]
fn test_field_suppression() {
    let mut input = Value::map();
    input.insert("name", "ada");
    input.insert("_balance", 10);
    input.insert("token", "secret");
    input.insert("lookups", 99);

    let account: Account = from_value(&input).unwrap();
    assert_eq!(account.token, "secret");
    // excluded from construction: the input key is not read
    assert_eq!(account.lookups, 0);

    let out = to_value(&account).unwrap();
    assert_eq!(out.get("token"), None);
    assert_eq!(out.get("_balance"), Some(&Value::Int(10)));
    assert_eq!(out.get("lookups"), Some(&Value::Int(0)));

    let public = to_value_with(&account, &EncodeOptions::new().with_public_fields_only(true)).unwrap();
    assert_eq!(public.get("_balance"), None);
    assert_eq!(public.get("name"), Some(&Value::from("ada")));
}

fn check_minimum(order: &Order) -> std::result::Result<(), String> {
    if order.quantity == 0 {
        return Err("quantity must be positive".to_string());
    }
    Ok(())
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, PartialEq, Marshal)]
#[marshal(rename = "order", validate = "check_minimum")]
struct Order {
    item: String,
    #[marshal(default = "default_quantity")]
    quantity: u32,
}

#[test]
fn test_validate_and_default_fn() {
    let mut value = Value::map();
    value.insert("item", "tea");
    let order: Order = from_value(&value).unwrap();
    assert_eq!(order.quantity, 1);
    assert_eq!(Order::descriptor().name, "order");

    value.insert("quantity", 0);
    let err = from_value::<Order>(&value).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().contains("quantity must be positive"));
}

fn parse_minutes(value: &Value) -> Result<u32> {
    let text = value
        .as_str()
        .and_then(|s| s.strip_suffix('m'))
        .ok_or_else(|| crate::Error::validation("expected minutes like \"90m\""))?;
    text.parse()
        .map_err(|e| crate::Error::validation(format!("bad minutes {:?}: {}", text, e)))
}

fn render_minutes(minutes: &u32) -> Result<Value> {
    Ok(Value::String(format!("{}m", minutes)))
}

#[derive(Debug, PartialEq, Marshal)]
struct Meeting {
    title: String,
    #[marshal(decode_with = "parse_minutes", encode_with = "render_minutes")]
    length: u32,
}

#[test]
fn test_field_codecs() {
    let mut value = Value::map();
    value.insert("title", "standup");
    value.insert("length", "15m");
    let meeting: Meeting = from_value(&value).unwrap();
    assert_eq!(meeting.length, 15);
    assert_eq!(to_value(&meeting).unwrap(), value);

    value.insert("length", 15);
    let err = from_value::<Meeting>(&value).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.path().to_string(), "$.length");
}

#[derive(Debug, PartialEq, Marshal)]
struct Circle {
    radius: f64,
}

#[derive(Debug, PartialEq, Marshal)]
struct Square {
    side: f64,
}

#[derive(Debug, PartialEq, Marshal)]
enum Figure {
    Circle(Circle),
    Square(Square),
}

#[test]
fn test_derived_union_picks_by_shape() {
    let mut value = Value::map();
    value.insert("side", 2.5);
    let figure: Figure = from_value(&value).unwrap();
    assert_eq!(figure, Figure::Square(Square { side: 2.5 }));
    assert_eq!(to_value(&figure).unwrap(), value);

    let err = from_value::<Figure>(&Value::from("round")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnionMismatch);
    let members: Vec<_> = err.union_attempts().iter().map(|a| a.member.as_str()).collect();
    assert_eq!(members, vec!["Circle", "Square"]);
}

#[test]
fn test_derived_union_recovers_variant_from_runtime_type() {
    let instance = Square { side: 1.0 }.to_instance().unwrap();
    assert_eq!(
        Figure::from_instance(instance).unwrap(),
        Figure::Square(Square { side: 1.0 })
    );
    let err = Figure::from_instance(Instance::Int(1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnionMismatch);
}

fn positive(value: &Positive) -> std::result::Result<(), String> {
    if value.x > 0 {
        Ok(())
    } else {
        Err(format!("{} is not positive", value.x))
    }
}

fn even(value: &Even) -> std::result::Result<(), String> {
    if value.x % 2 == 0 {
        Ok(())
    } else {
        Err(format!("{} is not even", value.x))
    }
}

#[derive(Debug, PartialEq, Marshal)]
#[marshal(validate = "positive")]
struct Positive {
    x: i64,
}

#[derive(Debug, PartialEq, Marshal)]
#[marshal(validate = "even")]
struct Even {
    x: i64,
}

#[derive(Debug, PartialEq, Marshal)]
struct Anything {
    x: i64,
}

#[derive(Debug, PartialEq, Marshal)]
enum Either {
    P(Positive),
    A(Anything),
}

#[derive(Debug, PartialEq, Marshal)]
enum Picky {
    P(Positive),
    E(Even),
}

#[test]
fn test_validated_union_member_falls_through() {
    let mut value = Value::map();
    value.insert("x", -1);
    let either: Either = from_value(&value).unwrap();
    assert_eq!(either, Either::A(Anything { x: -1 }));

    value.insert("x", 3);
    let either: Either = from_value(&value).unwrap();
    assert_eq!(either, Either::P(Positive { x: 3 }));
}

#[test]
fn test_validated_union_reports_every_rejection() {
    let mut value = Value::map();
    value.insert("x", -1);
    let err = from_value::<Picky>(&value).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnionMismatch);
    let attempts: Vec<_> = err
        .union_attempts()
        .iter()
        .map(|a| (a.member.as_str(), a.error.kind()))
        .collect();
    assert_eq!(
        attempts,
        vec![("Positive", ErrorKind::Validation), ("Even", ErrorKind::Validation)]
    );
    assert!(err.union_attempts()[0].error.to_string().contains("-1 is not positive"));
}

#[test]
fn test_hand_built_instance_still_validated() {
    let mut value = Value::map();
    value.insert("x", -4);
    let instance = decode(&value, &Even::descriptor()).unwrap();
    assert_eq!(Even::from_instance(instance).unwrap(), Even { x: -4 });

    let mut record = crate::RecordInstance::new(Positive::descriptor());
    record.push("x", Instance::Int(0));
    let err = Positive::from_instance(Instance::Record(record)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn test_optional_mapping_keys() {
    let mut value = Value::map();
    value.insert("1", "one");
    value.insert("2", "two");
    let named: std::collections::HashMap<Option<i64>, String> = from_value(&value).unwrap();
    assert_eq!(named[&Some(2)], "two");

    let back = to_value(&named).unwrap();
    assert_eq!(back.get("1"), Some(&Value::from("one")));
}

#[derive(Debug, PartialEq, Marshal)]
struct PlayerId(u64);

#[test]
fn test_newtype_alias_and_registry_codec() {
    assert!(matches!(PlayerId::descriptor().kind, TypeKind::Alias(_)));
    let id: PlayerId = from_value(&Value::Int(42)).unwrap();
    assert_eq!(id, PlayerId(42));

    let registry = Registry::new();
    registry.register_codec(
        "PlayerId",
        |value| {
            let text = value.as_str().unwrap_or_default();
            let id = text.trim_start_matches("P-").parse::<i64>().map_err(|e| {
                crate::Error::validation(format!("bad player id {:?}: {}", text, e))
            })?;
            Ok(Instance::Int(id))
        },
        |instance| Ok(Value::String(format!("P-{}", instance.as_i64().unwrap_or_default()))),
    );

    let instance = Decoder::new(&registry)
        .decode(&Value::from("P-7"), &PlayerId::descriptor())
        .unwrap();
    assert_eq!(PlayerId::from_instance(instance.clone()).unwrap(), PlayerId(7));
    let encoded = Encoder::new(&registry)
        .encode_as(&instance, &PlayerId::descriptor())
        .unwrap();
    assert_eq!(encoded, Value::from("P-7"));
}

#[derive(Debug, PartialEq, Marshal)]
enum Color {
    Red,
    #[marshal(rename = "GREEN")]
    Green,
}

#[test]
fn test_enum_raw_defaults_to_name() {
    assert_eq!(from_value::<Color>(&Value::from("Red")).unwrap(), Color::Red);
    assert_eq!(from_value::<Color>(&Value::from("GREEN")).unwrap(), Color::Green);
    assert_eq!(to_value(&Color::Green).unwrap(), Value::from("GREEN"));
}

#[derive(Debug, PartialEq, Marshal)]
struct Node {
    label: String,
    #[marshal(default)]
    children: Vec<Node>,
}

#[test]
fn test_recursive_record() {
    let mut leaf = Value::map();
    leaf.insert("label", "leaf");
    leaf.insert("children", Value::Seq(vec![]));
    let mut root = Value::map();
    root.insert("label", "root");
    root.insert("children", Value::Seq(vec![leaf.clone(), leaf]));

    let tree: Node = from_value(&root).unwrap();
    assert_eq!(tree.children.len(), 2);
    assert_eq!(to_value(&tree).unwrap(), root);
}

#[test]
fn test_depth_limit_on_deep_tree() {
    let mut value = Value::map();
    value.insert("label", "0");
    for i in 1..20 {
        let mut parent = Value::map();
        parent.insert("label", i.to_string());
        parent.insert("children", Value::Seq(vec![value]));
        value = parent;
    }
    assert!(from_value::<Node>(&value).is_ok());

    let options = DecodeOptions::new().with_max_depth(16);
    let err = from_value_with::<Node>(&value, &options).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DepthExceeded);
}

#[test]
fn test_mapping_of_records() {
    let mut value = Value::map();
    value.insert("1", card(1, "h"));
    value.insert("13", card(13, "s"));
    let by_rank: std::collections::BTreeMap<u8, Card> = from_value(&value).unwrap();
    assert_eq!(by_rank[&13].suit, Suit::Spade);

    let out = to_value(&by_rank).unwrap();
    let keys: Vec<&String> = out.as_map().map(Map::keys).unwrap().collect();
    assert_eq!(keys, vec!["1", "13"]);
}
