//! Tests for codecs
//!
//! These tests verify:
//! - Text codec is the identity in both directions
//! - Json codec encodes structured values and rejects bad input
//! - Timestamp format and millisecond truncation

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use shardkv::codec::{timestamp, Codec, Json, Text, Timestamp};
use shardkv::KvError;

// =============================================================================
// Helper Types
// =============================================================================

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Event {
    name: String,
    #[serde(with = "shardkv::codec::timestamp")]
    at: NaiveDateTime,
    tags: BTreeMap<String, u32>,
}

fn sample_datetime() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2014, 5, 16)
        .unwrap()
        .and_hms_nano_opt(21, 20, 5, 123_456_789)
        .unwrap()
}

// =============================================================================
// Text Codec Tests
// =============================================================================

#[test]
fn test_text_encode_is_identity() {
    let value = "line one\nline two\r\n\ttabbed {\"not\": json}".to_string();
    assert_eq!(Text.encode(&value).unwrap(), value);
}

#[test]
fn test_text_decode_is_identity() {
    let text = "  leading and trailing  ";
    assert_eq!(Text.decode(text).unwrap(), text);
}

// =============================================================================
// Json Codec Tests
// =============================================================================

#[test]
fn test_json_encode_object() {
    let codec = Json::<BTreeMap<String, i32>>::new();
    let mut map = BTreeMap::new();
    map.insert("n".to_string(), 1);

    assert_eq!(codec.encode(&map).unwrap(), r#"{"n":1}"#);
}

#[test]
fn test_json_decode_object() {
    let codec = Json::<serde_json::Value>::new();
    let value = codec.decode(r#"{"n": 1, "list": [true, null]}"#).unwrap();

    assert_eq!(value["n"], 1);
    assert_eq!(value["list"][0], true);
}

#[test]
fn test_json_decode_malformed_is_serialization_error() {
    let codec = Json::<Vec<u32>>::new();

    assert!(matches!(codec.decode("[1, 2"), Err(KvError::Serialization(_))));
    assert!(matches!(codec.decode(r#"{"a": 1}"#), Err(KvError::Serialization(_))));
    assert!(matches!(codec.decode(""), Err(KvError::Serialization(_))));
}

#[test]
fn test_json_string_value_is_quoted() {
    let codec = Json::<String>::new();

    assert_eq!(codec.encode(&"x".to_string()).unwrap(), "\"x\"");
    assert_eq!(codec.decode("\"x\"").unwrap(), "x");
}

// =============================================================================
// Timestamp Tests
// =============================================================================

#[test]
fn test_timestamp_display_format() {
    let ts = Timestamp(sample_datetime());
    assert_eq!(ts.to_string(), "2014-05-16 21:20:05.123");
}

#[test]
fn test_timestamp_json_drops_sub_millisecond_precision() {
    let codec = Json::<Timestamp>::new();
    let ts = Timestamp(sample_datetime());

    let text = codec.encode(&ts).unwrap();
    assert_eq!(text, "\"2014-05-16 21:20:05.123\"");

    let decoded = codec.decode(&text).unwrap();
    assert_ne!(decoded, ts);
    assert_eq!(decoded, ts.truncated());
}

#[test]
fn test_timestamp_now_is_already_truncated() {
    let now = Timestamp::now();
    assert_eq!(now, now.truncated());

    let codec = Json::<Timestamp>::new();
    assert_eq!(codec.decode(&codec.encode(&now).unwrap()).unwrap(), now);
}

#[test]
fn test_timestamp_parse_without_fraction() {
    let parsed = timestamp::parse("2014-05-16 21:20:05").unwrap();
    assert_eq!(parsed, sample_datetime().with_nanosecond(0).unwrap());
}

#[test]
fn test_timestamp_field_in_struct() {
    let codec = Json::<Event>::new();
    let mut tags = BTreeMap::new();
    tags.insert("priority".to_string(), 3);
    let event = Event {
        name: "deploy".into(),
        at: Timestamp(sample_datetime()).truncated().0,
        tags,
    };

    let text = codec.encode(&event).unwrap();
    assert!(text.contains(r#""at":"2014-05-16 21:20:05.123""#));
    assert_eq!(codec.decode(&text).unwrap(), event);
}

#[test]
fn test_timestamp_rejects_other_formats() {
    let codec = Json::<Timestamp>::new();

    assert!(codec.decode("\"2014-05-16T21:20:05Z\"").is_err());
    assert!(codec.decode("1400000000").is_err());
}
