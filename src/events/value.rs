// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property Values
//!
//! Typed view of the values found in a configuration item's property bag.
//! Numbers keep the exact decimal text they were delivered with and
//! timestamp-shaped strings are lifted into [`PropertyValue::Timestamp`].

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Wire format of timestamps inside configuration items
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// A single property-bag value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PropertyValue {
    Null,
    Bool(bool),
    /// Exact decimal text, never rounded through binary floating point
    Number(String),
    String(String),
    Timestamp(DateTime<Utc>),
    List(Vec<PropertyValue>),
    Map(PropertyMap),
}

impl PropertyValue {
    /// Scalars are everything except lists and maps
    pub fn is_scalar(&self) -> bool {
        !matches!(self, PropertyValue::List(_) | PropertyValue::Map(_))
    }

    /// Truthiness used when projecting scalars into node properties
    ///
    /// Null, `false`, numeric zero, empty strings and empty collections are
    /// all falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            PropertyValue::Null => false,
            PropertyValue::Bool(b) => *b,
            PropertyValue::Number(n) => !is_numeric_zero(n),
            PropertyValue::String(s) => !s.is_empty(),
            PropertyValue::Timestamp(_) => true,
            PropertyValue::List(items) => !items.is_empty(),
            PropertyValue::Map(map) => !map.is_empty(),
        }
    }

    /// Render a scalar as a node property string
    ///
    /// Booleans render capitalized (`True`, `False`). Returns `None` for lists
    /// and maps.
    pub fn to_property_string(&self) -> Option<String> {
        match self {
            PropertyValue::Null => Some(String::new()),
            PropertyValue::Bool(true) => Some("True".to_string()),
            PropertyValue::Bool(false) => Some("False".to_string()),
            PropertyValue::Number(n) => Some(n.clone()),
            PropertyValue::String(s) => Some(s.clone()),
            PropertyValue::Timestamp(ts) => Some(canonical_timestamp(ts)),
            PropertyValue::List(_) | PropertyValue::Map(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&PropertyMap> {
        match self {
            PropertyValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }
}

impl From<Value> for PropertyValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => PropertyValue::Null,
            Value::Bool(b) => PropertyValue::Bool(b),
            Value::Number(n) => PropertyValue::Number(n.to_string()),
            Value::String(s) => match parse_timestamp(&s) {
                Some(ts) => PropertyValue::Timestamp(ts),
                None => PropertyValue::String(s),
            },
            Value::Array(items) => {
                PropertyValue::List(items.into_iter().map(PropertyValue::from).collect())
            }
            Value::Object(map) => PropertyValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, PropertyValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

/// Ordered property mapping; keys keep the order they were delivered in
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyMap(Vec<(String, PropertyValue)>);

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace, keeping the original position of a replaced key
    pub fn insert(&mut self, key: impl Into<String>, value: PropertyValue) {
        let key = key.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, PropertyValue)> for PropertyMap {
    fn from_iter<I: IntoIterator<Item = (String, PropertyValue)>>(iter: I) -> Self {
        let mut map = PropertyMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// Recognize a `YYYY-MM-DDTHH:MM:SS.ffffffZ` timestamp
///
/// The fractional part is mandatory (1 to 6 digits) and the value must be
/// UTC (`Z`). Anything else stays a plain string.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let bytes = s.as_bytes();
    if bytes.len() < 22 || bytes.len() > 27 {
        return None;
    }
    if bytes[10] != b'T' || bytes[19] != b'.' || bytes[bytes.len() - 1] != b'Z' {
        return None;
    }
    if !bytes[20..bytes.len() - 1].iter().all(u8::is_ascii_digit) {
        return None;
    }

    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Canonical textual form of a timestamp property
///
/// `YYYY-MM-DD HH:MM:SS`, followed by `.ffffff` only when the sub-second
/// part is non-zero at microsecond precision.
pub fn canonical_timestamp(ts: &DateTime<Utc>) -> String {
    if ts.nanosecond() / 1_000 == 0 {
        ts.format("%Y-%m-%d %H:%M:%S").to_string()
    } else {
        ts.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
    }
}

fn is_numeric_zero(n: &str) -> bool {
    let digits = n.trim_start_matches(['-', '+']);
    let mantissa = digits.split(['e', 'E']).next().unwrap_or_default();
    !mantissa.is_empty() && mantissa.chars().all(|c| c == '0' || c == '.')
}
