//! # Lenient JSON value model
//!
//! `JsonValue` is a closed sum type over every JSON shape plus an `Invalid`
//! variant that carries a [`JsonError`]. Construction and navigation never
//! fail: a bad input or a missed lookup produces an `Invalid` value, and
//! further lookups on it extend its breadcrumb instead of erroring out.
//!
//! ```
//! use bitcoin_stats_sdk::json::JsonValue;
//!
//! let json = JsonValue::from_slice(br#"{"values":[{"x":1,"y":2.5}]}"#);
//! assert_eq!(json.get("values").get(0).get("y").as_f64(), Some(2.5));
//!
//! let missing = json.get("values").get(7).get("y");
//! assert_eq!(missing.error().and_then(|e| e.breadcrumb()), Some("7/y"));
//! ```
//!
//! ## Invalid children
//!
//! The container constructors (`JsonValue::array`, `JsonValue::object`,
//! `FromIterator` and the `From` conversions) drop `Invalid` members
//! silently rather than failing the whole container. Building the `Array` or
//! `Object` variants directly bypasses that filtering.

mod index;
mod render;

pub use index::JsonIndex;
pub use render::INVALID_JSON_MARKER;

use crate::error::JsonError;
use reqwest::Url;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Object payload of `JsonValue`
pub type JsonObject = HashMap<String, JsonValue>;

/// Numeric payload, keeping integers exact
#[derive(Debug, Clone, Copy)]
pub enum JsonNumber {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl JsonNumber {
    pub fn as_f64(&self) -> f64 {
        match *self {
            JsonNumber::I64(v) => v as f64,
            JsonNumber::U64(v) => v as f64,
            JsonNumber::F64(v) => v,
        }
    }

    /// Integer value, truncating floats and saturating out-of-range values
    pub fn as_i64(&self) -> i64 {
        match *self {
            JsonNumber::I64(v) => v,
            JsonNumber::U64(v) => i64::try_from(v).unwrap_or(i64::MAX),
            JsonNumber::F64(v) => v as i64,
        }
    }

    pub fn is_zero(&self) -> bool {
        match *self {
            JsonNumber::I64(v) => v == 0,
            JsonNumber::U64(v) => v == 0,
            JsonNumber::F64(v) => v == 0.0,
        }
    }

    fn from_serde(number: &serde_json::Number) -> Option<Self> {
        if let Some(v) = number.as_i64() {
            Some(JsonNumber::I64(v))
        } else if let Some(v) = number.as_u64() {
            Some(JsonNumber::U64(v))
        } else {
            number.as_f64().map(JsonNumber::F64)
        }
    }
}

impl PartialEq for JsonNumber {
    fn eq(&self, other: &Self) -> bool {
        match (*self, *other) {
            (JsonNumber::I64(a), JsonNumber::I64(b)) => a == b,
            (JsonNumber::U64(a), JsonNumber::U64(b)) => a == b,
            (JsonNumber::I64(a), JsonNumber::U64(b)) | (JsonNumber::U64(b), JsonNumber::I64(a)) => {
                u64::try_from(a).is_ok_and(|a| a == b)
            }
            (a, b) => a.as_f64() == b.as_f64(),
        }
    }
}

impl fmt::Display for JsonNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            JsonNumber::I64(v) => write!(f, "{v}"),
            JsonNumber::U64(v) => write!(f, "{v}"),
            // Non-finite floats have no JSON spelling
            JsonNumber::F64(v) => match serde_json::Number::from_f64(v) {
                Some(number) => write!(f, "{number}"),
                None => f.write_str("null"),
            },
        }
    }
}

/// Any JSON value, or the error that replaced it
#[derive(Debug, Clone)]
pub enum JsonValue {
    Number(JsonNumber),
    String(String),
    Bool(bool),
    Null,
    Array(Vec<JsonValue>),
    Object(JsonObject),
    Invalid(JsonError),
}

impl JsonValue {
    /// Parses raw bytes, yielding a Parse error value on malformed input
    pub fn from_slice(bytes: &[u8]) -> Self {
        match serde_json::from_slice::<serde_json::Value>(bytes) {
            Ok(value) => value.into(),
            Err(e) => {
                tracing::debug!(error = %e, "Raw JSON data failed to parse");
                JsonValue::Invalid(JsonError::parse())
            }
        }
    }

    /// Like [`from_slice`](Self::from_slice), but absent input yields an
    /// Init error value
    pub fn from_optional_slice(bytes: Option<&[u8]>) -> Self {
        match bytes {
            Some(bytes) => Self::from_slice(bytes),
            None => JsonValue::Invalid(JsonError::init()),
        }
    }

    /// Classifies anything serde can encode
    ///
    /// Values serde_json cannot represent (maps with non-string keys, for
    /// instance) become an Init error value.
    pub fn from_serializable<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => value.into(),
            Err(_) => JsonValue::Invalid(JsonError::init()),
        }
    }

    /// Builds an array, dropping invalid items
    pub fn array<I>(items: I) -> Self
    where
        I: IntoIterator<Item = JsonValue>,
    {
        JsonValue::Array(items.into_iter().filter(JsonValue::is_valid).collect())
    }

    /// Builds an object, dropping invalid entries
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, JsonValue)>,
    {
        JsonValue::Object(
            entries
                .into_iter()
                .filter(|(_, value)| value.is_valid())
                .map(|(key, value)| (key.into(), value))
                .collect(),
        )
    }

    /// True for every variant except `Invalid`
    pub fn is_valid(&self) -> bool {
        !matches!(self, JsonValue::Invalid(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, JsonValue::Null)
    }

    /// The error carried by an `Invalid` value
    pub fn error(&self) -> Option<&JsonError> {
        match self {
            JsonValue::Invalid(error) => Some(error),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonValue::String(value) => Some(value),
            _ => None,
        }
    }

    /// Parses a string value as a URL
    pub fn as_url(&self) -> Option<Url> {
        self.as_str().and_then(|value| Url::parse(value).ok())
    }

    pub fn as_number(&self) -> Option<JsonNumber> {
        match self {
            JsonValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Numbers directly, strings by parsing
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            JsonValue::Number(value) => Some(value.as_f64()),
            JsonValue::String(value) => value.trim().parse().ok(),
            _ => None,
        }
    }

    /// Booleans as 0/1, numbers truncated, strings by parsing
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            JsonValue::Bool(value) => Some(i64::from(*value)),
            JsonValue::Number(value) => Some(value.as_i64()),
            JsonValue::String(value) => {
                let value = value.trim();
                value
                    .parse::<i64>()
                    .ok()
                    .or_else(|| value.parse::<f64>().ok().map(|v| v as i64))
            }
            _ => None,
        }
    }

    /// Booleans directly, numbers as nonzero, strings like "true" or "no"
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            JsonValue::Bool(value) => Some(*value),
            JsonValue::Number(value) => Some(!value.is_zero()),
            JsonValue::String(value) => parse_bool(value),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[JsonValue]> {
        match self {
            JsonValue::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&JsonObject> {
        match self {
            JsonValue::Object(object) => Some(object),
            _ => None,
        }
    }

    /// First array element, or some object member
    ///
    /// Which member an object yields depends on map iteration order.
    pub fn first(&self) -> Option<&JsonValue> {
        match self {
            JsonValue::Array(values) => values.first(),
            JsonValue::Object(object) => object.values().next(),
            _ => None,
        }
    }

    /// Last array element, or some object member
    pub fn last(&self) -> Option<&JsonValue> {
        match self {
            JsonValue::Array(values) => values.last(),
            JsonValue::Object(object) => object.values().last(),
            _ => None,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    let value = value.trim();
    if ["true", "yes", "y", "t"]
        .iter()
        .any(|word| value.eq_ignore_ascii_case(word))
    {
        return Some(true);
    }
    if ["false", "no", "n", "f"]
        .iter()
        .any(|word| value.eq_ignore_ascii_case(word))
    {
        return Some(false);
    }
    value.parse::<f64>().ok().map(|n| n != 0.0)
}

// Invalid values never compare equal, not even to themselves.
impl PartialEq for JsonValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (JsonValue::Number(a), JsonValue::Number(b)) => a == b,
            (JsonValue::String(a), JsonValue::String(b)) => a == b,
            (JsonValue::Bool(a), JsonValue::Bool(b)) => a == b,
            (JsonValue::Null, JsonValue::Null) => true,
            (JsonValue::Array(a), JsonValue::Array(b)) => a == b,
            (JsonValue::Object(a), JsonValue::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl From<serde_json::Value> for JsonValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => JsonValue::Null,
            serde_json::Value::Bool(value) => JsonValue::Bool(value),
            serde_json::Value::Number(number) => JsonNumber::from_serde(&number)
                .map(JsonValue::Number)
                .unwrap_or_else(|| JsonValue::Invalid(JsonError::init())),
            serde_json::Value::String(value) => JsonValue::String(value),
            serde_json::Value::Array(items) => {
                JsonValue::array(items.into_iter().map(JsonValue::from))
            }
            serde_json::Value::Object(map) => JsonValue::object(
                map.into_iter()
                    .map(|(key, value)| (key, JsonValue::from(value))),
            ),
        }
    }
}

impl From<bool> for JsonValue {
    fn from(value: bool) -> Self {
        JsonValue::Bool(value)
    }
}

impl From<i32> for JsonValue {
    fn from(value: i32) -> Self {
        JsonValue::Number(JsonNumber::I64(i64::from(value)))
    }
}

impl From<i64> for JsonValue {
    fn from(value: i64) -> Self {
        JsonValue::Number(JsonNumber::I64(value))
    }
}

impl From<u64> for JsonValue {
    fn from(value: u64) -> Self {
        JsonValue::Number(JsonNumber::U64(value))
    }
}

impl From<f64> for JsonValue {
    fn from(value: f64) -> Self {
        JsonValue::Number(JsonNumber::F64(value))
    }
}

impl From<&str> for JsonValue {
    fn from(value: &str) -> Self {
        JsonValue::String(value.to_string())
    }
}

impl From<String> for JsonValue {
    fn from(value: String) -> Self {
        JsonValue::String(value)
    }
}

impl From<Vec<JsonValue>> for JsonValue {
    fn from(values: Vec<JsonValue>) -> Self {
        JsonValue::array(values)
    }
}

impl FromIterator<JsonValue> for JsonValue {
    fn from_iter<I: IntoIterator<Item = JsonValue>>(iter: I) -> Self {
        JsonValue::array(iter)
    }
}

impl<K: Into<String>> FromIterator<(K, JsonValue)> for JsonValue {
    fn from_iter<I: IntoIterator<Item = (K, JsonValue)>>(iter: I) -> Self {
        JsonValue::object(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JsonErrorKind;

    #[test]
    fn test_classifies_every_shape() {
        let json = JsonValue::from_slice(
            br#"{"n":1,"f":1.5,"s":"hi","b":true,"z":null,"a":[1,2],"o":{"k":"v"}}"#,
        );

        assert_eq!(json.get("n"), JsonValue::from(1));
        assert_eq!(json.get("f").as_f64(), Some(1.5));
        assert_eq!(json.get("s").as_str(), Some("hi"));
        assert_eq!(json.get("b"), JsonValue::Bool(true));
        assert!(json.get("z").is_null());
        assert_eq!(json.get("a").as_array().map(<[_]>::len), Some(2));
        assert_eq!(json.get("o").get("k").as_str(), Some("v"));
    }

    #[test]
    fn test_parse_failure_yields_parse_error() {
        let json = JsonValue::from_slice(b"{not json");
        let error = json.error().unwrap();
        assert_eq!(error.kind(), JsonErrorKind::Parse);
        assert_eq!(error.message(), "JSON Parser Error: Invalid Raw JSON Data");
        assert_eq!(error.breadcrumb(), None);
    }

    #[test]
    fn test_absent_input_yields_init_error() {
        let json = JsonValue::from_optional_slice(None);
        assert_eq!(
            json.error().map(JsonError::message),
            Some("JSON Init Error: Invalid Value Passed In init()")
        );
    }

    #[test]
    fn test_unrepresentable_serializable_yields_init_error() {
        let map: HashMap<(u8, u8), u8> = HashMap::from([((1, 2), 3)]);
        let json = JsonValue::from_serializable(&map);
        assert_eq!(json.error().map(JsonError::kind), Some(JsonErrorKind::Init));
    }

    #[test]
    fn test_invalid_children_are_dropped() {
        let array = JsonValue::array(vec![
            JsonValue::from(1),
            JsonValue::Invalid(JsonError::init()),
            JsonValue::from(2),
        ]);
        assert_eq!(array, JsonValue::array(vec![JsonValue::from(1), JsonValue::from(2)]));

        let object: JsonValue = vec![
            ("keep", JsonValue::from("yes")),
            ("drop", JsonValue::Invalid(JsonError::parse())),
        ]
        .into_iter()
        .collect();
        let object = object.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert!(object.contains_key("keep"));
    }

    #[test]
    fn test_integer_coercion() {
        assert_eq!(JsonValue::Bool(true).as_i64(), Some(1));
        assert_eq!(JsonValue::Bool(false).as_i64(), Some(0));
        assert_eq!(JsonValue::from("42").as_i64(), Some(42));
        assert_eq!(JsonValue::from(" 7.9 ").as_i64(), Some(7));
        assert_eq!(JsonValue::from(3.99).as_i64(), Some(3));
        assert_eq!(JsonValue::array(vec![JsonValue::from(1)]).as_i64(), None);
        assert_eq!(JsonValue::object(Vec::<(String, JsonValue)>::new()).as_i64(), None);
        assert_eq!(JsonValue::from("forty-two").as_i64(), None);
    }

    #[test]
    fn test_double_and_bool_coercion() {
        assert_eq!(JsonValue::from(2).as_f64(), Some(2.0));
        assert_eq!(JsonValue::from("2.25").as_f64(), Some(2.25));
        assert_eq!(JsonValue::Bool(true).as_f64(), None);

        assert_eq!(JsonValue::from(0).as_bool(), Some(false));
        assert_eq!(JsonValue::from(-3).as_bool(), Some(true));
        assert_eq!(JsonValue::from("TRUE").as_bool(), Some(true));
        assert_eq!(JsonValue::from("no").as_bool(), Some(false));
        assert_eq!(JsonValue::from("maybe").as_bool(), None);
        assert_eq!(JsonValue::Null.as_bool(), None);
    }

    #[test]
    fn test_strict_accessors_reject_other_variants() {
        let number = JsonValue::from(5);
        assert_eq!(number.as_str(), None);
        assert!(number.as_array().is_none());
        assert!(number.as_object().is_none());
        assert!(JsonValue::from("5").as_number().is_none());
    }

    #[test]
    fn test_url_accessor() {
        let url = JsonValue::from("https://blockchain.info/stats").as_url().unwrap();
        assert_eq!(url.host_str(), Some("blockchain.info"));
        assert!(JsonValue::from("not a url").as_url().is_none());
        assert!(JsonValue::from(1).as_url().is_none());
    }

    #[test]
    fn test_first_and_last() {
        let array = JsonValue::from_slice(b"[1,2,3]");
        assert_eq!(array.first(), Some(&JsonValue::from(1)));
        assert_eq!(array.last(), Some(&JsonValue::from(3)));
        assert!(JsonValue::from_slice(b"[]").first().is_none());

        let object = JsonValue::from_slice(br#"{"only":true}"#);
        assert_eq!(object.first(), Some(&JsonValue::Bool(true)));
        assert_eq!(object.last(), Some(&JsonValue::Bool(true)));
        assert!(JsonValue::from("x").first().is_none());
    }

    #[test]
    fn test_equality_is_variant_aware() {
        assert_eq!(JsonValue::from(1), JsonValue::from(1.0));
        assert_eq!(JsonValue::from(7u64), JsonValue::from(7i64));
        assert_ne!(JsonValue::from(1), JsonValue::Bool(true));
        assert_ne!(JsonValue::from("1"), JsonValue::from(1));
        assert_ne!(JsonValue::Null, JsonValue::from_slice(b"[]"));

        let invalid = JsonValue::Invalid(JsonError::init());
        assert_ne!(invalid, invalid.clone());
    }
}
