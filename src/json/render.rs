use super::{JsonObject, JsonValue};
use std::fmt;

/// Raw rendering of an `Invalid` value
pub const INVALID_JSON_MARKER: &str = "INVALID_JSON_VALUE";

impl JsonValue {
    /// Compact JSON text; `Invalid` renders as [`INVALID_JSON_MARKER`]
    ///
    /// Object keys are emitted in sorted order so output is stable.
    pub fn to_raw_string(&self) -> String {
        let mut out = String::new();
        self.write_raw(&mut out);
        out
    }

    /// Indented JSON text, two spaces per level
    pub fn to_pretty_string(&self) -> String {
        let mut out = String::new();
        self.write_pretty(&mut out, "");
        out
    }

    fn write_raw(&self, out: &mut String) {
        match self {
            JsonValue::Array(values) => {
                out.push('[');
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    value.write_raw(out);
                }
                out.push(']');
            }
            JsonValue::Object(object) => {
                out.push('{');
                for (i, (key, value)) in sorted_entries(object).into_iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    push_quoted(out, key);
                    out.push(':');
                    value.write_raw(out);
                }
                out.push('}');
            }
            scalar => push_scalar(out, scalar),
        }
    }

    fn write_pretty(&self, out: &mut String, indent: &str) {
        let inner = format!("{indent}  ");
        match self {
            JsonValue::Array(values) if !values.is_empty() => {
                out.push_str("[\n");
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        out.push_str(",\n");
                    }
                    out.push_str(&inner);
                    value.write_pretty(out, &inner);
                }
                out.push('\n');
                out.push_str(indent);
                out.push(']');
            }
            JsonValue::Object(object) if !object.is_empty() => {
                out.push_str("{\n");
                for (i, (key, value)) in sorted_entries(object).into_iter().enumerate() {
                    if i > 0 {
                        out.push_str(",\n");
                    }
                    out.push_str(&inner);
                    push_quoted(out, key);
                    out.push_str(": ");
                    value.write_pretty(out, &inner);
                }
                out.push('\n');
                out.push_str(indent);
                out.push('}');
            }
            other => other.write_raw(out),
        }
    }
}

fn sorted_entries(object: &JsonObject) -> Vec<(&String, &JsonValue)> {
    let mut entries: Vec<_> = object.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
}

fn push_quoted(out: &mut String, text: &str) {
    out.push_str(&serde_json::Value::from(text).to_string());
}

fn push_scalar(out: &mut String, value: &JsonValue) {
    match value {
        JsonValue::Number(number) => out.push_str(&number.to_string()),
        JsonValue::String(text) => push_quoted(out, text),
        JsonValue::Bool(flag) => out.push_str(if *flag { "true" } else { "false" }),
        JsonValue::Null => out.push_str("null"),
        JsonValue::Invalid(_) => out.push_str(INVALID_JSON_MARKER),
        JsonValue::Array(_) | JsonValue::Object(_) => out.push_str(&value.to_raw_string()),
    }
}

/// Pretty JSON for valid values, the error message for `Invalid`
impl fmt::Display for JsonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonValue::Invalid(error) => write!(f, "{error}"),
            _ => f.write_str(&self.to_pretty_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JsonError;

    #[test]
    fn test_raw_rendering() {
        let json = JsonValue::from_slice(br#"{"b":[1,2.5,"q\"uote"],"a":null,"c":true}"#);
        assert_eq!(
            json.to_raw_string(),
            r#"{"a":null,"b":[1,2.5,"q\"uote"],"c":true}"#
        );
    }

    #[test]
    fn test_pretty_rendering() {
        let json = JsonValue::from_slice(br#"{"list":[1,{"k":"v"}],"empty":[]}"#);
        let expected = "{\n  \"empty\": [],\n  \"list\": [\n    1,\n    {\n      \"k\": \"v\"\n    }\n  ]\n}";
        assert_eq!(json.to_pretty_string(), expected);
        assert_eq!(json.to_string(), expected);
    }

    #[test]
    fn test_invalid_rendering() {
        let invalid = JsonValue::from_slice(b"nope").get("a");
        assert_eq!(invalid.to_raw_string(), INVALID_JSON_MARKER);
        assert_eq!(invalid.to_string(), JsonError::parse().message());

        let keypath = JsonValue::Null.get("a");
        assert_eq!(
            keypath.to_string(),
            "JSON Keypath Error: Incorrect Keypath \"a\""
        );
    }

    #[test]
    fn test_raw_rendering_reparses_to_equal_value() {
        let sources: [&[u8]; 4] = [
            br#"{"market_price_usd":64321.5,"n_tx":412345,"ok":true,"note":null}"#,
            br#"{"values":[{"x":1000,"y":100.0},{"x":86400,"y":105.0}],"unit":"USD"}"#,
            br#"{"nested":{"deep":{"list":[[],{},["a\nb",-1e-7]]}}}"#,
            br#"{"big":18446744073709551615,"neg":-9223372036854775808}"#,
        ];

        for source in sources {
            let original = JsonValue::from_slice(source);
            let reparsed = JsonValue::from_slice(original.to_raw_string().as_bytes());
            assert_eq!(original, reparsed, "{}", original.to_raw_string());
        }
    }
}
