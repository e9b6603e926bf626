//! Lenient numeric and text coercion
//!
//! Form inputs arrive as free text and stored payloads may carry numbers as
//! strings. Both sides agree on one rule set:
//! - form text parses like a browser `parseFloat` (longest numeric prefix)
//! - anything unparseable or non-finite becomes 0 on the form side
//! - JSON payloads accept numbers, numeric strings and `null` (as 0)

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// Parse the longest numeric prefix of `raw`, skipping leading whitespace.
///
/// Returns `None` when no digits lead the text (`"abc"`, `"."`, `""`).
/// Mirrors browser `parseFloat`: `"12.5kg"` yields 12.5, `"1e3x"` yields 1000.
pub fn parse_float_prefix(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// Form-field rule: parse as float, substitute 0 on absence, failure or
/// non-finite result. Never fails.
pub fn parse_float_safe(raw: Option<&str>) -> f64 {
    raw.and_then(parse_float_prefix)
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Coerce a JSON value into a number.
///
/// Accepts numbers, strings holding a complete number, and `null` (as 0).
pub fn value_to_f64(value: &Value) -> Result<f64, String> {
    match value {
        Value::Null => Ok(0.0),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| format!("number {} out of range", n)),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(0.0);
            }
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| format!("cannot cast \"{}\" to a number", s))
        }
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        other => Err(format!("cannot cast {} to a number", type_name(other))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// serde `deserialize_with` for a lenient `f64`
pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    value_to_f64(&value).map_err(de::Error::custom)
}

/// serde `deserialize_with` for a lenient `Vec<f64>`; `null` yields an empty list
pub fn number_seq<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .iter()
            .map(|item| value_to_f64(item).map_err(de::Error::custom))
            .collect(),
        other => Err(de::Error::custom(format!(
            "expected a list of numbers, got {}",
            type_name(&other)
        ))),
    }
}

/// serde `deserialize_with` for free text; numbers are stringified, `null` is empty
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(de::Error::custom(format!(
            "cannot cast {} to text",
            type_name(&other)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prefix_plain_numbers() {
        assert_eq!(parse_float_prefix("42"), Some(42.0));
        assert_eq!(parse_float_prefix("-3.5"), Some(-3.5));
        assert_eq!(parse_float_prefix("  7.25"), Some(7.25));
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("5."), Some(5.0));
    }

    #[test]
    fn test_prefix_trailing_garbage() {
        assert_eq!(parse_float_prefix("12.5kg"), Some(12.5));
        assert_eq!(parse_float_prefix("1e3x"), Some(1000.0));
        assert_eq!(parse_float_prefix("4e"), Some(4.0));
        assert_eq!(parse_float_prefix("4e+"), Some(4.0));
        assert_eq!(parse_float_prefix("3.1.4"), Some(3.1));
    }

    #[test]
    fn test_prefix_rejects_non_numeric() {
        assert_eq!(parse_float_prefix(""), None);
        assert_eq!(parse_float_prefix("abc"), None);
        assert_eq!(parse_float_prefix("."), None);
        assert_eq!(parse_float_prefix("-"), None);
        assert_eq!(parse_float_prefix("x12"), None);
    }

    #[test]
    fn test_parse_float_safe_defaults_to_zero() {
        assert_eq!(parse_float_safe(None), 0.0);
        assert_eq!(parse_float_safe(Some("")), 0.0);
        assert_eq!(parse_float_safe(Some("n/a")), 0.0);
        assert_eq!(parse_float_safe(Some("1e400")), 0.0);
        assert_eq!(parse_float_safe(Some("55")), 55.0);
    }

    #[test]
    fn test_value_to_f64() {
        assert_eq!(value_to_f64(&json!(12)), Ok(12.0));
        assert_eq!(value_to_f64(&json!("12.5")), Ok(12.5));
        assert_eq!(value_to_f64(&json!(null)), Ok(0.0));
        assert_eq!(value_to_f64(&json!(" ")), Ok(0.0));
        assert!(value_to_f64(&json!("12kg")).is_err());
        assert!(value_to_f64(&json!([1])).is_err());
        assert!(value_to_f64(&json!({"a": 1})).is_err());
    }
}
