//! Field lookups over raw HAR JSON.
//!
//! Absent, `null` and mistyped fields all surface as [`Error::MissingField`]
//! naming the dotted path of the field.

use crate::{Error, Result};
use serde_json::Value;

pub(crate) fn field<'v>(obj: &'v Value, key: &str, context: &str) -> Result<&'v Value> {
    match obj.get(key) {
        None | Some(Value::Null) => Err(missing(key, context)),
        Some(value) => Ok(value),
    }
}

pub(crate) fn str_field<'v>(obj: &'v Value, key: &str, context: &str) -> Result<&'v str> {
    field(obj, key, context)?
        .as_str()
        .ok_or_else(|| mistyped(key, context, "string"))
}

pub(crate) fn i64_field(obj: &Value, key: &str, context: &str) -> Result<i64> {
    let value = field(obj, key, context)?;
    as_i64(value).ok_or_else(|| mistyped(key, context, "integer"))
}

/// Like [`str_field`] but an absent or `null` field is `None`
pub(crate) fn opt_str_field<'v>(obj: &'v Value, key: &str, context: &str) -> Result<Option<&'v str>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_str()
            .map(Some)
            .ok_or_else(|| mistyped(key, context, "string")),
    }
}

/// Like [`i64_field`] but an absent or `null` field is `None`
pub(crate) fn opt_i64_field(obj: &Value, key: &str, context: &str) -> Result<Option<i64>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => as_i64(value)
            .map(Some)
            .ok_or_else(|| mistyped(key, context, "integer")),
    }
}

pub(crate) fn f64_field(obj: &Value, key: &str, context: &str) -> Result<f64> {
    field(obj, key, context)?
        .as_f64()
        .ok_or_else(|| mistyped(key, context, "number"))
}

pub(crate) fn array_field<'v>(obj: &'v Value, key: &str, context: &str) -> Result<&'v [Value]> {
    field(obj, key, context)?
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| mistyped(key, context, "array"))
}

pub(crate) fn opt_str<'v>(obj: &'v Value, key: &str) -> Option<&'v str> {
    obj.get(key).and_then(Value::as_str)
}

pub(crate) fn opt_i64(obj: &Value, key: &str) -> Option<i64> {
    obj.get(key).and_then(as_i64)
}

/// Integers are sometimes exported as floats (`200.0`); accept both.
fn as_i64(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
}

fn missing(key: &str, context: &str) -> Error {
    Error::MissingField(format!("{}.{}", context, key))
}

fn mistyped(key: &str, context: &str, expected: &str) -> Error {
    Error::MissingField(format!("{}.{} (expected {})", context, key, expected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_and_null_are_errors() {
        let obj = json!({"a": null});
        assert!(matches!(field(&obj, "a", "x"), Err(Error::MissingField(_))));
        assert!(matches!(field(&obj, "b", "x"), Err(Error::MissingField(_))));
    }

    #[test]
    fn test_error_names_dotted_path() {
        let obj = json!({});
        let err = str_field(&obj, "mimeType", "response.content").unwrap_err();
        assert_eq!(err.to_string(), "Missing field: response.content.mimeType");
    }

    #[test]
    fn test_integer_accepts_whole_floats() {
        let obj = json!({"status": 200.0, "bad": 1.5});
        assert_eq!(i64_field(&obj, "status", "response").unwrap(), 200);
        assert!(i64_field(&obj, "bad", "response").is_err());
    }

    #[test]
    fn test_optional_integer() {
        let obj = json!({"bodySize": 42, "empty": null, "bad": "abc"});
        assert_eq!(opt_i64_field(&obj, "bodySize", "response").unwrap(), Some(42));
        assert_eq!(opt_i64_field(&obj, "empty", "response").unwrap(), None);
        assert_eq!(opt_i64_field(&obj, "absent", "response").unwrap(), None);
        assert!(matches!(
            opt_i64_field(&obj, "bad", "response"),
            Err(Error::MissingField(_))
        ));
    }

    #[test]
    fn test_mistyped_field() {
        let obj = json!({"time": "fast"});
        let err = f64_field(&obj, "time", "entry").unwrap_err();
        assert!(err.to_string().contains("expected number"));
    }
}
