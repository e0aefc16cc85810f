//! Small helpers for probing loosely-typed export JSON.

use serde_json::{Map, Value};

use heurist_model::{PartialDate, Scalar, integral_float};

use crate::error::{IngestError, Result};

/// Integer from a JSON number or an integer string.
pub fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().and_then(integral_float)),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Required integer key; `context` names the entry in error messages.
pub fn required_integer(object: &Map<String, Value>, key: &'static str, context: &str) -> Result<i64> {
    let value = object.get(key).ok_or_else(|| IngestError::MissingKey {
        key,
        context: context.to_string(),
    })?;
    as_integer(value).ok_or_else(|| IngestError::InvalidInteger {
        key,
        value: value.to_string(),
        context: context.to_string(),
    })
}

/// Text of a string, number or boolean; `None` for null, arrays and objects.
pub fn as_text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(text)) => Some(text.clone()),
        Some(Value::Number(number)) => Some(number.to_string()),
        Some(Value::Bool(flag)) => Some(flag.to_string()),
        _ => None,
    }
}

/// A JSON scalar, passed through. Nested values are kept as compact JSON text.
pub fn as_scalar(value: Option<&Value>) -> Option<Scalar> {
    match value? {
        Value::Null => None,
        Value::Bool(flag) => Some(Scalar::Boolean(*flag)),
        Value::Number(number) => match number.as_i64() {
            Some(integer) => Some(Scalar::Integer(integer)),
            None => number.as_f64().map(Scalar::Float),
        },
        Value::String(text) => Some(Scalar::Text(text.clone())),
        other => Some(Scalar::Text(other.to_string())),
    }
}

pub fn as_partial_date(value: Option<&Value>) -> Option<PartialDate> {
    match value? {
        Value::Number(number) => match number.as_i64() {
            Some(integer) => Some(PartialDate::Integer(integer)),
            None => number.as_f64().map(PartialDate::Float),
        },
        Value::String(text) if !text.trim().is_empty() => Some(PartialDate::Text(text.clone())),
        _ => None,
    }
}

/// Flag from a boolean, a number (non-zero is true) or a `"1"`/`"true"` string.
pub fn as_flag(value: Option<&Value>) -> Option<bool> {
    match value? {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => number.as_f64().map(|f| f != 0.0),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Some(true),
            "0" | "false" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Nested object at `path`, or `None` when any step is missing or not an object.
pub fn object_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Map<String, Value>> {
    path.iter()
        .try_fold(value, |node, key| node.get(key))?
        .as_object()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integers_accept_strings() {
        assert_eq!(as_integer(&json!(45)), Some(45));
        assert_eq!(as_integer(&json!("45")), Some(45));
        assert_eq!(as_integer(&json!(" 7 ")), Some(7));
        assert_eq!(as_integer(&json!(3.0)), Some(3));
        assert_eq!(as_integer(&json!(3.5)), None);
        assert_eq!(as_integer(&json!(1e30)), None);
        assert_eq!(as_integer(&json!(-1e19)), None);
        assert_eq!(as_integer(&json!("abc")), None);
    }

    #[test]
    fn scalars_pass_through() {
        assert_eq!(as_scalar(Some(&json!(12))), Some(Scalar::Integer(12)));
        assert_eq!(as_scalar(Some(&json!(1.5))), Some(Scalar::Float(1.5)));
        assert_eq!(as_scalar(Some(&json!(null))), None);
        assert_eq!(as_scalar(None), None);
    }

    #[test]
    fn nested_object_lookup() {
        let value = json!({"geo": {"type": "p", "wkt": "POINT(1 2)"}});
        let geo = object_at(&value, &["geo"]).unwrap();
        assert_eq!(as_text(geo.get("wkt")).as_deref(), Some("POINT(1 2)"));
        assert!(object_at(&value, &["file"]).is_none());
    }
}
