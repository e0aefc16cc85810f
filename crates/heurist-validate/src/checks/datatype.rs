//! Per-column type coercion.
//!
//! Values are coerced towards the column's declared type where the
//! conversion is lossless (numeric text, `0`/`1` booleans, integral pointer
//! ids). Anything else is a type mismatch.

use heurist_model::{CanonicalType, ColumnRole, ColumnSpec, FlatValue, integral_float};

use crate::error::FieldProblem;

/// Coerce one element (not a list) of a column.
pub fn coerce(column: &ColumnSpec<'_>, value: FlatValue) -> Result<FlatValue, FieldProblem> {
    if value.is_null() {
        return Ok(value);
    }
    let coerced = match column.role {
        ColumnRole::Temporal => matches!(value, FlatValue::Temporal(_)).then(|| value.clone()),
        ColumnRole::Term => as_integer(&value).map(FlatValue::Integer),
        ColumnRole::Value => coerce_value(column.field.canonical_type, &value),
    };
    coerced.ok_or_else(|| FieldProblem::TypeMismatch {
        key: column.key.clone(),
        expected: expected_name(column),
        found: describe(&value),
    })
}

fn coerce_value(canonical_type: CanonicalType, value: &FlatValue) -> Option<FlatValue> {
    match canonical_type {
        CanonicalType::Text | CanonicalType::EnumTerm | CanonicalType::Geo | CanonicalType::File => {
            match value {
                FlatValue::Text(_) => Some(value.clone()),
                FlatValue::Integer(v) => Some(FlatValue::Text(v.to_string())),
                FlatValue::Float(v) => Some(FlatValue::Text(v.to_string())),
                FlatValue::Boolean(v) => Some(FlatValue::Text(v.to_string())),
                _ => None,
            }
        }
        CanonicalType::Number => match value {
            FlatValue::Integer(_) | FlatValue::Float(_) => Some(value.clone()),
            FlatValue::Text(text) => text.trim().parse::<f64>().ok().map(FlatValue::Float),
            _ => None,
        },
        CanonicalType::Boolean => match value {
            FlatValue::Boolean(_) => Some(value.clone()),
            FlatValue::Integer(0) => Some(FlatValue::Boolean(false)),
            FlatValue::Integer(1) => Some(FlatValue::Boolean(true)),
            FlatValue::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Some(FlatValue::Boolean(true)),
                "false" | "no" | "0" => Some(FlatValue::Boolean(false)),
                _ => None,
            },
            _ => None,
        },
        CanonicalType::Pointer => as_integer(value).map(FlatValue::Integer),
        CanonicalType::Date => match value {
            FlatValue::DatePair(_) => Some(value.clone()),
            _ => None,
        },
    }
}

fn as_integer(value: &FlatValue) -> Option<i64> {
    match value {
        FlatValue::Integer(v) => Some(*v),
        FlatValue::Float(v) => integral_float(*v),
        FlatValue::Text(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn expected_name(column: &ColumnSpec<'_>) -> &'static str {
    match column.role {
        ColumnRole::Temporal => "temporal object",
        ColumnRole::Term => "term id",
        ColumnRole::Value => column.field.canonical_type.as_str(),
    }
}

fn describe(value: &FlatValue) -> String {
    match value {
        FlatValue::Text(text) => format!("text {text:?}"),
        FlatValue::Integer(v) => format!("integer {v}"),
        FlatValue::Float(v) => format!("float {v}"),
        FlatValue::Boolean(v) => format!("boolean {v}"),
        other => other.kind().to_string(),
    }
}
