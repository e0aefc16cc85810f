//! Tabular export of validated rows.
//!
//! Columns follow the schema order, after the two universal keys. Singular
//! scalar columns get a native dtype; date pairs, temporal objects and
//! repeatable columns are serialized to JSON text.

use polars::prelude::{Column, DataFrame, NamedFrom, PolarsResult, Series};

use heurist_model::{
    CanonicalType, ColumnRole, ColumnSpec, FlatValue, RECORD_ID_KEY, RECORD_TYPE_ID_KEY,
    RecordTypeSchema, ValidatedRow,
};

/// How a schema column is laid out in the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameType {
    String,
    Float64,
    Boolean,
    Int64,
    Json,
}

fn frame_type(column: &ColumnSpec<'_>) -> FrameType {
    if column.repeatable() {
        return FrameType::Json;
    }
    match column.role {
        ColumnRole::Temporal => FrameType::Json,
        ColumnRole::Term => FrameType::Int64,
        ColumnRole::Value => match column.field.canonical_type {
            CanonicalType::Text | CanonicalType::EnumTerm | CanonicalType::Geo | CanonicalType::File => {
                FrameType::String
            }
            CanonicalType::Number => FrameType::Float64,
            CanonicalType::Boolean => FrameType::Boolean,
            CanonicalType::Pointer => FrameType::Int64,
            CanonicalType::Date => FrameType::Json,
        },
    }
}

/// Build a DataFrame holding `rows` in the column layout of `schema`.
pub fn rows_to_frame(schema: &RecordTypeSchema, rows: &[ValidatedRow]) -> PolarsResult<DataFrame> {
    let schema_columns = schema.columns();
    let mut columns: Vec<Column> = Vec::with_capacity(schema_columns.len() + 2);

    let ids: Vec<i64> = rows.iter().map(|row| row.record_id).collect();
    columns.push(Series::new(RECORD_ID_KEY.into(), ids).into());
    let type_ids: Vec<i64> = rows.iter().map(|row| row.record_type_id).collect();
    columns.push(Series::new(RECORD_TYPE_ID_KEY.into(), type_ids).into());

    for column in &schema_columns {
        let name = column.key.as_str().into();
        let cells = rows.iter().map(|row| row.get(&column.key));
        let series = match frame_type(column) {
            FrameType::String => {
                let values: Vec<Option<String>> = cells.map(|v| v.and_then(as_string)).collect();
                Series::new(name, values)
            }
            FrameType::Float64 => {
                let values: Vec<Option<f64>> = cells.map(|v| v.and_then(as_f64)).collect();
                Series::new(name, values)
            }
            FrameType::Boolean => {
                let values: Vec<Option<bool>> = cells.map(|v| v.and_then(as_bool)).collect();
                Series::new(name, values)
            }
            FrameType::Int64 => {
                let values: Vec<Option<i64>> = cells.map(|v| v.and_then(as_i64)).collect();
                Series::new(name, values)
            }
            FrameType::Json => {
                let values: Vec<Option<String>> = cells.map(|v| v.and_then(as_json)).collect();
                Series::new(name, values)
            }
        };
        columns.push(series.into());
    }

    DataFrame::new(columns)
}

fn as_string(value: &FlatValue) -> Option<String> {
    match value {
        FlatValue::Text(text) => Some(text.clone()),
        FlatValue::Integer(v) => Some(v.to_string()),
        FlatValue::Float(v) => Some(v.to_string()),
        FlatValue::Boolean(v) => Some(v.to_string()),
        _ => None,
    }
}

fn as_f64(value: &FlatValue) -> Option<f64> {
    match value {
        FlatValue::Float(v) => Some(*v),
        FlatValue::Integer(v) => Some(*v as f64),
        _ => None,
    }
}

fn as_bool(value: &FlatValue) -> Option<bool> {
    match value {
        FlatValue::Boolean(v) => Some(*v),
        _ => None,
    }
}

fn as_i64(value: &FlatValue) -> Option<i64> {
    match value {
        FlatValue::Integer(v) => Some(*v),
        _ => None,
    }
}

fn as_json(value: &FlatValue) -> Option<String> {
    if value.is_null() {
        return None;
    }
    serde_json::to_string(value).ok()
}
