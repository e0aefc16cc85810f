//! Structural metadata parsing.
//!
//! The structure document is an array of record types, each listing its
//! fields in display order:
//!
//! ```json
//! [{"rty_ID": 101, "rty_Name": "Story",
//!   "fields": [{"dty_ID": 1, "rst_DisplayName": "title",
//!               "dty_Type": "freetext", "rst_MaxValues": 1}]}]
//! ```
//!
//! Layout-only entries (`separator`, `relmarker`) are dropped here so the
//! schema builder only ever sees data-bearing fields.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use heurist_model::{FieldMetadata, FieldType, RecordTypeMetadata};

use crate::error::{IngestError, Result};
use crate::json::{as_integer, as_text, required_integer};

const DOCUMENT: &str = "structure";

/// Read and parse a structure file.
pub fn load_structure(path: &Path) -> Result<Vec<RecordTypeMetadata>> {
    let text = std::fs::read_to_string(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_structure_str(&text)
}

pub fn parse_structure_str(text: &str) -> Result<Vec<RecordTypeMetadata>> {
    let value: Value = serde_json::from_str(text).map_err(|source| IngestError::JsonParse {
        document: DOCUMENT,
        source,
    })?;
    parse_structure(&value)
}

pub fn parse_structure(value: &Value) -> Result<Vec<RecordTypeMetadata>> {
    let entries = value
        .as_array()
        .ok_or_else(|| IngestError::MalformedDocument {
            document: DOCUMENT,
            reason: "expected an array of record types".to_string(),
        })?;
    entries.iter().map(parse_record_type).collect()
}

fn parse_record_type(entry: &Value) -> Result<RecordTypeMetadata> {
    let object = entry
        .as_object()
        .ok_or_else(|| IngestError::MalformedDocument {
            document: DOCUMENT,
            reason: format!("record type entry is not an object: {entry}"),
        })?;
    let record_type_id = required_integer(object, "rty_ID", "record type")?;
    let context = format!("record type {record_type_id}");
    let record_type_name = as_text(object.get("rty_Name")).unwrap_or_default();

    let mut fields = Vec::new();
    for field in object
        .get("fields")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
    {
        if let Some(parsed) = parse_field(field, &context)? {
            fields.push(parsed);
        }
    }

    Ok(RecordTypeMetadata {
        record_type_id,
        record_type_name,
        fields,
    })
}

fn parse_field(entry: &Value, context: &str) -> Result<Option<FieldMetadata>> {
    let object = entry
        .as_object()
        .ok_or_else(|| IngestError::MalformedDocument {
            document: DOCUMENT,
            reason: format!("field entry in {context} is not an object"),
        })?;
    let field_id = required_integer(object, "dty_ID", context)?;
    let tag = as_text(object.get("dty_Type")).ok_or_else(|| IngestError::MissingKey {
        key: "dty_Type",
        context: format!("{context}, field {field_id}"),
    })?;
    let field_type: FieldType = tag.parse().map_err(|_| IngestError::UnknownFieldType {
        tag: tag.clone(),
        context: format!("{context}, field {field_id}"),
    })?;
    if field_type.is_structural() {
        debug!(field_id, field_type = %field_type, "skipping structural field");
        return Ok(None);
    }

    let display_name = as_text(object.get("rst_DisplayName"))
        .or_else(|| as_text(object.get("dty_Name")))
        .unwrap_or_default();
    let max_values = match object.get("rst_MaxValues") {
        None | Some(Value::Null) => 1,
        Some(value) => as_integer(value).ok_or_else(|| IngestError::InvalidInteger {
            key: "rst_MaxValues",
            value: value.to_string(),
            context: format!("{context}, field {field_id}"),
        })?,
    };

    Ok(Some(FieldMetadata {
        field_id,
        display_name,
        field_type,
        max_values,
    }))
}
