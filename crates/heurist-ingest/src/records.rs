//! Record export parsing.
//!
//! Each detail's `value` is decoded once, from its `fieldType` tag, into the
//! closed [`DetailValue`] union. Missing nested keys are kept as `None`;
//! deciding whether that is fatal for the record is left to conversion.
//!
//! Only document-level problems (unreadable file, invalid JSON, wrong
//! envelope) fail a load. A record entry that cannot be parsed is rejected on
//! its own, and a detail with an unknown or missing `fieldType` is skipped.

use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use heurist_model::{
    DetailValue, FieldType, RawCompoundDate, RawDate, RawDateLimit, RawDetail, RawRecord,
    RawTimestamp,
};

use crate::error::{IngestError, Result};
use crate::json::{
    as_flag, as_integer, as_partial_date, as_scalar, as_text, object_at, required_integer,
};

const DOCUMENT: &str = "records";

/// A record entry that could not be parsed.
#[derive(Debug)]
pub struct RejectedRecord {
    /// Position of the entry in the records array.
    pub index: usize,
    /// The entry's `rec_ID`, when it could be read.
    pub record_id: Option<i64>,
    pub error: IngestError,
}

/// Records parsed from one document, plus the entries that were rejected.
#[derive(Debug, Default)]
pub struct RecordSet {
    pub records: Vec<RawRecord>,
    pub rejected: Vec<RejectedRecord>,
}

impl RecordSet {
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }
}

/// Read and parse a records file.
pub fn load_records(path: &Path) -> Result<RecordSet> {
    let text = std::fs::read_to_string(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_records_str(&text)
}

pub fn parse_records_str(text: &str) -> Result<RecordSet> {
    let value: Value = serde_json::from_str(text).map_err(|source| IngestError::JsonParse {
        document: DOCUMENT,
        source,
    })?;
    parse_records(&value)
}

/// Parse `{"heurist": {"records": [...]}}` or a bare array of records.
///
/// Entries that fail to parse are logged and collected in
/// [`RecordSet::rejected`]; the remaining records still load.
pub fn parse_records(value: &Value) -> Result<RecordSet> {
    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(_) => value
            .get("heurist")
            .and_then(|heurist| heurist.get("records"))
            .and_then(Value::as_array)
            .ok_or_else(|| IngestError::MalformedDocument {
                document: DOCUMENT,
                reason: "expected {\"heurist\": {\"records\": [...]}}".to_string(),
            })?,
        other => {
            return Err(IngestError::MalformedDocument {
                document: DOCUMENT,
                reason: format!("expected an object or array, found {}", json_kind(other)),
            });
        }
    };

    let mut set = RecordSet::default();
    for (index, entry) in entries.iter().enumerate() {
        match parse_record(entry) {
            Ok(record) => set.records.push(record),
            Err(error) => {
                let record_id = entry.get("rec_ID").and_then(as_integer);
                warn!(index, ?record_id, %error, "skipping unparseable record");
                set.rejected.push(RejectedRecord {
                    index,
                    record_id,
                    error,
                });
            }
        }
    }
    Ok(set)
}

/// Parse one record object.
pub fn parse_record(entry: &Value) -> Result<RawRecord> {
    let object = entry
        .as_object()
        .ok_or_else(|| IngestError::MalformedDocument {
            document: DOCUMENT,
            reason: format!("record entry is not an object: {}", json_kind(entry)),
        })?;
    let id = required_integer(object, "rec_ID", "record")?;
    let context = format!("record {id}");
    let record_type_id = required_integer(object, "rec_RecTypeID", &context)?;

    let mut details = Vec::new();
    for detail in object
        .get("details")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
    {
        if let Some(parsed) = parse_detail(detail, &context)? {
            details.push(parsed);
        }
    }

    Ok(RawRecord {
        id,
        record_type_id,
        details,
    })
}

fn parse_detail(entry: &Value, context: &str) -> Result<Option<RawDetail>> {
    let object = entry
        .as_object()
        .ok_or_else(|| IngestError::MalformedDocument {
            document: DOCUMENT,
            reason: format!("detail entry in {context} is not an object"),
        })?;
    let field_id = required_integer(object, "dty_ID", context)?;
    let tag = as_text(object.get("fieldType"));
    let Some(field_type) = tag.as_deref().and_then(|tag| tag.parse::<FieldType>().ok()) else {
        warn!(
            context,
            field_id,
            tag = ?tag,
            "skipping detail with unknown field type"
        );
        return Ok(None);
    };

    let Some(value) = detail_value(field_type, object) else {
        debug!(field_id, field_type = %field_type, "skipping structural detail");
        return Ok(None);
    };

    Ok(Some(RawDetail {
        field_id,
        field_type,
        field_name: as_text(object.get("fieldName")),
        value,
    }))
}

fn detail_value(field_type: FieldType, detail: &Map<String, Value>) -> Option<DetailValue> {
    let raw = detail.get("value");
    let value = match field_type {
        FieldType::Freetext | FieldType::Blocktext => DetailValue::Text(as_scalar(raw)),
        FieldType::Integer | FieldType::Float => DetailValue::Number(as_scalar(raw)),
        FieldType::Boolean => DetailValue::Boolean(as_scalar(raw)),
        FieldType::Enum => DetailValue::EnumTerm {
            term_id: as_text(raw),
            label: as_text(detail.get("termLabel")),
        },
        FieldType::Resource => DetailValue::Pointer {
            target_id: raw.and_then(|value| as_text(value.get("id"))),
        },
        FieldType::Geo => {
            let geo = raw.and_then(|value| object_at(value, &["geo"]));
            DetailValue::Geo {
                kind: geo.and_then(|geo| as_text(geo.get("type"))),
                wkt: geo.and_then(|geo| as_text(geo.get("wkt"))),
            }
        }
        FieldType::File => DetailValue::File {
            external_reference: raw
                .and_then(|value| object_at(value, &["file"]))
                .and_then(|file| as_text(file.get("ulf_ExternalFileReference"))),
        },
        FieldType::Date => DetailValue::Date(raw_date(raw)),
        FieldType::Separator | FieldType::Relmarker => return None,
    };
    Some(value)
}

fn raw_date(value: Option<&Value>) -> RawDate {
    match value {
        Some(Value::Object(object)) => RawDate::Compound(Box::new(compound_date(object))),
        Some(Value::Number(_)) | Some(Value::String(_)) => {
            as_partial_date(value).map_or(RawDate::Malformed, RawDate::Partial)
        }
        _ => RawDate::Malformed,
    }
}

fn compound_date(object: &Map<String, Value>) -> RawCompoundDate {
    RawCompoundDate {
        start: object
            .get("start")
            .and_then(Value::as_object)
            .map(date_limit),
        end: object.get("end").and_then(Value::as_object).map(date_limit),
        profile: as_text(object.get("profile")),
        determination: as_text(object.get("determination")),
        est_min_date: as_partial_date(object.get("estMinDate")),
        est_max_date: as_partial_date(object.get("estMaxDate")),
        timestamp: object
            .get("timestamp")
            .and_then(Value::as_object)
            .map(|timestamp| RawTimestamp {
                in_year: as_partial_date(timestamp.get("in")),
                type_time: as_text(timestamp.get("type")),
                circa: as_flag(timestamp.get("circa")),
            }),
    }
}

fn date_limit(object: &Map<String, Value>) -> RawDateLimit {
    RawDateLimit {
        earliest: as_partial_date(object.get("earliest")),
        latest: as_partial_date(object.get("latest")),
        profile: as_text(object.get("profile")),
        determination: as_text(object.get("determination")),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
