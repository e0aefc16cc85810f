//! Detail aggregation: one raw record into one flattened mapping.

use std::collections::BTreeMap;

use tracing::{debug, error};

use heurist_model::{
    CanonicalType, FieldSpec, FlatValue, FlattenedRecord, IssueKind, RawDetail, RawRecord,
    RecordIssue, RecordTypeSchema,
};

use crate::convert::{convert, convert_term_id};
use crate::error::ConversionError;
use crate::temporal::build_temporal_object;

/// A flattened record plus the schema violations recovered while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct FlattenOutcome {
    pub record: FlattenedRecord,
    /// One entry per singular field that was skipped for carrying several
    /// values.
    pub violations: Vec<RecordIssue>,
}

/// Key used for details whose field is not part of the schema.
pub fn unknown_field_key(field_id: i64) -> String {
    format!("DTY{field_id}")
}

/// Flatten a record's details against its record type schema.
///
/// Details are grouped by field id, keeping their input order within each
/// group. A singular field with more than one detail is skipped and
/// reported; every other field still flattens. A malformed nested value
/// fails the whole record.
pub fn flatten(
    record: &RawRecord,
    schema: &RecordTypeSchema,
) -> Result<FlattenOutcome, ConversionError> {
    let mut groups: BTreeMap<i64, Vec<&RawDetail>> = BTreeMap::new();
    for detail in &record.details {
        groups.entry(detail.field_id).or_default().push(detail);
    }

    let mut flat = FlattenedRecord::new(record.id, record.record_type_id);
    let mut violations = Vec::new();

    for (field_id, details) in groups {
        let Some(field) = schema.field(field_id) else {
            debug!(
                record_id = record.id,
                field_id,
                count = details.len(),
                "detail has no field in the record type schema"
            );
            flatten_unknown(&mut flat, field_id, &details);
            continue;
        };

        if !field.repeatable && details.len() > 1 {
            error!(
                record_id = record.id,
                field_id,
                field = %field.column_name,
                count = details.len(),
                "singular field received multiple values; skipping it"
            );
            violations.push(
                RecordIssue::new(
                    record.id,
                    IssueKind::SchemaViolation,
                    format!(
                        "singular field '{}' received {} values",
                        field.column_name,
                        details.len()
                    ),
                )
                .with_field(field.column_name.clone()),
            );
            continue;
        }

        flatten_field(&mut flat, field, &details)?;
    }

    Ok(FlattenOutcome {
        record: flat,
        violations,
    })
}

fn flatten_field(
    flat: &mut FlattenedRecord,
    field: &FieldSpec,
    details: &[&RawDetail],
) -> Result<(), ConversionError> {
    let values = details
        .iter()
        .map(|detail| convert(detail))
        .collect::<Result<Vec<_>, _>>()?;
    flat.insert(field.column_name.clone(), shape(field, values));

    match field.canonical_type {
        CanonicalType::Date => {
            let temporals: Vec<FlatValue> = details
                .iter()
                .filter_map(|detail| detail.value.compound_date())
                .map(|compound| FlatValue::from(build_temporal_object(compound)))
                .collect();
            // No compound value at all: the companion key stays absent.
            if !temporals.is_empty()
                && let Some(key) = field.temporal_key()
            {
                flat.insert(key, shape(field, temporals));
            }
        }
        CanonicalType::EnumTerm => {
            let term_ids = details
                .iter()
                .map(|detail| convert_term_id(detail))
                .collect::<Result<Vec<_>, _>>()?;
            if let Some(key) = field.term_key() {
                flat.insert(key, shape(field, term_ids));
            }
        }
        _ => {}
    }
    Ok(())
}

/// Repeatable fields hold a list, even of one; singular fields the value.
fn shape(field: &FieldSpec, mut values: Vec<FlatValue>) -> FlatValue {
    if field.repeatable || values.len() != 1 {
        FlatValue::List(values)
    } else {
        values.pop().unwrap_or(FlatValue::Null)
    }
}

fn flatten_unknown(flat: &mut FlattenedRecord, field_id: i64, details: &[&RawDetail]) {
    let mut values = Vec::with_capacity(details.len());
    for detail in details {
        match convert(detail) {
            Ok(value) => values.push(value),
            Err(err) => {
                debug!(field_id, error = %err, "dropping unconvertible unknown detail");
                return;
            }
        }
    }
    let value = if values.len() == 1 {
        values.pop().unwrap_or(FlatValue::Null)
    } else {
        FlatValue::List(values)
    };
    flat.insert(unknown_field_key(field_id), value);
}
