//! Compound date checks for strict validation.
//!
//! A date field with values but no temporal object, because none of its
//! values was entered as a compound date object, keeps its earliest/latest
//! pair and the record is flagged. A repeatable field with at least one
//! compound value passes.

use tracing::warn;

use heurist_model::{
    CanonicalType, FlatValue, FlattenedRecord, IssueKind, RecordIssue, RecordTypeSchema,
};

/// Flag date fields that have values but no temporal object.
pub fn check(flat: &FlattenedRecord, schema: &RecordTypeSchema) -> Vec<RecordIssue> {
    let mut issues = Vec::new();

    for field in &schema.fields {
        if field.canonical_type != CanonicalType::Date {
            continue;
        }
        let values = count_present(flat.get(&field.column_name));
        if values == 0 {
            continue;
        }
        let temporals = field
            .temporal_key()
            .map_or(0, |key| count_present(flat.get(&key)));
        if temporals > 0 {
            continue;
        }

        warn!(
            record_id = flat.record_id,
            field_id = field.field_id,
            field = %field.column_name,
            values,
            "date not entered as a compound date object"
        );
        issues.push(
            RecordIssue::new(
                flat.record_id,
                IssueKind::DateShapeMismatch,
                format!(
                    "no value of '{}' entered as a compound date object ({} value(s))",
                    field.column_name, values
                ),
            )
            .with_field(field.column_name.clone()),
        );
    }

    issues
}

fn count_present(value: Option<&FlatValue>) -> usize {
    match value {
        None | Some(FlatValue::Null) | Some(FlatValue::DatePair(None)) => 0,
        Some(FlatValue::List(items)) => items
            .iter()
            .filter(|item| count_present(Some(item)) > 0)
            .count(),
        Some(_) => 1,
    }
}
