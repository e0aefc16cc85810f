//! Record validation against a record type schema.
//!
//! Every schema column ends up in the validated row: present values are
//! shaped and coerced, missing ones take the column default (`[]` for
//! repeatable columns, null otherwise). Keys the schema does not know are
//! dropped. Note the asymmetry this creates for date companions: flattening
//! omits `_TEMPORAL` when no compound value existed, and validation then
//! restores it as null (or `[]`).

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use heurist_model::{
    ColumnSpec, FlattenedRecord, ProcessingOptions, RecordTypeSchema, ValidatedRow,
};

use crate::checks;
use crate::error::ValidationFailure;

/// Validates flattened records of one record type.
///
/// The schema's column layout is resolved once, so one validator should be
/// reused for a whole batch.
#[derive(Debug, Clone)]
pub struct RecordValidator<'a> {
    schema: &'a RecordTypeSchema,
    columns: Vec<ColumnSpec<'a>>,
    keys: HashSet<String>,
    options: ProcessingOptions,
}

impl<'a> RecordValidator<'a> {
    pub fn new(schema: &'a RecordTypeSchema, options: ProcessingOptions) -> Self {
        let columns = schema.columns();
        let keys = columns.iter().map(|column| column.key.clone()).collect();
        Self {
            schema,
            columns,
            keys,
            options,
        }
    }

    pub fn schema(&self) -> &RecordTypeSchema {
        self.schema
    }

    /// Validate one record.
    ///
    /// Shape and type problems fail the record. Under
    /// [`DateStrictness::RequireCompound`] date fields without compound
    /// values are flagged on the row instead.
    ///
    /// [`DateStrictness::RequireCompound`]: heurist_model::DateStrictness::RequireCompound
    pub fn validate(&self, flat: &FlattenedRecord) -> Result<ValidatedRow, ValidationFailure> {
        let mut values = BTreeMap::new();
        let mut problems = Vec::new();

        for column in &self.columns {
            let value = match flat.get(&column.key) {
                None => checks::default_value(column),
                Some(value) => match checks::conform(column, value.clone()) {
                    Ok(value) => value,
                    Err(mut column_problems) => {
                        problems.append(&mut column_problems);
                        continue;
                    }
                },
            };
            values.insert(column.key.clone(), value);
        }

        for key in flat.values.keys() {
            if !self.keys.contains(key) {
                debug!(
                    record_id = flat.record_id,
                    key = %key,
                    "dropping key absent from record type schema"
                );
            }
        }

        if !problems.is_empty() {
            return Err(ValidationFailure {
                record_id: flat.record_id,
                problems,
            });
        }

        let flags = if self.options.requires_compound_dates() {
            checks::dates::check(flat, self.schema)
        } else {
            Vec::new()
        };

        Ok(ValidatedRow {
            record_id: flat.record_id,
            record_type_id: flat.record_type_id,
            values,
            flags,
        })
    }
}

/// Validate one record with the given options.
pub fn validate(
    flat: &FlattenedRecord,
    schema: &RecordTypeSchema,
    options: &ProcessingOptions,
) -> Result<ValidatedRow, ValidationFailure> {
    RecordValidator::new(schema, options.clone()).validate(flat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use heurist_model::{FieldSpec, FieldType, FlatValue};

    fn schema() -> RecordTypeSchema {
        let field = |field_id, name: &str, field_type: FieldType| FieldSpec {
            field_id,
            display_name: name.to_string(),
            column_name: name.to_string(),
            field_type,
            canonical_type: field_type.canonical_type().unwrap(),
            max_values: 1,
            repeatable: false,
        };
        RecordTypeSchema {
            record_type_id: 101,
            record_type_name: "Story".to_string(),
            table_name: "Story".to_string(),
            fields: vec![
                field(1244, "title", FieldType::Freetext),
                field(1111, "written", FieldType::Date),
                field(1090, "language", FieldType::Enum),
            ],
        }
    }

    #[test]
    fn column_keys_are_resolved_once() {
        let schema = schema();
        let validator = RecordValidator::new(&schema, ProcessingOptions::new());
        let expected: Vec<String> = schema.columns().into_iter().map(|column| column.key).collect();
        let resolved: Vec<String> = validator.columns.iter().map(|column| column.key.clone()).collect();
        assert_eq!(resolved, expected);
        assert_eq!(validator.keys.len(), 5);
        assert!(validator.keys.contains("written_TEMPORAL"));
        assert!(validator.keys.contains("language_TRM"));
    }

    #[test]
    fn one_validator_serves_many_records() {
        let schema = schema();
        let validator = RecordValidator::new(&schema, ProcessingOptions::new());
        for id in 1..=3 {
            let mut flat = FlattenedRecord::new(id, 101);
            flat.insert("title", FlatValue::Text(format!("story {id}")));
            flat.insert("DTY9999", FlatValue::Integer(id));
            let row = validator.validate(&flat).expect("valid");
            assert_eq!(row.record_id, id);
            assert_eq!(row.values.len(), 5);
            assert!(row.get("DTY9999").is_none());
        }
    }
}
