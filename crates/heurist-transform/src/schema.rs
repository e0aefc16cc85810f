//! Per-record-type schema building from structural metadata.

use std::collections::HashSet;

use tracing::debug;

use heurist_model::{
    CanonicalType, FieldMetadata, FieldSpec, RECORD_ID_KEY, RECORD_TYPE_ID_KEY,
    RecordTypeMetadata, RecordTypeSchema, TEMPORAL_SUFFIX, TERM_SUFFIX,
};

use crate::error::StructureError;
use crate::naming::{NameRegistry, column_name, table_name};

/// Builds record type schemas for one run.
///
/// Table names are unique across every schema built by the same builder.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    tables: NameRegistry,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build_from(
        &mut self,
        metadata: &RecordTypeMetadata,
    ) -> Result<RecordTypeSchema, StructureError> {
        self.build(
            metadata.record_type_id,
            &metadata.record_type_name,
            &metadata.fields,
        )
    }

    /// Build the schema of one record type.
    ///
    /// Fields keep their metadata order. A field with `max_values == 0` is
    /// repeatable. Date and enum fields reserve their `_TEMPORAL` / `_TRM`
    /// companion keys alongside the field's own column name.
    pub fn build(
        &mut self,
        record_type_id: i64,
        record_type_name: &str,
        field_metadata: &[FieldMetadata],
    ) -> Result<RecordTypeSchema, StructureError> {
        let mut columns = NameRegistry::with_reserved([RECORD_ID_KEY, RECORD_TYPE_ID_KEY]);
        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(field_metadata.len());

        for metadata in field_metadata {
            let Some(canonical_type) = metadata.field_type.canonical_type() else {
                debug!(
                    record_type_id,
                    field_id = metadata.field_id,
                    field_type = %metadata.field_type,
                    "ignoring structural field"
                );
                continue;
            };
            if !seen.insert(metadata.field_id) {
                return Err(StructureError::DuplicateField {
                    record_type_id,
                    field_id: metadata.field_id,
                });
            }
            let max_values = u32::try_from(metadata.max_values).map_err(|_| {
                StructureError::InvalidMultiplicity {
                    record_type_id,
                    field_id: metadata.field_id,
                    max_values: metadata.max_values,
                }
            })?;

            let base = column_name(&metadata.display_name, metadata.field_id);
            let column_name = columns.claim_with_suffixes(&base, companion_suffixes(canonical_type));

            fields.push(FieldSpec {
                field_id: metadata.field_id,
                display_name: metadata.display_name.clone(),
                column_name,
                field_type: metadata.field_type,
                canonical_type,
                max_values,
                repeatable: max_values == 0,
            });
        }

        if fields.is_empty() {
            return Err(StructureError::NoFields {
                record_type_id,
                name: record_type_name.to_string(),
            });
        }

        let table_name = self.tables.claim(&table_name(record_type_name));
        debug!(
            record_type_id,
            table = %table_name,
            fields = fields.len(),
            "built record type schema"
        );

        Ok(RecordTypeSchema {
            record_type_id,
            record_type_name: record_type_name.to_string(),
            table_name,
            fields,
        })
    }
}

fn companion_suffixes(canonical_type: CanonicalType) -> &'static [&'static str] {
    if canonical_type.has_temporal_companion() {
        &[TEMPORAL_SUFFIX]
    } else if canonical_type.has_term_companion() {
        &[TERM_SUFFIX]
    } else {
        &[]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heurist_model::FieldType;

    fn meta(id: i64, name: &str, field_type: FieldType, max_values: i64) -> FieldMetadata {
        FieldMetadata {
            field_id: id,
            display_name: name.to_string(),
            field_type,
            max_values,
        }
    }

    #[test]
    fn builds_fields_in_order() {
        let mut builder = SchemaBuilder::new();
        let schema = builder
            .build(
                101,
                "Story",
                &[
                    meta(1244, "preferred_name", FieldType::Freetext, 1),
                    meta(1111, "date / time", FieldType::Date, 1),
                    meta(1090, "language", FieldType::Enum, 0),
                ],
            )
            .unwrap();
        assert_eq!(schema.table_name, "Story");
        let names: Vec<&str> = schema
            .fields
            .iter()
            .map(|f| f.column_name.as_str())
            .collect();
        assert_eq!(names, vec!["preferred_name", "date_time", "language"]);
        assert!(!schema.fields[0].repeatable);
        assert!(schema.fields[2].repeatable);
        assert_eq!(
            schema.fields[1].temporal_key().as_deref(),
            Some("date_time_TEMPORAL")
        );
    }

    #[test]
    fn column_collisions_are_suffixed() {
        let mut builder = SchemaBuilder::new();
        let schema = builder
            .build(
                5,
                "Place",
                &[
                    meta(1, "name", FieldType::Freetext, 1),
                    meta(2, "Name", FieldType::Blocktext, 1),
                    meta(3, "date TEMPORAL", FieldType::Freetext, 1),
                    meta(4, "date", FieldType::Date, 1),
                    meta(5, "rec ID", FieldType::Integer, 1),
                ],
            )
            .unwrap();
        let names: Vec<&str> = schema
            .fields
            .iter()
            .map(|f| f.column_name.as_str())
            .collect();
        assert_eq!(names, vec!["name", "Name_2", "date_TEMPORAL", "date_2", "rec_ID_2"]);
    }

    #[test]
    fn table_collisions_across_record_types() {
        let mut builder = SchemaBuilder::new();
        let fields = [meta(1, "name", FieldType::Freetext, 1)];
        let first = builder.build(1, "test record", &fields).unwrap();
        let second = builder.build(2, "Test-Record", &fields).unwrap();
        assert_eq!(first.table_name, "TestRecord");
        assert_eq!(second.table_name, "TestRecord_2");
    }

    #[test]
    fn structure_errors() {
        let mut builder = SchemaBuilder::new();
        assert!(matches!(
            builder.build(9, "Empty", &[]),
            Err(StructureError::NoFields { record_type_id: 9, .. })
        ));
        assert!(matches!(
            builder.build(9, "Layout", &[meta(1, "Section", FieldType::Separator, 1)]),
            Err(StructureError::NoFields { .. })
        ));
        assert!(matches!(
            builder.build(9, "Bad", &[meta(1, "x", FieldType::Freetext, -1)]),
            Err(StructureError::InvalidMultiplicity { max_values: -1, .. })
        ));
        assert!(matches!(
            builder.build(
                9,
                "Twice",
                &[
                    meta(1, "x", FieldType::Freetext, 1),
                    meta(1, "y", FieldType::Freetext, 1)
                ]
            ),
            Err(StructureError::DuplicateField { field_id: 1, .. })
        ));
    }
}
