use serde::{Deserialize, Serialize};

use crate::field::{CanonicalType, FieldType};

/// Universal key holding the record's Heurist id.
pub const RECORD_ID_KEY: &str = "rec_ID";
/// Universal key holding the record's record-type id.
pub const RECORD_TYPE_ID_KEY: &str = "rec_RecTypeID";
/// Suffix of a date field's structured-date companion column.
pub const TEMPORAL_SUFFIX: &str = "_TEMPORAL";
/// Suffix of an enum field's vocabulary-term-id companion column.
pub const TERM_SUFFIX: &str = "_TRM";

/// One field (detail type) of a record type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Heurist detail type id (`dty_ID`).
    pub field_id: i64,
    /// Name shown in Heurist (`rst_DisplayName`).
    pub display_name: String,
    /// SQL-safe, collision-free key used in flattened records and tables.
    pub column_name: String,
    pub field_type: FieldType,
    pub canonical_type: CanonicalType,
    /// Declared multiplicity (`rst_MaxValues`); 0 means unbounded.
    pub max_values: u32,
    pub repeatable: bool,
}

impl FieldSpec {
    /// Key of the `_TEMPORAL` companion, for date fields.
    pub fn temporal_key(&self) -> Option<String> {
        self.canonical_type
            .has_temporal_companion()
            .then(|| format!("{}{}", self.column_name, TEMPORAL_SUFFIX))
    }

    /// Key of the `_TRM` companion, for enum fields.
    pub fn term_key(&self) -> Option<String> {
        self.canonical_type
            .has_term_companion()
            .then(|| format!("{}{}", self.column_name, TERM_SUFFIX))
    }

    /// All column descriptors this field contributes, value column first.
    pub fn columns(&self) -> Vec<ColumnSpec<'_>> {
        let mut columns = vec![ColumnSpec {
            key: self.column_name.clone(),
            field: self,
            role: ColumnRole::Value,
        }];
        if let Some(key) = self.temporal_key() {
            columns.push(ColumnSpec {
                key,
                field: self,
                role: ColumnRole::Temporal,
            });
        }
        if let Some(key) = self.term_key() {
            columns.push(ColumnSpec {
                key,
                field: self,
                role: ColumnRole::Term,
            });
        }
        columns
    }
}

/// What a column holds relative to its owning field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    /// The field's generic (converted) value.
    Value,
    /// Optional structured date object.
    Temporal,
    /// Optional vocabulary term id.
    Term,
}

/// A single column of a record type's table.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec<'a> {
    pub key: String,
    pub field: &'a FieldSpec,
    pub role: ColumnRole,
}

impl ColumnSpec<'_> {
    pub fn repeatable(&self) -> bool {
        self.field.repeatable
    }

    /// Storage type for the column; repeatable columns are arrays.
    pub fn sql_type(&self) -> String {
        let base = match self.role {
            ColumnRole::Value => self.field.canonical_type.sql_type(),
            ColumnRole::Temporal => "JSON",
            ColumnRole::Term => "INTEGER",
        };
        if self.field.repeatable {
            format!("{base}[]")
        } else {
            base.to_string()
        }
    }
}

/// The field schema of one record type, built once per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordTypeSchema {
    pub record_type_id: i64,
    pub record_type_name: String,
    /// Collision-free, SQL-safe table name.
    pub table_name: String,
    pub fields: Vec<FieldSpec>,
}

impl RecordTypeSchema {
    /// Look up a field by its Heurist detail type id.
    pub fn field(&self, field_id: i64) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.field_id == field_id)
    }

    /// Every column in table order: each field's value column followed by
    /// its companions.
    pub fn columns(&self) -> Vec<ColumnSpec<'_>> {
        self.fields.iter().flat_map(FieldSpec::columns).collect()
    }

    /// Find the column owning `key`, whether a value or a companion column.
    pub fn column(&self, key: &str) -> Option<ColumnSpec<'_>> {
        self.columns().into_iter().find(|column| column.key == key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.column(key).is_some()
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(id: i64, name: &str, field_type: FieldType, max_values: u32) -> FieldSpec {
        FieldSpec {
            field_id: id,
            display_name: name.to_string(),
            column_name: name.to_string(),
            field_type,
            canonical_type: field_type.canonical_type().unwrap(),
            max_values,
            repeatable: max_values == 0,
        }
    }

    #[test]
    fn companion_keys_follow_canonical_type() {
        let date = field(1111, "date_of_creation", FieldType::Date, 1);
        assert_eq!(
            date.temporal_key().as_deref(),
            Some("date_of_creation_TEMPORAL")
        );
        assert_eq!(date.term_key(), None);

        let language = field(1090, "language", FieldType::Enum, 0);
        assert_eq!(language.term_key().as_deref(), Some("language_TRM"));
        assert_eq!(language.temporal_key(), None);
    }

    #[test]
    fn columns_are_listed_in_field_order() {
        let schema = RecordTypeSchema {
            record_type_id: 101,
            record_type_name: "Story".to_string(),
            table_name: "Story".to_string(),
            fields: vec![
                field(1, "title", FieldType::Freetext, 1),
                field(1111, "date_of_creation", FieldType::Date, 1),
                field(1090, "language", FieldType::Enum, 0),
            ],
        };
        let keys: Vec<String> = schema.columns().into_iter().map(|c| c.key).collect();
        assert_eq!(
            keys,
            vec![
                "title",
                "date_of_creation",
                "date_of_creation_TEMPORAL",
                "language",
                "language_TRM",
            ]
        );
        assert!(schema.contains_key("language_TRM"));
        assert!(!schema.contains_key("title_TRM"));
    }

    #[test]
    fn repeatable_columns_are_arrays() {
        let language = field(1090, "language", FieldType::Enum, 0);
        let columns = language.columns();
        assert_eq!(columns[0].sql_type(), "TEXT[]");
        assert_eq!(columns[1].sql_type(), "INTEGER[]");
    }
}
