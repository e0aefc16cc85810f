//! Structural metadata as supplied for schema building.

use serde::{Deserialize, Serialize};

use crate::field::FieldType;

/// One field entry of a record type's structure (`rst_*` / `dty_*` columns).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMetadata {
    pub field_id: i64,
    pub display_name: String,
    pub field_type: FieldType,
    /// `rst_MaxValues`: 0 is unbounded. Negative values are rejected when
    /// the schema is built.
    pub max_values: i64,
}

/// A record type and its data-bearing fields, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordTypeMetadata {
    pub record_type_id: i64,
    pub record_type_name: String,
    pub fields: Vec<FieldMetadata>,
}
