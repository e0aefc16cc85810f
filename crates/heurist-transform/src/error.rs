//! Error types for conversion and schema building.

use thiserror::Error;

/// A detail value whose nested structure could not be converted.
///
/// Fails the record it belongs to, never the batch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("field {field_id}: record pointer is missing its target id")]
    MissingPointerId { field_id: i64 },

    #[error("field {field_id}: vocabulary term has no label")]
    MissingTermLabel { field_id: i64 },

    #[error("field {field_id}: invalid vocabulary term id '{value}'")]
    InvalidTermId { field_id: i64, value: String },

    #[error("field {field_id}: malformed compound date: {reason}")]
    MalformedCompoundDate { field_id: i64, reason: String },
}

impl ConversionError {
    pub fn field_id(&self) -> i64 {
        match self {
            Self::MissingPointerId { field_id }
            | Self::MissingTermLabel { field_id }
            | Self::InvalidTermId { field_id, .. }
            | Self::MalformedCompoundDate { field_id, .. } => *field_id,
        }
    }
}

/// Structural metadata from which no schema can be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    #[error("record type {record_type_id} ({name}) has no data fields")]
    NoFields { record_type_id: i64, name: String },

    #[error("record type {record_type_id}, field {field_id}: invalid multiplicity {max_values}")]
    InvalidMultiplicity {
        record_type_id: i64,
        field_id: i64,
        max_values: i64,
    },

    #[error("record type {record_type_id} lists field {field_id} more than once")]
    DuplicateField { record_type_id: i64, field_id: i64 },
}
