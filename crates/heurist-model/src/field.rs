//! Field type tags and the canonical types they collapse into.
//!
//! Heurist's structural metadata and record exports both carry a `dty_Type` /
//! `fieldType` tag. The tag set is wider than what downstream code needs to
//! distinguish, so every data-bearing tag maps onto one [`CanonicalType`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Raw field type tag as exported by Heurist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Single-line text.
    Freetext,
    /// Multi-line text.
    Blocktext,
    Integer,
    Boolean,
    Float,
    /// Partial, exact or compound (fuzzy) date.
    Date,
    /// Controlled-vocabulary term.
    Enum,
    Geo,
    /// File or media reference.
    File,
    /// Record pointer (foreign key to another record).
    Resource,
    /// Structural-only section header.
    Separator,
    /// Structural-only relationship marker.
    Relmarker,
}

impl FieldType {
    /// Returns the tag as it appears in Heurist exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Freetext => "freetext",
            FieldType::Blocktext => "blocktext",
            FieldType::Integer => "integer",
            FieldType::Boolean => "boolean",
            FieldType::Float => "float",
            FieldType::Date => "date",
            FieldType::Enum => "enum",
            FieldType::Geo => "geo",
            FieldType::File => "file",
            FieldType::Resource => "resource",
            FieldType::Separator => "separator",
            FieldType::Relmarker => "relmarker",
        }
    }

    /// Returns true for tags that describe layout rather than data.
    pub fn is_structural(&self) -> bool {
        matches!(self, FieldType::Separator | FieldType::Relmarker)
    }

    /// Canonical type for data-bearing tags; `None` for structural tags.
    pub fn canonical_type(&self) -> Option<CanonicalType> {
        match self {
            FieldType::Freetext | FieldType::Blocktext => Some(CanonicalType::Text),
            FieldType::Integer | FieldType::Float => Some(CanonicalType::Number),
            FieldType::Boolean => Some(CanonicalType::Boolean),
            FieldType::Date => Some(CanonicalType::Date),
            FieldType::Enum => Some(CanonicalType::EnumTerm),
            FieldType::Geo => Some(CanonicalType::Geo),
            FieldType::File => Some(CanonicalType::File),
            FieldType::Resource => Some(CanonicalType::Pointer),
            FieldType::Separator | FieldType::Relmarker => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "freetext" => Ok(FieldType::Freetext),
            "blocktext" => Ok(FieldType::Blocktext),
            "integer" => Ok(FieldType::Integer),
            "boolean" => Ok(FieldType::Boolean),
            "float" => Ok(FieldType::Float),
            "date" => Ok(FieldType::Date),
            "enum" => Ok(FieldType::Enum),
            "geo" => Ok(FieldType::Geo),
            "file" => Ok(FieldType::File),
            "resource" => Ok(FieldType::Resource),
            "separator" => Ok(FieldType::Separator),
            "relmarker" => Ok(FieldType::Relmarker),
            _ => Err(format!("Unknown field type: {s}")),
        }
    }
}

/// The closed set of value types the engine reasons about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalType {
    Text,
    Number,
    Boolean,
    EnumTerm,
    Pointer,
    Date,
    Geo,
    File,
}

impl CanonicalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalType::Text => "text",
            CanonicalType::Number => "number",
            CanonicalType::Boolean => "boolean",
            CanonicalType::EnumTerm => "enum_term",
            CanonicalType::Pointer => "pointer",
            CanonicalType::Date => "date",
            CanonicalType::Geo => "geo",
            CanonicalType::File => "file",
        }
    }

    /// Storage column type for the field's generic value column.
    pub fn sql_type(&self) -> &'static str {
        match self {
            CanonicalType::Number => "FLOAT",
            CanonicalType::Date => "DATE[2]",
            CanonicalType::Pointer => "INTEGER",
            CanonicalType::Boolean => "BOOLEAN",
            CanonicalType::Text
            | CanonicalType::EnumTerm
            | CanonicalType::Geo
            | CanonicalType::File => "TEXT",
        }
    }

    /// Date fields carry a `_TEMPORAL` companion column.
    pub fn has_temporal_companion(&self) -> bool {
        matches!(self, CanonicalType::Date)
    }

    /// Enum fields carry a `_TRM` companion column.
    pub fn has_term_companion(&self) -> bool {
        matches!(self, CanonicalType::EnumTerm)
    }
}

impl fmt::Display for CanonicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
