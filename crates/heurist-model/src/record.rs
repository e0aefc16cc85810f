//! Raw Heurist records as a closed, typed union.
//!
//! A Heurist detail's `value` changes shape with the field type: a bare
//! scalar for text and numbers, a term id for vocabulary fields, a nested
//! object for pointers, geometries, files and compound dates. Ingestion
//! decides the shape once, from the `fieldType` tag, so the converter only
//! pattern-matches on [`DetailValue`].
//!
//! Sub-keys that may legitimately be absent stay `Option` here. Whether a
//! missing piece is an error is the converter's decision, not ingestion's.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::field::FieldType;

/// A JSON scalar passed through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Boolean(value) => write!(f, "{value}"),
            Scalar::Integer(value) => write!(f, "{value}"),
            Scalar::Float(value) => write!(f, "{value}"),
            Scalar::Text(value) => write!(f, "{value}"),
        }
    }
}

/// One date representation: a year, `YYYY-MM`, `YYYY.MMDD`, or ISO date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PartialDate {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for PartialDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartialDate::Integer(value) => write!(f, "{value}"),
            PartialDate::Float(value) => write!(f, "{value}"),
            PartialDate::Text(value) => write!(f, "{value}"),
        }
    }
}

/// `start` / `end` sub-object of a compound date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDateLimit {
    pub earliest: Option<PartialDate>,
    pub latest: Option<PartialDate>,
    pub profile: Option<String>,
    pub determination: Option<String>,
}

/// `timestamp` sub-object of a compound date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTimestamp {
    pub in_year: Option<PartialDate>,
    pub type_time: Option<String>,
    pub circa: Option<bool>,
}

/// A compound (fuzzy) date object as exported.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCompoundDate {
    pub start: Option<RawDateLimit>,
    pub end: Option<RawDateLimit>,
    pub profile: Option<String>,
    pub determination: Option<String>,
    pub est_min_date: Option<PartialDate>,
    pub est_max_date: Option<PartialDate>,
    pub timestamp: Option<RawTimestamp>,
}

/// Raw value of a date detail.
#[derive(Debug, Clone, PartialEq)]
pub enum RawDate {
    /// Bare year, partial or full date.
    Partial(PartialDate),
    /// Compound object with uncertainty bounds.
    Compound(Box<RawCompoundDate>),
    /// Anything else (null, list, unexpected object).
    Malformed,
}

impl RawDate {
    pub fn is_compound(&self) -> bool {
        matches!(self, RawDate::Compound(_))
    }
}

/// Raw detail value, one variant per canonical type.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailValue {
    Text(Option<Scalar>),
    Number(Option<Scalar>),
    Boolean(Option<Scalar>),
    /// Vocabulary term: the raw term id and its human-readable label.
    EnumTerm {
        term_id: Option<String>,
        label: Option<String>,
    },
    /// Pointer to another record (`value.id`).
    Pointer { target_id: Option<String> },
    /// Geometry (`value.geo.type` / `value.geo.wkt`).
    Geo {
        kind: Option<String>,
        wkt: Option<String>,
    },
    /// File reference (`value.file.ulf_ExternalFileReference`).
    File { external_reference: Option<String> },
    Date(RawDate),
}

impl DetailValue {
    /// The compound date carried by this value, if any.
    pub fn compound_date(&self) -> Option<&RawCompoundDate> {
        match self {
            DetailValue::Date(RawDate::Compound(compound)) => Some(compound.as_ref()),
            _ => None,
        }
    }
}

/// One entry of a record's `details` array.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDetail {
    /// Detail type id (`dty_ID`).
    pub field_id: i64,
    /// Tag mirroring the structural metadata (`fieldType`).
    pub field_type: FieldType,
    /// Exported field name (`fieldName`), used in log messages.
    pub field_name: Option<String>,
    pub value: DetailValue,
}

/// A raw record of one record type.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// `rec_ID`.
    pub id: i64,
    /// `rec_RecTypeID`.
    pub record_type_id: i64,
    pub details: Vec<RawDetail>,
}
