//! Flat values produced by conversion and consumed by validation.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use crate::record::Scalar;
use crate::report::RecordIssue;
use crate::temporal::TemporalObject;

/// Earliest/latest pair derived from a date detail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub earliest: Option<NaiveDate>,
    pub latest: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(earliest: Option<NaiveDate>, latest: Option<NaiveDate>) -> Self {
        Self { earliest, latest }
    }
}

/// 2^63, the first float above the `i64` range.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// The integer an integral float stands for, or `None` when it has a
/// fractional part or does not fit in an `i64`.
pub fn integral_float(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value >= -I64_BOUND && value < I64_BOUND {
        Some(value as i64)
    } else {
        None
    }
}

/// A canonical flat value.
#[derive(Debug, Clone, PartialEq)]
pub enum FlatValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    /// `[earliest, latest]`, or `[]` when no date could be derived.
    DatePair(Option<DateRange>),
    Temporal(Box<TemporalObject>),
    List(Vec<FlatValue>),
}

impl FlatValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FlatValue::Null)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, FlatValue::List(_))
    }

    pub fn as_list(&self) -> Option<&[FlatValue]> {
        match self {
            FlatValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Short shape name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            FlatValue::Null => "null",
            FlatValue::Boolean(_) => "boolean",
            FlatValue::Integer(_) => "integer",
            FlatValue::Float(_) => "float",
            FlatValue::Text(_) => "text",
            FlatValue::DatePair(_) => "date pair",
            FlatValue::Temporal(_) => "temporal object",
            FlatValue::List(_) => "list",
        }
    }
}

impl From<Scalar> for FlatValue {
    fn from(value: Scalar) -> Self {
        match value {
            Scalar::Boolean(value) => FlatValue::Boolean(value),
            Scalar::Integer(value) => FlatValue::Integer(value),
            Scalar::Float(value) => FlatValue::Float(value),
            Scalar::Text(value) => FlatValue::Text(value),
        }
    }
}

impl From<Option<Scalar>> for FlatValue {
    fn from(value: Option<Scalar>) -> Self {
        value.map_or(FlatValue::Null, FlatValue::from)
    }
}

impl From<TemporalObject> for FlatValue {
    fn from(value: TemporalObject) -> Self {
        FlatValue::Temporal(Box::new(value))
    }
}

impl Serialize for FlatValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            FlatValue::Null => serializer.serialize_none(),
            FlatValue::Boolean(value) => serializer.serialize_bool(*value),
            FlatValue::Integer(value) => serializer.serialize_i64(*value),
            FlatValue::Float(value) => serializer.serialize_f64(*value),
            FlatValue::Text(value) => serializer.serialize_str(value),
            FlatValue::DatePair(None) => serializer.serialize_seq(Some(0))?.end(),
            FlatValue::DatePair(Some(range)) => {
                let mut seq = serializer.serialize_seq(Some(2))?;
                seq.serialize_element(&range.earliest)?;
                seq.serialize_element(&range.latest)?;
                seq.end()
            }
            FlatValue::Temporal(temporal) => temporal.serialize(serializer),
            FlatValue::List(items) => serializer.collect_seq(items),
        }
    }
}

/// One record's details merged into a key/value mapping.
///
/// Built fresh per record and discarded after validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlattenedRecord {
    #[serde(rename = "rec_ID")]
    pub record_id: i64,
    #[serde(rename = "rec_RecTypeID")]
    pub record_type_id: i64,
    #[serde(flatten)]
    pub values: BTreeMap<String, FlatValue>,
}

impl FlattenedRecord {
    pub fn new(record_id: i64, record_type_id: i64) -> Self {
        Self {
            record_id,
            record_type_id,
            values: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: FlatValue) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&FlatValue> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

/// A flattened record coerced to its record type's schema.
///
/// Every value key is a schema column (a field or one of its companions).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedRow {
    #[serde(rename = "rec_ID")]
    pub record_id: i64,
    #[serde(rename = "rec_RecTypeID")]
    pub record_type_id: i64,
    #[serde(flatten)]
    pub values: BTreeMap<String, FlatValue>,
    /// Non-fatal issues raised while validating (e.g. strict date checks).
    #[serde(skip)]
    pub flags: Vec<RecordIssue>,
}

impl ValidatedRow {
    pub fn get(&self, key: &str) -> Option<&FlatValue> {
        self.values.get(key)
    }

    pub fn is_flagged(&self) -> bool {
        !self.flags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn date_pair_serializes_as_two_element_array() {
        let value = FlatValue::DatePair(Some(DateRange::new(Some(ymd(2024, 3, 19)), None)));
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"["2024-03-19",null]"#);
    }

    #[test]
    fn empty_date_pair_serializes_as_empty_array() {
        let json = serde_json::to_string(&FlatValue::DatePair(None)).unwrap();
        assert_eq!(json, "[]");
    }

    #[test]
    fn flattened_record_serializes_universal_keys_inline() {
        let mut record = FlattenedRecord::new(42, 101);
        record.insert("title", FlatValue::Text("Roman de la Rose".to_string()));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["rec_ID"], 42);
        assert_eq!(json["rec_RecTypeID"], 101);
        assert_eq!(json["title"], "Roman de la Rose");
    }

    #[test]
    fn integral_float_stays_in_range() {
        assert_eq!(integral_float(45.0), Some(45));
        assert_eq!(integral_float(-3.0), Some(-3));
        assert_eq!(integral_float(-I64_BOUND), Some(i64::MIN));
        assert_eq!(integral_float(2.5), None);
        assert_eq!(integral_float(1e30), None);
        assert_eq!(integral_float(-1e30), None);
        assert_eq!(integral_float(I64_BOUND), None);
        assert_eq!(integral_float(f64::NAN), None);
        assert_eq!(integral_float(f64::INFINITY), None);
    }

    #[test]
    fn scalar_conversion() {
        assert_eq!(FlatValue::from(None), FlatValue::Null);
        assert_eq!(
            FlatValue::from(Some(Scalar::Integer(3))),
            FlatValue::Integer(3)
        );
    }
}
