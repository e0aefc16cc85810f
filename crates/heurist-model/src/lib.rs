pub mod field;
pub mod metadata;
pub mod options;
pub mod record;
pub mod report;
pub mod schema;
pub mod temporal;
pub mod value;

pub use field::{CanonicalType, FieldType};
pub use metadata::{FieldMetadata, RecordTypeMetadata};
pub use options::{DateStrictness, ProcessingOptions};
pub use record::{
    DetailValue, PartialDate, RawCompoundDate, RawDate, RawDateLimit, RawDetail, RawRecord,
    RawTimestamp, Scalar,
};
pub use report::{IssueKind, ProcessingReport, RecordIssue, Severity};
pub use schema::{
    ColumnRole, ColumnSpec, FieldSpec, RecordTypeSchema, RECORD_ID_KEY, RECORD_TYPE_ID_KEY,
    TEMPORAL_SUFFIX, TERM_SUFFIX,
};
pub use temporal::{DateLimit, Determination, Profile, TemporalObject, Timestamp};
pub use value::{DateRange, FlatValue, FlattenedRecord, ValidatedRow, integral_float};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn processing_report_counts() {
        let mut report = ProcessingReport::new(101);
        report.push(
            RecordIssue::new(7, IssueKind::SchemaViolation, "2 values for singular field")
                .with_field("title"),
        );
        report.push(RecordIssue::new(
            8,
            IssueKind::ConversionError,
            "pointer is missing its id",
        ));
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.warning_count(), 1);
        assert!(report.has_errors());
        assert_eq!(report.for_record(7).count(), 1);
    }

    #[test]
    fn options_serialize() {
        let options = ProcessingOptions::strict();
        let json = serde_json::to_string(&options).expect("serialize options");
        let round: ProcessingOptions = serde_json::from_str(&json).expect("deserialize options");
        assert_eq!(round, options);
        assert!(round.requires_compound_dates());
    }
}
