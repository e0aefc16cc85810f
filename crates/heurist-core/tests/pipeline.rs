//! Tests for the flatten-and-validate pipeline and frame export.

use heurist_core::{SchemaCatalog, rows_to_frame};
use heurist_ingest::{parse_records, parse_structure};
use heurist_model::{IssueKind, ProcessingOptions, RecordTypeMetadata, Severity};
use heurist_transform::StructureError;
use polars::prelude::DataType;
use serde_json::json;

fn structure() -> Vec<RecordTypeMetadata> {
    parse_structure(&json!([
        {
            "rty_ID": 101,
            "rty_Name": "Story",
            "fields": [
                {"dty_ID": 1244, "rst_DisplayName": "preferred_name", "dty_Type": "freetext", "rst_MaxValues": 1},
                {"dty_ID": 1111, "rst_DisplayName": "date_of_creation", "dty_Type": "date", "rst_MaxValues": 1},
                {"dty_ID": 1090, "rst_DisplayName": "language", "dty_Type": "enum", "rst_MaxValues": 0},
                {"dty_ID": 1300, "rst_DisplayName": "pages", "dty_Type": "integer", "rst_MaxValues": 1},
                {"dty_ID": 1246, "rst_DisplayName": "storyverse", "dty_Type": "resource", "rst_MaxValues": 1}
            ]
        },
        {
            "rty_ID": 102,
            "rty_Name": "story",
            "fields": [
                {"dty_ID": 1, "rst_DisplayName": "name", "dty_Type": "freetext", "rst_MaxValues": 1}
            ]
        }
    ]))
    .expect("parse structure")
}

fn records() -> Vec<heurist_model::RawRecord> {
    parse_records(&json!({"heurist": {"records": [
        {
            "rec_ID": 1,
            "rec_RecTypeID": "101",
            "details": [
                {"dty_ID": 1244, "fieldType": "freetext", "value": "Aie d'Avignon"},
                {"dty_ID": 1111, "fieldType": "date", "value": "2024-03-19"},
                {"dty_ID": 1090, "fieldType": "enum", "value": "9728", "termLabel": "dum (Middle Dutch)"},
                {"dty_ID": 1090, "fieldType": "enum", "value": "9470", "termLabel": "fro (Old French)"},
                {"dty_ID": 1300, "fieldType": "integer", "value": 212}
            ]
        },
        {
            "rec_ID": 2,
            "rec_RecTypeID": "101",
            "details": [
                {"dty_ID": 1244, "fieldType": "freetext", "value": "Nanteuil"},
                {"dty_ID": 1244, "fieldType": "freetext", "value": "Doon de Nanteuil"},
                {"dty_ID": 1246, "fieldType": "resource", "value": {"id": "45"}}
            ]
        },
        {
            "rec_ID": 3,
            "rec_RecTypeID": "101",
            "details": [
                {"dty_ID": 1246, "fieldType": "resource", "value": {"title": "no id"}}
            ]
        },
        {
            "rec_ID": 4,
            "rec_RecTypeID": "101",
            "details": [
                {"dty_ID": 1300, "fieldType": "integer", "value": "many"}
            ]
        },
        {
            "rec_ID": 5,
            "rec_RecTypeID": "102",
            "details": []
        }
    ]}}))
    .expect("parse records")
    .records
}

#[test]
fn catalog_disambiguates_table_names() {
    let catalog = SchemaCatalog::build(&structure()).expect("catalog");
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.get(101).map(|s| s.table_name.as_str()), Some("Story"));
    assert_eq!(catalog.get(102).map(|s| s.table_name.as_str()), Some("Story_2"));
}

#[test]
fn zero_field_record_type_fails_the_catalog() {
    let mut metadata = structure();
    metadata[1].fields.clear();
    let err = SchemaCatalog::build(&metadata).unwrap_err();
    assert!(matches!(err, StructureError::NoFields { record_type_id: 102, .. }));
}

#[test]
fn batch_keeps_going_past_failures() {
    let catalog = SchemaCatalog::build(&structure()).expect("catalog");
    let pipeline = catalog
        .pipeline(101, ProcessingOptions::default())
        .expect("pipeline");
    let outcome = pipeline.process_batch(&records());

    let row_ids: Vec<i64> = outcome.rows.iter().map(|row| row.record_id).collect();
    assert_eq!(row_ids, vec![1, 2]);

    let failures: Vec<(i64, IssueKind)> = outcome
        .failures
        .iter()
        .map(|failure| (failure.record_id, failure.kind))
        .collect();
    assert_eq!(
        failures,
        vec![
            (3, IssueKind::ConversionError),
            (4, IssueKind::ValidationFailure),
            (5, IssueKind::WrongRecordType),
        ]
    );
    assert_eq!(outcome.failures[1].fields, vec!["pages".to_string()]);

    let report = &outcome.report;
    assert_eq!(report.error_count(), 3);
    assert_eq!(report.count_of(IssueKind::SchemaViolation), 1);
    let violation = report.for_record(2).next().expect("violation for record 2");
    assert_eq!(violation.severity, Severity::Warning);
    assert_eq!(violation.field.as_deref(), Some("preferred_name"));

    let second = &outcome.rows[1];
    assert_eq!(
        serde_json::to_value(second).expect("serialize")["preferred_name"],
        serde_json::Value::Null
    );
}

#[test]
fn strict_rejection_of_flagged_rows() {
    let catalog = SchemaCatalog::build(&structure()).expect("catalog");
    let pipeline = catalog
        .pipeline(101, ProcessingOptions::strict())
        .expect("pipeline");
    let outcome = pipeline.process_batch(&records()[..1]);
    assert!(outcome.rows.is_empty());
    assert_eq!(outcome.failures[0].kind, IssueKind::DateShapeMismatch);
    assert_eq!(outcome.failures[0].fields, vec!["date_of_creation".to_string()]);
    assert_eq!(outcome.report.error_count(), 1);

    let lenient = catalog
        .pipeline(
            101,
            ProcessingOptions::strict().with_reject_flagged(false),
        )
        .expect("pipeline");
    let outcome = lenient.process_batch(&records()[..1]);
    assert_eq!(outcome.rows.len(), 1);
    assert_eq!(outcome.report.warning_count(), 1);
}

#[test]
fn frame_follows_schema_columns() {
    let catalog = SchemaCatalog::build(&structure()).expect("catalog");
    let schema = catalog.get(101).expect("schema");
    let pipeline = catalog
        .pipeline(101, ProcessingOptions::default())
        .expect("pipeline");
    let outcome = pipeline.process_batch(&records());

    let frame = rows_to_frame(schema, &outcome.rows).expect("frame");
    assert_eq!(frame.height(), 2);
    let names: Vec<String> = frame
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "rec_ID",
            "rec_RecTypeID",
            "preferred_name",
            "date_of_creation",
            "date_of_creation_TEMPORAL",
            "language",
            "language_TRM",
            "pages",
            "storyverse",
        ]
    );
    assert_eq!(frame.column("pages").expect("pages").dtype(), &DataType::Float64);
    assert_eq!(frame.column("storyverse").expect("pointer").dtype(), &DataType::Int64);
    assert_eq!(frame.column("language").expect("language").dtype(), &DataType::String);

    let language = frame.column("language").expect("language");
    let first = language.str().expect("json text").get(0);
    assert_eq!(first, Some(r#"["dum (Middle Dutch)","fro (Old French)"]"#));
    let dates = frame.column("date_of_creation").expect("dates");
    assert_eq!(dates.str().expect("json text").get(0), Some(r#"["2024-03-19",null]"#));
}
