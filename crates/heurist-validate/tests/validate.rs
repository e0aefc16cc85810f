//! Tests for record validation.

use chrono::NaiveDate;
use heurist_ingest::parse_record;
use heurist_model::{
    DateRange, DateStrictness, FieldMetadata, FieldType, FlatValue, FlattenedRecord, IssueKind,
    ProcessingOptions, RecordTypeSchema,
};
use heurist_transform::{SchemaBuilder, flatten};
use heurist_validate::{FieldProblem, RecordValidator, validate};
use serde_json::{Value, json};

fn schema() -> RecordTypeSchema {
    let field = |id, name: &str, field_type, max_values| FieldMetadata {
        field_id: id,
        display_name: name.to_string(),
        field_type,
        max_values,
    };
    SchemaBuilder::new()
        .build(
            101,
            "Story",
            &[
                field(1244, "preferred_name", FieldType::Freetext, 1),
                field(1111, "date_of_creation", FieldType::Date, 1),
                field(1090, "language", FieldType::Enum, 0),
                field(1300, "pages", FieldType::Integer, 1),
                field(1246, "is_part_of_storyverse", FieldType::Resource, 0),
            ],
        )
        .expect("schema")
}

fn flattened(details: Value) -> FlattenedRecord {
    let raw = parse_record(&json!({"rec_ID": 36, "rec_RecTypeID": 101, "details": details}))
        .expect("parse record");
    flatten(&raw, &schema()).expect("flatten").record
}

#[test]
fn missing_columns_take_defaults() {
    let flat = flattened(json!([
        {"dty_ID": 1111, "fieldType": "date", "value": "2024-03-19"}
    ]));
    assert!(!flat.contains_key("date_of_creation_TEMPORAL"));

    let row = validate(&flat, &schema(), &ProcessingOptions::default()).expect("valid");
    assert_eq!(
        row.get("date_of_creation"),
        Some(&FlatValue::DatePair(Some(DateRange::new(
            NaiveDate::from_ymd_opt(2024, 3, 19),
            None
        ))))
    );
    // Omitted by flattening, restored as null by validation.
    assert_eq!(row.get("date_of_creation_TEMPORAL"), Some(&FlatValue::Null));
    assert_eq!(row.get("language"), Some(&FlatValue::List(vec![])));
    assert_eq!(row.get("language_TRM"), Some(&FlatValue::List(vec![])));
    assert_eq!(row.get("preferred_name"), Some(&FlatValue::Null));
    assert_eq!(row.values.len(), schema().columns().len());
    assert!(!row.is_flagged());
}

#[test]
fn unknown_keys_are_dropped() {
    let flat = flattened(json!([
        {"dty_ID": 1244, "fieldType": "freetext", "value": "Aie d'Avignon"},
        {"dty_ID": 9999, "fieldType": "freetext", "value": "metadata drift"}
    ]));
    assert!(flat.contains_key("DTY9999"));

    let row = validate(&flat, &schema(), &ProcessingOptions::default()).expect("valid");
    assert!(row.get("DTY9999").is_none());
    let json = serde_json::to_value(&row).expect("serialize");
    assert_eq!(json["preferred_name"], "Aie d'Avignon");
    assert_eq!(json["rec_ID"], 36);
}

#[test]
fn list_for_singular_fails_the_record() {
    let mut flat = FlattenedRecord::new(5, 101);
    flat.insert(
        "preferred_name",
        FlatValue::List(vec![
            FlatValue::Text("a".to_string()),
            FlatValue::Text("b".to_string()),
        ]),
    );
    flat.insert("pages", FlatValue::Text("many".to_string()));

    let failure = validate(&flat, &schema(), &ProcessingOptions::default()).unwrap_err();
    assert_eq!(failure.record_id, 5);
    assert_eq!(
        failure.problems[0],
        FieldProblem::ListForSingular {
            key: "preferred_name".to_string(),
            len: 2
        }
    );
    assert_eq!(failure.keys(), vec!["preferred_name", "pages"]);
}

#[test]
fn scalars_are_wrapped_and_coerced() {
    let mut flat = FlattenedRecord::new(5, 101);
    flat.insert("is_part_of_storyverse", FlatValue::Text("45".to_string()));
    flat.insert("pages", FlatValue::Text("212".to_string()));

    let row = validate(&flat, &schema(), &ProcessingOptions::default()).expect("valid");
    assert_eq!(
        row.get("is_part_of_storyverse"),
        Some(&FlatValue::List(vec![FlatValue::Integer(45)]))
    );
    assert_eq!(row.get("pages"), Some(&FlatValue::Float(212.0)));
}

#[test]
fn strict_mode_flags_simple_dates() {
    let flat = flattened(json!([
        {"dty_ID": 1111, "fieldType": "date", "value": 1188}
    ]));
    let schema = schema();
    let options = ProcessingOptions::new().with_date_strictness(DateStrictness::RequireCompound);
    let row = RecordValidator::new(&schema, options)
        .validate(&flat)
        .expect("still valid");
    assert!(row.is_flagged());
    assert_eq!(row.flags[0].kind, IssueKind::DateShapeMismatch);
    assert_eq!(row.flags[0].field.as_deref(), Some("date_of_creation"));
    assert!(matches!(row.get("date_of_creation"), Some(FlatValue::DatePair(Some(_)))));
}

#[test]
fn strict_mode_accepts_compound_dates() {
    let flat = flattened(json!([{
        "dty_ID": 1111,
        "fieldType": "date",
        "value": {"start": {"earliest": "1180", "profile": "1"}, "estMinDate": 1180, "estMaxDate": 1250}
    }]));
    let row = validate(&flat, &schema(), &ProcessingOptions::strict()).expect("valid");
    assert!(!row.is_flagged());
    assert!(matches!(
        row.get("date_of_creation_TEMPORAL"),
        Some(FlatValue::Temporal(_))
    ));
}

#[test]
fn strict_mode_flags_repeatable_dates_only_without_any_compound_value() {
    let schema = SchemaBuilder::new()
        .build(
            102,
            "Manuscript",
            &[FieldMetadata {
                field_id: 1120,
                display_name: "copied".to_string(),
                field_type: FieldType::Date,
                max_values: 0,
            }],
        )
        .expect("schema");
    let flatten_details = |details: Value| {
        let raw = parse_record(&json!({"rec_ID": 50, "rec_RecTypeID": 102, "details": details}))
            .expect("parse record");
        flatten(&raw, &schema).expect("flatten").record
    };
    let options = ProcessingOptions::strict();

    let mixed = flatten_details(json!([
        {
            "dty_ID": 1120,
            "fieldType": "date",
            "value": {"start": {"earliest": "1400", "profile": "1"}, "estMinDate": 1400, "estMaxDate": 1425}
        },
        {"dty_ID": 1120, "fieldType": "date", "value": 1454}
    ]));
    let row = validate(&mixed, &schema, &options).expect("valid");
    assert!(!row.is_flagged());

    let simple = flatten_details(json!([
        {"dty_ID": 1120, "fieldType": "date", "value": 1454},
        {"dty_ID": 1120, "fieldType": "date", "value": "1460"}
    ]));
    let row = validate(&simple, &schema, &options).expect("valid");
    assert_eq!(row.flags.len(), 1);
    assert_eq!(row.flags[0].kind, IssueKind::DateShapeMismatch);
    assert_eq!(row.flags[0].field.as_deref(), Some("copied"));
}
