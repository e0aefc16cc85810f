//! Flatten-and-validate pipeline per record type.
//!
//! # Processing Order
//!
//! 1. **Record type check** - records of another type are failures
//! 2. **Flatten** - group and convert details; a conversion error fails the record
//! 3. **Validate** - shape and coerce against the schema; a mismatch fails the record
//! 4. **Flag policy** - flagged rows are kept or rejected per [`ProcessingOptions`]
//!
//! No record failure aborts a batch. Only building the schemas themselves can
//! fail as a whole.

use serde::Serialize;
use tracing::{info, warn};

use heurist_model::{
    IssueKind, ProcessingOptions, ProcessingReport, RawRecord, RecordIssue, RecordTypeMetadata,
    RecordTypeSchema, Severity, ValidatedRow,
};
use heurist_transform::{SchemaBuilder, StructureError, flatten};
use heurist_validate::RecordValidator;

/// Every record type schema of one run, in metadata order.
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    schemas: Vec<RecordTypeSchema>,
}

impl SchemaCatalog {
    /// Build all schemas with one shared table-name scope.
    ///
    /// The first record type that cannot be built fails the whole catalog.
    pub fn build(metadata: &[RecordTypeMetadata]) -> Result<Self, StructureError> {
        let mut builder = SchemaBuilder::new();
        let schemas = metadata
            .iter()
            .map(|record_type| builder.build_from(record_type))
            .collect::<Result<Vec<_>, _>>()?;
        info!(record_types = schemas.len(), "built schema catalog");
        Ok(Self { schemas })
    }

    pub fn get(&self, record_type_id: i64) -> Option<&RecordTypeSchema> {
        self.schemas
            .iter()
            .find(|schema| schema.record_type_id == record_type_id)
    }

    pub fn schemas(&self) -> &[RecordTypeSchema] {
        &self.schemas
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Pipeline for one record type, if the catalog knows it.
    pub fn pipeline(
        &self,
        record_type_id: i64,
        options: ProcessingOptions,
    ) -> Option<RecordTypePipeline<'_>> {
        self.get(record_type_id)
            .map(|schema| RecordTypePipeline::new(schema, options))
    }
}

/// A record excluded from the output batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordFailure {
    pub record_id: i64,
    pub kind: IssueKind,
    pub message: String,
    /// Field keys involved, when known.
    pub fields: Vec<String>,
}

/// Result of processing one record.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordOutcome {
    pub result: Result<ValidatedRow, RecordFailure>,
    /// Issues raised along the way, including the failure itself.
    pub issues: Vec<RecordIssue>,
}

/// Result of processing a batch of records of one record type.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub rows: Vec<ValidatedRow>,
    pub failures: Vec<RecordFailure>,
    pub report: ProcessingReport,
}

impl BatchOutcome {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }
}

/// Flattens and validates records of a single record type.
#[derive(Debug, Clone)]
pub struct RecordTypePipeline<'a> {
    schema: &'a RecordTypeSchema,
    validator: RecordValidator<'a>,
    options: ProcessingOptions,
}

impl<'a> RecordTypePipeline<'a> {
    pub fn new(schema: &'a RecordTypeSchema, options: ProcessingOptions) -> Self {
        Self {
            schema,
            validator: RecordValidator::new(schema, options.clone()),
            options,
        }
    }

    pub fn schema(&self) -> &RecordTypeSchema {
        self.schema
    }

    /// Flatten and validate one record.
    pub fn process_record(&self, record: &RawRecord) -> RecordOutcome {
        let mut issues = Vec::new();
        let result = self.run(record, &mut issues);
        if let Err(failure) = &result {
            warn!(
                record_id = failure.record_id,
                record_type_id = self.schema.record_type_id,
                kind = %failure.kind,
                cause = %failure.message,
                "record excluded from batch"
            );
        }
        RecordOutcome { result, issues }
    }

    /// Process every record; failures are collected, never raised.
    pub fn process_batch(&self, records: &[RawRecord]) -> BatchOutcome {
        let mut outcome = BatchOutcome {
            report: ProcessingReport::new(self.schema.record_type_id),
            ..Default::default()
        };

        for record in records {
            let RecordOutcome { result, issues } = self.process_record(record);
            outcome.report.extend(issues);
            match result {
                Ok(row) => outcome.rows.push(row),
                Err(failure) => outcome.failures.push(failure),
            }
        }

        info!(
            record_type_id = self.schema.record_type_id,
            table = %self.schema.table_name,
            rows = outcome.rows.len(),
            failures = outcome.failures.len(),
            warnings = outcome.report.warning_count(),
            "processed record batch"
        );
        outcome
    }

    fn run(
        &self,
        record: &RawRecord,
        issues: &mut Vec<RecordIssue>,
    ) -> Result<ValidatedRow, RecordFailure> {
        if record.record_type_id != self.schema.record_type_id {
            return Err(fail(
                issues,
                record.id,
                IssueKind::WrongRecordType,
                format!(
                    "record type {} does not match pipeline record type {}",
                    record.record_type_id, self.schema.record_type_id
                ),
                Vec::new(),
            ));
        }

        let flattened = match flatten(record, self.schema) {
            Ok(flattened) => flattened,
            Err(err) => {
                let field = self
                    .schema
                    .field(err.field_id())
                    .map_or_else(|| err.field_id().to_string(), |f| f.column_name.clone());
                return Err(fail(
                    issues,
                    record.id,
                    IssueKind::ConversionError,
                    err.to_string(),
                    vec![field],
                ));
            }
        };
        issues.extend(flattened.violations);

        let mut row = match self.validator.validate(&flattened.record) {
            Ok(row) => row,
            Err(failure) => {
                let fields = failure.keys().into_iter().map(str::to_string).collect();
                return Err(fail(
                    issues,
                    record.id,
                    IssueKind::ValidationFailure,
                    failure.to_string(),
                    fields,
                ));
            }
        };

        if row.is_flagged() && self.options.reject_flagged_records {
            let fields: Vec<String> = row.flags.iter().filter_map(|f| f.field.clone()).collect();
            let kind = row.flags[0].kind;
            issues.extend(
                row.flags
                    .drain(..)
                    .map(|flag| flag.with_severity(Severity::Error)),
            );
            return Err(RecordFailure {
                record_id: record.id,
                kind,
                message: format!("rejected: flagged fields {}", fields.join(", ")),
                fields,
            });
        }

        issues.extend(row.flags.iter().cloned());
        Ok(row)
    }
}

fn fail(
    issues: &mut Vec<RecordIssue>,
    record_id: i64,
    kind: IssueKind,
    message: String,
    fields: Vec<String>,
) -> RecordFailure {
    let mut issue = RecordIssue::new(record_id, kind, message.clone());
    if !fields.is_empty() {
        issue = issue.with_field(fields.join(", "));
    }
    issues.push(issue);
    RecordFailure {
        record_id,
        kind,
        message,
        fields,
    }
}
