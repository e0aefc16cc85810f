use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The record was excluded from the output batch.
    Error,
    /// The record was kept but something was recovered or flagged.
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-record problem categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// A singular field received more than one value; the field was skipped.
    SchemaViolation,
    /// A date field carried no compound value under strict validation.
    DateShapeMismatch,
    /// A nested detail value was malformed.
    ConversionError,
    /// The flattened record did not match its schema.
    ValidationFailure,
    /// The record belongs to a different record type than the pipeline.
    WrongRecordType,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::SchemaViolation => "schema_violation",
            IssueKind::DateShapeMismatch => "date_shape_mismatch",
            IssueKind::ConversionError => "conversion_error",
            IssueKind::ValidationFailure => "validation_failure",
            IssueKind::WrongRecordType => "wrong_record_type",
        }
    }

    /// Severity an issue of this kind carries by default.
    pub fn default_severity(&self) -> Severity {
        match self {
            IssueKind::SchemaViolation | IssueKind::DateShapeMismatch => Severity::Warning,
            IssueKind::ConversionError
            | IssueKind::ValidationFailure
            | IssueKind::WrongRecordType => Severity::Error,
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One logged problem with one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordIssue {
    pub record_id: i64,
    /// Field key (or detail type id) involved, when the issue is field-level.
    pub field: Option<String>,
    pub kind: IssueKind,
    pub severity: Severity,
    pub message: String,
}

impl RecordIssue {
    /// Build an issue with the kind's default severity.
    pub fn new(record_id: i64, kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            record_id,
            field: None,
            kind,
            severity: kind.default_severity(),
            message: message.into(),
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

/// Every issue raised while processing one record type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingReport {
    pub record_type_id: i64,
    pub issues: Vec<RecordIssue>,
}

impl ProcessingReport {
    pub fn new(record_type_id: i64) -> Self {
        Self {
            record_type_id,
            issues: Vec::new(),
        }
    }

    pub fn push(&mut self, issue: RecordIssue) {
        self.issues.push(issue);
    }

    pub fn extend(&mut self, issues: impl IntoIterator<Item = RecordIssue>) {
        self.issues.extend(issues);
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == Severity::Warning)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn count_of(&self, kind: IssueKind) -> usize {
        self.issues.iter().filter(|issue| issue.kind == kind).count()
    }

    /// Issues attached to one record, in the order they were raised.
    pub fn for_record(&self, record_id: i64) -> impl Iterator<Item = &RecordIssue> {
        self.issues
            .iter()
            .filter(move |issue| issue.record_id == record_id)
    }
}
