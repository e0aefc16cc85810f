use std::path::PathBuf;

use heurist_core::RecordFailure;

/// Per record type outcome of a flatten run.
#[derive(Debug, Clone)]
pub struct RecordTypeSummary {
    pub record_type_id: i64,
    pub record_type_name: String,
    pub table_name: String,
    pub records: usize,
    pub rows: usize,
    pub warnings: usize,
    pub failures: Vec<RecordFailure>,
}

impl RecordTypeSummary {
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }
}

/// Outcome of a whole flatten run.
#[derive(Debug, Clone, Default)]
pub struct FlattenResult {
    pub summaries: Vec<RecordTypeSummary>,
    /// Records whose record type has no schema.
    pub unmatched_records: usize,
    /// Record entries that could not be parsed.
    pub rejected_records: usize,
    /// Where rows were written; `None` means stdout.
    pub output: Option<PathBuf>,
}

impl FlattenResult {
    pub fn has_failures(&self) -> bool {
        self.rejected_records > 0 || self.has_record_failures()
    }

    /// Whether any parsed record was excluded by its pipeline.
    pub fn has_record_failures(&self) -> bool {
        self.summaries
            .iter()
            .any(|summary| !summary.failures.is_empty())
    }

    pub fn total_rows(&self) -> usize {
        self.summaries.iter().map(|summary| summary.rows).sum()
    }
}
