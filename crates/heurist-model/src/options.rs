//! Configuration options for flattening and validation.

use serde::{Deserialize, Serialize};

/// How strictly date fields are checked against their compound form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateStrictness {
    /// Accept bare years and partial dates without comment.
    #[default]
    Relaxed,
    /// Flag date values that were not entered as compound date objects.
    ///
    /// The generic earliest/latest pair is still produced.
    RequireCompound,
}

/// Options controlling record processing behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingOptions {
    /// Date checks applied by the validator.
    pub date_strictness: DateStrictness,

    /// Exclude rows that validated but carry warning flags.
    ///
    /// Default: false (flagged rows are kept and reported).
    pub reject_flagged_records: bool,
}

impl ProcessingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require compound dates and reject every flagged row.
    pub fn strict() -> Self {
        Self {
            date_strictness: DateStrictness::RequireCompound,
            reject_flagged_records: true,
        }
    }

    pub fn with_date_strictness(mut self, strictness: DateStrictness) -> Self {
        self.date_strictness = strictness;
        self
    }

    pub fn with_reject_flagged(mut self, reject: bool) -> Self {
        self.reject_flagged_records = reject;
        self
    }

    pub fn requires_compound_dates(&self) -> bool {
        self.date_strictness == DateStrictness::RequireCompound
    }
}
