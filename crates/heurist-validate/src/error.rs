//! Validation failure types.

use thiserror::Error;

/// One column that does not fit its schema declaration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldProblem {
    /// A list where the schema declares a single value.
    #[error("'{key}': expected a single value, found a list of {len}")]
    ListForSingular { key: String, len: usize },

    /// A value that cannot be coerced to the declared type.
    #[error("'{key}': expected {expected}, found {found}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: String,
    },
}

impl FieldProblem {
    pub fn key(&self) -> &str {
        match self {
            Self::ListForSingular { key, .. } | Self::TypeMismatch { key, .. } => key,
        }
    }
}

/// A record that could not be validated against its schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("record {record_id} failed validation: {}", describe(.problems))]
pub struct ValidationFailure {
    pub record_id: i64,
    pub problems: Vec<FieldProblem>,
}

impl ValidationFailure {
    /// Keys of every column involved, in schema order.
    pub fn keys(&self) -> Vec<&str> {
        self.problems.iter().map(FieldProblem::key).collect()
    }
}

fn describe(problems: &[FieldProblem]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
