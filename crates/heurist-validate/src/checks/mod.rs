//! Validation check modules.
//!
//! Each module performs a specific type of validation check.

mod datatype;
pub mod dates;

use heurist_model::{ColumnSpec, FlatValue};

use crate::error::FieldProblem;

/// Bring one present column value to its declared shape and type.
///
/// Repeatable columns always end up as a list (a lone value or null is
/// wrapped or emptied); singular columns reject lists.
pub fn conform(column: &ColumnSpec<'_>, value: FlatValue) -> Result<FlatValue, Vec<FieldProblem>> {
    if column.repeatable() {
        let items = match value {
            FlatValue::List(items) => items,
            FlatValue::Null => Vec::new(),
            single => vec![single],
        };
        let mut coerced = Vec::with_capacity(items.len());
        let mut problems = Vec::new();
        for item in items {
            match datatype::coerce(column, item) {
                Ok(value) => coerced.push(value),
                Err(problem) => problems.push(problem),
            }
        }
        return if problems.is_empty() {
            Ok(FlatValue::List(coerced))
        } else {
            Err(problems)
        };
    }

    if let FlatValue::List(items) = &value {
        return Err(vec![FieldProblem::ListForSingular {
            key: column.key.clone(),
            len: items.len(),
        }]);
    }
    datatype::coerce(column, value).map_err(|problem| vec![problem])
}

/// Default for a column missing from a flattened record.
pub fn default_value(column: &ColumnSpec<'_>) -> FlatValue {
    if column.repeatable() {
        FlatValue::List(Vec::new())
    } else {
        FlatValue::Null
    }
}
