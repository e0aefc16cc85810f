pub mod checks;
pub mod error;
pub mod validator;

pub use error::{FieldProblem, ValidationFailure};
pub use validator::{RecordValidator, validate};
