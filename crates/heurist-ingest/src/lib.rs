pub mod error;
pub mod json;
pub mod records;
pub mod structure;

pub use error::{IngestError, Result};
pub use records::{
    RecordSet, RejectedRecord, load_records, parse_record, parse_records, parse_records_str,
};
pub use structure::{load_structure, parse_structure, parse_structure_str};
