//! Heurist record transformation: dates, values, schemas and aggregation.
//!
//! The pieces run in this order for each record type:
//!
//! 1. [`SchemaBuilder`] turns structural metadata into a [`RecordTypeSchema`]
//!    once per run.
//! 2. [`flatten`] groups a record's details by field and converts each one
//!    through [`convert`], which in turn uses the date normalizer for date
//!    fields.
//!
//! [`RecordTypeSchema`]: heurist_model::RecordTypeSchema

pub mod convert;
pub mod datetime;
pub mod error;
pub mod flatten;
pub mod naming;
pub mod schema;
pub mod temporal;

pub use convert::{convert, convert_term_id};
pub use datetime::{normalize_pair, normalize_range, parse_partial};
pub use error::{ConversionError, StructureError};
pub use flatten::{FlattenOutcome, flatten, unknown_field_key};
pub use naming::{NameRegistry, column_name, table_name};
pub use schema::SchemaBuilder;
pub use temporal::build_temporal_object;
