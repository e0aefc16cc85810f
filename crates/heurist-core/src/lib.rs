pub mod frame;
pub mod pipeline;

pub use frame::rows_to_frame;
pub use pipeline::{
    BatchOutcome, RecordFailure, RecordOutcome, RecordTypePipeline, SchemaCatalog,
};
