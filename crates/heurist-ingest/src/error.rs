//! Error types for Heurist export ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading structural metadata or records.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === JSON Errors ===
    /// The document is not valid JSON.
    #[error("failed to parse {document} JSON: {source}")]
    JsonParse {
        document: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The top-level shape is neither the export envelope nor an array.
    #[error("malformed {document}: {reason}")]
    MalformedDocument {
        document: &'static str,
        reason: String,
    },

    // === Entry Errors ===
    /// A required key is missing from an entry.
    #[error("missing required key '{key}' in {context}")]
    MissingKey { key: &'static str, context: String },

    /// An id or bound is not an integer or integer string.
    #[error("invalid {key} value '{value}' in {context}")]
    InvalidInteger {
        key: &'static str,
        value: String,
        context: String,
    },

    /// A field type tag outside the known set.
    #[error("unknown field type '{tag}' in {context}")]
    UnknownFieldType { tag: String, context: String },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
