//! Error types for report generation.
//!
//! Covers every failure between reading a listing and writing the report
//! files: fetching, schema loading, per-item mapping, and output I/O.

use snippet_report_core::MappingError;
use snippet_report_schema::SchemaError;
use thiserror::Error;

use crate::listing::FetchError;

/// Errors that can occur while generating a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The listing could not be obtained.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The listing is not shaped like a creative listing.
    #[error("malformed listing: {0}")]
    MalformedListing(String),

    /// The report schema lacks a field or value the report layout needs.
    #[error("report schema mismatch: {0}")]
    SchemaMismatch(String),

    /// One listing item failed to map; carries its position in the listing.
    #[error("item {index}: {source}")]
    Item {
        index: usize,
        #[source]
        source: MappingError,
    },

    /// A conversion outside the per-item pipeline failed.
    #[error("mapping error: {0}")]
    MappingError(#[from] MappingError),

    /// The schema could not be built or loaded.
    #[error("schema error: {0}")]
    SchemaError(#[from] SchemaError),

    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// CSV writing failure.
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Binary message decoding failure.
    #[error("decode error: {0}")]
    DecodeError(#[from] prost::DecodeError),
}

/// Convenience alias for results with [`ReportError`].
pub type Result<T> = std::result::Result<T, ReportError>;
