//! Snippet Status Report generation.
//!
//! Turns a saved ad-exchange creative listing into a `SnippetStatusReport`
//! and writes it as structured text, binary wire encoding, and CSV.
//!
//! - [`ListingSource`] / [`FileListingSource`]: obtain the listing body.
//! - [`rename_fields`] / [`RenameTable`]: listing keys → schema field names.
//! - [`remove_flashless_corrections`] / [`is_ssl_capable`]: business rules.
//! - [`generate_report`]: drives the steps above per item.
//! - [`write_reports`] and friends: the three emitters.
//! - [`ReportConfig`]: YAML configuration.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use snippet_report::{AssemblyOptions, generate_report, write_csv};
//! use snippet_report_schema::report_schema;
//!
//! let listing = json!({ "items": [{
//!     "buyerCreativeId": "creative-1",
//!     "attribute": [47],
//!     "status": "APPROVED",
//! }] });
//!
//! let report = generate_report(report_schema().unwrap(), &listing, &AssemblyOptions::default())
//!     .unwrap();
//! assert_eq!(report.stats.items_written, 1);
//!
//! let mut csv = Vec::new();
//! write_csv(&report.message, &mut csv).unwrap();
//! assert!(String::from_utf8(csv).unwrap().starts_with("buyer_creative_id,source,status,"));
//! ```

mod assemble;
mod config;
mod corrections;
mod error;
mod listing;
mod output;
mod rename;
mod text;

pub use assemble::{
    AssembledReport, AssemblyOptions, AssemblyStats, ItemErrorPolicy, SOURCE_TAG, generate_report,
};
pub use config::{MappingConfig, OutputConfig, ReportConfig};
pub use corrections::{
    FLASHLESS_ATTRIBUTE, INVALID_SSL_DECLARATION, RICH_MEDIA_CAPABILITY_SSL, SSL_ATTRIBUTE,
    is_ssl_capable, remove_flashless_corrections,
};
pub use error::{ReportError, Result};
pub use listing::{FetchError, FileListingSource, ListingSource, reject_error_envelope};
pub use output::{
    OutputFormat, format_text, write_binary, write_csv, write_format, write_reports, write_text,
};
pub use rename::{RenameTable, rename_fields};
pub use text::{c_escape, format_cell, format_value};
