//! Schema registries and the built-in Snippet Status Report schema.
//!
//! - [`SchemaRegistry`]: a descriptor pool plus its message-set extension
//!   index, built from code or from a `FileDescriptorSet` file.
//! - [`report_schema`]: the process-wide `snippet_status_report` schema,
//!   built on first use.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use snippet_report_core::MappingOptions;
//! use snippet_report_schema::report_schema;
//!
//! let schema = report_schema().unwrap();
//! let mapper = schema
//!     .registry()
//!     .mapper(MappingOptions::new().with_enum_names(true));
//!
//! let item = mapper
//!     .decode(
//!         schema.item().clone(),
//!         &json!({ "buyer_creative_id": "abc", "status": "APPROVED" }),
//!     )
//!     .unwrap();
//! assert_eq!(
//!     mapper.encode(&item).unwrap(),
//!     json!({ "buyer_creative_id": "abc", "status": "APPROVED" })
//! );
//! ```

mod error;
mod registry;
mod snippet;

pub use error::{Result, SchemaError};
pub use registry::SchemaRegistry;
pub use snippet::{
    DEPRECATED_PREFIX, ITEM_MESSAGE, PACKAGE, REPORT_MESSAGE, ReportSchema, report_schema,
    snippet_status_report_file,
};
