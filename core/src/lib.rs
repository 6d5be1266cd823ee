//! Schema-driven mapping between JSON values and dynamic protobuf messages.
//!
//! This crate converts between untyped [`serde_json::Value`] trees and
//! [`prost_reflect::DynamicMessage`]s for any message type loaded into a
//! descriptor pool:
//!
//! - [`JsonMapper`]: the decode/encode engine, configured with
//!   [`MappingOptions`] (symbolic enums, all-fields output).
//! - [`coerce`]: per-kind scalar conversion tables.
//! - [`enums`]: enum name ↔ number conversion with pass-through fallbacks.
//! - [`ExtensionRegistry`]: message-set payload types indexed by name.
//! - [`find_initialization_errors`]: recursive required-field check.
//! - [`descriptor`]: constructors for declaring proto2 schemas in code.
//!
//! Every conversion fails fast with a [`MappingError`]; a successful decode
//! or encode never leaves a required field unset.
//!
//! # Example
//!
//! ```
//! use prost_reflect::DescriptorPool;
//! use prost_types::FileDescriptorProto;
//! use serde_json::json;
//! use snippet_report_core::descriptor::{Label, Type, message_type, scalar};
//! use snippet_report_core::{ExtensionRegistry, JsonMapper};
//!
//! let file = FileDescriptorProto {
//!     name: Some("point.proto".to_string()),
//!     package: Some("geo".to_string()),
//!     message_type: vec![message_type(
//!         "Point",
//!         vec![
//!             scalar("x", 1, Label::Required, Type::Int32),
//!             scalar("y", 2, Label::Optional, Type::Int32),
//!         ],
//!     )],
//!     ..Default::default()
//! };
//! let mut pool = DescriptorPool::new();
//! pool.add_file_descriptor_proto(file).unwrap();
//! let point = pool.get_message_by_name("geo.Point").unwrap();
//!
//! let registry = ExtensionRegistry::from_pool(&pool);
//! let mapper = JsonMapper::new(&registry);
//! let message = mapper.decode(point.clone(), &json!({ "x": "3" })).unwrap();
//! assert_eq!(mapper.encode(&message).unwrap(), json!({ "x": 3 }));
//!
//! assert!(mapper.decode(point, &json!({ "y": 1 })).is_err());
//! ```

pub mod coerce;
mod decode;
pub mod descriptor;
mod encode;
pub mod enums;
mod error;
mod init;
mod mapper;
mod message_set;

#[cfg(test)]
mod test_support;

pub use error::{MappingError, Result};
pub use init::find_initialization_errors;
pub use mapper::{JsonMapper, MappingOptions};
pub use message_set::{
    ExtensionRegistry, MESSAGE_SET_FILE_NAME, MESSAGE_SET_FULL_NAME, is_message_set,
    message_set_file,
};
