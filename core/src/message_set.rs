//! Message-set support: heterogeneous payloads keyed by type name.
//!
//! A message set is a message with no fields of its own, only an extension
//! range. Each payload type declares one message-typed extension of the
//! marker message, and a populated set holds at most one payload per type.
//! In JSON a set is an object keyed by the payload message's simple name:
//!
//! ```json
//! { "Note": { "text": "hello" }, "Flag": { "enabled": true } }
//! ```
//!
//! Type names resolve through an [`ExtensionRegistry`] built once from a
//! descriptor pool, so decoding never searches the pool by name.

use std::collections::BTreeMap;

use prost_reflect::{
    DescriptorPool, DynamicMessage, ExtensionDescriptor, FieldDescriptor, Kind, Value,
};
use prost_types::{DescriptorProto, FileDescriptorProto, descriptor_proto::ExtensionRange};
use serde_json::{Map, Value as Json};

use crate::error::{MappingError, Result};
use crate::mapper::JsonMapper;

/// Fully-qualified name of the marker message.
pub const MESSAGE_SET_FULL_NAME: &str = "proto2.bridge.MessageSet";

/// File name under which [`message_set_file`] declares the marker message.
pub const MESSAGE_SET_FILE_NAME: &str = "proto2/bridge/message_set.proto";

// Exclusive upper bound of the extension range: one past the largest legal
// field number.
const EXTENSION_RANGE_END: i32 = 536_870_912;

/// Returns true if `field` holds a message set.
pub fn is_message_set(field: &FieldDescriptor) -> bool {
    matches!(field.kind(), Kind::Message(message) if message.full_name() == MESSAGE_SET_FULL_NAME)
}

/// Declares the marker message so that schemas can depend on it.
///
/// Add this file to a pool before any file that uses message sets.
pub fn message_set_file() -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some(MESSAGE_SET_FILE_NAME.to_string()),
        package: Some("proto2.bridge".to_string()),
        syntax: Some("proto2".to_string()),
        message_type: vec![DescriptorProto {
            name: Some("MessageSet".to_string()),
            extension_range: vec![ExtensionRange {
                start: Some(4),
                end: Some(EXTENSION_RANGE_END),
                options: None,
            }],
            ..Default::default()
        }],
        ..Default::default()
    }
}

/// Message-set extensions indexed by payload type name.
///
/// # Examples
///
/// ```
/// use prost_reflect::DescriptorPool;
/// use snippet_report_core::ExtensionRegistry;
///
/// let registry = ExtensionRegistry::from_pool(&DescriptorPool::new());
/// assert!(registry.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExtensionRegistry {
    by_type: BTreeMap<String, ExtensionDescriptor>,
}

impl ExtensionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every message-typed extension of the marker message found
    /// in `pool`.
    pub fn from_pool(pool: &DescriptorPool) -> Self {
        let mut registry = Self::new();
        for extension in pool.all_extensions() {
            registry.register(extension);
        }
        registry
    }

    /// Registers one extension. Returns false, leaving the registry
    /// unchanged, if it does not extend the marker message with a message
    /// payload.
    ///
    /// A later registration for the same payload type replaces the earlier
    /// one.
    pub fn register(&mut self, extension: ExtensionDescriptor) -> bool {
        if extension.containing_message().full_name() != MESSAGE_SET_FULL_NAME {
            return false;
        }
        let Kind::Message(payload) = extension.kind() else {
            return false;
        };
        self.by_type.insert(payload.name().to_string(), extension);
        true
    }

    /// Looks up the extension carrying payloads of the named type.
    pub fn get(&self, type_name: &str) -> Option<&ExtensionDescriptor> {
        self.by_type.get(type_name)
    }

    /// Number of registered payload types.
    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    /// Returns true if no payload type is registered.
    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }

    /// Registered payload type names in sorted order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.by_type.keys().map(String::as_str)
    }
}

impl JsonMapper<'_> {
    /// Installs one extension per entry of `json` into `set`.
    pub(crate) fn merge_message_set(&self, set: &mut DynamicMessage, json: &Json) -> Result<()> {
        let object = json
            .as_object()
            .ok_or_else(|| MappingError::shape(MESSAGE_SET_FULL_NAME, "object", json))?;

        for (type_name, content) in object {
            let extension = self
                .extensions()
                .get(type_name)
                .ok_or_else(|| MappingError::UnknownExtension(type_name.clone()))?;
            let Kind::Message(payload_type) = extension.kind() else {
                return Err(MappingError::UnknownExtension(type_name.clone()));
            };

            let mut payload = DynamicMessage::new(payload_type);
            self.merge_object(&mut payload, content)?;
            set.set_extension(extension, Value::Message(payload));
        }
        Ok(())
    }

    /// Renders the installed extensions of `set` keyed by payload type name.
    pub(crate) fn encode_message_set(&self, set: &DynamicMessage) -> Result<Json> {
        let mut object = Map::new();
        for (extension, value) in set.extensions() {
            let (Kind::Message(payload_type), Some(payload)) = (extension.kind(), value.as_message())
            else {
                return Err(MappingError::invalid(
                    extension.full_name(),
                    "message-set extensions must carry messages",
                ));
            };
            object.insert(
                payload_type.name().to_string(),
                Json::Object(self.encode_object(payload)?),
            );
        }
        Ok(Json::Object(object))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::test_support::pool;

    fn outer_with_extras(extras: Json) -> Json {
        json!({ "name": "outer", "extras": extras })
    }

    #[test]
    fn test_registry_indexes_payloads_by_simple_name() {
        let registry = ExtensionRegistry::from_pool(&pool());
        assert_eq!(registry.type_names().collect::<Vec<_>>(), vec!["Flag", "Note"]);
        assert_eq!(
            registry.get("Note").map(|e| e.number()),
            Some(1001)
        );
        assert!(registry.get("test.Note").is_none());
    }

    #[test]
    fn test_register_ignores_unrelated_extensions() {
        let pool = pool();
        let mut registry = ExtensionRegistry::new();
        for extension in pool.all_extensions() {
            registry.register(extension);
        }
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_decode_installs_extension_payloads() {
        let pool = pool();
        let registry = ExtensionRegistry::from_pool(&pool);
        let mapper = JsonMapper::new(&registry);
        let outer = pool.get_message_by_name("test.Outer").unwrap();

        let message = mapper
            .decode(
                outer,
                &outer_with_extras(json!({ "Note": { "text": "hi" }, "Flag": { "enabled": 1 } })),
            )
            .unwrap();

        let extras = message.get_field_by_name("extras").unwrap();
        let extras = extras.as_message().unwrap();
        let note = registry.get("Note").unwrap();
        let payload = extras.get_extension(note);
        let payload = payload.as_message().unwrap();
        assert_eq!(
            payload.get_field_by_name("text").unwrap().as_str(),
            Some("hi")
        );
    }

    #[test]
    fn test_encode_keys_payloads_by_simple_name() {
        let pool = pool();
        let registry = ExtensionRegistry::from_pool(&pool);
        let mapper = JsonMapper::new(&registry);
        let outer = pool.get_message_by_name("test.Outer").unwrap();

        let input = outer_with_extras(json!({ "Note": { "text": "hi" } }));
        let message = mapper.decode(outer, &input).unwrap();
        assert_eq!(mapper.encode(&message).unwrap(), input);
    }

    #[test]
    fn test_unknown_type_name_is_lookup_failure() {
        let pool = pool();
        let registry = ExtensionRegistry::from_pool(&pool);
        let mapper = JsonMapper::new(&registry);
        let outer = pool.get_message_by_name("test.Outer").unwrap();

        let err = mapper
            .decode(outer, &outer_with_extras(json!({ "Missing": {} })))
            .unwrap_err();
        assert_eq!(err, MappingError::UnknownExtension("Missing".to_string()));
    }

    #[test]
    fn test_required_field_inside_payload_is_reported_with_extension_path() {
        let pool = pool();
        let registry = ExtensionRegistry::from_pool(&pool);
        let mapper = JsonMapper::new(&registry);
        let outer = pool.get_message_by_name("test.Outer").unwrap();

        let err = mapper
            .decode(outer, &outer_with_extras(json!({ "Flag": {} })))
            .unwrap_err();
        assert_eq!(
            err,
            MappingError::RequiredFieldMissing(vec![
                "extras.(test.Flag.message_set_extension).enabled".to_string()
            ])
        );
    }
}
