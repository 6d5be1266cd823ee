//! Descriptor pools paired with their message-set extension index.
//!
//! A [`SchemaRegistry`] is built once, at load time, from either
//! programmatic file descriptors or a serialized `FileDescriptorSet` (as
//! written by `protoc --descriptor_set_out`). All later lookups are by name
//! against the immutable pool.
//!
//! ```
//! use snippet_report_schema::SchemaRegistry;
//!
//! let registry = SchemaRegistry::from_files(Vec::new()).unwrap();
//! assert!(registry.message("proto2.bridge.MessageSet").is_ok());
//! assert!(registry.message("missing.Type").is_err());
//! ```

use std::path::Path;

use prost_reflect::{DescriptorPool, MessageDescriptor};
use prost_types::FileDescriptorProto;
use snippet_report_core::{
    ExtensionRegistry, JsonMapper, MESSAGE_SET_FILE_NAME, MappingOptions, message_set_file,
};
use tracing::debug;

use crate::error::{Result, SchemaError};

/// A descriptor pool and the message-set extensions it declares.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    pool: DescriptorPool,
    extensions: ExtensionRegistry,
}

impl SchemaRegistry {
    /// Builds a registry from file descriptors.
    ///
    /// The message-set marker file is added automatically unless one of the
    /// files already declares it. Files may be given in any order.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidDescriptor`] if the files do not form a
    /// valid, fully linked schema.
    pub fn from_files(files: impl IntoIterator<Item = FileDescriptorProto>) -> Result<Self> {
        let mut files: Vec<_> = files.into_iter().collect();
        if !files
            .iter()
            .any(|file| file.name() == MESSAGE_SET_FILE_NAME)
        {
            files.insert(0, message_set_file());
        }

        let mut pool = DescriptorPool::new();
        pool.add_file_descriptor_protos(files)?;
        Ok(Self::from_pool(pool))
    }

    /// Builds a registry from an encoded `FileDescriptorSet`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidDescriptor`] if the bytes do not decode
    /// to a valid descriptor set.
    pub fn from_descriptor_set_bytes(bytes: &[u8]) -> Result<Self> {
        let pool = DescriptorPool::decode(bytes)?;
        Ok(Self::from_pool(pool))
    }

    /// Builds a registry from a `FileDescriptorSet` file on disk.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::IoError`] if the file cannot be read, or
    /// [`SchemaError::InvalidDescriptor`] if it is not a descriptor set.
    pub fn from_descriptor_set_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        debug!(path = %path.display(), bytes = bytes.len(), "loading descriptor set");
        Self::from_descriptor_set_bytes(&bytes)
    }

    /// Wraps an already-built pool, indexing its message-set extensions.
    pub fn from_pool(pool: DescriptorPool) -> Self {
        let extensions = ExtensionRegistry::from_pool(&pool);
        debug!(
            files = pool.files().len(),
            message_set_types = extensions.len(),
            "schema registry built"
        );
        Self { pool, extensions }
    }

    /// Looks up a message type by fully-qualified name.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MessageNotFound`] if no such message exists.
    pub fn message(&self, full_name: &str) -> Result<MessageDescriptor> {
        self.pool
            .get_message_by_name(full_name)
            .ok_or_else(|| SchemaError::MessageNotFound(full_name.to_string()))
    }

    /// Returns the underlying descriptor pool.
    pub fn pool(&self) -> &DescriptorPool {
        &self.pool
    }

    /// Returns the message-set extension index.
    pub fn extensions(&self) -> &ExtensionRegistry {
        &self.extensions
    }

    /// Returns a mapper over this registry's extensions.
    pub fn mapper(&self, options: MappingOptions) -> JsonMapper<'_> {
        JsonMapper::new(&self.extensions).with_options(options)
    }
}
