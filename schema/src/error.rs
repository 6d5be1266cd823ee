//! Error types for schema loading.

use thiserror::Error;

/// Errors that can occur while building or loading a schema registry.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A descriptor set could not be decoded or its files do not link.
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(#[from] prost_reflect::DescriptorError),

    /// The requested message type is not in the registry.
    #[error("message type '{0}' not found")]
    MessageNotFound(String),

    /// The built-in schema failed to build. Carries the rendered cause,
    /// since the original error is owned by the process-wide cache.
    #[error("built-in schema is invalid: {0}")]
    BuiltIn(String),
}

/// Convenience alias for results with [`SchemaError`].
pub type Result<T> = std::result::Result<T, SchemaError>;
