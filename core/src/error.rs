//! Error types for JSON ↔ message mapping.
//!
//! Every failure aborts the conversion of the message being processed; the
//! engine never recovers locally or collects more than one error.

use thiserror::Error;

/// Errors that can occur while mapping between JSON and dynamic messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// The field's type has no coercion entry and is not a message or enum
    /// handled by the engine (e.g. map fields).
    #[error("field {message}.{field} of type '{kind}' is not supported")]
    UnsupportedType {
        message: String,
        field: String,
        kind: String,
    },

    /// One or more required fields were left unset after a conversion.
    #[error("required fields missing: {}", .0.join(", "))]
    RequiredFieldMissing(Vec<String>),

    /// A symbolic enum value was neither a known name nor a numeric code.
    #[error("unknown value '{value}' for enum {enum_name}")]
    UnknownEnumValue { enum_name: String, value: String },

    /// A message-set type name did not resolve to a registered extension.
    #[error("no message-set extension registered for type '{0}'")]
    UnknownExtension(String),

    /// A scalar value could not be converted to the field's type.
    #[error("invalid value for field {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    /// The JSON value has the wrong shape for the field (e.g. an object where
    /// a list is expected).
    #[error("expected {expected} for field {field}, found {found}")]
    UnexpectedShape {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl MappingError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn shape(
        field: impl Into<String>,
        expected: &'static str,
        found: &serde_json::Value,
    ) -> Self {
        Self::UnexpectedShape {
            field: field.into(),
            expected,
            found: json_type_name(found),
        }
    }
}

/// Returns a short name for the JSON type of `value`, used in error messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Convenience alias for results with [`MappingError`].
pub type Result<T> = std::result::Result<T, MappingError>;
