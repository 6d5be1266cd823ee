//! The [`JsonMapper`] entry point and per-field conversion selection.

use prost_reflect::{EnumDescriptor, FieldDescriptor, Kind, MessageDescriptor};

use crate::coerce::{self, Decoder, Encoder};
use crate::error::{MappingError, Result};
use crate::message_set::{ExtensionRegistry, is_message_set};

/// Flags controlling how values are mapped.
///
/// # Examples
///
/// ```
/// use snippet_report_core::MappingOptions;
///
/// let options = MappingOptions::new().with_enum_names(true);
/// assert!(options.use_enum_names);
/// assert!(!options.all_fields);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MappingOptions {
    /// Map enums through their symbolic names instead of their numbers.
    pub use_enum_names: bool,
    /// When encoding, emit every schema field: unset optional fields become
    /// `null` and unset repeated fields become `[]`.
    pub all_fields: bool,
}

impl MappingOptions {
    /// Creates options with numeric enums and present-fields-only encoding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets [`use_enum_names`](Self::use_enum_names).
    pub fn with_enum_names(mut self, enabled: bool) -> Self {
        self.use_enum_names = enabled;
        self
    }

    /// Sets [`all_fields`](Self::all_fields).
    pub fn with_all_fields(mut self, enabled: bool) -> Self {
        self.all_fields = enabled;
        self
    }
}

/// Schema-driven converter between JSON values and
/// [`DynamicMessage`](prost_reflect::DynamicMessage)s.
///
/// The mapper is generic over message types: it walks the message's
/// descriptor at runtime, so any schema loaded into a descriptor pool can be
/// mapped without generated code. Message-set content resolves its type
/// names through the borrowed [`ExtensionRegistry`].
///
/// See [`decode`](Self::decode) and [`encode`](Self::encode).
#[derive(Debug, Clone, Copy)]
pub struct JsonMapper<'a> {
    extensions: &'a ExtensionRegistry,
    options: MappingOptions,
}

impl<'a> JsonMapper<'a> {
    /// Creates a mapper with default [`MappingOptions`].
    pub fn new(extensions: &'a ExtensionRegistry) -> Self {
        Self {
            extensions,
            options: MappingOptions::default(),
        }
    }

    /// Replaces the mapping options.
    pub fn with_options(mut self, options: MappingOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the active mapping options.
    pub fn options(&self) -> MappingOptions {
        self.options
    }

    /// Returns the registry used to resolve message-set type names.
    pub fn extensions(&self) -> &'a ExtensionRegistry {
        self.extensions
    }

    /// Selects how values of `field` are converted, in both directions.
    pub(crate) fn conversion(&self, field: &FieldDescriptor) -> Result<Conversion> {
        if field.is_map() {
            return Err(unsupported(field));
        }
        match field.kind() {
            Kind::Message(message) if is_message_set(field) => Ok(Conversion::MessageSet(message)),
            Kind::Message(message) => Ok(Conversion::Message(message)),
            Kind::Enum(enum_type) if self.options.use_enum_names => {
                Ok(Conversion::SymbolicEnum(enum_type))
            }
            kind => match (coerce::decoder(&kind), coerce::encoder(&kind)) {
                (Some(decode), Some(encode)) => Ok(Conversion::Scalar { decode, encode }),
                _ => Err(unsupported(field)),
            },
        }
    }
}

/// How one field's values are converted.
pub(crate) enum Conversion {
    /// Nested message or group, mapped recursively.
    Message(MessageDescriptor),
    /// Message-set container, mapped through the extension registry.
    MessageSet(MessageDescriptor),
    /// Enum mapped through its value names.
    SymbolicEnum(EnumDescriptor),
    /// Scalar mapped through the coercion tables.
    Scalar { decode: Decoder, encode: Encoder },
}

fn unsupported(field: &FieldDescriptor) -> MappingError {
    MappingError::UnsupportedType {
        message: field.parent_message().full_name().to_string(),
        field: field.name().to_string(),
        kind: coerce::type_tag(field).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::pool;

    fn field(message: &str, name: &str) -> FieldDescriptor {
        pool()
            .get_message_by_name(message)
            .unwrap()
            .get_field_by_name(name)
            .unwrap()
    }

    #[test]
    fn test_unsupported_type_names_owning_message() {
        let registry = ExtensionRegistry::new();
        let mapper = JsonMapper::new(&registry);
        let err = mapper
            .conversion(&field("test.Labeled", "labels"))
            .err()
            .unwrap();
        assert_eq!(
            err,
            MappingError::UnsupportedType {
                message: "test.Labeled".to_string(),
                field: "labels".to_string(),
                kind: "map".to_string(),
            }
        );
    }

    #[test]
    fn test_conversion_selection() {
        let registry = ExtensionRegistry::new();
        let numeric = JsonMapper::new(&registry);
        let symbolic = numeric.with_options(MappingOptions::new().with_enum_names(true));

        assert!(matches!(
            numeric.conversion(&field("test.Outer", "inner")),
            Ok(Conversion::Message(_))
        ));
        assert!(matches!(
            numeric.conversion(&field("test.Outer", "extras")),
            Ok(Conversion::MessageSet(_))
        ));
        assert!(matches!(
            numeric.conversion(&field("test.Outer", "color")),
            Ok(Conversion::Scalar { .. })
        ));
        assert!(matches!(
            symbolic.conversion(&field("test.Outer", "color")),
            Ok(Conversion::SymbolicEnum(_))
        ));
    }
}
