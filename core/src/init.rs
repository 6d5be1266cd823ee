//! Required-field completeness checks.

use prost_reflect::{Cardinality, DynamicMessage, ReflectMessage, Value};

use crate::error::{MappingError, Result};

/// Lists every unset required field in `message`, recursing into set
/// nested messages, repeated message elements and extensions.
///
/// Paths are dotted from `message`: `field`, `parent.field`,
/// `list[2].field`, and `(extension.full.name).field` for extensions.
pub fn find_initialization_errors(message: &DynamicMessage) -> Vec<String> {
    let mut missing = Vec::new();
    collect(message, "", &mut missing);
    missing
}

pub(crate) fn check_initialized(message: &DynamicMessage) -> Result<()> {
    let missing = find_initialization_errors(message);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(MappingError::RequiredFieldMissing(missing))
    }
}

fn collect(message: &DynamicMessage, prefix: &str, missing: &mut Vec<String>) {
    let descriptor = message.descriptor();

    for field in descriptor.fields() {
        if field.cardinality() == Cardinality::Required && !message.has_field(&field) {
            missing.push(format!("{prefix}{}", field.name()));
        }
    }

    for field in descriptor.fields() {
        if !message.has_field(&field) {
            continue;
        }
        match &*message.get_field(&field) {
            Value::Message(nested) => {
                collect(nested, &format!("{prefix}{}.", field.name()), missing);
            }
            Value::List(elements) => {
                for (index, element) in elements.iter().enumerate() {
                    if let Value::Message(nested) = element {
                        let path = format!("{prefix}{}[{index}].", field.name());
                        collect(nested, &path, missing);
                    }
                }
            }
            _ => {}
        }
    }

    for (extension, value) in message.extensions() {
        if let Value::Message(nested) = value {
            let path = format!("{prefix}({}).", extension.full_name());
            collect(nested, &path, missing);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::pool;

    #[test]
    fn test_complete_message_has_no_errors() {
        let pool = pool();
        let mut inner = DynamicMessage::new(pool.get_message_by_name("test.Inner").unwrap());
        inner.set_field_by_name("id", Value::I32(1));
        assert!(find_initialization_errors(&inner).is_empty());
        assert_eq!(check_initialized(&inner), Ok(()));
    }

    #[test]
    fn test_unset_optional_messages_are_not_checked() {
        let pool = pool();
        let outer = DynamicMessage::new(pool.get_message_by_name("test.Outer").unwrap());
        assert!(find_initialization_errors(&outer).is_empty());
    }

    #[test]
    fn test_top_level_required_field_is_named() {
        let pool = pool();
        let inner = DynamicMessage::new(pool.get_message_by_name("test.Inner").unwrap());
        assert_eq!(find_initialization_errors(&inner), vec!["id".to_string()]);
    }
}
