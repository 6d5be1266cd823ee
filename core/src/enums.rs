//! Conversion between enum numbers and symbolic enum names.
//!
//! Both directions are forgiving: a name that is not in the enum's value
//! table is parsed as a number, and a number without a name is passed
//! through unchanged. Producers can therefore send codes that a newer
//! schema revision introduced without breaking older readers.

use prost_reflect::EnumDescriptor;
use serde_json::Value as Json;

use crate::coerce;
use crate::error::{MappingError, Result};

/// Resolves a JSON enum value to its number.
///
/// Strings are looked up by name first; on a miss the same string is parsed
/// as an integer. Non-string values go through the integer coercion table.
///
/// # Errors
///
/// Returns [`MappingError::UnknownEnumValue`] if a string is neither a known
/// name nor an integer, and [`MappingError::InvalidValue`] if a non-string
/// value is not an integer.
pub fn name_to_number(enum_type: &EnumDescriptor, field: &str, value: &Json) -> Result<i32> {
    match value {
        Json::String(name) => match enum_type.get_value_by_name(name) {
            Some(known) => Ok(known.number()),
            None => name
                .trim()
                .parse::<i32>()
                .map_err(|_| MappingError::UnknownEnumValue {
                    enum_name: enum_type.full_name().to_string(),
                    value: name.clone(),
                }),
        },
        other => coerce::to_i32(other).map_err(|reason| MappingError::invalid(field, reason)),
    }
}

/// Renders an enum number as its symbolic name, or as the raw number when
/// the enum has no value with that number.
pub fn number_to_name(enum_type: &EnumDescriptor, number: i32) -> Json {
    match enum_type.get_value(number) {
        Some(known) => Json::String(known.name().to_string()),
        None => Json::from(number),
    }
}
