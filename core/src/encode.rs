//! Message → JSON encoding.

use prost_reflect::{DynamicMessage, FieldDescriptor, ReflectMessage, Value};
use serde_json::{Map, Value as Json};

use crate::enums;
use crate::error::{MappingError, Result};
use crate::init;
use crate::mapper::{Conversion, JsonMapper};

impl JsonMapper<'_> {
    /// Renders `message` as a JSON object.
    ///
    /// By default only fields that are set appear, in declaration order.
    /// With [`MappingOptions::all_fields`](crate::MappingOptions::all_fields)
    /// every field appears: unset singular fields as `null` and unset
    /// repeated fields as `[]`.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::RequiredFieldMissing`] if any required field,
    /// nested ones included, is unset, and [`MappingError::UnsupportedType`]
    /// for fields the engine cannot map.
    pub fn encode(&self, message: &DynamicMessage) -> Result<Json> {
        let object = self.encode_object(message)?;
        init::check_initialized(message)?;
        Ok(Json::Object(object))
    }

    pub(crate) fn encode_object(&self, message: &DynamicMessage) -> Result<Map<String, Json>> {
        let mut object = Map::new();
        for field in message.descriptor().fields() {
            if message.has_field(&field) {
                let json = self.encode_field(&field, &message.get_field(&field))?;
                object.insert(field.name().to_string(), json);
            } else if self.options().all_fields {
                self.conversion(&field)?;
                let placeholder = if field.is_list() {
                    Json::Array(Vec::new())
                } else {
                    Json::Null
                };
                object.insert(field.name().to_string(), placeholder);
            }
        }
        Ok(object)
    }

    fn encode_field(&self, field: &FieldDescriptor, value: &Value) -> Result<Json> {
        let conversion = self.conversion(field)?;
        match value {
            Value::List(elements) => elements
                .iter()
                .map(|element| self.encode_value(field, &conversion, element))
                .collect::<Result<Vec<_>>>()
                .map(Json::Array),
            single => self.encode_value(field, &conversion, single),
        }
    }

    fn encode_value(
        &self,
        field: &FieldDescriptor,
        conversion: &Conversion,
        value: &Value,
    ) -> Result<Json> {
        let encoded = match conversion {
            Conversion::Message(_) => match value.as_message() {
                Some(nested) => Some(Json::Object(self.encode_object(nested)?)),
                None => None,
            },
            Conversion::MessageSet(_) => match value.as_message() {
                Some(set) => Some(self.encode_message_set(set)?),
                None => None,
            },
            Conversion::SymbolicEnum(enum_type) => value
                .as_enum_number()
                .map(|number| enums::number_to_name(enum_type, number)),
            Conversion::Scalar { encode, .. } => encode(value),
        };
        encoded.ok_or_else(|| {
            MappingError::invalid(field.full_name(), "stored value does not match the field type")
        })
    }
}
