//! JSON → message decoding.

use prost_reflect::{DynamicMessage, FieldDescriptor, MessageDescriptor, ReflectMessage, Value};
use serde_json::Value as Json;

use crate::enums;
use crate::error::{MappingError, Result};
use crate::init;
use crate::mapper::{Conversion, JsonMapper};

impl JsonMapper<'_> {
    /// Builds a new message of type `descriptor` from `json`.
    ///
    /// A message is returned only if the whole conversion succeeded and no
    /// required field is left unset.
    ///
    /// # Errors
    ///
    /// Fails on the first field that cannot be converted; see
    /// [`decode_into`](Self::decode_into).
    pub fn decode(&self, descriptor: MessageDescriptor, json: &Json) -> Result<DynamicMessage> {
        let mut message = DynamicMessage::new(descriptor);
        self.decode_into(&mut message, json)?;
        Ok(message)
    }

    /// Populates `message` from the keys of `json` that name its fields.
    ///
    /// Keys without a matching field are ignored and a `null` value leaves
    /// its field unset. Repeated fields are appended to, in input order.
    /// After a failure `message` may be partially populated and must be
    /// discarded.
    ///
    /// # Errors
    ///
    /// - [`MappingError::UnexpectedShape`] if `json` or a nested value has the
    ///   wrong JSON type
    /// - [`MappingError::UnsupportedType`] for fields the engine cannot map
    /// - [`MappingError::InvalidValue`] if a scalar cannot be coerced
    /// - [`MappingError::UnknownEnumValue`] / [`MappingError::UnknownExtension`]
    ///   for failed lookups
    /// - [`MappingError::RequiredFieldMissing`] listing every unset required
    ///   field, nested ones included
    pub fn decode_into(&self, message: &mut DynamicMessage, json: &Json) -> Result<()> {
        self.merge_object(message, json)?;
        init::check_initialized(message)
    }

    /// Decodes without the final required-field check, so that nested
    /// messages are checked once from the top with full paths.
    pub(crate) fn merge_object(&self, message: &mut DynamicMessage, json: &Json) -> Result<()> {
        let descriptor = message.descriptor();
        let object = json
            .as_object()
            .ok_or_else(|| MappingError::shape(descriptor.full_name(), "object", json))?;

        for field in descriptor.fields() {
            let Some(raw) = object.get(field.name()) else {
                continue;
            };
            if raw.is_null() {
                continue;
            }
            let conversion = self.conversion(&field)?;

            if field.is_list() {
                let elements = raw
                    .as_array()
                    .ok_or_else(|| MappingError::shape(field.full_name(), "array", raw))?;
                let decoded = elements
                    .iter()
                    .map(|element| self.decode_value(&field, &conversion, element))
                    .collect::<Result<Vec<_>>>()?;
                match message.get_field_mut(&field).as_list_mut() {
                    Some(list) => list.extend(decoded),
                    None => return Err(MappingError::invalid(field.full_name(), "not a list")),
                }
            } else {
                let value = self.decode_value(&field, &conversion, raw)?;
                message
                    .try_set_field(&field, value)
                    .map_err(|err| MappingError::invalid(field.full_name(), err.to_string()))?;
            }
        }
        Ok(())
    }

    fn decode_value(
        &self,
        field: &FieldDescriptor,
        conversion: &Conversion,
        raw: &Json,
    ) -> Result<Value> {
        match conversion {
            Conversion::Message(nested_type) => {
                let mut nested = DynamicMessage::new(nested_type.clone());
                self.merge_object(&mut nested, raw)?;
                Ok(Value::Message(nested))
            }
            Conversion::MessageSet(set_type) => {
                let mut set = DynamicMessage::new(set_type.clone());
                self.merge_message_set(&mut set, raw)?;
                Ok(Value::Message(set))
            }
            Conversion::SymbolicEnum(enum_type) => {
                expect_scalar(field, raw)?;
                enums::name_to_number(enum_type, field.full_name(), raw).map(Value::EnumNumber)
            }
            Conversion::Scalar { decode, .. } => {
                expect_scalar(field, raw)?;
                decode(raw).map_err(|reason| MappingError::invalid(field.full_name(), reason))
            }
        }
    }
}

// Nulls only reach here as list elements.
fn expect_scalar(field: &FieldDescriptor, raw: &Json) -> Result<()> {
    match raw {
        Json::Null | Json::Array(_) | Json::Object(_) => {
            Err(MappingError::shape(field.full_name(), "scalar", raw))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::mapper::MappingOptions;
    use crate::message_set::ExtensionRegistry;
    use crate::test_support::pool;

    fn decode(type_name: &str, options: MappingOptions, json: Json) -> Result<DynamicMessage> {
        let pool = pool();
        let registry = ExtensionRegistry::from_pool(&pool);
        let descriptor = pool.get_message_by_name(type_name).unwrap();
        JsonMapper::new(&registry)
            .with_options(options)
            .decode(descriptor, &json)
    }

    fn field(message: &DynamicMessage, name: &str) -> Value {
        message.get_field_by_name(name).unwrap().into_owned()
    }

    #[test]
    fn test_decode_scalars_through_coercion_tables() {
        let message = decode(
            "test.Scalars",
            MappingOptions::new(),
            json!({
                "f_double": "1.5",
                "f_int64": "12345",
                "f_uint32": 7,
                "f_sint32": -3.7,
                "f_bool": "false",
                "f_string": 42,
                "f_bytes": "a\\x00b",
                "color": 2,
            }),
        )
        .unwrap();

        assert_eq!(field(&message, "f_double"), Value::F64(1.5));
        assert_eq!(field(&message, "f_int64"), Value::I64(12345));
        assert_eq!(field(&message, "f_uint32"), Value::U32(7));
        assert_eq!(field(&message, "f_sint32"), Value::I32(-3));
        assert_eq!(field(&message, "f_bool"), Value::Bool(true));
        assert_eq!(field(&message, "f_string"), Value::String("42".to_string()));
        assert_eq!(
            field(&message, "f_bytes"),
            Value::Bytes(prost::bytes::Bytes::from_static(b"a\x00b"))
        );
        assert_eq!(field(&message, "color"), Value::EnumNumber(2));
    }

    #[test]
    fn test_absent_and_null_fields_stay_unset() {
        let message = decode(
            "test.Outer",
            MappingOptions::new(),
            json!({ "name": null, "unknown_key": 5 }),
        )
        .unwrap();
        assert!(!message.has_field_by_name("name"));
        assert_eq!(message.descriptor().full_name(), "test.Outer");
    }

    #[test]
    fn test_repeated_fields_preserve_order() {
        let message = decode(
            "test.Outer",
            MappingOptions::new(),
            json!({
                "tags": ["b", "a", "c"],
                "items": [{ "id": 3 }, { "id": 1 }],
            }),
        )
        .unwrap();

        let tags = field(&message, "tags");
        let tags: Vec<_> = tags
            .as_list()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap().to_string())
            .collect();
        assert_eq!(tags, vec!["b", "a", "c"]);

        let items = field(&message, "items");
        let ids: Vec<_> = items
            .as_list()
            .unwrap()
            .iter()
            .map(|v| v.as_message().unwrap().get_field_by_name("id").unwrap().as_i32())
            .collect();
        assert_eq!(ids, vec![Some(3), Some(1)]);
    }

    #[test]
    fn test_decode_into_appends_to_existing_lists() {
        let pool = pool();
        let registry = ExtensionRegistry::from_pool(&pool);
        let mapper = JsonMapper::new(&registry);
        let outer = pool.get_message_by_name("test.Outer").unwrap();

        let mut message = mapper.decode(outer, &json!({ "tags": ["a"] })).unwrap();
        mapper
            .decode_into(&mut message, &json!({ "tags": ["b"] }))
            .unwrap();
        assert_eq!(field(&message, "tags").as_list().map(|l| l.len()), Some(2));
    }

    #[test]
    fn test_symbolic_enums_with_numeric_fallback() {
        let options = MappingOptions::new().with_enum_names(true);
        let message = decode(
            "test.Scalars",
            options,
            json!({ "color": "GREEN", "colors": ["BLUE", "0", 9] }),
        )
        .unwrap();

        assert_eq!(field(&message, "color"), Value::EnumNumber(1));
        assert_eq!(
            field(&message, "colors"),
            Value::List(vec![
                Value::EnumNumber(2),
                Value::EnumNumber(0),
                Value::EnumNumber(9),
            ])
        );
    }

    #[test]
    fn test_enum_names_rejected_without_symbolic_mode() {
        let err = decode("test.Scalars", MappingOptions::new(), json!({ "color": "GREEN" }))
            .unwrap_err();
        assert!(matches!(err, MappingError::InvalidValue { ref field, .. } if field == "test.Scalars.color"));
    }

    #[test]
    fn test_unknown_enum_name_fails() {
        let err = decode(
            "test.Scalars",
            MappingOptions::new().with_enum_names(true),
            json!({ "color": "PURPLE" }),
        )
        .unwrap_err();
        assert!(matches!(err, MappingError::UnknownEnumValue { .. }));
    }

    #[test]
    fn test_missing_required_field_is_reported_with_path() {
        let err = decode(
            "test.Outer",
            MappingOptions::new(),
            json!({ "inner": { "label": "x" }, "items": [{ "id": 1 }, {}] }),
        )
        .unwrap_err();
        assert_eq!(
            err,
            MappingError::RequiredFieldMissing(vec![
                "inner.id".to_string(),
                "items[1].id".to_string(),
            ])
        );
    }

    #[test]
    fn test_map_fields_are_unsupported() {
        let err = decode(
            "test.Labeled",
            MappingOptions::new(),
            json!({ "labels": [{ "key": "k", "value": "v" }] }),
        )
        .unwrap_err();
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
    fn test_shape_mismatches_are_rejected() {
        let err = decode("test.Outer", MappingOptions::new(), json!(["not", "an", "object"]))
            .unwrap_err();
        assert_eq!(
            err,
            MappingError::UnexpectedShape {
                field: "test.Outer".to_string(),
                expected: "object",
                found: "array",
            }
        );

        let err = decode("test.Outer", MappingOptions::new(), json!({ "tags": "solo" }))
            .unwrap_err();
        assert!(matches!(err, MappingError::UnexpectedShape { expected: "array", .. }));

        let err = decode("test.Outer", MappingOptions::new(), json!({ "name": ["a"] }))
            .unwrap_err();
        assert!(matches!(err, MappingError::UnexpectedShape { expected: "scalar", .. }));

        let err = decode("test.Outer", MappingOptions::new(), json!({ "tags": ["a", null] }))
            .unwrap_err();
        assert!(matches!(err, MappingError::UnexpectedShape { found: "null", .. }));
    }
}
