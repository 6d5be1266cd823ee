//! Helpers for declaring proto2 schemas in code.
//!
//! Schemas are described with [`prost_types`] descriptor protos and loaded
//! into a [`prost_reflect::DescriptorPool`]. These constructors keep the
//! declarations short enough to read like the `.proto` file they replace.

use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
};

pub use prost_types::field_descriptor_proto::{Label, Type};

/// Declares a scalar field.
pub fn scalar(name: &str, number: i32, label: Label, ty: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(label as i32),
        r#type: Some(ty as i32),
        ..Default::default()
    }
}

/// Declares a message-typed field. `type_name` is fully qualified with a
/// leading dot, e.g. `.pkg.Message`.
pub fn message(name: &str, number: i32, label: Label, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(type_name.to_string()),
        ..scalar(name, number, label, Type::Message)
    }
}

/// Declares an enum-typed field. `type_name` is fully qualified with a
/// leading dot.
pub fn enumeration(name: &str, number: i32, label: Label, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(type_name.to_string()),
        ..scalar(name, number, label, Type::Enum)
    }
}

/// Declares a message-typed extension of `extendee`.
pub fn extension(
    name: &str,
    number: i32,
    extendee: &str,
    type_name: &str,
) -> FieldDescriptorProto {
    FieldDescriptorProto {
        extendee: Some(extendee.to_string()),
        ..message(name, number, Label::Optional, type_name)
    }
}

/// Declares a message type with the given fields.
pub fn message_type(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_string()),
        field: fields,
        ..Default::default()
    }
}

/// Declares an enum type from `(name, number)` pairs.
pub fn enum_type(name: &str, values: &[(&str, i32)]) -> EnumDescriptorProto {
    EnumDescriptorProto {
        name: Some(name.to_string()),
        value: values
            .iter()
            .map(|(value_name, number)| EnumValueDescriptorProto {
                name: Some((*value_name).to_string()),
                number: Some(*number),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}
