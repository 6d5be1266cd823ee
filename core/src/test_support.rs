//! A small schema covering every construct the mapper handles.

use std::sync::LazyLock;

use prost_reflect::DescriptorPool;
use prost_types::{DescriptorProto, FileDescriptorProto, MessageOptions};

use crate::descriptor::{Label, Type, enum_type, enumeration, extension, message, message_type, scalar};
use crate::message_set::{MESSAGE_SET_FILE_NAME, message_set_file};

static POOL: LazyLock<DescriptorPool> = LazyLock::new(|| {
    let mut pool = DescriptorPool::new();
    pool.add_file_descriptor_proto(message_set_file())
        .expect("message set file is valid");
    pool.add_file_descriptor_proto(test_file())
        .expect("test file is valid");
    pool
});

pub(crate) fn pool() -> DescriptorPool {
    POOL.clone()
}

fn test_file() -> FileDescriptorProto {
    use Label::{Optional, Repeated, Required};

    let scalars = message_type(
        "Scalars",
        vec![
            scalar("f_double", 1, Optional, Type::Double),
            scalar("f_float", 2, Optional, Type::Float),
            scalar("f_int32", 3, Optional, Type::Int32),
            scalar("f_int64", 4, Optional, Type::Int64),
            scalar("f_uint32", 5, Optional, Type::Uint32),
            scalar("f_uint64", 6, Optional, Type::Uint64),
            scalar("f_sint32", 7, Optional, Type::Sint32),
            scalar("f_sint64", 8, Optional, Type::Sint64),
            scalar("f_fixed32", 9, Optional, Type::Fixed32),
            scalar("f_fixed64", 10, Optional, Type::Fixed64),
            scalar("f_sfixed32", 11, Optional, Type::Sfixed32),
            scalar("f_sfixed64", 12, Optional, Type::Sfixed64),
            scalar("f_bool", 13, Optional, Type::Bool),
            scalar("f_string", 14, Optional, Type::String),
            scalar("f_bytes", 15, Optional, Type::Bytes),
            enumeration("color", 16, Optional, ".test.Color"),
            enumeration("colors", 17, Repeated, ".test.Color"),
            scalar("numbers", 18, Repeated, Type::Int32),
        ],
    );

    let inner = message_type(
        "Inner",
        vec![
            scalar("id", 1, Required, Type::Int32),
            scalar("label", 2, Optional, Type::String),
        ],
    );

    let outer = message_type(
        "Outer",
        vec![
            scalar("name", 1, Optional, Type::String),
            message("inner", 2, Optional, ".test.Inner"),
            message("items", 3, Repeated, ".test.Inner"),
            message("extras", 4, Optional, ".proto2.bridge.MessageSet"),
            enumeration("color", 5, Optional, ".test.Color"),
            scalar("tags", 6, Repeated, Type::String),
        ],
    );

    let labels_entry = DescriptorProto {
        options: Some(MessageOptions {
            map_entry: Some(true),
            ..Default::default()
        }),
        ..message_type(
            "LabelsEntry",
            vec![
                scalar("key", 1, Optional, Type::String),
                scalar("value", 2, Optional, Type::String),
            ],
        )
    };
    let labeled = DescriptorProto {
        nested_type: vec![labels_entry],
        ..message_type(
            "Labeled",
            vec![message("labels", 1, Repeated, ".test.Labeled.LabelsEntry")],
        )
    };

    // Payload types declare their extension inside themselves.
    let note = DescriptorProto {
        extension: vec![extension(
            "message_set_extension",
            1001,
            ".proto2.bridge.MessageSet",
            ".test.Note",
        )],
        ..message_type("Note", vec![scalar("text", 1, Optional, Type::String)])
    };
    let flag = DescriptorProto {
        extension: vec![extension(
            "message_set_extension",
            1002,
            ".proto2.bridge.MessageSet",
            ".test.Flag",
        )],
        ..message_type("Flag", vec![scalar("enabled", 1, Required, Type::Bool)])
    };

    FileDescriptorProto {
        name: Some("test.proto".to_string()),
        package: Some("test".to_string()),
        dependency: vec![MESSAGE_SET_FILE_NAME.to_string()],
        syntax: Some("proto2".to_string()),
        message_type: vec![scalars, inner, outer, labeled, note, flag],
        enum_type: vec![enum_type("Color", &[("RED", 0), ("GREEN", 1), ("BLUE", 2)])],
        ..Default::default()
    }
}
