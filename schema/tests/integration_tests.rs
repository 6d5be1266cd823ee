use prost::Message;
use prost_types::{DescriptorProto, FileDescriptorSet};
use serde_json::json;
use snippet_report_core::descriptor::{Label, Type, extension, message, message_type, scalar};
use snippet_report_core::{MappingError, MappingOptions, message_set_file};
use snippet_report_schema::{SchemaError, SchemaRegistry, report_schema, snippet_status_report_file};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn envelope_set() -> FileDescriptorSet {
    let audit = DescriptorProto {
        extension: vec![extension(
            "message_set_extension",
            100,
            ".proto2.bridge.MessageSet",
            ".ops.Audit",
        )],
        ..message_type("Audit", vec![scalar("actor", 1, Label::Required, Type::String)])
    };
    let envelope = message_type(
        "Envelope",
        vec![
            scalar("id", 1, Label::Optional, Type::Uint64),
            message("payload", 2, Label::Optional, ".proto2.bridge.MessageSet"),
        ],
    );

    FileDescriptorSet {
        file: vec![
            message_set_file(),
            prost_types::FileDescriptorProto {
                name: Some("ops.proto".to_string()),
                package: Some("ops".to_string()),
                dependency: vec![snippet_report_core::MESSAGE_SET_FILE_NAME.to_string()],
                syntax: Some("proto2".to_string()),
                message_type: vec![audit, envelope],
                ..Default::default()
            },
        ],
    }
}

// ---------------------------------------------------------------------------
// Descriptor-set loading
// ---------------------------------------------------------------------------

#[test]
fn test_descriptor_set_file_loading() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ops.desc");
    std::fs::write(&path, envelope_set().encode_to_vec()).unwrap();

    let registry = SchemaRegistry::from_descriptor_set_file(&path).unwrap();
    assert_eq!(registry.extensions().type_names().collect::<Vec<_>>(), vec!["Audit"]);

    let envelope = registry.message("ops.Envelope").unwrap();
    let mapper = registry.mapper(MappingOptions::new());
    let input = json!({ "id": 7, "payload": { "Audit": { "actor": "ci" } } });
    let decoded = mapper.decode(envelope, &input).unwrap();
    assert_eq!(mapper.encode(&decoded).unwrap(), input);
}

#[test]
fn test_message_set_survives_wire_encoding() {
    let registry =
        SchemaRegistry::from_descriptor_set_bytes(&envelope_set().encode_to_vec()).unwrap();
    let envelope = registry.message("ops.Envelope").unwrap();
    let mapper = registry.mapper(MappingOptions::new());
    let input = json!({ "id": 42, "payload": { "Audit": { "actor": "release-bot" } } });

    let bytes = mapper.decode(envelope.clone(), &input).unwrap().encode_to_vec();
    let decoded = prost_reflect::DynamicMessage::decode(envelope, bytes.as_slice()).unwrap();
    assert_eq!(mapper.encode(&decoded).unwrap(), input);
}

#[test]
fn test_missing_descriptor_set_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = SchemaRegistry::from_descriptor_set_file(dir.path().join("absent.desc")).unwrap_err();
    assert!(matches!(err, SchemaError::IoError(_)));
}

#[test]
fn test_required_field_inside_message_set_payload() {
    let registry =
        SchemaRegistry::from_descriptor_set_bytes(&envelope_set().encode_to_vec()).unwrap();
    let envelope = registry.message("ops.Envelope").unwrap();
    let err = registry
        .mapper(MappingOptions::new())
        .decode(envelope, &json!({ "payload": { "Audit": {} } }))
        .unwrap_err();
    assert_eq!(
        err,
        MappingError::RequiredFieldMissing(vec![
            "payload.(ops.Audit.message_set_extension).actor".to_string()
        ])
    );
}

// ---------------------------------------------------------------------------
// Built-in schema
// ---------------------------------------------------------------------------

#[test]
fn test_builtin_schema_matches_exported_file() {
    let schema = report_schema().unwrap();
    let rebuilt = SchemaRegistry::from_files([snippet_status_report_file()]).unwrap();
    let item = rebuilt.message("snippet_status_report.SnippetStatusItem").unwrap();
    assert_eq!(item.fields().count(), schema.item().fields().count());
}

#[test]
fn test_builtin_report_round_trip_with_enum_names() {
    let schema = report_schema().unwrap();
    let mapper = schema
        .registry()
        .mapper(MappingOptions::new().with_enum_names(true));

    let input = json!({
        "snippet_status": [{
            "buyer_creative_id": "creative-1",
            "source": "RTB",
            "status": "DISAPPROVED",
            "advertiser_id": [12345],
            "width": 300,
            "height": 250,
            "disapproval_reason": [{
                "reason": "PROBLEM_WITH_CLICK_MACRO",
                "detail": ["No click macro was declared in the snippet"],
            }],
            "snippet_filtering": {
                "date": "1900-01-01",
                "item": [{ "filtering_count": 200, "filtering_status": 1 }],
            },
            "is_ssl_capable": false,
        }]
    });

    let report = mapper.decode(schema.report().clone(), &input).unwrap();
    assert_eq!(mapper.encode(&report).unwrap(), input);
}

#[test]
fn test_builtin_report_requires_creative_id() {
    let schema = report_schema().unwrap();
    let err = schema
        .registry()
        .mapper(MappingOptions::new())
        .decode(
            schema.report().clone(),
            &json!({ "snippet_status": [{ "width": 1 }] }),
        )
        .unwrap_err();
    assert_eq!(
        err,
        MappingError::RequiredFieldMissing(vec!["snippet_status[0].buyer_creative_id".to_string()])
    );
}
