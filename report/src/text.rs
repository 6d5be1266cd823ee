//! Single-line rendering of field values, as used in CSV cells.
//!
//! The format follows the protobuf text format written on one line:
//! strings and bytes are C-escaped inside double quotes, enums print their
//! value name, and messages print as ` { name: value other { ... } }` with
//! a leading space. Set extensions print as `[full.extension.name] ...`,
//! ordered with the regular fields by field number.

use std::borrow::Cow;
use std::fmt::Write as _;

use prost_reflect::{DynamicMessage, FieldDescriptor, Kind, ReflectMessage, Value};

/// Renders one field of a message as a table cell.
///
/// Repeated fields render as `[a;b;c]`. An unset singular field renders its
/// default value.
pub fn format_cell(message: &DynamicMessage, field: &FieldDescriptor) -> String {
    let value = message.get_field(field);
    match &*value {
        Value::List(elements) => {
            let rendered: Vec<_> = elements
                .iter()
                .map(|element| format_value(field, element))
                .collect();
            format!("[{}]", rendered.join(";"))
        }
        single => format_value(field, single),
    }
}

/// Renders a single (non-list) value of `field`.
pub fn format_value(field: &FieldDescriptor, value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, &field.kind(), value);
    out
}

fn write_value(out: &mut String, kind: &Kind, value: &Value) {
    match value {
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::I32(n) => push_display(out, n),
        Value::I64(n) => push_display(out, n),
        Value::U32(n) => push_display(out, n),
        Value::U64(n) => push_display(out, n),
        Value::F32(f) => push_display(out, f),
        Value::F64(f) => push_display(out, f),
        Value::String(s) => {
            out.push('"');
            out.push_str(&c_escape(s.as_bytes()));
            out.push('"');
        }
        Value::Bytes(b) => {
            out.push('"');
            out.push_str(&c_escape(b));
            out.push('"');
        }
        Value::EnumNumber(number) => match kind {
            Kind::Enum(enum_type) => match enum_type.get_value(*number) {
                Some(known) => out.push_str(known.name()),
                None => push_display(out, number),
            },
            _ => push_display(out, number),
        },
        Value::Message(message) => write_message(out, message),
        Value::List(elements) => {
            for element in elements {
                write_value(out, kind, element);
            }
        }
        Value::Map(_) => out.push_str(" { }"),
    }
}

fn write_message(out: &mut String, message: &DynamicMessage) {
    out.push_str(" { ");
    let descriptor = message.descriptor();
    let fields = descriptor
        .fields()
        .filter(move |field| message.has_field(field))
        .map(move |field| {
            let value = message.get_field(&field);
            (field.number(), field.name().to_string(), field.kind(), value)
        });
    let extensions = message.extensions().map(|(extension, value)| {
        (
            extension.number(),
            format!("[{}]", extension.full_name()),
            extension.kind(),
            Cow::Borrowed(value),
        )
    });
    let mut entries: Vec<_> = fields.chain(extensions).collect();
    entries.sort_by_key(|(number, ..)| *number);

    for (_, name, kind, value) in &entries {
        let elements = match &**value {
            Value::List(elements) => elements.iter().collect::<Vec<_>>(),
            single => vec![single],
        };
        for element in elements {
            out.push_str(name);
            if element.as_message().is_none() {
                out.push_str(": ");
            }
            write_value(out, kind, element);
            out.push(' ');
        }
    }
    out.push('}');
}

fn push_display(out: &mut String, value: &impl std::fmt::Display) {
    // Writing to a String cannot fail.
    let _ = write!(out, "{value}");
}

/// Escapes bytes the way the protobuf text format does: `\n`, `\r`, `\t`,
/// quotes and backslash get short escapes, other non-printable bytes become
/// three-digit octal escapes.
///
/// ```
/// use snippet_report::c_escape;
///
/// assert_eq!(c_escape("tab\there \"q\"".as_bytes()), "tab\\there \\\"q\\\"");
/// assert_eq!(c_escape("é".as_bytes()), "\\303\\251");
/// ```
pub fn c_escape(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        match b {
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            b'"' => out.push_str("\\\""),
            b'\'' => out.push_str("\\'"),
            b'\\' => out.push_str("\\\\"),
            0x20..=0x7e => out.push(b as char),
            _ => {
                let _ = write!(out, "\\{b:03o}");
            }
        }
    }
    out
}
