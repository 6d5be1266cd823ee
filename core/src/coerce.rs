//! Type coercion tables for scalar fields.
//!
//! Each scalar [`Kind`] has one decoder (JSON → field value) and one encoder
//! (field value → JSON). Message kinds have no entry: the mapping engine
//! handles them recursively. A field whose kind has no entry and is not
//! otherwise handled is reported as unsupported.
//!
//! Decoding is lenient in the way dynamic JSON producers need: integers
//! accept decimal strings and truncate floats, floats accept numeric strings,
//! booleans follow truthiness, and strings accept numbers and booleans.

use prost::bytes::Bytes;
use prost_reflect::{FieldDescriptor, Kind, Value};
use serde_json::Value as Json;

/// Converts one JSON scalar into a field value. The error is a human-readable
/// reason; the caller attaches the field name.
pub type Decoder = fn(&Json) -> Result<Value, String>;

/// Converts one field value into JSON. Returns `None` if the value does not
/// match the kind the encoder was selected for.
pub type Encoder = fn(&Value) -> Option<Json>;

/// Looks up the decoder for a field kind.
///
/// Enums decode from integers here; symbolic enum names are handled by the
/// [enum codec](crate::enums) when enabled.
pub fn decoder(kind: &Kind) -> Option<Decoder> {
    let decoder: Decoder = match kind {
        Kind::Double => |v| to_f64(v).map(Value::F64),
        Kind::Float => |v| to_f64(v).map(|f| Value::F32(f as f32)),
        Kind::Int32 | Kind::Sint32 | Kind::Sfixed32 => |v| to_i32(v).map(Value::I32),
        Kind::Int64 | Kind::Sint64 | Kind::Sfixed64 => |v| to_i64(v).map(Value::I64),
        Kind::Uint32 | Kind::Fixed32 => |v| to_u32(v).map(Value::U32),
        Kind::Uint64 | Kind::Fixed64 => |v| to_u64(v).map(Value::U64),
        Kind::Bool => |v| Ok(Value::Bool(truthy(v))),
        Kind::String => |v| to_text(v).map(Value::String),
        Kind::Bytes => |v| match v {
            Json::String(s) => unescape_bytes(s).map(|b| Value::Bytes(Bytes::from(b))),
            _ => Err("bytes fields require an escaped string".to_string()),
        },
        Kind::Enum(_) => |v| to_i32(v).map(Value::EnumNumber),
        Kind::Message(_) => return None,
    };
    Some(decoder)
}

/// Looks up the encoder for a field kind.
pub fn encoder(kind: &Kind) -> Option<Encoder> {
    let encoder: Encoder = match kind {
        Kind::Double => |v| v.as_f64().map(float_to_json),
        Kind::Float => |v| v.as_f32().map(|f| float_to_json(f as f64)),
        Kind::Int32 | Kind::Sint32 | Kind::Sfixed32 => |v| v.as_i32().map(Json::from),
        Kind::Int64 | Kind::Sint64 | Kind::Sfixed64 => |v| v.as_i64().map(Json::from),
        Kind::Uint32 | Kind::Fixed32 => |v| v.as_u32().map(Json::from),
        Kind::Uint64 | Kind::Fixed64 => |v| v.as_u64().map(Json::from),
        Kind::Bool => |v| v.as_bool().map(Json::Bool),
        Kind::String => |v| v.as_str().map(|s| Json::String(s.to_string())),
        Kind::Bytes => |v| v.as_bytes().map(|b| Json::String(escape_bytes(b))),
        Kind::Enum(_) => |v| v.as_enum_number().map(Json::from),
        Kind::Message(_) => return None,
    };
    Some(encoder)
}

/// Returns the schema type tag of a field, as written in `.proto` files.
pub fn type_tag(field: &FieldDescriptor) -> &'static str {
    if field.is_map() {
        return "map";
    }
    if field.is_group() {
        return "group";
    }
    match field.kind() {
        Kind::Double => "double",
        Kind::Float => "float",
        Kind::Int32 => "int32",
        Kind::Int64 => "int64",
        Kind::Uint32 => "uint32",
        Kind::Uint64 => "uint64",
        Kind::Sint32 => "sint32",
        Kind::Sint64 => "sint64",
        Kind::Fixed32 => "fixed32",
        Kind::Fixed64 => "fixed64",
        Kind::Sfixed32 => "sfixed32",
        Kind::Sfixed64 => "sfixed64",
        Kind::Bool => "bool",
        Kind::String => "string",
        Kind::Bytes => "bytes",
        Kind::Message(_) => "message",
        Kind::Enum(_) => "enum",
    }
}

fn to_f64(value: &Json) -> Result<f64, String> {
    match value {
        Json::Number(n) => n
            .as_f64()
            .ok_or_else(|| format!("{n} is not representable as a float")),
        Json::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("could not convert '{s}' to float")),
        Json::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        other => Err(format!("cannot convert {other} to float")),
    }
}

pub(crate) fn to_i64(value: &Json) -> Result<i64, String> {
    match value {
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else if n.is_u64() {
                Err(format!("{n} is out of range for a signed 64-bit integer"))
            } else {
                truncate(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Json::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("invalid literal for integer: '{s}'")),
        Json::Bool(b) => Ok(i64::from(*b)),
        other => Err(format!("cannot convert {other} to integer")),
    }
}

fn to_u64(value: &Json) -> Result<u64, String> {
    match value {
        Json::Number(n) => {
            if let Some(u) = n.as_u64() {
                Ok(u)
            } else if n.is_i64() {
                Err(format!("{n} is out of range for an unsigned integer"))
            } else {
                let i = truncate(n.as_f64().unwrap_or(f64::NAN))?;
                u64::try_from(i).map_err(|_| format!("{n} is out of range for an unsigned integer"))
            }
        }
        Json::String(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| format!("invalid literal for unsigned integer: '{s}'")),
        Json::Bool(b) => Ok(u64::from(*b)),
        other => Err(format!("cannot convert {other} to unsigned integer")),
    }
}

pub(crate) fn to_i32(value: &Json) -> Result<i32, String> {
    let wide = to_i64(value)?;
    i32::try_from(wide).map_err(|_| format!("{wide} is out of range for a 32-bit integer"))
}

fn to_u32(value: &Json) -> Result<u32, String> {
    let wide = to_u64(value)?;
    u32::try_from(wide)
        .map_err(|_| format!("{wide} is out of range for an unsigned 32-bit integer"))
}

fn truncate(f: f64) -> Result<i64, String> {
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
    if f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Ok(f.trunc() as i64)
    } else {
        Err(format!("cannot convert float {f} to integer"))
    }
}

fn truthy(value: &Json) -> bool {
    match value {
        Json::Null => false,
        Json::Bool(b) => *b,
        Json::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Json::String(s) => !s.is_empty(),
        Json::Array(items) => !items.is_empty(),
        Json::Object(map) => !map.is_empty(),
    }
}

fn to_text(value: &Json) -> Result<String, String> {
    match value {
        Json::String(s) => Ok(s.clone()),
        Json::Number(n) => Ok(n.to_string()),
        Json::Bool(true) => Ok("True".to_string()),
        Json::Bool(false) => Ok("False".to_string()),
        other => Err(format!("cannot convert {other} to text")),
    }
}

fn float_to_json(f: f64) -> Json {
    match serde_json::Number::from_f64(f) {
        Some(n) => Json::Number(n),
        None if f.is_nan() => Json::String("NaN".to_string()),
        None if f > 0.0 => Json::String("Infinity".to_string()),
        None => Json::String("-Infinity".to_string()),
    }
}

/// Escapes raw bytes into a printable ASCII form.
///
/// Backslash, single quote, tab, newline and carriage return get their
/// short escapes; every other byte outside printable ASCII becomes `\xHH`.
/// [`unescape_bytes`] reverses this.
///
/// ```
/// use snippet_report_core::coerce::escape_bytes;
///
/// assert_eq!(escape_bytes(b"it's\n\x00"), "it\\'s\\n\\x00");
/// ```
pub fn escape_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'\'' => out.push_str("\\'"),
            b'\t' => out.push_str("\\t"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            0x20..=0x7e => out.push(b as char),
            _ => out.push_str(&format!("\\x{b:02x}")),
        }
    }
    out
}

/// Parses the printable escape form back into raw bytes.
///
/// Accepts the escapes produced by [`escape_bytes`] plus `\"`, `\a`, `\b`,
/// `\f`, `\v`, and one-to-three digit octal escapes. An unrecognized escape
/// is kept literally, backslash included.
///
/// # Errors
///
/// Returns a reason string for a truncated `\x` escape.
pub fn unescape_bytes(text: &str) -> Result<Vec<u8>, String> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b != b'\\' || i + 1 == bytes.len() {
            out.push(b);
            i += 1;
            continue;
        }

        let escape = bytes[i + 1];
        i += 2;
        match escape {
            b'\\' => out.push(b'\\'),
            b'\'' => out.push(b'\''),
            b'"' => out.push(b'"'),
            b'a' => out.push(0x07),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0c),
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'v' => out.push(0x0b),
            b'\n' => {}
            b'x' => {
                let hex = bytes
                    .get(i..i + 2)
                    .and_then(|h| std::str::from_utf8(h).ok())
                    .and_then(|h| u8::from_str_radix(h, 16).ok())
                    .ok_or_else(|| format!("invalid \\x escape at byte {}", i - 2))?;
                out.push(hex);
                i += 2;
            }
            b'0'..=b'7' => {
                let mut code = u32::from(escape - b'0');
                let mut digits = 1;
                while digits < 3 && i < bytes.len() && (b'0'..=b'7').contains(&bytes[i]) {
                    code = code * 8 + u32::from(bytes[i] - b'0');
                    i += 1;
                    digits += 1;
                }
                out.push((code & 0xff) as u8);
            }
            other => {
                out.push(b'\\');
                out.push(other);
            }
        }
    }

    Ok(out)
}
