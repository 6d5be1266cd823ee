//! Building a `SnippetStatusReport` from a creative listing.
//!
//! Each listing item goes through the same steps, in order:
//!
//! 1. keys are renamed to schema field names ([`rename_fields`]);
//! 2. SSL capability is computed from the renamed item, before any
//!    correction is removed;
//! 3. `FLASHLESS_ATTRIBUTE` corrections are removed;
//! 4. the corrected item is decoded into a `SnippetStatusItem`;
//! 5. `source` is set to `RTB` and `is_ssl_capable` to the result of step 2.
//!
//! Items keep their listing order in the report.

use prost_reflect::{DynamicMessage, Kind, Value};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use snippet_report_core::{JsonMapper, MappingError, MappingOptions};
use snippet_report_schema::ReportSchema;
use tracing::{debug, info, warn};

use crate::corrections::{is_ssl_capable, remove_flashless_corrections};
use crate::error::{ReportError, Result};
use crate::rename::{RenameTable, rename_fields};

/// Source tag stamped on every item.
pub const SOURCE_TAG: &str = "RTB";

/// What to do when one listing item cannot be mapped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemErrorPolicy {
    /// Fail the whole report.
    #[default]
    Abort,
    /// Log the item at `warn` level and leave it out of the report.
    Skip,
}

/// Settings for [`generate_report`].
#[derive(Debug, Clone)]
pub struct AssemblyOptions {
    pub renames: RenameTable,
    /// Decode enum fields from their value names.
    pub use_enum_names: bool,
    pub on_item_error: ItemErrorPolicy,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            renames: RenameTable::builtin().clone(),
            use_enum_names: true,
            on_item_error: ItemErrorPolicy::Abort,
        }
    }
}

/// Item counts from one [`generate_report`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AssemblyStats {
    pub items_seen: usize,
    pub items_written: usize,
    pub items_skipped: usize,
}

/// A populated report message and how it was built.
#[derive(Debug, Clone)]
pub struct AssembledReport {
    pub message: DynamicMessage,
    pub stats: AssemblyStats,
}

/// Builds a report from a creative `listing`.
///
/// A listing without an `items` key yields an empty report.
///
/// # Errors
///
/// - [`ReportError::MalformedListing`] if the listing is not an object or
///   `items` is not an array
/// - [`ReportError::Item`] for the first item that fails to map, unless
///   `options.on_item_error` is [`ItemErrorPolicy::Skip`]
/// - [`ReportError::SchemaMismatch`] if the item type has no `source` enum
///   field
pub fn generate_report(
    schema: &ReportSchema,
    listing: &Json,
    options: &AssemblyOptions,
) -> Result<AssembledReport> {
    let listing = listing.as_object().ok_or_else(|| {
        ReportError::MalformedListing("listing response is not a JSON object".to_string())
    })?;
    let items = match listing.get("items") {
        None => &[][..],
        Some(Json::Array(items)) => items.as_slice(),
        Some(_) => {
            return Err(ReportError::MalformedListing(
                "'items' is not an array".to_string(),
            ));
        }
    };

    let mapper = schema
        .registry()
        .mapper(MappingOptions::new().with_enum_names(options.use_enum_names));
    let source_tag = source_tag_number(schema)?;

    let mut stats = AssemblyStats::default();
    let mut assembled = Vec::with_capacity(items.len());
    for (index, raw) in items.iter().enumerate() {
        stats.items_seen += 1;
        match assemble_item(schema, &mapper, &options.renames, source_tag, raw) {
            Ok(item) => {
                assembled.push(Value::Message(item));
                stats.items_written += 1;
            }
            Err(source) if options.on_item_error == ItemErrorPolicy::Skip => {
                warn!(index, error = %source, "skipping listing item");
                stats.items_skipped += 1;
            }
            Err(source) => return Err(ReportError::Item { index, source }),
        }
    }

    let mut message = DynamicMessage::new(schema.report().clone());
    message
        .try_set_field_by_name("snippet_status", Value::List(assembled))
        .map_err(|err| ReportError::SchemaMismatch(err.to_string()))?;

    info!(
        seen = stats.items_seen,
        written = stats.items_written,
        skipped = stats.items_skipped,
        "assembled snippet status report"
    );
    Ok(AssembledReport { message, stats })
}

fn assemble_item(
    schema: &ReportSchema,
    mapper: &JsonMapper<'_>,
    renames: &RenameTable,
    source_tag: i32,
    raw: &Json,
) -> std::result::Result<DynamicMessage, MappingError> {
    let renamed = rename_fields(raw.clone(), renames);
    let ssl_capable = is_ssl_capable(&renamed);

    let mut corrected = renamed;
    let removed = remove_flashless_corrections(&mut corrected);

    let mut item = mapper.decode(schema.item().clone(), &corrected)?;
    set_computed(&mut item, "source", Value::EnumNumber(source_tag))?;
    set_computed(&mut item, "is_ssl_capable", Value::Bool(ssl_capable))?;

    debug!(
        buyer_creative_id = corrected
            .get("buyer_creative_id")
            .and_then(Json::as_str)
            .unwrap_or_default(),
        removed_corrections = removed,
        ssl_capable,
        "assembled item"
    );
    Ok(item)
}

fn set_computed(
    item: &mut DynamicMessage,
    name: &str,
    value: Value,
) -> std::result::Result<(), MappingError> {
    item.try_set_field_by_name(name, value).map_err(|err| MappingError::InvalidValue {
        field: name.to_string(),
        reason: err.to_string(),
    })
}

fn source_tag_number(schema: &ReportSchema) -> Result<i32> {
    let source = schema
        .item()
        .get_field_by_name("source")
        .map(|field| field.kind());
    match source {
        Some(Kind::Enum(source_enum)) => source_enum
            .get_value_by_name(SOURCE_TAG)
            .map(|value| value.number())
            .ok_or_else(|| {
                ReportError::MappingError(MappingError::UnknownEnumValue {
                    enum_name: source_enum.full_name().to_string(),
                    value: SOURCE_TAG.to_string(),
                })
            }),
        _ => Err(ReportError::SchemaMismatch(format!(
            "{} has no enum field 'source'",
            schema.item().full_name()
        ))),
    }
}
