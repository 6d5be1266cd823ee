//! Report emitters: structured text, binary wire encoding, and CSV.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use prost::Message;
use prost_reflect::text_format::FormatOptions;
use prost_reflect::{DynamicMessage, Kind, ReflectMessage};
use serde::{Deserialize, Serialize};
use snippet_report_schema::DEPRECATED_PREFIX;
use tracing::info;

use crate::error::{ReportError, Result};
use crate::text::format_cell;

/// Name of the repeated item field of the report message.
const ITEMS_FIELD: &str = "snippet_status";

/// Supported report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Protobuf text format, one field per line.
    Text,
    /// Protobuf binary wire encoding.
    Binary,
    /// One row per report item.
    Csv,
}

impl OutputFormat {
    /// Every format, in the order files are written.
    pub const ALL: [OutputFormat; 3] = [Self::Text, Self::Binary, Self::Csv];

    /// File extension used for this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Binary => "pb",
            Self::Csv => "csv",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Binary => write!(f, "binary"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

/// Renders `report` in the multi-line protobuf text format.
pub fn format_text(report: &DynamicMessage) -> String {
    report.to_text_format_with_options(&FormatOptions::new().pretty(true))
}

/// Writes `report` in the multi-line protobuf text format.
pub fn write_text<W: Write>(report: &DynamicMessage, mut out: W) -> Result<()> {
    let mut text = format_text(report);
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    out.write_all(text.as_bytes())?;
    Ok(())
}

/// Writes the binary wire encoding of `report`.
pub fn write_binary<W: Write>(report: &DynamicMessage, mut out: W) -> Result<()> {
    out.write_all(&report.encode_to_vec())?;
    Ok(())
}

/// Writes one header row and one row per report item.
///
/// Columns are the item fields not marked deprecated, in declaration order.
/// Records end with CRLF.
///
/// # Errors
///
/// Returns [`ReportError::SchemaMismatch`] if `report` has no repeated
/// message field named `snippet_status`.
pub fn write_csv<W: Write>(report: &DynamicMessage, out: W) -> Result<()> {
    let items_field = report
        .descriptor()
        .get_field_by_name(ITEMS_FIELD)
        .filter(|field| field.is_list())
        .ok_or_else(|| {
            ReportError::SchemaMismatch(format!(
                "{} has no repeated {ITEMS_FIELD} field",
                report.descriptor().full_name()
            ))
        })?;
    let Kind::Message(item_type) = items_field.kind() else {
        return Err(ReportError::SchemaMismatch(format!(
            "{ITEMS_FIELD} is not a message field"
        )));
    };

    let columns: Vec<_> = item_type
        .fields()
        .filter(|field| !field.name().starts_with(DEPRECATED_PREFIX))
        .collect();

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(out);
    writer.write_record(columns.iter().map(|field| field.name()))?;

    let items = report.get_field(&items_field);
    for item in items.as_list().into_iter().flatten() {
        let Some(item) = item.as_message() else {
            continue;
        };
        writer.write_record(columns.iter().map(|field| format_cell(item, field)))?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes `report` in `format` to `out`.
pub fn write_format<W: Write>(report: &DynamicMessage, format: OutputFormat, out: W) -> Result<()> {
    match format {
        OutputFormat::Text => write_text(report, out),
        OutputFormat::Binary => write_binary(report, out),
        OutputFormat::Csv => write_csv(report, out),
    }
}

/// Writes one `<basename>.<ext>` file per format into `dir`, creating the
/// directory if needed. Returns the written paths in format order.
pub fn write_reports(
    report: &DynamicMessage,
    dir: impl AsRef<Path>,
    basename: &str,
    formats: &[OutputFormat],
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(formats.len());
    for &format in formats {
        let path = dir.join(format!("{basename}.{}", format.extension()));
        let mut out = BufWriter::new(File::create(&path)?);
        write_format(report, format, &mut out)?;
        out.flush()?;
        info!(%format, path = %path.display(), "wrote report");
        written.push(path);
    }
    Ok(written)
}
