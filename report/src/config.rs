//! Report generation configuration.
//!
//! Every section is optional; missing keys take their defaults.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! output:
//!   directory: reports
//!   basename: SnippetStatusReport
//!   formats: [text, binary, csv]
//! mapping:
//!   use_enum_names: true
//! on_item_error: skip
//! extra_renames:
//!   accountId: account_id
//! ```

use std::collections::BTreeMap;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::assemble::{AssemblyOptions, ItemErrorPolicy};
use crate::error::Result;
use crate::output::OutputFormat;
use crate::rename::RenameTable;

/// Where and how report files are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving the report files.
    pub directory: PathBuf,
    /// File name without extension.
    pub basename: String,
    /// Formats to write; each produces one file.
    pub formats: Vec<OutputFormat>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            basename: "SnippetStatusReport".to_string(),
            formats: OutputFormat::ALL.to_vec(),
        }
    }
}

/// Mapping engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    /// Decode enum fields from their value names.
    pub use_enum_names: bool,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            use_enum_names: true,
        }
    }
}

/// Top-level report configuration.
///
/// # Examples
///
/// ```
/// use snippet_report::{ItemErrorPolicy, ReportConfig};
///
/// let config: ReportConfig = serde_yaml::from_str("on_item_error: skip").unwrap();
/// assert_eq!(config.on_item_error, ItemErrorPolicy::Skip);
/// assert_eq!(config.output.basename, "SnippetStatusReport");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Configuration format version.
    pub version: String,
    pub output: OutputConfig,
    pub mapping: MappingConfig,
    /// What to do with listing items that fail to map.
    pub on_item_error: ItemErrorPolicy,
    /// Rename entries layered over the built-in table; an entry for an
    /// existing path replaces it.
    pub extra_renames: BTreeMap<String, String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            output: OutputConfig::default(),
            mapping: MappingConfig::default(),
            on_item_error: ItemErrorPolicy::default(),
            extra_renames: BTreeMap::new(),
        }
    }
}

impl ReportConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::ReportError::IoError) if the file cannot be
    /// read, or [`YamlError`](crate::ReportError::YamlError) if parsing
    /// fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::ReportError::IoError) if the file cannot be
    /// written, or [`YamlError`](crate::ReportError::YamlError) if
    /// serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// The built-in rename table with [`extra_renames`](Self::extra_renames)
    /// applied.
    pub fn rename_table(&self) -> RenameTable {
        let mut table = RenameTable::builtin().clone();
        table.extend(
            self.extra_renames
                .iter()
                .map(|(path, name)| (path.clone(), name.clone())),
        );
        table
    }

    /// Assembly settings derived from this configuration.
    pub fn assembly_options(&self) -> AssemblyOptions {
        AssemblyOptions {
            renames: self.rename_table(),
            use_enum_names: self.mapping.use_enum_names,
            on_item_error: self.on_item_error,
        }
    }
}
