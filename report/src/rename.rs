//! Key renaming from listing field names to schema field names.
//!
//! A [`RenameTable`] maps dotted key paths to replacement names. Paths are
//! spelled with the listing's original key names: `corrections.reason`
//! addresses the `reason` key inside the value of the `corrections` key,
//! whatever `corrections` itself is renamed to. Arrays are transparent, so
//! the same path addresses a key in every element.
//!
//! Only keys reachable through the table are visited. A key whose path is
//! not in the table keeps its name and its subtree is left untouched.
//!
//! ```
//! use serde_json::json;
//! use snippet_report::{RenameTable, rename_fields};
//!
//! let renamed = rename_fields(
//!     json!({ "corrections": [{ "reason": "VENDOR_IDS", "details": ["d"] }] }),
//!     RenameTable::builtin(),
//! );
//! assert_eq!(
//!     renamed,
//!     json!({ "snippet_correction": [{ "type": "VENDOR_IDS", "detail": ["d"] }] })
//! );
//! ```

use std::collections::BTreeMap;
use std::sync::LazyLock;

use serde_json::{Map, Value as Json};

const BUILTIN_RENAMES: &[(&str, &str)] = &[
    ("advertiserId", "advertiser_id"),
    ("buyerCreativeId", "buyer_creative_id"),
    ("clickThroughUrl", "click_through_url"),
    ("corrections", "snippet_correction"),
    ("corrections.details", "detail"),
    ("corrections.reason", "type"),
    ("disapprovalReasons", "disapproval_reason"),
    ("disapprovalReasons.details", "detail"),
    ("disapprovalReasons.reason", "reason"),
    ("filteringReasons", "snippet_filtering"),
    ("filteringReasons.date", "date"),
    ("filteringReasons.reasons", "item"),
    ("filteringReasons.reasons.filteringCount", "filtering_count"),
    ("filteringReasons.reasons.filteringStatus", "filtering_status"),
    ("height", "height"),
    ("productCategories", "detected_product_category"),
    ("sensitiveCategories", "detected_sensitive_category"),
    ("status", "status"),
    ("width", "width"),
];

static BUILTIN: LazyLock<RenameTable> = LazyLock::new(|| {
    BUILTIN_RENAMES
        .iter()
        .map(|(path, name)| ((*path).to_string(), (*name).to_string()))
        .collect()
});

/// Dotted key path → replacement key name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameTable {
    entries: BTreeMap<String, String>,
}

impl RenameTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The table translating creative-listing keys to `SnippetStatusItem`
    /// field names.
    pub fn builtin() -> &'static RenameTable {
        &BUILTIN
    }

    /// Adds or replaces the entry for `path`.
    pub fn insert(&mut self, path: impl Into<String>, new_name: impl Into<String>) {
        self.entries.insert(path.into(), new_name.into());
    }

    /// Returns the replacement name for `path`.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, n)| (p.as_str(), n.as_str()))
    }
}

impl FromIterator<(String, String)> for RenameTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Extend<(String, String)> for RenameTable {
    fn extend<I: IntoIterator<Item = (String, String)>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

/// Returns a copy of `value` with every key reachable through `table`
/// renamed.
///
/// If a renamed key lands on a key that already exists in the same object,
/// the renamed entry replaces it.
pub fn rename_fields(value: Json, table: &RenameTable) -> Json {
    rename_at(value, table, "")
}

fn rename_at(value: Json, table: &RenameTable, prefix: &str) -> Json {
    match value {
        Json::Array(elements) => Json::Array(
            elements
                .into_iter()
                .map(|element| rename_at(element, table, prefix))
                .collect(),
        ),
        Json::Object(object) => {
            let mut kept = Map::new();
            let mut renamed = Vec::new();
            for (key, child) in object {
                let path = format!("{prefix}{key}");
                match table.get(&path) {
                    Some(new_name) => {
                        let child = rename_at(child, table, &format!("{path}."));
                        renamed.push((new_name.to_string(), child));
                    }
                    None => {
                        kept.insert(key, child);
                    }
                }
            }
            kept.extend(renamed);
            Json::Object(kept)
        }
        scalar => scalar,
    }
}
