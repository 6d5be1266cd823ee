//! Business rules applied to renamed listing items.

use serde_json::Value as Json;

/// Attribute code declaring that a creative can be served over SSL.
pub const RICH_MEDIA_CAPABILITY_SSL: i64 = 47;

/// Disapproval reason revoking an SSL declaration.
pub const INVALID_SSL_DECLARATION: &str = "INVALID_SSL_DECLARATION";

/// Correction type revoking an SSL declaration.
pub const SSL_ATTRIBUTE: &str = "SSL_ATTRIBUTE";

/// Correction type the report schema cannot represent.
pub const FLASHLESS_ATTRIBUTE: &str = "FLASHLESS_ATTRIBUTE";

/// Removes every `snippet_correction` entry whose `type` is
/// [`FLASHLESS_ATTRIBUTE`]. Returns how many entries were removed.
pub fn remove_flashless_corrections(item: &mut Json) -> usize {
    let Some(corrections) = item
        .get_mut("snippet_correction")
        .and_then(Json::as_array_mut)
    else {
        return 0;
    };

    let before = corrections.len();
    corrections.retain(|correction| !has_str(correction, "type", FLASHLESS_ATTRIBUTE));
    before - corrections.len()
}

/// Returns true if the renamed `item` may be served over SSL.
///
/// The item must declare [`RICH_MEDIA_CAPABILITY_SSL`] among its
/// `attribute` codes, carry no [`INVALID_SSL_DECLARATION`] disapproval, and
/// carry no [`SSL_ATTRIBUTE`] correction.
///
/// ```
/// use serde_json::json;
/// use snippet_report::is_ssl_capable;
///
/// assert!(is_ssl_capable(&json!({ "attribute": [47] })));
/// assert!(!is_ssl_capable(&json!({ "attribute": [] })));
/// ```
pub fn is_ssl_capable(item: &Json) -> bool {
    let declared = entries(item, "attribute")
        .any(|code| code.as_f64() == Some(RICH_MEDIA_CAPABILITY_SSL as f64));
    declared
        && !entries(item, "disapproval_reason")
            .any(|reason| has_str(reason, "reason", INVALID_SSL_DECLARATION))
        && !entries(item, "snippet_correction")
            .any(|correction| has_str(correction, "type", SSL_ATTRIBUTE))
}

fn entries<'a>(item: &'a Json, key: &str) -> impl Iterator<Item = &'a Json> {
    item.get(key)
        .and_then(Json::as_array)
        .into_iter()
        .flatten()
}

fn has_str(entry: &Json, key: &str, expected: &str) -> bool {
    entry.get(key).and_then(Json::as_str) == Some(expected)
}
