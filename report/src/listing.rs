//! Sources of creative listings.
//!
//! The report is built from the JSON body of a creative-list API call. A
//! [`ListingSource`] produces that body; [`FileListingSource`] reads a saved
//! response from disk or stdin.
//!
//! A saved response may also be an API error envelope:
//!
//! ```json
//! { "error": { "code": 401, "message": "Invalid Credentials" } }
//! ```
//!
//! Envelopes are turned into [`FetchError`]s so that no report is ever
//! generated from a failed call.

use std::io::Read;
use std::path::{Path, PathBuf};

use serde_json::Value as Json;
use thiserror::Error;
use tracing::debug;

/// HTTP status the API uses for revoked or expired credentials.
const UNAUTHORIZED: i64 = 401;

/// Errors produced while obtaining a listing.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The API rejected the credentials. Fatal: the user must re-authorize.
    #[error(
        "the credentials have been revoked or expired, please re-run the application to re-authorize"
    )]
    CredentialsRejected,

    /// The API answered with an error envelope.
    #[error("API error {code}: {message}")]
    Api { code: i64, message: String },

    /// The listing could not be read.
    #[error("failed to read listing from {origin}: {source}")]
    Io {
        origin: String,
        #[source]
        source: std::io::Error,
    },

    /// The listing is not valid JSON.
    #[error("listing is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Produces the raw creative listing.
pub trait ListingSource {
    /// Returns the listing body.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the listing cannot be obtained or the
    /// upstream call failed.
    fn fetch(&self) -> Result<Json, FetchError>;
}

/// A saved listing response on disk, or on stdin when the path is `-`.
#[derive(Debug, Clone)]
pub struct FileListingSource {
    path: PathBuf,
}

impl FileListingSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads from stdin.
    pub fn stdin() -> Self {
        Self::new("-")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_stdin(&self) -> bool {
        self.path.as_os_str() == "-"
    }

    fn read_body(&self) -> std::io::Result<String> {
        if self.is_stdin() {
            let mut body = String::new();
            std::io::stdin().read_to_string(&mut body)?;
            Ok(body)
        } else {
            std::fs::read_to_string(&self.path)
        }
    }
}

impl ListingSource for FileListingSource {
    fn fetch(&self) -> Result<Json, FetchError> {
        let body = self.read_body().map_err(|source| FetchError::Io {
            origin: if self.is_stdin() {
                "stdin".to_string()
            } else {
                self.path.display().to_string()
            },
            source,
        })?;
        debug!(bytes = body.len(), path = %self.path.display(), "read listing");
        reject_error_envelope(serde_json::from_str(&body)?)
    }
}

impl ListingSource for Json {
    fn fetch(&self) -> Result<Json, FetchError> {
        reject_error_envelope(self.clone())
    }
}

/// Passes `response` through unless it is an API error envelope.
///
/// # Errors
///
/// Returns [`FetchError::CredentialsRejected`] for code 401 and
/// [`FetchError::Api`] for any other envelope.
pub fn reject_error_envelope(response: Json) -> Result<Json, FetchError> {
    let Some(error) = response.get("error").filter(|e| e.is_object()) else {
        return Ok(response);
    };

    let code = error.get("code").and_then(Json::as_i64).unwrap_or_default();
    if code == UNAUTHORIZED {
        return Err(FetchError::CredentialsRejected);
    }
    let message = error
        .get("message")
        .and_then(Json::as_str)
        .unwrap_or("unknown error")
        .to_string();
    Err(FetchError::Api { code, message })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_listing_passes_through() {
        let listing = json!({ "items": [] });
        assert_eq!(listing.fetch().unwrap(), listing);
    }

    #[test]
    fn test_unauthorized_envelope_is_credential_rejection() {
        let envelope = json!({ "error": { "code": 401, "message": "Invalid Credentials" } });
        assert!(matches!(envelope.fetch(), Err(FetchError::CredentialsRejected)));
    }

    #[test]
    fn test_other_envelopes_are_api_errors() {
        let envelope = json!({ "error": { "code": 403, "message": "Forbidden" } });
        match envelope.fetch() {
            Err(FetchError::Api { code, message }) => {
                assert_eq!(code, 403);
                assert_eq!(message, "Forbidden");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_reports_origin() {
        let err = FileListingSource::new("/nonexistent/listing.json")
            .fetch()
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/listing.json"));
    }
}
