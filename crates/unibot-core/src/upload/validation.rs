//! Local checks applied before a file is handed to the request pipeline.

use crate::error::{Result, UnibotError};
use std::path::Path;

/// Default upper bound for an uploaded file (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

pub const NO_FILE_SELECTED: &str = "Please select a JSON file first.";
pub const NOT_JSON: &str = "Please select a valid JSON file.";

/// Message shown when a file is over `max_bytes`, e.g. "File size exceeds 10MB.".
pub fn too_large_message(max_bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;

    let limit = match max_bytes {
        0 => "0 bytes".to_string(),
        n if n % MIB == 0 => format!("{}MB", n / MIB),
        n if n % KIB == 0 => format!("{}KB", n / KIB),
        n => format!("{} bytes", n),
    };
    format!("File size exceeds {}.", limit)
}

/// Guesses the MIME type from the file extension.
pub fn guess_mime(path: &Path) -> Option<String> {
    mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string())
}

/// Accepts only JSON files no larger than `max_bytes`.
///
/// The returned error is a [`UnibotError::Validation`] whose text is meant
/// for the user as is.
pub fn validate_selection(path: Option<&Path>, size: u64, max_bytes: u64) -> Result<String> {
    let path = path.ok_or_else(|| UnibotError::validation(NO_FILE_SELECTED))?;

    let mime = guess_mime(path)
        .filter(|mime| mime == "application/json")
        .ok_or_else(|| UnibotError::validation(NOT_JSON))?;

    if size > max_bytes {
        return Err(UnibotError::validation(too_large_message(max_bytes)));
    }

    Ok(mime)
}
