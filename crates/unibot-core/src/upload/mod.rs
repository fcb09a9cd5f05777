//! Knowledge-base upload domain.

mod model;
pub mod validation;

pub use model::{UploadFile, UploadHistoryEntry};
pub use validation::{DEFAULT_MAX_UPLOAD_BYTES, validate_selection};
