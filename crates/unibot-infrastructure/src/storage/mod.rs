//! Storage layer for atomic file operations.

mod atomic_toml;
mod credential_storage;

pub use atomic_toml::{AtomicTomlError, AtomicTomlFile};
pub use credential_storage::FileCredentialStore;
