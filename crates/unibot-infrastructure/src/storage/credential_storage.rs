//! Durable credential store backed by `session.toml`.
//!
//! The file is a flat key-value table with the keys `accessToken`,
//! `refreshToken` and `user` (the profile as a JSON string). It survives
//! restarts and is deleted on logout or when the server rejects the session.

use crate::paths::{PathError, UnibotPaths};
use crate::storage::AtomicTomlFile;
use std::path::PathBuf;
use unibot_core::credential::{CredentialBundle, CredentialStore, SessionCredential};
use unibot_core::error::Result;

pub struct FileCredentialStore {
    file: AtomicTomlFile<CredentialBundle>,
}

impl FileCredentialStore {
    /// Store at the default location (`<config_dir>/unibot/session.toml`).
    pub fn new() -> std::result::Result<Self, PathError> {
        Ok(Self::with_path(UnibotPaths::session_file()?))
    }

    /// Store at a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        self.file.path()
    }
}

impl CredentialStore for FileCredentialStore {
    fn read(&self) -> Option<SessionCredential> {
        match self.file.load() {
            Ok(Some(bundle)) => {
                let credential = bundle.to_credential();
                if credential.is_none() {
                    tracing::warn!(path = %self.path().display(), "Ignoring incomplete session bundle");
                }
                credential
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(path = %self.path().display(), "Failed to read session file: {}", e);
                None
            }
        }
    }

    fn save(&self, credential: &SessionCredential) -> Result<()> {
        credential.validate()?;
        let bundle = CredentialBundle::from_credential(credential)?;
        self.file.save(&bundle)?;
        tracing::debug!(path = %self.path().display(), "Session saved");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.file.remove()?;
        tracing::debug!(path = %self.path().display(), "Session cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;
    use unibot_core::credential::UserProfile;

    fn credential() -> SessionCredential {
        SessionCredential::new(
            "access-token",
            "refresh-token",
            UserProfile(json!({"id": 3, "Username": "registrar", "email": "reg@uni.edu"})),
        )
    }

    #[test]
    fn test_missing_file_is_unauthenticated() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileCredentialStore::with_path(temp_dir.path().join("session.toml"));
        assert!(store.read().is_none());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_save_survives_a_new_handle() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.toml");

        FileCredentialStore::with_path(path.clone())
            .save(&credential())
            .unwrap();

        let reopened = FileCredentialStore::with_path(path);
        assert_eq!(reopened.read(), Some(credential()));
    }

    #[test]
    fn test_file_uses_browser_storage_keys() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.toml");
        FileCredentialStore::with_path(path.clone())
            .save(&credential())
            .unwrap();

        let raw: toml::Table = toml::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(raw["accessToken"].as_str(), Some("access-token"));
        assert_eq!(raw["refreshToken"].as_str(), Some("refresh-token"));
        let user: serde_json::Value =
            serde_json::from_str(raw["user"].as_str().unwrap()).unwrap();
        assert_eq!(user["Username"], "registrar");
    }

    #[test]
    fn test_partial_file_reads_as_absent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.toml");
        fs::write(&path, "accessToken = \"a\"\nuser = \"{}\"\n").unwrap();

        let store = FileCredentialStore::with_path(path);
        assert!(store.read().is_none());
    }

    #[test]
    fn test_corrupt_file_reads_as_absent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.toml");
        fs::write(&path, "accessToken = ").unwrap();

        let store = FileCredentialStore::with_path(path);
        assert!(store.read().is_none());
    }

    #[test]
    fn test_empty_access_token_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileCredentialStore::with_path(temp_dir.path().join("session.toml"));
        let mut bad = credential();
        bad.access_token.clear();

        assert!(store.save(&bad).unwrap_err().is_validation());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_clear_removes_file_and_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileCredentialStore::with_path(temp_dir.path().join("session.toml"));
        store.save(&credential()).unwrap();

        store.clear().unwrap();
        assert!(store.read().is_none());
        assert!(!store.path().exists());

        store.clear().unwrap();
        assert!(store.read().is_none());
    }
}
