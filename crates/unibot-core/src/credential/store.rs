//! Credential store trait and the in-memory implementation.

use super::model::SessionCredential;
use crate::error::{Result, UnibotError};
use std::sync::RwLock;

/// Single source of truth for "is this session authenticated".
///
/// Writers are limited to login (`save`), logout (`clear`) and the request
/// pipeline on an authentication failure (`clear`). Everything else only
/// reads. Reads are synchronous so the pipeline can consult the store on
/// every outbound request.
///
/// The store knows nothing about routing; navigating away after `clear` is
/// the caller's job.
pub trait CredentialStore: Send + Sync {
    /// Returns the current credential, or `None` if any part is missing.
    fn read(&self) -> Option<SessionCredential>;

    /// Persists all three fields at once. Only an empty access token is rejected.
    fn save(&self, credential: &SessionCredential) -> Result<()>;

    /// Removes all three fields. Clearing an empty store is Ok.
    fn clear(&self) -> Result<()>;

    fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }
}

/// Credential store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    current: RwLock<Option<SessionCredential>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: SessionCredential) -> Self {
        Self {
            current: RwLock::new(Some(credential)),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn read(&self) -> Option<SessionCredential> {
        self.current.read().ok().and_then(|guard| guard.clone())
    }

    fn save(&self, credential: &SessionCredential) -> Result<()> {
        credential.validate()?;
        let mut guard = self
            .current
            .write()
            .map_err(|e| UnibotError::internal(format!("credential lock poisoned: {e}")))?;
        *guard = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self
            .current
            .write()
            .map_err(|e| UnibotError::internal(format!("credential lock poisoned: {e}")))?;
        *guard = None;
        Ok(())
    }
}
