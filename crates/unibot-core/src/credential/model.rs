//! Session credential types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Storage key holding the access token.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
/// Storage key holding the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
/// Storage key holding the JSON-encoded user profile.
pub const USER_KEY: &str = "user";

/// Opaque user profile returned by the login endpoint.
///
/// The client never interprets the record beyond picking a display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserProfile(pub Value);

impl UserProfile {
    /// Best-effort display name (`Username`, `username`, then `email`).
    pub fn display_name(&self) -> Option<&str> {
        ["Username", "username", "email"]
            .iter()
            .find_map(|key| self.0.get(key).and_then(Value::as_str))
            .filter(|name| !name.is_empty())
    }
}

/// The access token, refresh token and user profile of one authenticated session.
///
/// All three travel together. A partial bundle is never turned into a
/// `SessionCredential`; see [`CredentialBundle::to_credential`].
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionCredential {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserProfile,
}

impl SessionCredential {
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        user: UserProfile,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            user,
        }
    }

    /// Well-formedness of the tokens is not checked; only an empty access
    /// token is refused.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.access_token.is_empty() {
            return Err(crate::error::UnibotError::validation(
                "access token must not be empty",
            ));
        }
        Ok(())
    }
}

// Tokens must never reach logs.
impl fmt::Debug for SessionCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCredential")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

/// Key-value form of a credential, as kept in durable storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialBundle(pub BTreeMap<String, String>);

impl CredentialBundle {
    pub fn from_credential(credential: &SessionCredential) -> crate::error::Result<Self> {
        let mut entries = BTreeMap::new();
        entries.insert(
            ACCESS_TOKEN_KEY.to_string(),
            credential.access_token.clone(),
        );
        entries.insert(
            REFRESH_TOKEN_KEY.to_string(),
            credential.refresh_token.clone(),
        );
        entries.insert(USER_KEY.to_string(), serde_json::to_string(&credential.user)?);
        Ok(Self(entries))
    }

    /// Rebuilds the credential, or `None` when any of the three keys is
    /// missing, the access token is empty, or the profile is not JSON.
    pub fn to_credential(&self) -> Option<SessionCredential> {
        let access = self.0.get(ACCESS_TOKEN_KEY)?;
        let refresh = self.0.get(REFRESH_TOKEN_KEY)?;
        let user = self.0.get(USER_KEY)?;

        if access.is_empty() {
            return None;
        }

        let user: UserProfile = serde_json::from_str(user).ok()?;
        Some(SessionCredential::new(access.clone(), refresh.clone(), user))
    }
}
