//! Login and logout for the admin surface.

use std::sync::Arc;
use unibot_core::api::{ApiError, AuthBackend, LoginRequest};
use unibot_core::credential::{CredentialStore, SessionCredential, UserProfile};
use unibot_core::navigation::Notifier;

pub const MISSING_CREDENTIALS: &str = "Please enter both username and password.";
pub const LOGIN_SUCCEEDED: &str = "Login successful";
pub const LOGIN_FAILED: &str = "Login failed. Please check your credentials.";
pub const LOGGED_OUT: &str = "Logged out";

#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    LoggedIn(UserProfile),
    /// Empty identifier or password; no request was made.
    Rejected,
    Failed(ApiError),
    /// The server accepted the login but the session could not be stored.
    StoreFailed(String),
}

/// Owns the writes to the credential store that are not the pipeline's.
///
/// Login saves the whole bundle at once, logout clears it. Neither
/// navigates; the dispatcher does that from the returned outcome.
pub struct AuthService {
    backend: Arc<dyn AuthBackend>,
    store: Arc<dyn CredentialStore>,
    notifier: Arc<dyn Notifier>,
}

impl AuthService {
    pub fn new(
        backend: Arc<dyn AuthBackend>,
        store: Arc<dyn CredentialStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            backend,
            store,
            notifier,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.store.read().map(|credential| credential.user)
    }

    pub async fn login(&self, identifier: &str, password: &str) -> LoginOutcome {
        let identifier = identifier.trim();
        if identifier.is_empty() || password.is_empty() {
            self.notifier.error(MISSING_CREDENTIALS);
            return LoginOutcome::Rejected;
        }

        let request = LoginRequest {
            identifier: identifier.to_string(),
            password: password.to_string(),
        };

        let response = match self.backend.login(&request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(
                    "[AuthService] Login failed for {}: {}",
                    identifier,
                    err.server_message().unwrap_or(&err.to_string())
                );
                self.notifier.error(LOGIN_FAILED);
                return LoginOutcome::Failed(err);
            }
        };

        let credential = SessionCredential::new(
            response.token.access,
            response.token.refresh,
            UserProfile(response.user),
        );
        if let Err(e) = self.store.save(&credential) {
            // An empty access token or an unwritable store: the session cannot be used.
            tracing::error!("[AuthService] Failed to store session: {}", e);
            self.notifier.error(LOGIN_FAILED);
            return LoginOutcome::StoreFailed(e.to_string());
        }

        tracing::info!("[AuthService] Logged in as {}", identifier);
        self.notifier.success(LOGIN_SUCCEEDED);
        LoginOutcome::LoggedIn(credential.user)
    }

    /// Clears the session. Clearing an empty store is fine.
    pub fn logout(&self) {
        match self.store.clear() {
            Ok(()) => {
                tracing::info!("[AuthService] Logged out");
                self.notifier.success(LOGGED_OUT);
            }
            Err(e) => {
                tracing::error!("[AuthService] Failed to clear session: {}", e);
                self.notifier.error(&e.to_string());
            }
        }
    }
}
