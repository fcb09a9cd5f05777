//! UI-event dispatcher.
//!
//! The single place where request outcomes turn into navigation. Services
//! report what happened; the dispatcher decides which surface to show.
//! In particular, any request that ended in [`ApiError::AuthExpired`] sends
//! the user to the login surface. The pipeline below has already cleared
//! the session by then.

use crate::auth_service::{AuthService, LoginOutcome};
use crate::chat_service::ChatService;
use crate::upload_workflow::{UploadOutcome, UploadWorkflow};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use unibot_core::api::ApiError;
use unibot_core::conversation::{PendingSend, Settlement};
use unibot_core::navigation::{Navigator, Route};

/// Everything a front end can ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    SendMessage(String),
    ClearConversation,
    Login { identifier: String, password: String },
    Logout,
    OpenAdmin,
    OpenLogin,
    /// `None` when the user confirmed without picking a file.
    Upload(Option<PathBuf>),
    RefreshHistory,
}

pub struct Dispatcher {
    chat: Arc<ChatService>,
    uploads: Arc<UploadWorkflow>,
    auth: Arc<AuthService>,
    navigator: Arc<dyn Navigator>,
    logout_delay: Duration,
}

impl Dispatcher {
    pub fn new(
        chat: Arc<ChatService>,
        uploads: Arc<UploadWorkflow>,
        auth: Arc<AuthService>,
        navigator: Arc<dyn Navigator>,
        logout_delay: Duration,
    ) -> Self {
        Self {
            chat,
            uploads,
            auth,
            navigator,
            logout_delay,
        }
    }

    pub fn chat(&self) -> &Arc<ChatService> {
        &self.chat
    }

    pub fn uploads(&self) -> &Arc<UploadWorkflow> {
        &self.uploads
    }

    pub fn auth(&self) -> &Arc<AuthService> {
        &self.auth
    }

    /// Handles one event. Returns the route navigated to, if any.
    pub async fn dispatch(&self, event: UiEvent) -> Option<Route> {
        tracing::debug!("[Dispatcher] {:?}", redact(&event));

        match event {
            UiEvent::SendMessage(text) => match self.chat.send(&text).await {
                Some(Settlement::Failed(err)) => self.on_api_error(&err),
                _ => None,
            },
            UiEvent::ClearConversation => {
                self.chat.clear().await;
                None
            }
            UiEvent::Login {
                identifier,
                password,
            } => {
                // A 401 here means wrong credentials, not an expired session,
                // so it never redirects.
                match self.auth.login(&identifier, &password).await {
                    LoginOutcome::LoggedIn(_) => self.go(Route::Admin),
                    _ => None,
                }
            }
            UiEvent::Logout => {
                self.auth.logout();
                tokio::time::sleep(self.logout_delay).await;
                self.go(Route::Login)
            }
            UiEvent::OpenAdmin => {
                if !self.auth.is_authenticated() {
                    return self.go(Route::Login);
                }
                let route = self.go(Route::Admin);
                match self.uploads.refresh_history().await {
                    Err(err) => self.on_api_error(&err).or(route),
                    Ok(()) => route,
                }
            }
            UiEvent::OpenLogin => {
                if self.auth.is_authenticated() {
                    self.go(Route::Admin)
                } else {
                    self.go(Route::Login)
                }
            }
            UiEvent::Upload(path) => self.upload(path.as_deref()).await.1,
            UiEvent::RefreshHistory => match self.uploads.refresh_history().await {
                Err(err) => self.on_api_error(&err),
                Ok(()) => None,
            },
        }
    }

    /// Same as dispatching [`UiEvent::Upload`] but hands back the outcome, for
    /// front ends that report it themselves.
    pub async fn upload(&self, path: Option<&Path>) -> (UploadOutcome, Option<Route>) {
        let outcome = self.uploads.upload(path).await;
        let route = outcome.api_error().and_then(|err| self.on_api_error(err));
        (outcome, route)
    }

    /// Completes a send whose placeholder was already added with
    /// [`ChatService::begin_send`]. Lets a front end refuse a line up front
    /// while the request itself runs in the background.
    pub async fn deliver(&self, pending: PendingSend) -> Option<Route> {
        match self.chat.deliver(pending).await {
            Settlement::Failed(err) => self.on_api_error(&err),
            _ => None,
        }
    }

    fn on_api_error(&self, err: &ApiError) -> Option<Route> {
        if err.is_auth_expired() {
            tracing::info!("[Dispatcher] Session expired; returning to login");
            self.go(Route::Login)
        } else {
            None
        }
    }

    fn go(&self, route: Route) -> Option<Route> {
        self.navigator.navigate(route);
        Some(route)
    }
}

fn redact(event: &UiEvent) -> UiEvent {
    match event {
        UiEvent::Login { identifier, .. } => UiEvent::Login {
            identifier: identifier.clone(),
            password: "***".to_string(),
        },
        other => other.clone(),
    }
}
