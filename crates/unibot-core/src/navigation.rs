//! Surfaces, navigation and transient notifications.
//!
//! The core only describes *where* to go and *what* to tell the user. The
//! front end decides how a route switch or a notification is rendered.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The surfaces of the product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Home,
    Chat,
    Login,
    Admin,
    NotFound,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Chat => "/chat",
            Route::Login => "/admin-login",
            Route::Admin => "/admin",
            Route::NotFound => "*",
        }
    }

    pub fn from_path(path: &str) -> Self {
        match path {
            "/" => Route::Home,
            "/chat" => Route::Chat,
            "/admin-login" => Route::Login,
            "/admin" => Route::Admin,
            _ => Route::NotFound,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Performs a full switch to another surface.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A short-lived message for the user (a toast).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notification {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Shows transient notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);

    fn success(&self, text: &str) {
        self.notify(Notification::success(text));
    }

    fn error(&self, text: &str) {
        self.notify(Notification::error(text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths() {
        for route in [Route::Home, Route::Chat, Route::Login, Route::Admin] {
            assert_eq!(Route::from_path(route.path()), route);
        }
        assert_eq!(Route::from_path("/missing"), Route::NotFound);
        assert_eq!(Route::Login.to_string(), "/admin-login");
    }
}
