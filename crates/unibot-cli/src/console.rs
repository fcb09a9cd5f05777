//! Terminal implementations of the navigation and notification seams.

use colored::Colorize;
use std::sync::Mutex;
use unibot_core::navigation::{Navigator, NoticeLevel, Notification, Notifier, Route};

/// Tracks the current surface and announces switches.
pub struct ConsoleNavigator {
    current: Mutex<Route>,
}

impl ConsoleNavigator {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(Route::Chat),
        }
    }

    pub fn current(&self) -> Route {
        self.current
            .lock()
            .map(|route| *route)
            .unwrap_or(Route::Chat)
    }
}

impl Default for ConsoleNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator for ConsoleNavigator {
    fn navigate(&self, route: Route) {
        if let Ok(mut current) = self.current.lock() {
            *current = route;
        }
        tracing::debug!("[Console] Navigated to {}", route);
        let label = match route {
            Route::Login => "Login required. Use /login to sign in.",
            Route::Admin => "Admin panel. Use /upload <file> or /history.",
            Route::Chat | Route::Home => "Chat",
            Route::NotFound => "Page not found",
        };
        println!("{}", format!("[{}] {}", route, label).bright_yellow());
    }
}

pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NoticeLevel::Success => println!("{}", format!("✔ {}", notification.text).green()),
            NoticeLevel::Error => eprintln!("{}", format!("✘ {}", notification.text).red()),
        }
    }
}
