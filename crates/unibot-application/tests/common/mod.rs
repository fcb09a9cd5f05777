#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::oneshot;
use unibot_core::api::{ApiResult, ChatBackend, ChatReply};
use unibot_core::credential::{SessionCredential, UserProfile};
use unibot_core::navigation::{NoticeLevel, Navigator, Notification, Notifier, Route};

pub fn credential() -> SessionCredential {
    SessionCredential::new(
        "token-123",
        "refresh-456",
        UserProfile(json!({"id": 1, "Username": "admin"})),
    )
}

#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn all(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.texts(NoticeLevel::Error)
    }

    pub fn successes(&self) -> Vec<String> {
        self.texts(NoticeLevel::Success)
    }

    fn texts(&self, level: NoticeLevel) -> Vec<String> {
        self.all()
            .into_iter()
            .filter(|n| n.level == level)
            .map(|n| n.text)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }
}

/// Chat backend whose replies are released by the test.
///
/// Each call takes the next queued gate and waits for the test to send the
/// outcome through it.
#[derive(Default)]
pub struct GatedChatBackend {
    gates: Mutex<VecDeque<oneshot::Receiver<ApiResult<ChatReply>>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl GatedChatBackend {
    pub fn gate(&self) -> oneshot::Sender<ApiResult<ChatReply>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().push_back(rx);
        tx
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for GatedChatBackend {
    async fn chat(&self, prompt: &str) -> ApiResult<ChatReply> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        let gate = self
            .gates
            .lock()
            .unwrap()
            .pop_front()
            .expect("no gate queued for chat call");
        gate.await.expect("gate dropped")
    }
}
