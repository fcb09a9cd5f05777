//! Chat service: drives the conversation state machine around the network call.

use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use unibot_core::api::ChatBackend;
use unibot_core::conversation::{
    Conversation, Message, PendingSend, SEND_FAILED_NOTICE, Settlement,
};
use unibot_core::navigation::Notifier;

/// What the chat surface renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationSnapshot {
    pub messages: Vec<Message>,
    pub pending: bool,
}

/// Owns one conversation and sends its messages through a [`ChatBackend`].
///
/// Every state transition is published on a `watch` channel so the front end
/// can render the streaming placeholder while the request is outstanding.
pub struct ChatService {
    conversation: Mutex<Conversation>,
    backend: Arc<dyn ChatBackend>,
    notifier: Arc<dyn Notifier>,
    snapshots: watch::Sender<ConversationSnapshot>,
}

impl ChatService {
    pub fn new(backend: Arc<dyn ChatBackend>, notifier: Arc<dyn Notifier>) -> Self {
        let (snapshots, _) = watch::channel(ConversationSnapshot::default());
        Self {
            conversation: Mutex::new(Conversation::new()),
            backend,
            notifier,
            snapshots,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ConversationSnapshot> {
        self.snapshots.subscribe()
    }

    pub async fn snapshot(&self) -> ConversationSnapshot {
        let conversation = self.conversation.lock().await;
        Self::capture(&conversation)
    }

    /// Sends `text`.
    ///
    /// Returns `None` when the send was refused (blank text or another send
    /// outstanding); nothing is appended and no request is made in that case.
    /// Otherwise returns how the placeholder was settled. A failure has
    /// already been shown to the user as a notification.
    pub async fn send(&self, text: &str) -> Option<Settlement> {
        let pending = self.begin_send(text).await?;
        Some(self.deliver(pending).await)
    }

    /// First half of [`send`](Self::send): appends the user message and the
    /// placeholder without issuing the request. `None` means refused.
    pub async fn begin_send(&self, text: &str) -> Option<PendingSend> {
        let mut conversation = self.conversation.lock().await;
        let pending = conversation.begin_send(text)?;
        self.publish(&conversation);
        Some(pending)
    }

    /// Second half of [`send`](Self::send): issues the request started by
    /// `begin_send` and settles its placeholder.
    pub async fn deliver(&self, pending: PendingSend) -> Settlement {
        // The only suspension point of a send. The lock is not held here, so
        // the front end can render and `clear` while the request is outstanding.
        let outcome = self.backend.chat(&pending.prompt).await;

        let settlement = {
            let mut conversation = self.conversation.lock().await;
            let settlement = conversation.complete(pending.request_id, outcome);
            self.publish(&conversation);
            settlement
        };

        if let Settlement::Failed(err) = &settlement {
            tracing::warn!("[ChatService] Send failed: {}", err);
            self.notifier.error(SEND_FAILED_NOTICE);
        }

        settlement
    }

    /// Empties the conversation. An outstanding send stays outstanding.
    pub async fn clear(&self) {
        let mut conversation = self.conversation.lock().await;
        conversation.clear();
        self.publish(&conversation);
    }

    fn capture(conversation: &Conversation) -> ConversationSnapshot {
        ConversationSnapshot {
            messages: conversation.messages().to_vec(),
            pending: conversation.is_pending(),
        }
    }

    fn publish(&self, conversation: &Conversation) {
        self.snapshots.send_replace(Self::capture(conversation));
    }
}
