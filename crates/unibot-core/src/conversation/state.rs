//! Conversation state machine.
//!
//! Sending is a two-step affair around a single suspension point:
//!
//! 1. [`Conversation::begin_send`] runs synchronously before any network
//!    activity. It appends the user message and a streaming bot placeholder
//!    and moves the machine from `Idle` to `Awaiting(request_id)`.
//! 2. [`Conversation::complete`] runs when the request settles. It finalizes
//!    the placeholder with the reply (or an error text) and returns the
//!    machine to `Idle`.
//!
//! At most one send is in flight. A `begin_send` while awaiting is a no-op,
//! and a completion carrying any other request id is ignored.

use super::message::{Message, MessageId, MessageIdGenerator};
use crate::api::{ApiError, ApiResult, ChatReply};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Shown when the backend answers successfully but without reply text.
pub const FALLBACK_REPLY: &str = "I'm here to help! How can I assist you today?";
/// Shown in the placeholder when the request fails without a server error text.
pub const FALLBACK_ERROR: &str = "Sorry, there was an error. Please try again.";
/// Transient notification emitted on a failed send.
pub const SEND_FAILED_NOTICE: &str = "Failed to send message. Please try again.";

/// Identifies one outstanding send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where the machine is in the send cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum SendState {
    /// Ready to accept a send.
    Idle,
    /// A request is outstanding; its placeholder is still streaming.
    Awaiting(RequestId),
}

/// Everything the caller needs to issue the request started by `begin_send`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSend {
    pub request_id: RequestId,
    /// Trimmed text to send as the prompt.
    pub prompt: String,
    pub placeholder_id: MessageId,
}

/// Result of feeding a completion into the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    /// The placeholder now holds the reply (or the fallback reply).
    Answered,
    /// The placeholder now holds an error text. The caller should notify
    /// the user and let the dispatcher look at the error.
    Failed(ApiError),
    /// The completion did not belong to the outstanding request.
    Ignored,
}

/// Ordered chat log plus the single-in-flight guard.
#[derive(Debug)]
pub struct Conversation {
    messages: Vec<Message>,
    state: SendState,
    placeholder: Option<MessageId>,
    ids: MessageIdGenerator,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            state: SendState::Idle,
            placeholder: None,
            ids: MessageIdGenerator::new(),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn state(&self) -> SendState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, SendState::Awaiting(_))
    }

    /// Transition 1. Returns `None` (and changes nothing) when the text is
    /// blank after trimming or a send is already outstanding.
    pub fn begin_send(&mut self, text: &str) -> Option<PendingSend> {
        let prompt = text.trim();
        if prompt.is_empty() || self.is_pending() {
            return None;
        }

        let user_id = self.ids.next_id();
        let placeholder_id = self.ids.next_id();
        let request_id = RequestId::new();

        self.messages.push(Message::user(user_id, prompt));
        self.messages.push(Message::placeholder(placeholder_id));
        self.state = SendState::Awaiting(request_id);
        self.placeholder = Some(placeholder_id);

        tracing::debug!(%request_id, %placeholder_id, "Send started");

        Some(PendingSend {
            request_id,
            prompt: prompt.to_string(),
            placeholder_id,
        })
    }

    /// Transition 2 or 3, followed by the return to `Idle`.
    pub fn complete(&mut self, request_id: RequestId, outcome: ApiResult<ChatReply>) -> Settlement {
        if self.state != SendState::Awaiting(request_id) {
            tracing::warn!(%request_id, "Ignoring completion for a request that is not outstanding");
            return Settlement::Ignored;
        }

        let (text, settlement) = match outcome {
            Ok(reply) => (
                reply.non_empty().unwrap_or(FALLBACK_REPLY).to_string(),
                Settlement::Answered,
            ),
            Err(err) => (
                err.server_error().unwrap_or(FALLBACK_ERROR).to_string(),
                Settlement::Failed(err),
            ),
        };

        // The log may have been cleared while the request was in flight.
        let placeholder_id = self.placeholder.take();
        match self
            .messages
            .iter_mut()
            .find(|m| Some(m.id) == placeholder_id)
        {
            Some(placeholder) => {
                placeholder.text = text;
                placeholder.streaming = false;
            }
            None => tracing::debug!(%request_id, "Placeholder gone; reply dropped"),
        }

        self.state = SendState::Idle;
        settlement
    }

    /// Empties the log. The send state is left alone.
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
