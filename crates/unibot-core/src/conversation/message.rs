//! Chat message types.
//!
//! A conversation is an ordered log of [`Message`]s. User messages never
//! change after creation; a bot message starts as an empty streaming
//! placeholder and is finalized exactly once.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Typed by the person using the chat.
    User,
    /// Produced by the chatbot backend (or the client on its behalf).
    Bot,
}

/// Time-derived message identifier, strictly increasing within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out [`MessageId`]s from the wall clock (milliseconds), bumping by
/// one whenever the clock has not moved past the previous id.
#[derive(Debug, Default)]
pub struct MessageIdGenerator {
    last: u64,
}

impl MessageIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> MessageId {
        let now = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0);
        self.last = now.max(self.last + 1);
        MessageId(self.last)
    }
}

/// A single entry in the conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub text: String,
    pub sender: Sender,
    /// True only while the bot reply this placeholder stands for is outstanding.
    pub streaming: bool,
}

impl Message {
    pub fn user(id: MessageId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            sender: Sender::User,
            streaming: false,
        }
    }

    pub fn placeholder(id: MessageId) -> Self {
        Self {
            id,
            text: String::new(),
            sender: Sender::Bot,
            streaming: true,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.sender == Sender::Bot && self.streaming
    }
}
