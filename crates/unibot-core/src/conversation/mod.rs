//! Chat conversation domain.

mod message;
mod state;

pub use message::{Message, MessageId, MessageIdGenerator, Sender};
pub use state::{
    Conversation, FALLBACK_ERROR, FALLBACK_REPLY, PendingSend, RequestId, SEND_FAILED_NOTICE,
    SendState, Settlement,
};
