//! Application layer for Unibot.
//!
//! Use cases that sit between the domain types in `unibot-core` and the
//! HTTP client in `unibot-interaction`: the chat conversation, login and
//! logout, knowledge-base uploads, and the dispatcher that turns their
//! outcomes into navigation.

pub mod auth_service;
pub mod bootstrap;
pub mod chat_service;
pub mod dispatcher;
pub mod upload_workflow;

pub use auth_service::{AuthService, LoginOutcome};
pub use bootstrap::AppBootstrap;
pub use chat_service::{ChatService, ConversationSnapshot};
pub use dispatcher::{Dispatcher, UiEvent};
pub use upload_workflow::{UploadOutcome, UploadWorkflow};
