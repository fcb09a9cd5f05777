pub mod api;
pub mod config;
pub mod conversation;
pub mod credential;
pub mod error;
pub mod navigation;
pub mod upload;

// Re-export common error type
pub use error::UnibotError;
