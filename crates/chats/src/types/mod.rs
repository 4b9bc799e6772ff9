//! Shared types for the chat session core.

pub mod errors;

pub use errors::{ChatError, ChatResult, ErrorKind};

// Identifiers are opaque strings issued by the backend.
pub type UserId = String;
pub type ChatId = String;
pub type MessageId = String;
