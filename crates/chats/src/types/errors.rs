//! Error types for the chat session core.

use thiserror::Error;

/// Result type alias for chat operations
pub type ChatResult<T> = Result<T, ChatError>;

/// Main error type for the registry and the message store
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid message: {reason}")]
    InvalidMessage { reason: String },

    #[error("Chat not found: {id}")]
    ChatNotFound { id: String },

    #[error("Message not found: {id}")]
    MessageNotFound { id: String },
}

/// Coarse classification used by callers deciding how to present a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed local input; never reaches the network.
    Validation,
    /// Reference to an unknown chat, message or selection.
    NotFound,
}

impl ChatError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an invalid message error
    pub fn invalid_message(reason: impl Into<String>) -> Self {
        Self::InvalidMessage {
            reason: reason.into(),
        }
    }

    /// Create a not found error for chats
    pub fn chat_not_found(id: impl Into<String>) -> Self {
        Self::ChatNotFound { id: id.into() }
    }

    /// Create a not found error for messages
    pub fn message_not_found(id: impl Into<String>) -> Self {
        Self::MessageNotFound { id: id.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } | Self::InvalidMessage { .. } => ErrorKind::Validation,
            Self::ChatNotFound { .. } | Self::MessageNotFound { .. } => ErrorKind::NotFound,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}
