//! Error types for session coordination.

use chitchat_chats::ChatError;
use thiserror::Error;

use crate::directory::DirectoryError;

/// Result type alias for session operations
pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("{what} not found: {id}")]
    NotFound { what: &'static str, id: String },

    #[error("Cannot {action} while {state}")]
    InvalidState {
        action: &'static str,
        state: &'static str,
    },

    #[error("Chat service error: {0}")]
    Service(#[from] DirectoryError),

    #[error(transparent)]
    Chat(#[from] ChatError),
}

/// How a failure should be presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Service,
}

impl SessionError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(what: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            what,
            id: id.into(),
        }
    }

    pub fn invalid_state(action: &'static str, state: &'static str) -> Self {
        Self::InvalidState { action, state }
    }

    pub fn invalid_payload(reason: impl Into<String>) -> Self {
        Self::Service(DirectoryError::InvalidPayload(reason.into()))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::NotFound { .. } | Self::InvalidState { .. } => ErrorKind::NotFound,
            Self::Service(_) => ErrorKind::Service,
            Self::Chat(error) => match error.kind() {
                chitchat_chats::ErrorKind::Validation => ErrorKind::Validation,
                chitchat_chats::ErrorKind::NotFound => ErrorKind::NotFound,
            },
        }
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub fn is_service(&self) -> bool {
        self.kind() == ErrorKind::Service
    }
}
