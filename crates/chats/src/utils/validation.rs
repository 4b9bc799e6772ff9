//! Validation utilities.

use crate::types::ChatError;

/// Maximum message length in bytes
pub const MAX_MESSAGE_LENGTH: usize = 100_000;

/// Validation utilities
pub struct Validator;

impl Validator {
    /// Validate an identifier issued by the backend
    pub fn identifier(label: &str, value: &str) -> Result<(), ChatError> {
        if value.trim().is_empty() {
            return Err(ChatError::validation(format!("{label} id cannot be empty")));
        }

        if value.chars().any(char::is_whitespace) {
            return Err(ChatError::validation(format!(
                "{label} id cannot contain whitespace"
            )));
        }

        Ok(())
    }

    /// Validate a user search query, returning the trimmed query
    pub fn search_query(query: &str) -> Result<String, ChatError> {
        let trimmed = query.trim();

        if trimmed.is_empty() {
            return Err(ChatError::validation("Search query cannot be empty"));
        }

        Ok(trimmed.to_string())
    }

    /// Validate message content, returning the trimmed content
    pub fn message_content(content: &str) -> Result<String, ChatError> {
        let trimmed = content.trim();

        if trimmed.is_empty() {
            return Err(ChatError::invalid_message("Message content cannot be empty"));
        }

        if trimmed.len() > MAX_MESSAGE_LENGTH {
            return Err(ChatError::invalid_message(format!(
                "Message content too long (max {MAX_MESSAGE_LENGTH} bytes)"
            )));
        }

        Ok(trimmed.to_string())
    }
}
