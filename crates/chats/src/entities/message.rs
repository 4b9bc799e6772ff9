use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{ChatId, MessageId, UserId};

/// Represents a message within a chat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Backend identifier (or a locally generated UUID for composed messages)
    #[serde(alias = "_id")]
    pub id: MessageId,
    /// Chat this message belongs to
    #[serde(rename = "chat")]
    pub chat_id: ChatId,
    /// User who sent the message
    pub sender: UserId,
    /// Message content, trimmed when stored
    pub content: String,
    /// Last user who acknowledged the message
    #[serde(default)]
    pub read_by: Option<UserId>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Message {
    /// Create a new message with a fresh id
    pub fn compose(
        chat_id: impl Into<ChatId>,
        sender: impl Into<UserId>,
        content: impl Into<String>,
    ) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), chat_id, sender, content)
    }

    pub fn with_id(
        id: impl Into<MessageId>,
        chat_id: impl Into<ChatId>,
        sender: impl Into<UserId>,
        content: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            chat_id: chat_id.into(),
            sender: sender.into(),
            content: content.into(),
            read_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record `reader_id` as the last reader. Returns false when nothing changed.
    pub fn mark_read(&mut self, reader_id: &str) -> bool {
        if self.read_by.as_deref() == Some(reader_id) {
            return false;
        }
        self.read_by = Some(reader_id.to_string());
        self.updated_at = Utc::now();
        true
    }

    pub fn is_read_by(&self, user_id: &str) -> bool {
        self.read_by.as_deref() == Some(user_id)
    }
}
