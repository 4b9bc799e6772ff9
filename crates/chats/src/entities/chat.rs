use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ChatError, ChatId, UserId};
use crate::utils::Validator;

/// Represents a chat conversation visible to the session user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    /// Backend identifier
    #[serde(alias = "_id")]
    pub id: ChatId,
    /// Participant user ids
    #[serde(alias = "users")]
    pub participants: Vec<UserId>,
    /// Group chats allow more than two participants
    #[serde(default, alias = "isGroupChat")]
    pub is_group: bool,
    /// Optional title (group chats)
    #[serde(default, alias = "chatName", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Chat {
    /// Create a one-on-one chat between two users
    pub fn direct(id: impl Into<ChatId>, first: impl Into<UserId>, second: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            participants: vec![first.into(), second.into()],
            is_group: false,
            title: None,
            created_at: Utc::now(),
        }
    }

    /// Create a group chat
    pub fn group(id: impl Into<ChatId>, title: impl Into<String>, participants: Vec<UserId>) -> Self {
        Self {
            id: id.into(),
            participants,
            is_group: true,
            title: Some(title.into()),
            created_at: Utc::now(),
        }
    }

    pub fn is_direct(&self) -> bool {
        !self.is_group
    }

    pub fn has_participant(&self, user_id: &str) -> bool {
        self.participants.iter().any(|participant| participant == user_id)
    }

    /// True when this is the direct chat for the unordered pair `(a, b)`
    pub fn is_direct_between(&self, a: &str, b: &str) -> bool {
        self.is_direct() && a != b && self.has_participant(a) && self.has_participant(b)
    }

    /// The other participant of a direct chat
    pub fn counterpart(&self, user_id: &str) -> Option<&UserId> {
        if !self.is_direct() {
            return None;
        }
        self.participants.iter().find(|participant| *participant != user_id)
    }

    /// Validate chat data received from the directory
    pub fn validate(&self) -> Result<(), ChatError> {
        Validator::identifier("Chat", &self.id)?;

        for participant in &self.participants {
            Validator::identifier("Participant", participant)?;
        }

        let unique: HashSet<&str> = self.participants.iter().map(String::as_str).collect();
        if unique.len() != self.participants.len() {
            return Err(ChatError::validation("Chat participants must be unique"));
        }

        if self.is_direct() && self.participants.len() != 2 {
            return Err(ChatError::validation(
                "Direct chats must have exactly two participants",
            ));
        }

        if self.is_group && self.participants.len() < 2 {
            return Err(ChatError::validation(
                "Group chats must have at least two participants",
            ));
        }

        Ok(())
    }
}
