//! Append-only message sequences, one per chat.

use std::collections::HashMap;

use tracing::debug;

use super::ChatRegistry;
use crate::entities::Message;
use crate::types::{ChatError, ChatId, ChatResult};
use crate::utils::Validator;

/// Messages keyed by chat, in arrival order.
#[derive(Debug, Default, Clone)]
pub struct MessageStore {
    messages: HashMap<ChatId, Vec<Message>>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `message` to the end of the chat's sequence.
    ///
    /// The chat must be registered and the sender must be one of its
    /// participants. Content is stored trimmed.
    pub fn append(
        &mut self,
        registry: &ChatRegistry,
        chat_id: &str,
        mut message: Message,
    ) -> ChatResult<&Message> {
        let chat = registry
            .get(chat_id)
            .ok_or_else(|| ChatError::chat_not_found(chat_id))?;

        message.content = Validator::message_content(&message.content)?;

        if message.chat_id != chat_id {
            return Err(ChatError::invalid_message(format!(
                "Message belongs to chat {}, not {}",
                message.chat_id, chat_id
            )));
        }

        if !chat.has_participant(&message.sender) {
            return Err(ChatError::invalid_message(format!(
                "Sender {} is not a participant of chat {}",
                message.sender, chat_id
            )));
        }

        let sequence = self.messages.entry(chat_id.to_string()).or_default();
        if sequence.iter().any(|existing| existing.id == message.id) {
            return Err(ChatError::invalid_message(format!(
                "Message {} already exists",
                message.id
            )));
        }

        debug!(chat_id, message_id = %message.id, "message appended");
        sequence.push(message);
        Ok(&sequence[sequence.len() - 1])
    }

    /// Set the read marker of a message. Re-marking with the same reader is a no-op.
    ///
    /// Returns whether the marker changed.
    pub fn mark_read(
        &mut self,
        registry: &ChatRegistry,
        chat_id: &str,
        message_id: &str,
        reader_id: &str,
    ) -> ChatResult<bool> {
        if !registry.contains(chat_id) {
            return Err(ChatError::chat_not_found(chat_id));
        }

        let message = self
            .messages
            .get_mut(chat_id)
            .and_then(|sequence| sequence.iter_mut().find(|message| message.id == message_id))
            .ok_or_else(|| ChatError::message_not_found(message_id))?;

        Ok(message.mark_read(reader_id))
    }

    /// Messages of a registered chat, oldest first.
    pub fn messages_for(&self, registry: &ChatRegistry, chat_id: &str) -> ChatResult<&[Message]> {
        if !registry.contains(chat_id) {
            return Err(ChatError::chat_not_found(chat_id));
        }

        Ok(self
            .messages
            .get(chat_id)
            .map(Vec::as_slice)
            .unwrap_or_default())
    }

    /// Drop the messages of chats no longer in `registry`.
    ///
    /// Returns how many chats were forgotten.
    pub fn retain_registered(&mut self, registry: &ChatRegistry) -> usize {
        let before = self.messages.len();
        self.messages.retain(|chat_id, _| registry.contains(chat_id));

        let dropped = before - self.messages.len();
        if dropped > 0 {
            debug!(dropped, "forgot messages of unregistered chats");
        }
        dropped
    }

    /// Messages in the chat neither sent by nor marked read by `reader_id`.
    pub fn unread_count(&self, chat_id: &str, reader_id: &str) -> usize {
        self.messages.get(chat_id).map_or(0, |sequence| {
            sequence
                .iter()
                .filter(|message| message.sender != reader_id && !message.is_read_by(reader_id))
                .count()
        })
    }
}
