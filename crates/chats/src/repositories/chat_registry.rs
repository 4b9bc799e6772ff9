//! In-memory registry of the chats visible to the session user.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::entities::Chat;
use crate::types::{ChatError, ChatId, ChatResult};

/// Ordered, duplicate-free set of chats plus the active selection.
///
/// The most recently added chat comes first. Membership only changes through
/// [`ChatRegistry::load_initial`] and [`ChatRegistry::upsert_front`].
#[derive(Debug, Default, Clone)]
pub struct ChatRegistry {
    chats: Vec<Chat>,
    selected: Option<ChatId>,
}

impl ChatRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the registry contents at session start.
    ///
    /// Duplicate ids, and further direct chats for an already loaded pair of
    /// participants, keep their first occurrence. The selection is cleared.
    pub fn load_initial(&mut self, chats: impl IntoIterator<Item = Chat>) {
        let mut seen = HashSet::new();
        let mut pairs = HashSet::new();
        let mut loaded = Vec::new();

        for chat in chats {
            if !seen.insert(chat.id.clone()) {
                warn!(chat_id = %chat.id, "dropping duplicate chat from initial load");
                continue;
            }

            if let Some(pair) = direct_pair(&chat) {
                if !pairs.insert(pair) {
                    warn!(chat_id = %chat.id, "dropping second direct chat for the same pair");
                    continue;
                }
            }

            loaded.push(chat);
        }

        debug!(count = loaded.len(), "chat registry loaded");
        self.chats = loaded;
        self.selected = None;
    }

    /// Insert `chat` at the front unless a chat with the same id is present.
    ///
    /// Returns `true` when the chat was inserted.
    pub fn upsert_front(&mut self, chat: Chat) -> bool {
        if self.contains(&chat.id) {
            debug!(chat_id = %chat.id, "chat already registered");
            return false;
        }

        self.chats.insert(0, chat);
        true
    }

    /// Mark `chat_id` as the active chat.
    pub fn select(&mut self, chat_id: &str) -> ChatResult<&Chat> {
        let index = self
            .position(chat_id)
            .ok_or_else(|| ChatError::chat_not_found(chat_id))?;

        self.selected = Some(chat_id.to_string());
        Ok(&self.chats[index])
    }

    pub fn current_selection(&self) -> Option<&Chat> {
        self.selected.as_deref().and_then(|id| self.get(id))
    }

    pub fn get(&self, chat_id: &str) -> Option<&Chat> {
        self.chats.iter().find(|chat| chat.id == chat_id)
    }

    /// The direct chat between `a` and `b`, in either order
    pub fn direct_chat_between(&self, a: &str, b: &str) -> Option<&Chat> {
        self.chats.iter().find(|chat| chat.is_direct_between(a, b))
    }

    pub fn contains(&self, chat_id: &str) -> bool {
        self.position(chat_id).is_some()
    }

    /// Chats in display order
    pub fn chats(&self) -> &[Chat] {
        &self.chats
    }

    pub fn len(&self) -> usize {
        self.chats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }

    fn position(&self, chat_id: &str) -> Option<usize> {
        self.chats.iter().position(|chat| chat.id == chat_id)
    }
}

// Unordered participant pair of a direct chat
fn direct_pair(chat: &Chat) -> Option<(String, String)> {
    match chat.participants.as_slice() {
        [a, b] if chat.is_direct() => Some(if a <= b {
            (a.clone(), b.clone())
        } else {
            (b.clone(), a.clone())
        }),
        _ => None,
    }
}
