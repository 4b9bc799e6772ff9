//! In-process directory for testing sessions without a backend.

use std::collections::HashMap;
use std::sync::Arc;

use chitchat_chats::{Chat, User, UserId};
use tokio::sync::RwLock;

use super::{ChatDirectory, DirectoryError};
use crate::auth::AuthToken;

/// Calls received by a [`MemoryDirectory`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectoryCalls {
    pub search_users: usize,
    pub access_or_create_chat: usize,
    pub fetch_chats: usize,
}

#[derive(Debug, Default)]
struct DirectoryState {
    users: Vec<User>,
    sessions: HashMap<String, UserId>,
    chats: Vec<Chat>,
    next_chat_id: u64,
    fail_next_search: Option<String>,
    fail_next_access: Option<String>,
    calls: DirectoryCalls,
}

/// Directory that keeps users and chats in memory.
///
/// Clones share state, so a test can keep a handle for seeding and
/// inspecting calls while a session owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryDirectory {
    state: Arc<RwLock<DirectoryState>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_user(&self, user: User) {
        self.state.write().await.users.push(user);
    }

    /// Accept `token` as a sign-in of `user_id`
    pub async fn add_session(&self, token: &AuthToken, user_id: impl Into<UserId>) {
        self.state
            .write()
            .await
            .sessions
            .insert(token.expose().to_string(), user_id.into());
    }

    pub async fn add_chat(&self, chat: Chat) {
        self.state.write().await.chats.push(chat);
    }

    /// Delete a chat, as another client or an admin would
    pub async fn remove_chat(&self, chat_id: &str) {
        self.state.write().await.chats.retain(|chat| chat.id != chat_id);
    }

    /// Make the next search fail with `reason`
    pub async fn fail_next_search(&self, reason: impl Into<String>) {
        self.state.write().await.fail_next_search = Some(reason.into());
    }

    /// Make the next access-or-create fail with `reason`
    pub async fn fail_next_access(&self, reason: impl Into<String>) {
        self.state.write().await.fail_next_access = Some(reason.into());
    }

    pub async fn calls(&self) -> DirectoryCalls {
        self.state.read().await.calls
    }

    pub async fn chat_count(&self) -> usize {
        self.state.read().await.chats.len()
    }
}

impl DirectoryState {
    fn caller(&self, token: &AuthToken) -> Result<UserId, DirectoryError> {
        self.sessions
            .get(token.expose())
            .cloned()
            .ok_or(DirectoryError::UnexpectedStatus { status: 401 })
    }
}

impl ChatDirectory for MemoryDirectory {
    async fn search_users(&self, query: &str, token: &AuthToken) -> Result<Vec<User>, DirectoryError> {
        let mut state = self.state.write().await;
        state.calls.search_users += 1;

        if let Some(reason) = state.fail_next_search.take() {
            return Err(DirectoryError::Unavailable(reason));
        }

        let caller = state.caller(token)?;
        let needle = query.to_lowercase();

        Ok(state
            .users
            .iter()
            .filter(|user| user.id != caller)
            .filter(|user| {
                user.name.to_lowercase().contains(&needle)
                    || user
                        .email
                        .as_deref()
                        .is_some_and(|email| email.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect())
    }

    async fn access_or_create_chat(
        &self,
        target_user_id: &str,
        token: &AuthToken,
    ) -> Result<Chat, DirectoryError> {
        let mut state = self.state.write().await;
        state.calls.access_or_create_chat += 1;

        if let Some(reason) = state.fail_next_access.take() {
            return Err(DirectoryError::Unavailable(reason));
        }

        let caller = state.caller(token)?;

        if !state.users.iter().any(|user| user.id == target_user_id) {
            return Err(DirectoryError::UnexpectedStatus { status: 404 });
        }

        if let Some(existing) = state
            .chats
            .iter()
            .find(|chat| chat.is_direct_between(&caller, target_user_id))
        {
            return Ok(existing.clone());
        }

        state.next_chat_id += 1;
        let chat = Chat::direct(format!("chat-{}", state.next_chat_id), caller, target_user_id);
        state.chats.push(chat.clone());
        Ok(chat)
    }

    async fn fetch_chats(&self, token: &AuthToken) -> Result<Vec<Chat>, DirectoryError> {
        let mut state = self.state.write().await;
        state.calls.fetch_chats += 1;

        let caller = state.caller(token)?;

        // Newest first, as the backend sorts by last update.
        Ok(state
            .chats
            .iter()
            .rev()
            .filter(|chat| chat.has_participant(&caller))
            .cloned()
            .collect())
    }
}
