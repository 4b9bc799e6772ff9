//! The backend collaborators a session talks to.
//!
//! A [`ChatDirectory`] finds users and resolves the canonical direct chat with
//! one of them. [`HttpDirectory`] talks to the REST backend;
//! [`MemoryDirectory`] keeps everything in process for tests and demos.

pub mod http;
pub mod memory;

pub use http::HttpDirectory;
pub use memory::MemoryDirectory;

use chitchat_chats::{Chat, User};
use thiserror::Error;

use crate::auth::AuthToken;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("directory request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("directory returned status {status}")]
    UnexpectedStatus { status: u16 },
    #[error("invalid directory payload: {0}")]
    InvalidPayload(String),
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

/// Backend operations the session depends on.
///
/// `access_or_create_chat` must be safe to repeat: every call for the same
/// target returns the same direct chat.
pub trait ChatDirectory {
    async fn search_users(&self, query: &str, token: &AuthToken) -> Result<Vec<User>, DirectoryError>;

    async fn access_or_create_chat(
        &self,
        target_user_id: &str,
        token: &AuthToken,
    ) -> Result<Chat, DirectoryError>;

    async fn fetch_chats(&self, token: &AuthToken) -> Result<Vec<Chat>, DirectoryError>;
}
