//! # Chitchat Chats Crate
//!
//! Client-side chat state for a Chitchat session: the entities exchanged with
//! the backend, the registry of chats visible to the signed-in user, and the
//! per-chat message store with read markers.
//!
//! ## Architecture
//!
//! - **Entities**: record types (User, Chat, Message) with boundary validation
//! - **Repositories**: in-memory `ChatRegistry` and `MessageStore`
//! - **Types**: identifiers and errors
//! - **Utils**: input validation
//!
//! ## Usage
//!
//! ```rust
//! use chitchat_chats::{Chat, ChatRegistry, Message, MessageStore};
//!
//! let mut registry = ChatRegistry::new();
//! registry.load_initial(vec![Chat::direct("c1", "u1", "u2")]);
//!
//! let mut store = MessageStore::new();
//! store
//!     .append(&registry, "c1", Message::compose("c1", "u1", "  hello "))
//!     .unwrap();
//!
//! assert_eq!(store.messages_for(&registry, "c1").unwrap()[0].content, "hello");
//! ```

pub mod entities;
pub mod repositories;
pub mod types;
pub mod utils;

pub use entities::{Chat, Message, User};
pub use repositories::{ChatRegistry, MessageStore};
pub use types::{ChatError, ChatId, ChatResult, ErrorKind, MessageId, UserId};
