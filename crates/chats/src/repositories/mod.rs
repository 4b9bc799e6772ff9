//! In-memory state for a chat session.
//!
//! The registry owns the set of chats and the active selection; the message
//! store owns the per-chat message sequences and cross-checks every write
//! against the registry.

pub mod chat_registry;
pub mod message_store;

pub use chat_registry::ChatRegistry;
pub use message_store::MessageStore;
