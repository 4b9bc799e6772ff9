//! Domain entities for the chat session core.
//!
//! Explicit record types for the shapes exchanged with the chat backend.
//! Each entity validates itself before it is allowed into the registry.

pub mod chat;
pub mod message;
pub mod user;

pub use chat::Chat;
pub use message::Message;
pub use user::User;
