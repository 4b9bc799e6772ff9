//! # Chitchat Session Crate
//!
//! Drives one signed-in session: loading the user's chats, searching for other
//! users, opening (or resuming) a direct chat with one of them and keeping the
//! chat list, selection and messages consistent while requests race.
//!
//! ```rust
//! use chitchat_chats::User;
//! use chitchat_config::SessionConfig;
//! use chitchat_session::{AuthToken, InteractionState, MemoryDirectory, SessionCoordinator, SessionUser};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let directory = MemoryDirectory::new();
//! let token = AuthToken::new("token-u1");
//! directory.add_user(User::new("u1", "Me")).await;
//! directory.add_user(User::new("u2", "Alice")).await;
//! directory.add_session(&token, "u1").await;
//!
//! let me = SessionUser::new(User::new("u1", "Me"), token);
//! let mut session = SessionCoordinator::new(directory, me, &SessionConfig::default());
//! session.start().await.unwrap();
//!
//! session.search("ali").await.unwrap();
//! let chat = session.open_chat("u2").await.unwrap().applied().unwrap();
//!
//! assert_eq!(session.registry().current_selection(), Some(&chat));
//! assert_eq!(session.state(), &InteractionState::Idle);
//! # });
//! ```

pub mod auth;
pub mod coordinator;
pub mod directory;
pub mod error;
pub mod events;
pub mod notice;

pub use auth::{AuthToken, SessionUser};
pub use coordinator::{Completion, InteractionState, OpenTicket, SearchTicket, SessionCoordinator};
pub use directory::{ChatDirectory, DirectoryError, HttpDirectory, MemoryDirectory};
pub use error::{ErrorKind, SessionError, SessionResult};
pub use events::SessionEvent;
pub use notice::{Notice, NoticeLevel, NoticePlacement};
