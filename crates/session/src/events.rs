//! Events broadcast by a running session.

use chitchat_chats::{ChatId, Message, MessageId, User, UserId};

use crate::notice::Notice;

#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The chat list was (re)loaded from the backend
    ChatsLoaded { count: usize },
    SearchStarted { query: String },
    SearchResults { query: String, users: Vec<User> },
    /// A chat was inserted at the front of the list
    ChatAdded { chat_id: ChatId },
    ChatSelected { chat_id: ChatId },
    SearchClosed,
    MessageAppended { message: Message },
    MessageRead {
        chat_id: ChatId,
        message_id: MessageId,
        reader_id: UserId,
    },
    Notice(Notice),
}
