//! The search-and-connect flow of a signed-in session.
//!
//! A [`SessionCoordinator`] owns the chat registry and message store of one
//! session and drives the interaction
//!
//! ```text
//! Idle -> Searching -> ResultsShown -> ConnectingChat -> Idle
//! ```
//!
//! Every request is split into a `begin_*` step issuing a ticket and a
//! `complete_*` step applying the directory's outcome. Only the latest ticket
//! is honoured; outcomes arriving for an older ticket are dropped.

use std::time::Duration;

use chitchat_chats::utils::Validator;
use chitchat_chats::{Chat, ChatRegistry, Message, MessageStore, User, UserId};
use chitchat_config::SessionConfig;
use tokio::sync::broadcast;
use tracing::{debug, info, trace, warn};

use crate::auth::SessionUser;
use crate::directory::{ChatDirectory, DirectoryError};
use crate::error::{SessionError, SessionResult};
use crate::events::SessionEvent;
use crate::notice::Notice;

/// Where the session is in the search-and-connect flow.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionState {
    Idle,
    Searching {
        query: String,
    },
    ResultsShown {
        query: String,
        results: Vec<User>,
    },
    ConnectingChat {
        query: String,
        results: Vec<User>,
        target: UserId,
    },
}

impl InteractionState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Searching { .. } => "searching",
            Self::ResultsShown { .. } => "showing results",
            Self::ConnectingChat { .. } => "connecting",
        }
    }

    /// Search results currently on screen, if any
    pub fn results(&self) -> Option<&[User]> {
        match self {
            Self::ResultsShown { results, .. } | Self::ConnectingChat { results, .. } => {
                Some(results)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    seq: u64,
    query: String,
}

impl SearchTicket {
    /// The trimmed query to send to the directory
    pub fn query(&self) -> &str {
        &self.query
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenTicket {
    seq: u64,
    target: UserId,
}

impl OpenTicket {
    pub fn target(&self) -> &str {
        &self.target
    }
}

/// Outcome of completing a ticket.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion<T> {
    Applied(T),
    /// A newer request or user action replaced this one; nothing changed.
    Superseded,
}

impl<T> Completion<T> {
    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            Self::Superseded => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded)
    }
}

pub struct SessionCoordinator<D> {
    directory: D,
    session: SessionUser,
    registry: ChatRegistry,
    store: MessageStore,
    state: InteractionState,
    pending: Option<u64>,
    next_seq: u64,
    events: broadcast::Sender<SessionEvent>,
    notice_duration: Duration,
}

impl<D: ChatDirectory> SessionCoordinator<D> {
    pub fn new(directory: D, session: SessionUser, config: &SessionConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));

        Self {
            directory,
            session,
            registry: ChatRegistry::new(),
            store: MessageStore::new(),
            state: InteractionState::Idle,
            pending: None,
            next_seq: 0,
            events,
            notice_duration: Duration::from_millis(config.notice_duration_ms),
        }
    }

    /// Load the signed-in user's chats from the directory.
    pub async fn start(&mut self) -> SessionResult<&[Chat]> {
        let chats = self.directory.fetch_chats(&self.session.token).await?;

        for chat in &chats {
            chat.validate()
                .map_err(|error| SessionError::invalid_payload(error.to_string()))?;
            if !chat.has_participant(self.session.id()) {
                return Err(SessionError::invalid_payload(format!(
                    "chat {} does not include the session user",
                    chat.id
                )));
            }
        }

        self.registry.load_initial(chats);
        self.store.retain_registered(&self.registry);
        info!(
            user_id = %self.session.id(),
            chats = self.registry.len(),
            "session started"
        );
        emit(
            &self.events,
            SessionEvent::ChatsLoaded {
                count: self.registry.len(),
            },
        );

        Ok(self.registry.chats())
    }

    /// Search for users and show the results.
    pub async fn search(&mut self, query: &str) -> SessionResult<Completion<Vec<User>>> {
        let ticket = self.begin_search(query)?;
        let outcome = self
            .directory
            .search_users(ticket.query(), &self.session.token)
            .await;
        self.complete_search(ticket, outcome)
    }

    /// Open (or resume) the direct chat with a user from the shown results.
    pub async fn open_chat(&mut self, user_id: &str) -> SessionResult<Completion<Chat>> {
        let ticket = self.begin_open(user_id)?;
        let outcome = self
            .directory
            .access_or_create_chat(ticket.target(), &self.session.token)
            .await;
        self.complete_open(ticket, outcome)
    }

    /// Start a search. Supersedes any request still in flight.
    ///
    /// An empty query fails before anything changes.
    pub fn begin_search(&mut self, query: &str) -> SessionResult<SearchTicket> {
        let query = match Validator::search_query(query) {
            Ok(query) => query,
            Err(error) => {
                self.notify(Notice::empty_search(self.notice_duration));
                return Err(error.into());
            }
        };

        let seq = self.issue();
        self.state = InteractionState::Searching {
            query: query.clone(),
        };
        debug!(seq, query = %query, "search started");
        emit(
            &self.events,
            SessionEvent::SearchStarted {
                query: query.clone(),
            },
        );

        Ok(SearchTicket { seq, query })
    }

    pub fn complete_search(
        &mut self,
        ticket: SearchTicket,
        outcome: Result<Vec<User>, DirectoryError>,
    ) -> SessionResult<Completion<Vec<User>>> {
        if !self.take_pending(ticket.seq) {
            return Ok(Completion::Superseded);
        }

        let users = match outcome.map_err(SessionError::from).and_then(|users| {
            for user in &users {
                user.validate()
                    .map_err(|error| SessionError::invalid_payload(error.to_string()))?;
            }
            Ok(users)
        }) {
            Ok(users) => users,
            Err(error) => {
                warn!(query = %ticket.query, %error, "user search failed");
                self.state = InteractionState::Idle;
                self.notify(Notice::search_failed(self.notice_duration));
                return Err(error);
            }
        };

        debug!(query = %ticket.query, results = users.len(), "search results shown");
        self.state = InteractionState::ResultsShown {
            query: ticket.query.clone(),
            results: users.clone(),
        };
        emit(
            &self.events,
            SessionEvent::SearchResults {
                query: ticket.query,
                users: users.clone(),
            },
        );

        Ok(Completion::Applied(users))
    }

    /// Pick a candidate from the shown results.
    pub fn begin_open(&mut self, user_id: &str) -> SessionResult<OpenTicket> {
        match self.check_pick(user_id) {
            Ok((query, results)) => {
                let seq = self.issue();
                debug!(seq, user_id, "opening chat");
                self.state = InteractionState::ConnectingChat {
                    query,
                    results,
                    target: user_id.to_string(),
                };
                Ok(OpenTicket {
                    seq,
                    target: user_id.to_string(),
                })
            }
            Err(error) => {
                self.notify(Notice::open_failed(self.notice_duration));
                Err(error)
            }
        }
    }

    pub fn complete_open(
        &mut self,
        ticket: OpenTicket,
        outcome: Result<Chat, DirectoryError>,
    ) -> SessionResult<Completion<Chat>> {
        if !self.take_pending(ticket.seq) {
            return Ok(Completion::Superseded);
        }

        let InteractionState::ConnectingChat { query, results, .. } =
            std::mem::replace(&mut self.state, InteractionState::Idle)
        else {
            return Err(SessionError::invalid_state("open a chat", "not connecting"));
        };

        let chat = match outcome
            .map_err(SessionError::from)
            .and_then(|chat| self.check_direct_chat(chat, &ticket.target))
        {
            Ok(chat) => chat,
            Err(error) => {
                warn!(user_id = %ticket.target, %error, "failed to open chat");
                self.state = InteractionState::ResultsShown { query, results };
                self.notify(Notice::open_failed(self.notice_duration));
                return Err(error);
            }
        };

        let chat = match self
            .registry
            .direct_chat_between(self.session.id(), &ticket.target)
        {
            Some(existing) if existing.id != chat.id => {
                warn!(
                    chat_id = %chat.id,
                    existing = %existing.id,
                    "directory returned a second chat for the pair, keeping the registered one"
                );
                existing.clone()
            }
            _ => chat,
        };

        if self.registry.upsert_front(chat.clone()) {
            emit(
                &self.events,
                SessionEvent::ChatAdded {
                    chat_id: chat.id.clone(),
                },
            );
        }
        self.registry.select(&chat.id)?;
        info!(chat_id = %chat.id, user_id = %ticket.target, "chat opened");

        emit(
            &self.events,
            SessionEvent::ChatSelected {
                chat_id: chat.id.clone(),
            },
        );
        emit(&self.events, SessionEvent::SearchClosed);

        Ok(Completion::Applied(chat))
    }

    /// Select a chat from the list. Closes any open search.
    pub fn select_chat(&mut self, chat_id: &str) -> SessionResult<&Chat> {
        if !self.registry.contains(chat_id) {
            return Err(chitchat_chats::ChatError::chat_not_found(chat_id).into());
        }

        self.close_search();
        let chat = self.registry.select(chat_id)?;
        emit(
            &self.events,
            SessionEvent::ChatSelected {
                chat_id: chat.id.clone(),
            },
        );

        Ok(chat)
    }

    /// Dismiss the search; any response still in flight is dropped.
    pub fn close_search(&mut self) {
        if let Some(seq) = self.pending.take() {
            debug!(seq, "in-flight request abandoned");
        }

        if self.state != InteractionState::Idle {
            self.state = InteractionState::Idle;
            emit(&self.events, SessionEvent::SearchClosed);
        }
    }

    /// Send a message from the session user.
    pub fn send_message(&mut self, chat_id: &str, content: &str) -> SessionResult<Message> {
        let message = Message::compose(chat_id, self.session.id(), content);
        self.append(chat_id.to_string(), message)
    }

    /// Record a message delivered by the backend.
    pub fn receive_message(&mut self, message: Message) -> SessionResult<Message> {
        self.append(message.chat_id.clone(), message)
    }

    /// Mark a message as read by the session user.
    pub fn mark_read(&mut self, chat_id: &str, message_id: &str) -> SessionResult<bool> {
        let reader_id = self.session.id().to_string();
        let changed = self
            .store
            .mark_read(&self.registry, chat_id, message_id, &reader_id)?;

        if changed {
            emit(
                &self.events,
                SessionEvent::MessageRead {
                    chat_id: chat_id.to_string(),
                    message_id: message_id.to_string(),
                    reader_id,
                },
            );
        }

        Ok(changed)
    }

    pub fn messages(&self, chat_id: &str) -> SessionResult<&[Message]> {
        Ok(self.store.messages_for(&self.registry, chat_id)?)
    }

    pub fn unread_count(&self, chat_id: &str) -> usize {
        self.store.unread_count(chat_id, self.session.id())
    }

    pub fn registry(&self) -> &ChatRegistry {
        &self.registry
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn session(&self) -> &SessionUser {
        &self.session
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Log out. Chats, messages and in-flight requests are discarded.
    pub fn end(self) {
        info!(
            user_id = %self.session.id(),
            abandoned_request = self.pending.is_some(),
            "session ended"
        );
    }

    fn append(&mut self, chat_id: String, message: Message) -> SessionResult<Message> {
        let message = self.store.append(&self.registry, &chat_id, message)?.clone();
        emit(
            &self.events,
            SessionEvent::MessageAppended {
                message: message.clone(),
            },
        );
        Ok(message)
    }

    fn issue(&mut self) -> u64 {
        self.next_seq += 1;
        if let Some(previous) = self.pending.replace(self.next_seq) {
            debug!(previous, "in-flight request superseded");
        }
        self.next_seq
    }

    fn take_pending(&mut self, seq: u64) -> bool {
        if self.pending == Some(seq) {
            self.pending = None;
            true
        } else {
            debug!(seq, latest = ?self.pending, "discarding stale response");
            false
        }
    }

    fn check_pick(&self, user_id: &str) -> SessionResult<(String, Vec<User>)> {
        let (query, results) = match &self.state {
            InteractionState::ResultsShown { query, results }
            | InteractionState::ConnectingChat { query, results, .. } => (query, results),
            other => return Err(SessionError::invalid_state("open a chat", other.name())),
        };

        if user_id == self.session.id() {
            return Err(SessionError::validation("Cannot open a chat with yourself"));
        }

        if !results.iter().any(|user| user.id == user_id) {
            return Err(SessionError::not_found("User", user_id));
        }

        Ok((query.clone(), results.clone()))
    }

    fn check_direct_chat(&self, chat: Chat, target: &str) -> SessionResult<Chat> {
        chat.validate()
            .map_err(|error| SessionError::invalid_payload(error.to_string()))?;

        if !chat.is_direct_between(self.session.id(), target) {
            return Err(SessionError::invalid_payload(format!(
                "chat {} is not the direct chat with {target}",
                chat.id
            )));
        }

        Ok(chat)
    }

    fn notify(&self, notice: Notice) {
        emit(&self.events, SessionEvent::Notice(notice));
    }
}

fn emit(events: &broadcast::Sender<SessionEvent>, event: SessionEvent) {
    if events.send(event).is_err() {
        trace!("no session event subscribers");
    }
}
