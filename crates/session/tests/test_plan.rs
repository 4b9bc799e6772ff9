//! Test plan for the `chitchat-session` crate.
//!
//! The HTTP directory is exercised against a mock backend; the session flows
//! run against both the mock backend and the in-memory directory.

use chitchat_chats::{Chat, User};
use chitchat_config::{ApiConfig, SessionConfig};
use chitchat_session::{
    AuthToken, ChatDirectory, Completion, DirectoryError, HttpDirectory, InteractionState,
    MemoryDirectory, NoticeLevel, SessionCoordinator, SessionEvent, SessionUser,
};
use httpmock::prelude::*;
use serde_json::json;

const TOKEN: &str = "token-u1";

fn api_config(server: &MockServer) -> ApiConfig {
    ApiConfig {
        base_url: server.url("/api"),
        ..ApiConfig::default()
    }
}

fn me() -> SessionUser {
    SessionUser::new(User::new("u1", "Me"), AuthToken::new(TOKEN))
}

fn chat_json(id: &str, users: [&str; 2]) -> serde_json::Value {
    json!({
        "_id": id,
        "users": users,
        "isGroupChat": false,
        "chatName": "sender",
        "createdAt": "2024-03-01T10:00:00Z"
    })
}

async fn memory_session() -> (SessionCoordinator<MemoryDirectory>, MemoryDirectory) {
    let directory = MemoryDirectory::new();
    let token = AuthToken::new(TOKEN);
    directory.add_user(User::new("u1", "Me")).await;
    directory.add_user(User::new("u2", "Alice")).await;
    directory.add_user(User::new("u3", "Albert")).await;
    directory.add_session(&token, "u1").await;

    let coordinator = SessionCoordinator::new(directory.clone(), me(), &SessionConfig::default());
    (coordinator, directory)
}

#[tokio::test]
async fn http_search_sends_query_and_auth_header() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/user/getUser")
                .query_param("search", "al")
                .header("x-auth-key", TOKEN);
            then.status(200).json_body(json!([
                { "_id": "u2", "name": "Alice", "email": "alice@example.com", "picture": "https://img/alice.png" }
            ]));
        })
        .await;

    let directory = HttpDirectory::new(&api_config(&server)).unwrap();
    let users = directory
        .search_users("al", &AuthToken::new(TOKEN))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].id, "u2");
    assert_eq!(users[0].avatar.as_deref(), Some("https://img/alice.png"));
}

#[tokio::test]
async fn http_access_chat_posts_user_id() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/chat/createChat")
                .header("x-auth-key", TOKEN)
                .json_body(json!({ "userId": "u2" }));
            then.status(200).json_body(chat_json("c1", ["u1", "u2"]));
        })
        .await;

    let directory = HttpDirectory::new(&api_config(&server)).unwrap();
    let chat = directory
        .access_or_create_chat("u2", &AuthToken::new(TOKEN))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(chat.id, "c1");
    assert!(chat.is_direct_between("u2", "u1"));
}

#[tokio::test]
async fn http_error_status_is_reported() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/chat/fetchChats");
            then.status(401);
        })
        .await;

    let directory = HttpDirectory::new(&api_config(&server)).unwrap();
    let error = directory
        .fetch_chats(&AuthToken::new("expired"))
        .await
        .unwrap_err();

    assert!(matches!(error, DirectoryError::UnexpectedStatus { status: 401 }));
}

#[tokio::test]
async fn session_over_http_search_then_open() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/chat/fetchChats");
            then.status(200).json_body(json!([chat_json("c0", ["u1", "u3"])]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/user/getUser").query_param("search", "al");
            then.status(200)
                .json_body(json!([{ "_id": "u2", "name": "Alice" }]));
        })
        .await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/chat/createChat");
            then.status(200).json_body(chat_json("c1", ["u1", "u2"]));
        })
        .await;

    let directory = HttpDirectory::new(&api_config(&server)).unwrap();
    let mut session = SessionCoordinator::new(directory, me(), &SessionConfig::default());

    session.start().await.unwrap();
    assert_eq!(session.registry().len(), 1);

    let results = session.search(" al ").await.unwrap();
    assert_eq!(results, Completion::Applied(vec![User::new("u2", "Alice")]));

    session.open_chat("u2").await.unwrap();
    session.search("al").await.unwrap();
    session.open_chat("u2").await.unwrap();

    create.assert_hits_async(2).await;
    let ids: Vec<&str> = session
        .registry()
        .chats()
        .iter()
        .map(|chat| chat.id.as_str())
        .collect();
    assert_eq!(ids, vec!["c1", "c0"]);
    assert_eq!(
        session.registry().current_selection().map(|chat| chat.id.as_str()),
        Some("c1")
    );
}

#[tokio::test]
async fn session_search_failure_raises_notice() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/user/getUser");
            then.status(500);
        })
        .await;

    let directory = HttpDirectory::new(&api_config(&server)).unwrap();
    let mut session = SessionCoordinator::new(directory, me(), &SessionConfig::default());
    let mut events = session.subscribe();

    let error = session.search("al").await.unwrap_err();
    assert!(error.is_service());
    assert_eq!(session.state(), &InteractionState::Idle);

    let mut notices = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let SessionEvent::Notice(notice) = event {
            notices.push(notice);
        }
    }
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert_eq!(
        notices[0].description.as_deref(),
        Some("Failed to load search results")
    );
}

#[tokio::test]
async fn empty_search_never_reaches_directory() {
    let (mut session, directory) = memory_session().await;

    for query in ["", "   ", "\t\n"] {
        let error = session.search(query).await.unwrap_err();
        assert!(error.is_validation());
    }

    assert_eq!(directory.calls().await.search_users, 0);
    assert_eq!(session.state(), &InteractionState::Idle);
}

#[tokio::test]
async fn repeated_open_keeps_one_chat_per_pair() {
    let (mut session, directory) = memory_session().await;
    session.start().await.unwrap();

    for _ in 0..2 {
        session.search("alice").await.unwrap();
        session.open_chat("u2").await.unwrap();
    }

    let chats_with_alice = session
        .registry()
        .chats()
        .iter()
        .filter(|chat| chat.is_direct_between("u1", "u2"))
        .count();
    assert_eq!(chats_with_alice, 1);
    assert_eq!(directory.chat_count().await, 1);
}

#[tokio::test]
async fn differing_chat_ids_for_one_pair_keep_the_first() {
    let (mut session, _directory) = memory_session().await;

    for chat_id in ["c1", "c2"] {
        session.search("alice").await.unwrap();
        let ticket = session.begin_open("u2").unwrap();
        session
            .complete_open(ticket, Ok(Chat::direct(chat_id, "u2", "u1")))
            .unwrap();
    }

    let ids: Vec<&str> = session
        .registry()
        .chats()
        .iter()
        .map(|chat| chat.id.as_str())
        .collect();
    assert_eq!(ids, vec!["c1"]);
    assert_eq!(
        session.registry().current_selection().map(|chat| chat.id.as_str()),
        Some("c1")
    );
}

#[tokio::test]
async fn start_keeps_one_direct_chat_per_pair() {
    let (mut session, directory) = memory_session().await;
    directory.add_chat(Chat::direct("c-a", "u1", "u2")).await;
    directory.add_chat(Chat::direct("c-b", "u2", "u1")).await;

    let chats = session.start().await.unwrap();

    assert_eq!(chats.len(), 1);
    assert!(chats[0].is_direct_between("u1", "u2"));
}

#[tokio::test]
async fn session_open_failure_raises_notice() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/user/getUser");
            then.status(200)
                .json_body(json!([{ "_id": "u2", "name": "Alice" }]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/chat/createChat");
            then.status(500);
        })
        .await;

    let directory = HttpDirectory::new(&api_config(&server)).unwrap();
    let mut session = SessionCoordinator::new(directory, me(), &SessionConfig::default());
    session.search("al").await.unwrap();
    let mut events = session.subscribe();

    let error = session.open_chat("u2").await.unwrap_err();
    assert!(error.is_service());
    assert!(matches!(session.state(), InteractionState::ResultsShown { .. }));

    let mut notices = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let SessionEvent::Notice(notice) = event {
            notices.push(notice);
        }
    }
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert_eq!(notices[0].title, "Error occurred");
    assert_eq!(notices[0].description.as_deref(), Some("Failed to open chat"));
}

#[tokio::test]
async fn start_loads_existing_chats() {
    let (mut session, directory) = memory_session().await;
    directory.add_chat(Chat::direct("c-old", "u1", "u3")).await;
    directory.add_chat(Chat::direct("c-other", "u2", "u3")).await;

    let chats = session.start().await.unwrap();

    assert_eq!(chats.len(), 1);
    assert_eq!(chats[0].id, "c-old");
    assert!(session.registry().current_selection().is_none());
}

#[tokio::test]
async fn stale_outcomes_leave_session_untouched() {
    let (mut session, directory) = memory_session().await;
    session.start().await.unwrap();
    session.search("al").await.unwrap();

    let slow = session.begin_open("u2").unwrap();
    let slow_outcome = directory
        .access_or_create_chat(slow.target(), &session.session().token)
        .await;

    // The user starts a new search before the first pick completes.
    let fresh = session.begin_search("albert").unwrap();
    let before = session.state().clone();

    let discarded = session.complete_open(slow, slow_outcome).unwrap();
    assert!(discarded.is_superseded());
    assert!(session.registry().is_empty());
    assert_eq!(session.state(), &before);

    let outcome = directory
        .search_users(fresh.query(), &session.session().token)
        .await;
    let applied = session.complete_search(fresh, outcome).unwrap();
    assert_eq!(
        applied.applied().map(|users| users.len()),
        Some(1)
    );
}

#[tokio::test]
async fn selecting_a_chat_supersedes_a_running_search() {
    let (mut session, directory) = memory_session().await;
    directory.add_chat(Chat::direct("c-old", "u1", "u3")).await;
    session.start().await.unwrap();

    let ticket = session.begin_search("al").unwrap();
    session.select_chat("c-old").unwrap();

    let late = session
        .complete_search(ticket, Ok(vec![User::new("u2", "Alice")]))
        .unwrap();

    assert!(late.is_superseded());
    assert_eq!(session.state(), &InteractionState::Idle);
    assert_eq!(
        session.registry().current_selection().map(|chat| chat.id.as_str()),
        Some("c-old")
    );

    let error = session.select_chat("missing").unwrap_err();
    assert!(error.is_not_found());
}

#[tokio::test]
async fn end_discards_session_state() {
    let (mut session, directory) = memory_session().await;
    session.search("al").await.unwrap();
    let _pending = session.begin_open("u2").unwrap();

    session.end();

    assert_eq!(directory.calls().await.access_or_create_chat, 0);
}
