//! Integration tests for the chats crate.

use std::collections::HashSet;

use chitchat_chats::{Chat, ChatError, ChatRegistry, ErrorKind, Message, MessageStore};

fn ids(registry: &ChatRegistry) -> Vec<String> {
    registry.chats().iter().map(|chat| chat.id.clone()).collect()
}

#[test]
fn registry_never_holds_duplicate_ids() {
    let mut registry = ChatRegistry::new();
    let pool = ["a", "b", "c", "d"];

    // Deterministic pseudo-random walk over repeated and interleaved upserts.
    let mut state: u32 = 7;
    for _ in 0..200 {
        state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        let id = pool[(state >> 16) as usize % pool.len()];
        registry.upsert_front(Chat::direct(id, "me", format!("peer-{id}")));

        let unique: HashSet<String> = ids(&registry).into_iter().collect();
        assert_eq!(unique.len(), registry.len());
    }

    assert_eq!(registry.len(), pool.len());
}

#[test]
fn upsert_front_scenario() {
    let mut registry = ChatRegistry::new();
    registry.load_initial(vec![Chat::direct("A", "me", "u1"), Chat::direct("B", "me", "u2")]);

    registry.upsert_front(Chat::direct("C", "me", "u3"));
    assert_eq!(ids(&registry), vec!["C", "A", "B"]);

    registry.upsert_front(Chat::direct("A", "me", "u1"));
    assert_eq!(ids(&registry), vec!["C", "A", "B"]);
}

#[test]
fn blank_content_leaves_sequence_unchanged() {
    let mut registry = ChatRegistry::new();
    registry.load_initial(vec![Chat::direct("c1", "u1", "u2")]);
    let mut store = MessageStore::new();

    store
        .append(&registry, "c1", Message::with_id("m1", "c1", "u1", "hello"))
        .unwrap();
    let before = store.messages_for(&registry, "c1").unwrap().to_vec();

    for blank in ["", " ", "\n\t  "] {
        let err = store
            .append(&registry, "c1", Message::compose("c1", "u1", blank))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    assert_eq!(store.messages_for(&registry, "c1").unwrap(), before.as_slice());
}

#[test]
fn unknown_chat_is_distinguishable_from_empty_chat() {
    let mut registry = ChatRegistry::new();
    registry.load_initial(vec![Chat::direct("c1", "u1", "u2")]);
    let store = MessageStore::new();

    let empty = store.messages_for(&registry, "c1").unwrap();
    assert!(empty.is_empty());

    let err = store.messages_for(&registry, "ghost").unwrap_err();
    assert_eq!(err, ChatError::chat_not_found("ghost"));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn mark_read_is_idempotent() {
    let mut registry = ChatRegistry::new();
    registry.load_initial(vec![Chat::direct("c1", "u1", "u2")]);
    let mut store = MessageStore::new();
    store
        .append(&registry, "c1", Message::with_id("m1", "c1", "u1", "ping"))
        .unwrap();

    assert!(store.mark_read(&registry, "c1", "m1", "u2").unwrap());
    let once = store.messages_for(&registry, "c1").unwrap().to_vec();

    assert!(!store.mark_read(&registry, "c1", "m1", "u2").unwrap());
    let twice = store.messages_for(&registry, "c1").unwrap().to_vec();

    assert_eq!(once, twice);
    assert_eq!(twice[0].read_by.as_deref(), Some("u2"));
}
