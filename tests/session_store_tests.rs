// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session store persistence and notification tests.
//!
//! These tests verify that:
//! 1. Sessions survive process restarts via the backing file
//! 2. Unreadable or malformed files degrade to "no session"
//! 3. Subscribers hear about every set and clear, until unsubscribed

use leads_client::models::{AuthUser, Session, UserRole};
use leads_client::session::ListenerId;
use leads_client::SessionStore;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

fn make_session(access: &str) -> Session {
    Session {
        access_token: access.to_string(),
        refresh_token: "refresh-1".to_string(),
        user: AuthUser {
            id: "user-1".to_string(),
            role: UserRole::Partner,
            partner_id: Some("partner-1".to_string()),
        },
    }
}

#[test]
fn test_session_round_trips_through_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("session.json");

    let store = SessionStore::open(&path);
    assert!(store.current().is_none());
    store.set(make_session("access-1"));

    // A second store on the same file sees the persisted session
    let reopened = SessionStore::open(&path);
    assert_eq!(reopened.current().unwrap().access_token, "access-1");
    assert!(reopened.is_authenticated());
}

#[test]
fn test_parent_directories_are_created_on_persist() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("state").join("leads").join("session.json");

    let store = SessionStore::open(&path);
    store.set(make_session("access-1"));
    assert!(path.exists());
}

#[test]
fn test_malformed_file_means_no_session() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("session.json");
    std::fs::write(&path, "{not json").unwrap();

    let store = SessionStore::open(&path);
    assert!(store.current().is_none());
    assert!(!store.is_authenticated());
}

#[test]
fn test_clear_removes_file_and_session() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("session.json");

    let store = SessionStore::open(&path);
    store.set(make_session("access-1"));
    assert!(path.exists());

    store.clear();
    assert!(store.current().is_none());
    assert!(!path.exists());

    // Clearing with nothing on disk is fine
    store.clear();
}

#[test]
fn test_empty_access_token_is_not_authenticated() {
    let tmp = TempDir::new().unwrap();
    let store = SessionStore::open(tmp.path().join("session.json"));

    store.set(make_session(""));
    assert!(store.current().is_some());
    assert!(!store.is_authenticated());
}

#[test]
fn test_listeners_observe_every_change() {
    let tmp = TempDir::new().unwrap();
    let store = SessionStore::open(tmp.path().join("session.json"));

    let seen: Arc<Mutex<Vec<Option<String>>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    store.subscribe(move |session| {
        sink.lock()
            .unwrap()
            .push(session.map(|s| s.access_token.clone()));
    });

    store.set(make_session("access-1"));
    store.set(make_session("access-2"));
    store.clear();

    let seen = seen.lock().unwrap();
    assert_eq!(
        *seen,
        vec![
            Some("access-1".to_string()),
            Some("access-2".to_string()),
            None
        ]
    );
}

#[test]
fn test_unsubscribe_stops_notifications() {
    let tmp = TempDir::new().unwrap();
    let store = SessionStore::open(tmp.path().join("session.json"));

    let count = Arc::new(AtomicU32::new(0));
    let counter = count.clone();
    let id = store.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    store.set(make_session("access-1"));
    store.unsubscribe(id);
    store.clear();

    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_listener_may_unsubscribe_itself_during_notification() {
    let tmp = TempDir::new().unwrap();
    let store = Arc::new(SessionStore::open(tmp.path().join("session.json")));

    let slot: Arc<Mutex<Option<ListenerId>>> = Arc::new(Mutex::new(None));
    let (store_handle, slot_handle) = (store.clone(), slot.clone());
    let count = Arc::new(AtomicU32::new(0));
    let counter = count.clone();

    let id = store.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        if let Some(id) = slot_handle.lock().unwrap().take() {
            store_handle.unsubscribe(id);
        }
    });
    *slot.lock().unwrap() = Some(id);

    // First change runs the listener, which removes itself; the second
    // must not invoke it again or deadlock
    store.set(make_session("access-1"));
    store.set(make_session("access-2"));

    assert_eq!(count.load(Ordering::SeqCst), 1);
}
