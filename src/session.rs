// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session persistence and change notification.
//!
//! The store owns the current session for the whole process. Components
//! that need auth state receive a shared handle instead of reaching for
//! globals, and can subscribe to be told when login, logout, or a token
//! refresh swaps the session underneath them.
//!
//! Persistence is best effort: a session that cannot be written to disk
//! still works for the lifetime of the process.

use crate::models::Session;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

type Listener = Arc<dyn Fn(Option<&Session>) + Send + Sync>;

/// Handle returned by [`SessionStore::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

/// Owns the current session and its on-disk copy.
pub struct SessionStore {
    path: PathBuf,
    current: Mutex<Option<Session>>,
    listeners: Mutex<Vec<(u64, Listener)>>,
    next_listener_id: AtomicU64,
}

impl SessionStore {
    /// Open a store backed by the given file, loading any persisted
    /// session. A missing or unreadable file simply means no session.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let current = load_session(&path);
        Self {
            path,
            current: Mutex::new(current),
            listeners: Mutex::new(Vec::new()),
            next_listener_id: AtomicU64::new(1),
        }
    }

    /// Snapshot of the current session, if any.
    pub fn current(&self) -> Option<Session> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether a session with a usable access token is present.
    pub fn is_authenticated(&self) -> bool {
        self.current()
            .map(|session| session.is_authenticated())
            .unwrap_or(false)
    }

    /// Replace the current session, persist it, and notify subscribers.
    pub fn set(&self, session: Session) {
        {
            let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
            *current = Some(session.clone());
        }
        self.persist(&session);
        self.notify(Some(&session));
    }

    /// Drop the current session, remove the on-disk copy, and notify
    /// subscribers.
    pub fn clear(&self) {
        {
            let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
            *current = None;
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    error = %e,
                    path = %self.path.display(),
                    "Failed to remove session file, continuing anyway"
                );
            }
        }
        self.notify(None);
    }

    /// Register a listener called on every session change.
    ///
    /// The listener runs synchronously on the thread performing the
    /// change and must not block for long.
    pub fn subscribe(
        &self,
        listener: impl Fn(Option<&Session>) + Send + Sync + 'static,
    ) -> ListenerId {
        let id = self.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(listener)));
        ListenerId(id)
    }

    /// Remove a previously registered listener. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: ListenerId) {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(listener_id, _)| *listener_id != id.0);
    }

    fn persist(&self, session: &Session) {
        let payload = match serde_json::to_string(session) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to encode session, continuing anyway");
                return;
            }
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                let _ = std::fs::create_dir_all(parent);
            }
        }
        if let Err(e) = std::fs::write(&self.path, payload) {
            tracing::warn!(
                error = %e,
                path = %self.path.display(),
                "Failed to persist session, continuing anyway"
            );
        }
    }

    fn notify(&self, session: Option<&Session>) {
        // Snapshot the listener list so callbacks can subscribe or
        // unsubscribe without deadlocking.
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(session);
        }
    }
}

/// Read a persisted session, treating anything unreadable as absent.
fn load_session(path: &Path) -> Option<Session> {
    let raw = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&raw) {
        Ok(session) => Some(session),
        Err(e) => {
            tracing::debug!(
                error = %e,
                path = %path.display(),
                "Ignoring malformed session file"
            );
            None
        }
    }
}
