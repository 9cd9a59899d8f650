//! Per-visitor session state
//!
//! The host owns one `SessionState` per browser session and hands it to the
//! journal flow on every interaction. The store is bounded; past capacity the
//! least recently written session is dropped.

use crate::stress::StressScore;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Instant;
use uuid::Uuid;

/// Mutable state of one journaling session
#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    pub id: Uuid,
    pub stress: StressScore,
}

impl SessionState {
    /// Fresh session at the initial stress score
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    /// Fresh session under a known id
    pub fn with_id(id: Uuid) -> Self {
        Self {
            id,
            stress: StressScore::default(),
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Sessions kept before the least recently written one is evicted
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

#[derive(Debug)]
struct Slot {
    state: SessionState,
    touched: Instant,
}

/// Shared map of sessions that have logged at least one entry
///
/// Ids are handed out without touching the map; a session only takes memory
/// once `store` writes its state back.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Slot>>>,
    capacity: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_SESSIONS)
    }
}

impl SessionStore {
    /// Empty store with the default capacity
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty store holding at most `capacity` sessions
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    /// Resolve the id a client presented, issuing a fresh one when absent
    ///
    /// Returns the id to use and whether it was newly issued. Nothing is
    /// inserted; an unknown id simply reads as the initial state.
    pub fn resolve(&self, id: Option<Uuid>) -> (Uuid, bool) {
        match id {
            Some(id) => (id, false),
            None => {
                let id = Uuid::new_v4();
                tracing::debug!(session = %id, "New journaling session");
                (id, true)
            }
        }
    }

    /// Copy of a session's state
    pub fn snapshot(&self, id: Uuid) -> Option<SessionState> {
        self.read().get(&id).map(|slot| slot.state.clone())
    }

    /// Stored state, or the initial state under `id`
    pub fn snapshot_or_default(&self, id: Uuid) -> SessionState {
        self.snapshot(id).unwrap_or_else(|| SessionState::with_id(id))
    }

    /// Run `f` against a session, creating it under `id` if missing
    pub fn with_session<T>(&self, id: Uuid, f: impl FnOnce(&mut SessionState) -> T) -> T {
        let mut state = self.snapshot_or_default(id);
        let out = f(&mut state);
        self.store(state);
        out
    }

    /// Replace a session's state
    pub fn store(&self, session: SessionState) {
        let mut sessions = self.write();
        if !sessions.contains_key(&session.id) && sessions.len() >= self.capacity {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, slot)| slot.touched)
                .map(|(id, _)| *id);
            if let Some(oldest) = oldest {
                sessions.remove(&oldest);
                tracing::debug!(session = %oldest, "Evicted idle session");
            }
        }
        sessions.insert(
            session.id,
            Slot {
                state: session,
                touched: Instant::now(),
            },
        );
    }

    /// Number of stored sessions
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether no session has been stored yet
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Most sessions kept at once
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<Uuid, Slot>> {
        self.sessions.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<Uuid, Slot>> {
        self.sessions.write().unwrap_or_else(|e| e.into_inner())
    }
}
