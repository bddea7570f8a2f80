use std::{
    collections::HashMap,
    fmt,
    str::FromStr,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use thiserror::Error;
use tokio::sync::broadcast;
use tracing::debug;

use crate::{
    chat::{ChatSession, Responder},
    region::RegionRegistry,
    state::{reduce, Action, VizState},
};

const MAX_ID_LEN: usize = 64;

/// Identifies one page load. The browser mints a fresh id each time the page
/// opens, so a reload starts from the dry overview with a new transcript.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

#[derive(Debug, Error, PartialEq)]
pub enum InvalidSessionId {
    #[error("session id is empty")]
    Empty,
    #[error("session id is longer than {MAX_ID_LEN} characters")]
    TooLong,
    #[error("session id may only contain ASCII letters, digits, '-' and '_'")]
    BadCharacter,
}

impl FromStr for SessionId {
    type Err = InvalidSessionId;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.is_empty() {
            return Err(InvalidSessionId::Empty);
        }
        if raw.len() > MAX_ID_LEN {
            return Err(InvalidSessionId::TooLong);
        }
        if !raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(InvalidSessionId::BadCharacter);
        }
        Ok(Self(raw.to_string()))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Season, selection and chat for one visitor.
pub struct Session {
    viz: Mutex<VizState>,
    chat: ChatSession,
    updates: broadcast::Sender<String>,
}

impl Session {
    fn new(typing_delay: Duration) -> Self {
        let (updates, _) = broadcast::channel(64);
        Self {
            viz: Mutex::new(VizState::default()),
            chat: ChatSession::new(Responder::default(), typing_delay),
            updates,
        }
    }

    pub fn viz(&self) -> VizState {
        *self.viz.lock().expect("viz lock poisoned")
    }

    pub fn chat(&self) -> &ChatSession {
        &self.chat
    }

    /// Replaces the state with the reducer's output; reports whether it changed.
    pub(super) fn reduce(&self, action: Action, registry: &RegionRegistry) -> (VizState, bool) {
        let mut guard = self.viz.lock().expect("viz lock poisoned");
        let next = reduce(&guard, action, registry);
        let changed = next != *guard;
        *guard = next;
        (next, changed)
    }

    pub(super) fn announce(&self, payload: String) {
        let _ = self.updates.send(payload);
    }

    pub(super) fn subscribe_updates(&self) -> broadcast::Receiver<String> {
        self.updates.subscribe()
    }
}

struct Entry {
    session: Arc<Session>,
    last_seen: Instant,
}

/// Sessions by id, created on first use and dropped after sitting idle.
pub struct SessionStore {
    sessions: Mutex<HashMap<SessionId, Entry>>,
    typing_delay: Duration,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(typing_delay: Duration, idle_timeout: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            typing_delay,
            idle_timeout,
        }
    }

    pub fn get_or_create(&self, id: &SessionId) -> Arc<Session> {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().expect("session lock poisoned");

        let before = sessions.len();
        sessions.retain(|key, entry| {
            key == id || now.duration_since(entry.last_seen) < self.idle_timeout
        });
        if sessions.len() < before {
            debug!(expired = before - sessions.len(), "dropped idle sessions");
        }

        let entry = sessions.entry(id.clone()).or_insert_with(|| {
            debug!(session = %id, "session opened");
            Entry {
                session: Arc::new(Session::new(self.typing_delay)),
                last_seen: now,
            }
        });
        entry.last_seen = now;
        entry.session.clone()
    }

    pub fn typing_delay(&self) -> Duration {
        self.typing_delay
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().expect("session lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
