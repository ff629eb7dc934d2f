//! Keyed store of in-flight QR login sessions.
//!
//! # Design
//!
//! - Sessions are addressed by an opaque UUID handed to the browser.
//! - Entries expire after an idle TTL; expired entries are purged lazily on
//!   every access, so no background task is needed.
//! - The lock is never held across an `.await`.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use qrgate_upstream::LoginSession;
use uuid::Uuid;

/// Opaque identifier of a stored login session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value.trim()).map(Self)
    }
}

struct SessionRecord {
    session: LoginSession,
    expires_at: Instant,
}

/// Concurrency-safe session store with idle expiry.
pub struct SessionStore {
    ttl: Duration,
    entries: Mutex<HashMap<SessionId, SessionRecord>>,
}

impl SessionStore {
    /// Create an empty store whose entries live for `ttl` after their last use.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Store a new session and return its identifier.
    pub fn insert(&self, session: LoginSession) -> SessionId {
        let id = SessionId::generate();
        let now = Instant::now();
        let mut guard = self.lock();
        Self::purge(&mut guard, now);
        guard.insert(
            id,
            SessionRecord {
                session,
                expires_at: now + self.ttl,
            },
        );
        id
    }

    /// Fetch a live session and extend its lifetime.
    pub fn get(&self, id: &SessionId) -> Option<LoginSession> {
        let now = Instant::now();
        let mut guard = self.lock();
        Self::purge(&mut guard, now);
        let record = guard.get_mut(id)?;
        record.expires_at = now + self.ttl;
        Some(record.session.clone())
    }

    /// Store `session` under `id`, replacing the live entry if there is one.
    ///
    /// Returns `false` when the entry had already expired and was re-created.
    pub fn replace(&self, id: &SessionId, session: LoginSession) -> bool {
        let now = Instant::now();
        let mut guard = self.lock();
        Self::purge(&mut guard, now);
        guard
            .insert(
                *id,
                SessionRecord {
                    session,
                    expires_at: now + self.ttl,
                },
            )
            .is_some()
    }

    /// Remove a session, returning it if it was live.
    pub fn remove(&self, id: &SessionId) -> Option<LoginSession> {
        let now = Instant::now();
        let mut guard = self.lock();
        Self::purge(&mut guard, now);
        guard.remove(id).map(|record| record.session)
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        let mut guard = self.lock();
        Self::purge(&mut guard, Instant::now());
        guard.len()
    }

    /// Whether no live sessions remain.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn purge(entries: &mut HashMap<SessionId, SessionRecord>, now: Instant) {
        entries.retain(|_, record| record.expires_at > now);
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, SessionRecord>> {
        // Records are plain data; a panic elsewhere cannot leave one half-written.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> LoginSession {
        LoginSession::new(reqwest::Client::new(), Uuid::new_v4(), "en-US")
    }

    #[test]
    fn insert_get_and_remove() {
        let store = SessionStore::new(Duration::from_secs(60));
        let id = store.insert(session());
        assert_eq!(store.len(), 1);
        assert!(store.get(&id).is_some());
        assert!(store.remove(&id).is_some());
        assert!(store.get(&id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn expired_entries_are_purged() {
        let store = SessionStore::new(Duration::from_millis(40));
        let id = store.insert(session());
        std::thread::sleep(Duration::from_millis(80));
        assert!(store.get(&id).is_none());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn replace_recreates_expired_entry_under_same_id() {
        let store = SessionStore::new(Duration::from_millis(40));
        let id = store.insert(session());
        std::thread::sleep(Duration::from_millis(80));
        let fresh = session();
        let fresh_sid = fresh.sdk_sid();
        assert!(!store.replace(&id, fresh));
        assert_eq!(store.get(&id).map(|s| s.sdk_sid()), Some(fresh_sid));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn replace_keeps_identifier() {
        let store = SessionStore::new(Duration::from_secs(60));
        let id = store.insert(session());
        let fresh = session();
        let fresh_sid = fresh.sdk_sid();
        assert!(store.replace(&id, fresh));
        assert_eq!(store.get(&id).map(|s| s.sdk_sid()), Some(fresh_sid));
    }

    #[test]
    fn session_ids_parse_from_headers() {
        let id = SessionId::generate();
        let parsed: SessionId = format!(" {id} ").parse().expect("uuid parses");
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<SessionId>().is_err());
    }
}
