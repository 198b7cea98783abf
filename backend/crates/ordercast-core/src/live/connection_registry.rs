//! In-memory registry of open stream sessions
//!
//! Maps a recipient to the session currently receiving its notifications.
//! DashMap sharding keeps lookups on the notify path free of a global lock.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use ordercast_commons::{RecipientId, SessionId};
use serde_json::{json, Value};
use std::sync::Arc;

use super::session::{SessionState, StreamSession};

/// Point-in-time view of one registered session, for health reporting
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub recipient: RecipientId,
    pub session_id: SessionId,
    pub created_at: DateTime<Utc>,
    pub state: SessionState,
}

impl SessionSnapshot {
    pub fn to_json(&self) -> Value {
        json!({
            "recipient": self.recipient.as_str(),
            "session_id": self.session_id.as_str(),
            "created_at": self.created_at.to_rfc3339(),
            "state": self.state.as_str(),
        })
    }
}

/// One live session per recipient per process; a second open replaces the
/// entry (last-open-wins).
#[derive(Default)]
pub struct ConnectionRegistry {
    sessions: DashMap<RecipientId, Arc<StreamSession>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the entry for the session's recipient.
    ///
    /// Returns the replaced session, which keeps running but no longer
    /// receives notifications.
    pub fn register(&self, session: Arc<StreamSession>) -> Option<Arc<StreamSession>> {
        let recipient = session.recipient().clone();
        let replaced = self.sessions.insert(recipient, session);
        if let Some(previous) = &replaced {
            log::warn!(
                "Session {} for {} replaced; it stays open without notifications",
                previous.session_id(),
                previous.recipient()
            );
        }
        replaced
    }

    pub fn lookup(&self, recipient: &RecipientId) -> Option<Arc<StreamSession>> {
        self.sessions
            .get(recipient)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Remove whatever session is registered for `recipient`.
    pub fn remove(&self, recipient: &RecipientId) -> Option<Arc<StreamSession>> {
        self.sessions.remove(recipient).map(|(_, session)| session)
    }

    /// Remove the entry only while it still belongs to `session_id`.
    pub fn remove_session(&self, recipient: &RecipientId, session_id: &SessionId) -> bool {
        self.sessions
            .remove_if(recipient, |_, session| session.session_id() == session_id)
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn snapshot(&self) -> Vec<SessionSnapshot> {
        self.sessions
            .iter()
            .map(|entry| {
                let session = entry.value();
                SessionSnapshot {
                    recipient: session.recipient().clone(),
                    session_id: session.session_id().clone(),
                    created_at: session.created_at(),
                    state: session.state(),
                }
            })
            .collect()
    }

    /// Complete every registered session. Returns how many were closed.
    pub fn close_all(&self) -> usize {
        // Collect first: closing removes entries from the map
        let sessions: Vec<Arc<StreamSession>> = self
            .sessions
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        sessions
            .iter()
            .filter(|session| session.close(SessionState::Completed))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordercast_commons::SseEvent;
    use std::thread;
    use tokio::sync::mpsc;

    fn session(
        registry: &Arc<ConnectionRegistry>,
        recipient: &str,
        id: &str,
    ) -> (Arc<StreamSession>, mpsc::Receiver<SseEvent>) {
        let (tx, rx) = mpsc::channel(8);
        let session =
            StreamSession::new(SessionId::new(id), RecipientId::new(recipient), tx, registry);
        (session, rx)
    }

    #[test]
    fn test_register_lookup_remove() {
        let registry = Arc::new(ConnectionRegistry::new());
        let (s1, _rx) = session(&registry, "a@x.com", "s1");

        assert!(registry.register(s1).is_none());
        let found = registry.lookup(&RecipientId::new("a@x.com")).unwrap();
        assert_eq!(found.session_id().as_str(), "s1");

        assert!(registry.remove(&RecipientId::new("a@x.com")).is_some());
        assert!(registry.lookup(&RecipientId::new("a@x.com")).is_none());
        assert!(registry.remove(&RecipientId::new("a@x.com")).is_none());
    }

    #[test]
    fn test_replaced_session_close_keeps_newer_entry() {
        let registry = Arc::new(ConnectionRegistry::new());
        let (old, _rx_old) = session(&registry, "a@x.com", "old");
        let (new, _rx_new) = session(&registry, "a@x.com", "new");

        registry.register(Arc::clone(&old));
        let replaced = registry.register(Arc::clone(&new)).unwrap();
        assert_eq!(replaced.session_id().as_str(), "old");

        old.close(SessionState::Completed);

        let current = registry.lookup(&RecipientId::new("a@x.com")).unwrap();
        assert_eq!(current.session_id().as_str(), "new");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_session_ignores_other_ids() {
        let registry = Arc::new(ConnectionRegistry::new());
        let (s1, _rx) = session(&registry, "a@x.com", "s1");
        registry.register(s1);

        let recipient = RecipientId::new("a@x.com");
        assert!(!registry.remove_session(&recipient, &SessionId::new("other")));
        assert!(registry.remove_session(&recipient, &SessionId::new("s1")));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_close_all_completes_every_session() {
        let registry = Arc::new(ConnectionRegistry::new());
        let mut receivers = Vec::new();
        let mut sessions = Vec::new();
        for i in 0..5 {
            let (s, rx) = session(&registry, &format!("user{}@x.com", i), &format!("s{}", i));
            registry.register(Arc::clone(&s));
            sessions.push(s);
            receivers.push(rx);
        }

        assert_eq!(registry.snapshot().len(), 5);
        assert_eq!(registry.close_all(), 5);
        assert!(registry.is_empty());
        assert!(sessions
            .iter()
            .all(|s| s.state() == SessionState::Completed));
    }

    #[test]
    fn test_concurrent_open_close_leaves_registry_consistent() {
        let registry = Arc::new(ConnectionRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    for i in 0..200 {
                        let recipient = format!("user{}@x.com", i % 10);
                        let (tx, _rx) = mpsc::channel(1);
                        let s = StreamSession::new(
                            SessionId::new(format!("{}-{}", t, i)),
                            RecipientId::new(recipient),
                            tx,
                            &registry,
                        );
                        registry.register(Arc::clone(&s));
                        s.close(SessionState::Completed);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // Every session closed itself, so nothing may remain registered
        assert!(registry.is_empty());
    }
}
