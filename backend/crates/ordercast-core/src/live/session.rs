//! One open server-to-client push channel.

use chrono::{DateTime, Utc};
use ordercast_commons::constants::{CONNECT_EVENT, CONNECT_MESSAGE, ORDERED_EVENT};
use ordercast_commons::{codec, OrderNotification, RecipientId, SessionId, SseEvent};
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::sync::CancellationToken;

use super::connection_registry::ConnectionRegistry;
use crate::error::{LiveError, Result};

/// Lifecycle state of a [`StreamSession`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Opening,
    Active,
    /// Client disconnected or the server shut down
    Completed,
    /// No event was delivered within the idle timeout
    TimedOut,
    /// Writing to the stream failed
    ClosedOnError,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SessionState::Completed | SessionState::TimedOut | SessionState::ClosedOnError
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionState::Opening => "opening",
            SessionState::Active => "active",
            SessionState::Completed => "completed",
            SessionState::TimedOut => "timed_out",
            SessionState::ClosedOnError => "closed_on_error",
        }
    }
}

/// Handle to one open stream.
///
/// Events are written into a bounded channel drained by the session's
/// [`SessionStream`](super::SessionStream). The first transition into a
/// terminal state removes the session from the registry (only if the entry is
/// still this session) and cancels the stream.
pub struct StreamSession {
    session_id: SessionId,
    recipient: RecipientId,
    created_at: DateTime<Utc>,
    opened: Instant,
    state: Mutex<SessionState>,
    event_tx: mpsc::Sender<SseEvent>,
    cancel: CancellationToken,
    registry: Weak<ConnectionRegistry>,
}

impl StreamSession {
    pub fn new(
        session_id: SessionId,
        recipient: RecipientId,
        event_tx: mpsc::Sender<SseEvent>,
        registry: &Arc<ConnectionRegistry>,
    ) -> Arc<Self> {
        Arc::new(Self {
            session_id,
            recipient,
            created_at: Utc::now(),
            opened: Instant::now(),
            state: Mutex::new(SessionState::Opening),
            event_tx,
            cancel: CancellationToken::new(),
            registry: Arc::downgrade(registry),
        })
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn recipient(&self) -> &RecipientId {
        &self.recipient
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn age(&self) -> Duration {
        self.opened.elapsed()
    }

    pub fn state(&self) -> SessionState {
        *self.state.lock()
    }

    pub fn is_open(&self) -> bool {
        !self.state().is_terminal()
    }

    /// Move `Opening -> Active` and push the `connect` handshake.
    ///
    /// A failed handshake is logged; the session stays registered.
    pub fn activate(&self) -> bool {
        {
            let mut state = self.state.lock();
            if *state != SessionState::Opening {
                return false;
            }
            *state = SessionState::Active;
        }

        if let Err(err) = self
            .event_tx
            .try_send(SseEvent::new(CONNECT_EVENT, CONNECT_MESSAGE))
        {
            log::warn!(
                "Failed to send handshake to {} (session={}): {}",
                self.recipient,
                self.session_id,
                err
            );
        }
        true
    }

    /// Push a notification as an `ordered` event.
    ///
    /// A closed stream moves the session to `ClosedOnError` and deregisters it.
    /// A full buffer drops only this event.
    pub fn push(&self, payload: &OrderNotification) -> Result<()> {
        if !self.is_open() {
            return Err(LiveError::SessionClosed(self.session_id.to_string()));
        }
        let data = codec::encode_to_string(payload)?;
        self.send(SseEvent::new(ORDERED_EVENT, data))
    }

    fn send(&self, event: SseEvent) -> Result<()> {
        match self.event_tx.try_send(event) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(event)) => {
                log::warn!(
                    "Stream buffer full for {} (session={}), dropping '{}' event",
                    self.recipient,
                    self.session_id,
                    event.name
                );
                Err(LiveError::SessionBackpressure(self.session_id.to_string()))
            },
            Err(TrySendError::Closed(_)) => {
                self.close(SessionState::ClosedOnError);
                Err(LiveError::SessionClosed(self.session_id.to_string()))
            },
        }
    }

    /// Enter a terminal state. Only the first call has any effect.
    pub fn close(&self, reason: SessionState) -> bool {
        debug_assert!(reason.is_terminal());
        {
            let mut state = self.state.lock();
            if state.is_terminal() {
                return false;
            }
            *state = reason;
        }

        if let Some(registry) = self.registry.upgrade() {
            registry.remove_session(&self.recipient, &self.session_id);
        }
        self.cancel.cancel();

        log::debug!(
            "Session {} for {} closed: {} after {:?}",
            self.session_id,
            self.recipient,
            reason.as_str(),
            self.age()
        );
        true
    }

    pub(crate) fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

impl fmt::Debug for StreamSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamSession")
            .field("session_id", &self.session_id)
            .field("recipient", &self.recipient)
            .field("state", &self.state())
            .finish()
    }
}
