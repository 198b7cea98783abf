//! Opening and shutting down stream sessions.

use ordercast_commons::{RecipientId, SessionId};
use ordercast_configs::StreamSettings;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

use super::connection_registry::ConnectionRegistry;
use super::session::{SessionState, StreamSession};
use super::session_stream::{SessionStream, StreamSlot};
use super::subscription_tracker::SubscriptionTracker;
use crate::error::{LiveError, Result};

/// Coordinates the registry and the subscription tracker for session opens
pub struct SessionManager {
    registry: Arc<ConnectionRegistry>,
    tracker: Arc<SubscriptionTracker>,
    settings: StreamSettings,
    /// Streams still held by a response, including ones replaced in the registry
    open_streams: Arc<AtomicUsize>,
    is_shutting_down: AtomicBool,
}

impl SessionManager {
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        tracker: Arc<SubscriptionTracker>,
        settings: StreamSettings,
    ) -> Self {
        Self {
            registry,
            tracker,
            settings,
            open_streams: Arc::new(AtomicUsize::new(0)),
            is_shutting_down: AtomicBool::new(false),
        }
    }

    /// Open a stream session for `recipient`.
    ///
    /// The session is sent the `connect` handshake, registered and the bus is
    /// subscribed to the recipient's topic. The returned stream is the response
    /// body; the session lives as long as it does.
    ///
    /// `max_connections` bounds open streams, so a stream replaced by a newer
    /// one for the same recipient still counts until its response ends.
    pub fn open_session(&self, recipient: RecipientId) -> Result<SessionStream> {
        if self.is_shutting_down() {
            return Err(LiveError::ShuttingDown);
        }

        let max = self.settings.max_connections;
        let slot = match StreamSlot::acquire(&self.open_streams, max) {
            Some(slot) => slot,
            None => {
                log::warn!("Rejecting session for {}: {} streams open", recipient, max);
                return Err(LiveError::ConnectionLimit(max));
            },
        };

        let (event_tx, event_rx) = mpsc::channel(self.settings.channel_capacity);
        let session_id = SessionId::new(uuid::Uuid::new_v4().simple().to_string());
        let session = StreamSession::new(session_id, recipient.clone(), event_tx, &self.registry);

        // Created before registering so every exit path below closes the session
        let stream = SessionStream::new(
            Arc::clone(&session),
            event_rx,
            self.settings.idle_timeout(),
            self.settings.keepalive_interval(),
        )
        .with_slot(slot);

        // The handshake is queued before deliveries can find the session
        session.activate();
        self.registry.register(Arc::clone(&session));

        if let Err(err) = self.tracker.ensure_subscribed(&recipient) {
            log::error!("Failed to subscribe to topic '{}': {}", recipient.topic(), err);
            session.close(SessionState::ClosedOnError);
            return Err(err);
        }

        log::info!(
            "Session {} opened for {} ({} registered, {} streams open)",
            session.session_id(),
            recipient,
            self.registry.len(),
            self.open_streams()
        );
        Ok(stream)
    }

    /// Number of session streams whose response has not ended.
    pub fn open_streams(&self) -> usize {
        self.open_streams.load(Ordering::Acquire)
    }

    pub fn is_shutting_down(&self) -> bool {
        self.is_shutting_down.load(Ordering::Acquire)
    }

    /// Refuse new sessions and complete every open one.
    pub fn shutdown(&self) -> usize {
        self.is_shutting_down.store(true, Ordering::Release);
        let closed = self.registry.close_all();
        log::info!("Closed {} stream sessions for shutdown", closed);
        closed
    }
}
