//! Receive callback attached to the channel bus.

use ordercast_commons::{codec, RecipientId};
use std::sync::Arc;

use super::connection_registry::ConnectionRegistry;
use crate::bus::MessageListener;
use crate::error::Result;

/// Routes a received message to the recipient's local session, if any.
pub struct NotificationListener {
    registry: Arc<ConnectionRegistry>,
}

impl NotificationListener {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }
}

impl MessageListener for NotificationListener {
    fn on_message(&self, topic: &str, body: &[u8]) -> Result<()> {
        let payload = codec::decode(body)?;

        let recipient = RecipientId::new(topic);
        match self.registry.lookup(&recipient) {
            Some(session) => match session.push(&payload) {
                Ok(()) => log::debug!(
                    "Delivered order {} to {} (session={})",
                    payload.order_id,
                    recipient,
                    session.session_id()
                ),
                Err(err) => log::debug!(
                    "Order {} not delivered to {}: {}",
                    payload.order_id,
                    recipient,
                    err
                ),
            },
            None => log::trace!("No local session for '{}', discarding", topic),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LiveError;
    use crate::live::{SessionState, StreamSession};
    use ordercast_commons::{OrderNotification, OrderStatus, SessionId};
    use tokio::sync::mpsc;

    #[test]
    fn test_absent_recipient_is_discarded() {
        let listener = NotificationListener::new(Arc::new(ConnectionRegistry::new()));
        let body = codec::encode(&OrderNotification::new(1, OrderStatus::Placed)).unwrap();

        assert!(listener.on_message("nobody@x.com", &body).is_ok());
    }

    #[test]
    fn test_malformed_body_is_reported() {
        let listener = NotificationListener::new(Arc::new(ConnectionRegistry::new()));

        let result = listener.on_message("a@x.com", b"not json");
        assert!(matches!(result, Err(LiveError::Codec(_))));
    }

    #[test]
    fn test_broken_stream_is_cleaned_up() {
        let registry = Arc::new(ConnectionRegistry::new());
        let (tx, rx) = mpsc::channel(4);
        let session =
            StreamSession::new(SessionId::new("s1"), RecipientId::new("a@x.com"), tx, &registry);
        registry.register(Arc::clone(&session));
        drop(rx);

        let listener = NotificationListener::new(Arc::clone(&registry));
        let body = codec::encode(&OrderNotification::new(1, OrderStatus::Placed)).unwrap();

        assert!(listener.on_message("a@x.com", &body).is_ok());
        assert_eq!(session.state(), SessionState::ClosedOnError);
        assert!(registry.is_empty());
    }
}
