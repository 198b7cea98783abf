//! Entry point the application uses to notify a recipient.

use ordercast_commons::{codec, OrderNotification, RecipientId};
use std::sync::Arc;

use crate::bus::ChannelBus;
use crate::error::Result;

/// Publishes notifications on the recipient's topic.
///
/// Always goes through the bus, even when this process holds the recipient's
/// session: the bus is the only path that reaches sessions on other processes,
/// and a local shortcut would deliver twice.
pub struct NotificationDispatcher {
    bus: Arc<dyn ChannelBus>,
}

impl NotificationDispatcher {
    pub fn new(bus: Arc<dyn ChannelBus>) -> Self {
        Self { bus }
    }

    /// Fire-and-forget notify. Only an encode failure is returned; transport
    /// errors are logged.
    pub fn notify(&self, recipient: &RecipientId, payload: &OrderNotification) -> Result<()> {
        let body = codec::encode(payload)?;
        if let Err(err) = self.bus.publish(recipient.topic(), body) {
            log::warn!(
                "Failed to publish order {} to '{}': {}",
                payload.order_id,
                recipient.topic(),
                err
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::MessageListener;
    use crate::error::LiveError;
    use bytes::Bytes;
    use ordercast_commons::OrderStatus;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingBus {
        published: Mutex<Vec<(String, Bytes)>>,
        fail: bool,
    }

    impl ChannelBus for RecordingBus {
        fn publish(&self, topic: &str, body: Bytes) -> Result<()> {
            if self.fail {
                return Err(LiveError::Bus("down".to_string()));
            }
            self.published.lock().push((topic.to_string(), body));
            Ok(())
        }

        fn subscribe(&self, _topic: &str) -> Result<()> {
            Ok(())
        }

        fn deliver(&self, _topic: &str, _body: &[u8]) -> Result<usize> {
            Ok(0)
        }

        fn subscription_count(&self, _topic: &str) -> usize {
            0
        }
    }

    struct Unused;

    impl MessageListener for Unused {
        fn on_message(&self, _topic: &str, _body: &[u8]) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_notify_publishes_on_recipient_topic() {
        let bus = Arc::new(RecordingBus::default());
        let dispatcher = NotificationDispatcher::new(bus.clone());
        let payload = OrderNotification::new(9, OrderStatus::Placed);

        dispatcher
            .notify(&RecipientId::new("a@x.com"), &payload)
            .unwrap();

        let published = bus.published.lock();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].0, "a@x.com");
        assert_eq!(codec::decode(&published[0].1).unwrap(), payload);
    }

    #[test]
    fn test_transport_error_is_not_surfaced() {
        let bus = Arc::new(RecordingBus {
            fail: true,
            ..Default::default()
        });
        let dispatcher = NotificationDispatcher::new(bus);

        assert!(dispatcher
            .notify(
                &RecipientId::new("a@x.com"),
                &OrderNotification::new(1, OrderStatus::Placed)
            )
            .is_ok());
    }

    #[test]
    fn test_notify_without_subscribers_is_ok() {
        let bus = crate::bus::MemoryBus::standalone(Arc::new(Unused));
        let dispatcher = NotificationDispatcher::new(bus);

        assert!(dispatcher
            .notify(
                &RecipientId::new("nobody@x.com"),
                &OrderNotification::new(1, OrderStatus::Placed)
            )
            .is_ok());
    }
}
