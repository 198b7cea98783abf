//! Channel bus: topic-addressed publish/subscribe between server processes.
//!
//! A bus is built once per process with the process's [`MessageListener`]
//! attached; `subscribe` only registers interest in a topic. Every process that
//! subscribed to a topic has its listener invoked once per subscription for
//! each message published on it, by any process.

pub mod memory;
pub mod peer;

use bytes::Bytes;
use dashmap::DashMap;
use std::sync::Arc;

use crate::error::Result;

pub use memory::{MemoryBus, MemoryHub};
pub use peer::PeerBus;

/// Receive callback invoked by the bus for every delivered message.
pub trait MessageListener: Send + Sync {
    /// Handle one message delivered on `topic`.
    ///
    /// An error means the message could not be dispatched at all (for example
    /// a malformed body); a recipient without a live session is not an error.
    fn on_message(&self, topic: &str, body: &[u8]) -> Result<()>;
}

/// Publish/subscribe transport addressed by topic name
pub trait ChannelBus: Send + Sync {
    /// Publish `body` on `topic`. Fire-and-forget: `Ok` means the message was
    /// handed to the transport, not that anyone received it.
    fn publish(&self, topic: &str, body: Bytes) -> Result<()>;

    /// Register this process's interest in `topic`.
    fn subscribe(&self, topic: &str) -> Result<()>;

    /// Hand a message that arrived from the transport to the local listener.
    ///
    /// Returns how many times the listener was invoked (0 when this process is
    /// not subscribed to the topic).
    fn deliver(&self, topic: &str, body: &[u8]) -> Result<usize>;

    /// Number of active subscriptions this process holds for `topic`.
    fn subscription_count(&self, topic: &str) -> usize;
}

/// Topic subscriptions of one process plus its attached listener.
///
/// Subscribing twice to a topic is recorded as two subscriptions and produces
/// two listener invocations per message, the same way a broker would behave
/// with two registered listeners. Deduplication is the subscription tracker's
/// job, not the transport's.
pub(crate) struct LocalSubscriptions {
    listener: Arc<dyn MessageListener>,
    topics: DashMap<String, usize>,
}

impl LocalSubscriptions {
    pub(crate) fn new(listener: Arc<dyn MessageListener>) -> Self {
        Self {
            listener,
            topics: DashMap::new(),
        }
    }

    pub(crate) fn subscribe(&self, topic: &str) {
        *self.topics.entry(topic.to_string()).or_insert(0) += 1;
    }

    pub(crate) fn count(&self, topic: &str) -> usize {
        self.topics.get(topic).map(|count| *count).unwrap_or(0)
    }

    pub(crate) fn deliver(&self, topic: &str, body: &[u8]) -> Result<usize> {
        // Read the count first so no shard lock is held while the listener runs
        let count = self.count(topic);
        for _ in 0..count {
            self.listener.on_message(topic, body)?;
        }
        Ok(count)
    }
}
