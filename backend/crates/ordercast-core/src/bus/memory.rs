//! In-process channel bus.
//!
//! A [`MemoryHub`] links several [`MemoryBus`] endpoints, one per simulated
//! process. Publishing on any endpoint delivers synchronously to every endpoint
//! subscribed to the topic, so publish order per topic is preserved.

use bytes::Bytes;
use parking_lot::RwLock;
use std::sync::Arc;

use super::{ChannelBus, LocalSubscriptions, MessageListener};
use crate::error::Result;

/// Shared medium connecting in-process bus endpoints
#[derive(Default)]
pub struct MemoryHub {
    endpoints: RwLock<Vec<Arc<LocalSubscriptions>>>,
}

impl MemoryHub {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Attach a new endpoint with its process's listener.
    pub fn connect(self: &Arc<Self>, listener: Arc<dyn MessageListener>) -> Arc<MemoryBus> {
        let local = Arc::new(LocalSubscriptions::new(listener));
        self.endpoints.write().push(Arc::clone(&local));
        Arc::new(MemoryBus {
            hub: Arc::clone(self),
            local,
        })
    }

    /// Number of endpoints attached to this hub
    pub fn endpoint_count(&self) -> usize {
        self.endpoints.read().len()
    }
}

/// One process's endpoint on a [`MemoryHub`]
pub struct MemoryBus {
    hub: Arc<MemoryHub>,
    local: Arc<LocalSubscriptions>,
}

impl MemoryBus {
    /// Single endpoint on a private hub (single-process deployments).
    pub fn standalone(listener: Arc<dyn MessageListener>) -> Arc<Self> {
        MemoryHub::new().connect(listener)
    }
}

impl ChannelBus for MemoryBus {
    fn publish(&self, topic: &str, body: Bytes) -> Result<()> {
        // Snapshot so listeners run without the hub lock held
        let endpoints: Vec<Arc<LocalSubscriptions>> = self.hub.endpoints.read().clone();
        for endpoint in endpoints {
            if let Err(err) = endpoint.deliver(topic, &body) {
                log::error!("Failed to dispatch message on topic '{}': {}", topic, err);
            }
        }
        Ok(())
    }

    fn subscribe(&self, topic: &str) -> Result<()> {
        self.local.subscribe(topic);
        Ok(())
    }

    fn deliver(&self, topic: &str, body: &[u8]) -> Result<usize> {
        self.local.deliver(topic, body)
    }

    fn subscription_count(&self, topic: &str) -> usize {
        self.local.count(topic)
    }
}
