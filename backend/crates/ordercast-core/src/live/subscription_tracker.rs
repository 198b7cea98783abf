//! Per-process record of which recipients' topics the bus is subscribed to.

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use ordercast_commons::RecipientId;
use std::sync::Arc;

use crate::bus::ChannelBus;
use crate::error::Result;

/// Ensures each recipient's topic is subscribed at most once per process.
///
/// Entries are only ever added: once a recipient has had a session on this
/// process, its topic stays subscribed for the process lifetime.
pub struct SubscriptionTracker {
    bus: Arc<dyn ChannelBus>,
    subscribed: DashMap<RecipientId, DateTime<Utc>>,
}

impl SubscriptionTracker {
    pub fn new(bus: Arc<dyn ChannelBus>) -> Self {
        Self {
            bus,
            subscribed: DashMap::new(),
        }
    }

    /// Subscribe the bus to the recipient's topic unless already subscribed.
    ///
    /// The entry's shard lock is held across the check, the bus subscription
    /// and the insert, so concurrent first calls subscribe exactly once. If the
    /// bus refuses, nothing is recorded and the error is returned.
    ///
    /// Returns `true` when this call performed the subscription.
    pub fn ensure_subscribed(&self, recipient: &RecipientId) -> Result<bool> {
        match self.subscribed.entry(recipient.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                self.bus.subscribe(recipient.topic())?;
                slot.insert(Utc::now());
                log::debug!("Subscribed to topic '{}'", recipient.topic());
                Ok(true)
            },
        }
    }

    pub fn is_subscribed(&self, recipient: &RecipientId) -> bool {
        self.subscribed.contains_key(recipient)
    }

    pub fn len(&self) -> usize {
        self.subscribed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribed.is_empty()
    }
}
