//! Order notification payload.
//!
//! Carried over the channel bus as JSON and pushed verbatim as the `data` of an
//! `ordered` server-sent event. Field names are camelCase on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order lifecycle states a recipient can be notified about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Placed,
    Ordered,
    Shipped,
    Delivered,
    Canceled,
}

/// One product line of an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub detail_id: i64,
    pub product_name: String,
    pub quantity: u32,
}

/// Event record addressed to exactly one recipient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderNotification {
    pub order_id: i64,
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_email: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurred_at: Option<DateTime<Utc>>,
}

impl OrderNotification {
    pub fn new(order_id: i64, status: OrderStatus) -> Self {
        Self {
            order_id,
            status,
            member_email: None,
            items: Vec::new(),
            occurred_at: None,
        }
    }

    pub fn with_member_email(mut self, email: impl Into<String>) -> Self {
        self.member_email = Some(email.into());
        self
    }

    pub fn with_item(mut self, line: OrderLine) -> Self {
        self.items.push(line);
        self
    }

    pub fn with_occurred_at(mut self, at: DateTime<Utc>) -> Self {
        self.occurred_at = Some(at);
        self
    }
}
