//! # ordercast-commons
//!
//! Shared types used across the ordercast crates (ordercast-core, ordercast-api
//! and the server binary).
//!
//! ## Type-Safe Wrappers
//!
//! - `RecipientId`: the resolved identity a notification is addressed to. The same
//!   string is used as the connection registry key and as the bus topic name.
//! - `SessionId`: unique id of one open stream session.
//!
//! ## Wire Types
//!
//! - `OrderNotification`: the payload carried over the channel bus and pushed to
//!   clients as the data of an `ordered` event.
//! - `SseEvent`: a named server-sent event frame.
//! - `ClusterEnvelope`: the body peers exchange on `/v1/api/cluster/notify`.
//!
//! ```rust
//! use ordercast_commons::{codec, OrderNotification, OrderStatus, RecipientId};
//!
//! let recipient = RecipientId::new("a@x.com");
//! let payload = OrderNotification::new(42, OrderStatus::Placed);
//! let body = codec::encode(&payload).unwrap();
//! assert_eq!(codec::decode(&body).unwrap(), payload);
//! assert_eq!(recipient.as_str(), "a@x.com");
//! ```

pub mod codec;
pub mod constants;
pub mod errors;
pub mod models;

pub use errors::{CodecError, Result};
pub use models::{
    ClusterEnvelope, OrderLine, OrderNotification, OrderStatus, RecipientId,
    RecipientIdValidationError, SessionId, SseEvent,
};
