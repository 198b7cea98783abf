//! Model definitions shared across crates

pub mod cluster;
pub mod ids;
pub mod notification;
pub mod sse_event;

pub use cluster::ClusterEnvelope;
pub use ids::{RecipientId, RecipientIdValidationError, SessionId};
pub use notification::{OrderLine, OrderNotification, OrderStatus};
pub use sse_event::SseEvent;
