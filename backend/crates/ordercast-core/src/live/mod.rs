//! Live notification delivery: per-recipient stream sessions and the pieces that
//! route published notifications to them.

pub mod connection_registry;
pub mod dispatcher;
pub mod listener;
pub mod manager;
pub mod session;
pub mod session_stream;
pub mod subscription_tracker;

pub use connection_registry::{ConnectionRegistry, SessionSnapshot};
pub use dispatcher::NotificationDispatcher;
pub use listener::NotificationListener;
pub use manager::SessionManager;
pub use session::{SessionState, StreamSession};
pub use session_stream::SessionStream;
pub use subscription_tracker::SubscriptionTracker;
