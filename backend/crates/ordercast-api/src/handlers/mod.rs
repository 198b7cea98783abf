//! HTTP request handlers
//!
//! ## Endpoints
//! - GET  /v1/api/subscribe       - event stream for the authenticated recipient
//! - POST /v1/api/notifications   - notify a recipient (internal callers)
//! - POST /v1/api/cluster/notify  - receive a message forwarded by a peer
//! - GET  /v1/api/healthcheck     - health and counters
//! - GET  /v1/api/sessions        - open sessions on this node (localhost only)

mod cluster;
mod health;
mod notify;
mod subscribe;

pub use cluster::cluster_notify;
pub use health::{healthcheck_handler, sessions_handler};
pub use notify::notify_recipient;
pub use subscribe::subscribe_handler;
