// ordercast API Library
//
// HTTP layer for ordercast: the long-lived event-stream endpoint clients
// subscribe on, the internal notify trigger, the peer receive endpoint used for
// cross-process fanout, and health reporting.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;

pub use error::ApiError;
pub use routes::configure_routes;
