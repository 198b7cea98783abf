//! Request identity and peer verification
//!
//! The server never authenticates end users itself: an upstream authenticator
//! resolves the user and forwards the identity in a trusted header. Peers and
//! internal callers prove membership with the shared cluster id.

mod cluster;
mod identity;

pub use cluster::{is_local_request, verify_cluster_id};
pub use identity::resolve_identity;
