//! Body exchanged between peers for cross-process fanout.

use serde::{Deserialize, Serialize};

/// One published message forwarded to a peer process.
///
/// `body` is the encoded payload exactly as it was published; the receiving
/// process decodes it, so a protocol mismatch surfaces on the receiving side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterEnvelope {
    pub cluster_id: String,
    pub origin_node: String,
    pub topic: String,
    pub body: String,
}
