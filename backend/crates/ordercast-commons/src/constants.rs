//! Event names and header names shared by the server and its peers.

/// Event name of the handshake pushed when a stream opens.
pub const CONNECT_EVENT: &str = "connect";

/// Data of the handshake event.
pub const CONNECT_MESSAGE: &str = "connected!";

/// Event name of every pushed order notification.
pub const ORDERED_EVENT: &str = "ordered";

/// Header carrying the shared cluster secret on internal endpoints.
pub const CLUSTER_ID_HEADER: &str = "X-Cluster-Id";

/// Version segment every API path is scoped under.
pub const API_VERSION: &str = "v1";

/// Path (below the API scope) peers deliver envelopes to.
pub const CLUSTER_NOTIFY_PATH: &str = "/v1/api/cluster/notify";
