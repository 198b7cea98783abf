//! Request and response bodies

use ordercast_commons::OrderNotification;
use serde::{Deserialize, Serialize};

/// Body of `POST /v1/api/notifications`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyRequest {
    pub recipient: String,
    pub payload: OrderNotification,
}

/// Body of `GET /v1/api/healthcheck`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub api_version: String,
    pub build_date: String,
    pub node_id: String,
    pub is_cluster_mode: bool,
    pub open_sessions: usize,
    pub open_streams: usize,
    pub subscribed_topics: usize,
    pub uptime_seconds: u64,
}
