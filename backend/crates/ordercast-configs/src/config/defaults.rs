// Default value functions

pub fn default_host() -> String {
    "127.0.0.1".to_string()
}

pub fn default_port() -> u16 {
    8080
}

pub fn default_workers() -> usize {
    0 // 0 = one worker per CPU core
}

pub fn default_true() -> bool {
    true
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_log_format() -> String {
    "compact".to_string()
}

pub fn default_logs_path() -> String {
    "./logs".to_string()
}

/// Idle timeout of a stream session: 4 hours.
pub fn default_idle_timeout_secs() -> u64 {
    4 * 60 * 60
}

pub fn default_keepalive_interval_secs() -> u64 {
    30
}

pub fn default_channel_capacity() -> usize {
    256
}

pub fn default_max_connections() -> usize {
    10_000
}

pub fn default_shutdown_timeout_secs() -> u64 {
    5
}

pub fn default_identity_header() -> String {
    "X-Authenticated-User".to_string()
}

pub fn default_cluster_id() -> String {
    "ordercast-cluster".to_string()
}

pub fn default_node_id() -> String {
    "node-1".to_string()
}

pub fn default_peer_queue_capacity() -> usize {
    4096
}

pub fn default_peer_request_timeout_ms() -> u64 {
    2_000
}

pub fn default_cors_methods() -> Vec<String> {
    vec!["GET".to_string(), "POST".to_string(), "OPTIONS".to_string()]
}

pub fn default_cors_headers() -> Vec<String> {
    vec![
        "Authorization".to_string(),
        "Content-Type".to_string(),
        "Accept".to_string(),
        "Last-Event-ID".to_string(),
    ]
}

pub fn default_cors_max_age() -> u64 {
    3600 // 1 hour
}
