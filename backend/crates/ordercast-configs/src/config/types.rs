use super::defaults::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Main server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub stream: StreamSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub security: SecuritySettings,
    /// Absent = standalone mode (local delivery only)
    #[serde(default)]
    pub cluster: Option<ClusterSettings>,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Seconds to wait for open streams to drain on shutdown
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: default_workers(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Directory for log files (default: "./logs")
    #[serde(default = "default_logs_path")]
    pub logs_path: String,
    #[serde(default = "default_true")]
    pub log_to_console: bool,
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Optional per-target log level overrides
    /// [logging.targets]
    /// ordercast_core = "debug"
    #[serde(default)]
    pub targets: HashMap<String, String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            logs_path: default_logs_path(),
            log_to_console: true,
            format: default_log_format(),
            targets: HashMap::new(),
        }
    }
}

/// Stream session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamSettings {
    /// A session with no delivered event for this long times out (default: 4h)
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
    /// Interval between keep-alive comments on idle streams (0 disables)
    #[serde(default = "default_keepalive_interval_secs")]
    pub keepalive_interval_secs: u64,
    /// Buffered events per session before new events are dropped
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
    /// Maximum concurrently open sessions in this process
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
}

impl StreamSettings {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn keepalive_interval(&self) -> Option<Duration> {
        (self.keepalive_interval_secs > 0).then(|| Duration::from_secs(self.keepalive_interval_secs))
    }
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            idle_timeout_secs: default_idle_timeout_secs(),
            keepalive_interval_secs: default_keepalive_interval_secs(),
            channel_capacity: default_channel_capacity(),
            max_connections: default_max_connections(),
        }
    }
}

/// Identity resolution settings
///
/// Authentication happens upstream (gateway or session layer); the server only
/// reads the already-resolved identity from this header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    #[serde(default = "default_identity_header")]
    pub identity_header: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            identity_header: default_identity_header(),
        }
    }
}

/// CORS configuration that maps directly to actix-cors options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsSettings {
    /// Allowed origins. Empty list or ["*"] = allow any origin
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    #[serde(default = "default_cors_methods")]
    pub allowed_methods: Vec<String>,
    #[serde(default = "default_cors_headers")]
    pub allowed_headers: Vec<String>,
    #[serde(default = "default_true")]
    pub allow_credentials: bool,
    #[serde(default = "default_cors_max_age")]
    pub max_age: u64,
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            allowed_methods: default_cors_methods(),
            allowed_headers: default_cors_headers(),
            allow_credentials: true,
            max_age: default_cors_max_age(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecuritySettings {
    #[serde(default)]
    pub cors: CorsSettings,
}

/// Cross-process fanout configuration (FLAT `[cluster]` section)
///
/// ```toml
/// [cluster]
/// cluster_id = "ordercast-prod"
/// node_id = "node-1"
/// peers = ["http://10.0.0.2:8080", "http://10.0.0.3:8080"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSettings {
    /// Shared secret every peer sends in `X-Cluster-Id`
    #[serde(default = "default_cluster_id")]
    pub cluster_id: String,
    #[serde(default = "default_node_id")]
    pub node_id: String,
    /// Base URLs of the other processes (not including this one)
    #[serde(default)]
    pub peers: Vec<String>,
    /// Envelopes buffered per peer before new ones are dropped
    #[serde(default = "default_peer_queue_capacity")]
    pub peer_queue_capacity: usize,
    #[serde(default = "default_peer_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl ClusterSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for ClusterSettings {
    fn default() -> Self {
        Self {
            cluster_id: default_cluster_id(),
            node_id: default_node_id(),
            peers: Vec::new(),
            peer_queue_capacity: default_peer_queue_capacity(),
            request_timeout_ms: default_peer_request_timeout_ms(),
        }
    }
}
