use super::types::ServerConfig;
use log::warn;
use std::fs;
use std::path::Path;

impl ServerConfig {
    /// Load configuration from a TOML file
    ///
    /// Note: Environment overrides are applied separately via `apply_env_overrides()`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))
    }

    /// Load from `path` when it exists, otherwise start from defaults.
    ///
    /// A file that exists but cannot be parsed is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            warn!("Config file {} not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Apply environment overrides and validate.
    pub fn finalize(&mut self) -> anyhow::Result<()> {
        self.apply_env_overrides()?;
        self.validate()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            return Err(anyhow::anyhow!("Server port cannot be 0"));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_levels.join(", ")
            ));
        }

        for (target, level) in &self.logging.targets {
            if !valid_levels.contains(&level.as_str()) {
                return Err(anyhow::anyhow!(
                    "Invalid log level '{}' for target '{}'. Must be one of: {}",
                    level,
                    target,
                    valid_levels.join(", ")
                ));
            }
        }

        let valid_formats = ["compact", "pretty", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_formats.join(", ")
            ));
        }

        if self.stream.idle_timeout_secs == 0 {
            return Err(anyhow::anyhow!("stream.idle_timeout_secs cannot be 0"));
        }
        if self.stream.channel_capacity == 0 {
            return Err(anyhow::anyhow!("stream.channel_capacity cannot be 0"));
        }
        if self.stream.max_connections == 0 {
            return Err(anyhow::anyhow!("stream.max_connections cannot be 0"));
        }

        if self.auth.identity_header.trim().is_empty() {
            return Err(anyhow::anyhow!("auth.identity_header cannot be empty"));
        }

        if let Some(cluster) = &self.cluster {
            if cluster.cluster_id.trim().is_empty() {
                return Err(anyhow::anyhow!("cluster.cluster_id cannot be empty"));
            }
            if cluster.node_id.trim().is_empty() {
                return Err(anyhow::anyhow!("cluster.node_id cannot be empty"));
            }
            if cluster.peer_queue_capacity == 0 {
                return Err(anyhow::anyhow!("cluster.peer_queue_capacity cannot be 0"));
            }
            for peer in &cluster.peers {
                if !(peer.starts_with("http://") || peer.starts_with("https://")) {
                    return Err(anyhow::anyhow!(
                        "Invalid peer address '{}': must start with http:// or https://",
                        peer
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.cluster.is_none());
        assert_eq!(config.stream.idle_timeout_secs, 4 * 60 * 60);
    }

    #[test]
    fn test_invalid_port() {
        let mut config = ServerConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = ServerConfig::default();
        config.logging.level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_idle_timeout_rejected() {
        let mut config = ServerConfig::default();
        config.stream.idle_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_peer_without_scheme_rejected() {
        let toml = r#"
            [cluster]
            cluster_id = "c1"
            node_id = "n1"
            peers = ["10.0.0.2:8080"]
        "#;
        let config = ServerConfig::from_toml_str(toml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let toml = r#"
            [server]
            port = 9090

            [stream]
            keepalive_interval_secs = 0

            [cluster]
            cluster_id = "c1"
            peers = ["http://10.0.0.2:8080"]
        "#;
        let config = ServerConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(config.stream.keepalive_interval().is_none());
        let cluster = config.cluster.as_ref().unwrap();
        assert_eq!(cluster.node_id, "node-1");
        assert_eq!(cluster.peers.len(), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = ServerConfig::load_or_default("./does-not-exist/server.toml").unwrap();
        assert_eq!(config.server.port, 8080);
    }
}
