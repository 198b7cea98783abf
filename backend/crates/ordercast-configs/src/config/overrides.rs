use super::types::{ClusterSettings, ServerConfig};

impl ServerConfig {
    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - ORDERCAST_SERVER_HOST: Override server.host
    /// - ORDERCAST_SERVER_PORT: Override server.port
    /// - ORDERCAST_LOG_LEVEL: Override logging.level
    /// - ORDERCAST_LOGS_PATH: Override logging.logs_path
    /// - ORDERCAST_LOG_TO_CONSOLE: Override logging.log_to_console
    /// - ORDERCAST_CLUSTER_ID: Override cluster.cluster_id (enables cluster mode)
    /// - ORDERCAST_NODE_ID: Override cluster.node_id (enables cluster mode)
    /// - ORDERCAST_PEERS: Comma-separated peer base URLs (enables cluster mode)
    ///
    /// Environment variables take precedence over server.toml values.
    pub fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    pub(crate) fn apply_overrides_from<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("ORDERCAST_SERVER_HOST") {
            self.server.host = host;
        }

        if let Some(port_str) = lookup("ORDERCAST_SERVER_PORT") {
            self.server.port = port_str
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid ORDERCAST_SERVER_PORT value: {}", port_str))?;
        }

        if let Some(level) = lookup("ORDERCAST_LOG_LEVEL") {
            self.logging.level = level.to_lowercase();
        }

        if let Some(path) = lookup("ORDERCAST_LOGS_PATH") {
            self.logging.logs_path = path;
        }

        if let Some(val) = lookup("ORDERCAST_LOG_TO_CONSOLE") {
            let val = val.to_lowercase();
            self.logging.log_to_console = val == "true" || val == "1" || val == "yes";
        }

        if let Some(cluster_id) = lookup("ORDERCAST_CLUSTER_ID") {
            self.cluster_mut().cluster_id = cluster_id;
        }

        if let Some(node_id) = lookup("ORDERCAST_NODE_ID") {
            self.cluster_mut().node_id = node_id;
        }

        if let Some(peers) = lookup("ORDERCAST_PEERS") {
            self.cluster_mut().peers = peers
                .split(',')
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect();
        }

        Ok(())
    }

    fn cluster_mut(&mut self) -> &mut ClusterSettings {
        self.cluster.get_or_insert_with(ClusterSettings::default)
    }
}
