//! Shared helpers for ordercast integration tests.

#![allow(dead_code)]

use ordercast_configs::{ClusterSettings, ServerConfig};
use std::time::{Duration, Instant};

pub const CLUSTER_ID: &str = "it-cluster";

/// Config for a node listening on an ephemeral port.
pub fn node_config(node_id: &str, peers: Vec<String>) -> ServerConfig {
    let mut config = ServerConfig::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.workers = 1;
    config.cluster = Some(ClusterSettings {
        cluster_id: CLUSTER_ID.to_string(),
        node_id: node_id.to_string(),
        peers,
        ..Default::default()
    });
    config
}

/// Poll `condition` until it holds or `timeout` elapses.
pub async fn wait_until<F>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    condition()
}

/// Read from an event-stream response until one complete frame is buffered.
pub async fn next_frame(resp: &mut reqwest::Response, buffer: &mut String) -> String {
    loop {
        if let Some(end) = buffer.find("\n\n") {
            let frame = buffer[..end + 2].to_string();
            buffer.drain(..end + 2);
            return frame;
        }
        let chunk = tokio::time::timeout(Duration::from_secs(5), resp.chunk())
            .await
            .expect("timed out waiting for event")
            .expect("stream read failed")
            .expect("stream ended");
        buffer.push_str(std::str::from_utf8(&chunk).expect("utf-8 frame"));
    }
}
