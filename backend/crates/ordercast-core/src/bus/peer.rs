//! HTTP peer fanout bus.
//!
//! Every publish is delivered to the local process synchronously and queued
//! for each configured peer. One worker per peer drains its queue in order and
//! POSTs a [`ClusterEnvelope`] to the peer's cluster notify endpoint, so publish
//! order for a topic is preserved between any two processes.

use bytes::Bytes;
use ordercast_commons::constants::{CLUSTER_ID_HEADER, CLUSTER_NOTIFY_PATH};
use ordercast_commons::ClusterEnvelope;
use ordercast_configs::ClusterSettings;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};

use super::{ChannelBus, LocalSubscriptions, MessageListener};
use crate::error::{LiveError, Result};

struct PeerLink {
    url: String,
    tx: mpsc::Sender<ClusterEnvelope>,
}

/// Channel bus that fans out to peer server processes over HTTP
pub struct PeerBus {
    cluster_id: String,
    node_id: String,
    local: LocalSubscriptions,
    peers: Vec<PeerLink>,
}

impl PeerBus {
    /// Build the bus and spawn one delivery worker per configured peer.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(
        settings: &ClusterSettings,
        listener: Arc<dyn MessageListener>,
    ) -> Result<Arc<Self>> {
        let client = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| LiveError::Bus(format!("Failed to build HTTP client: {}", e)))?;

        let mut peers = Vec::with_capacity(settings.peers.len());
        for peer in &settings.peers {
            let url = format!("{}{}", peer.trim_end_matches('/'), CLUSTER_NOTIFY_PATH);
            let (tx, rx) = mpsc::channel(settings.peer_queue_capacity);
            tokio::spawn(run_peer_worker(
                client.clone(),
                url.clone(),
                settings.cluster_id.clone(),
                rx,
            ));
            peers.push(PeerLink { url, tx });
        }

        log::info!(
            "Peer bus started: cluster_id={}, node_id={}, peers={}",
            settings.cluster_id,
            settings.node_id,
            peers.len()
        );

        Ok(Arc::new(Self {
            cluster_id: settings.cluster_id.clone(),
            node_id: settings.node_id.clone(),
            local: LocalSubscriptions::new(listener),
            peers,
        }))
    }

    /// Bus with no peers: publishes reach only this process.
    pub fn standalone(listener: Arc<dyn MessageListener>) -> Arc<Self> {
        Arc::new(Self {
            cluster_id: String::new(),
            node_id: "standalone".to_string(),
            local: LocalSubscriptions::new(listener),
            peers: Vec::new(),
        })
    }

    pub fn cluster_id(&self) -> &str {
        &self.cluster_id
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }
}

impl ChannelBus for PeerBus {
    fn publish(&self, topic: &str, body: Bytes) -> Result<()> {
        if let Err(err) = self.local.deliver(topic, &body) {
            log::error!("Failed to dispatch message on topic '{}': {}", topic, err);
        }

        if self.peers.is_empty() {
            return Ok(());
        }

        let body = std::str::from_utf8(&body)
            .map_err(|_| LiveError::Bus("Message body is not valid UTF-8".to_string()))?;
        let envelope = ClusterEnvelope {
            cluster_id: self.cluster_id.clone(),
            origin_node: self.node_id.clone(),
            topic: topic.to_string(),
            body: body.to_string(),
        };

        for peer in &self.peers {
            match peer.tx.try_send(envelope.clone()) {
                Ok(()) => {},
                Err(TrySendError::Full(_)) => {
                    log::warn!(
                        "Peer queue full, dropping message for topic '{}' to {}",
                        topic,
                        peer.url
                    );
                },
                Err(TrySendError::Closed(_)) => {
                    log::warn!("Peer worker for {} has stopped", peer.url);
                },
            }
        }
        Ok(())
    }

    fn subscribe(&self, topic: &str) -> Result<()> {
        self.local.subscribe(topic);
        Ok(())
    }

    fn deliver(&self, topic: &str, body: &[u8]) -> Result<usize> {
        self.local.deliver(topic, body)
    }

    fn subscription_count(&self, topic: &str) -> usize {
        self.local.count(topic)
    }
}

async fn run_peer_worker(
    client: Client,
    url: String,
    cluster_id: String,
    mut rx: mpsc::Receiver<ClusterEnvelope>,
) {
    while let Some(envelope) = rx.recv().await {
        let response = client
            .post(&url)
            .header(CLUSTER_ID_HEADER, &cluster_id)
            .json(&envelope)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {},
            Ok(resp) if resp.status() == StatusCode::UNPROCESSABLE_ENTITY => {
                log::error!(
                    "Peer {} rejected message for topic '{}' as undecodable",
                    url,
                    envelope.topic
                );
            },
            Ok(resp) => {
                log::warn!(
                    "Peer {} answered {} for topic '{}'",
                    url,
                    resp.status(),
                    envelope.topic
                );
            },
            Err(err) => {
                log::warn!("Failed to forward message to {}: {}", url, err);
            },
        }
    }
    log::debug!("Peer worker for {} stopped", url);
}
