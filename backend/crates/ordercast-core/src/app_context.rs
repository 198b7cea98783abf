//! Process-wide wiring of the live delivery components.
//!
//! One `AppContext` is built at startup and handed to the HTTP layer; nothing
//! here is a global, so tests can build several contexts side by side (one per
//! simulated process).

use ordercast_configs::ServerConfig;
use std::sync::Arc;
use std::time::Instant;

use crate::bus::{ChannelBus, MessageListener, PeerBus};
use crate::error::Result;
use crate::live::{
    ConnectionRegistry, NotificationDispatcher, NotificationListener, SessionManager,
    SubscriptionTracker,
};

const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct AppContext {
    config: Arc<ServerConfig>,
    node_id: String,
    registry: Arc<ConnectionRegistry>,
    bus: Arc<dyn ChannelBus>,
    tracker: Arc<SubscriptionTracker>,
    sessions: Arc<SessionManager>,
    dispatcher: Arc<NotificationDispatcher>,
    started_at: Instant,
}

impl AppContext {
    /// Build the context with the peer bus described by `config.cluster`
    /// (standalone when absent). Must be called from within a tokio runtime.
    pub fn init(config: ServerConfig) -> Result<Arc<Self>> {
        let cluster = config.cluster.clone();
        Self::try_with_bus(config, |listener| {
            let bus: Arc<dyn ChannelBus> = match &cluster {
                Some(settings) => PeerBus::start(settings, listener)?,
                None => PeerBus::standalone(listener),
            };
            Ok(bus)
        })
    }

    /// Build the context around a caller-supplied bus. `make_bus` receives the
    /// listener that must be attached to it.
    pub fn with_bus<F>(config: ServerConfig, make_bus: F) -> Arc<Self>
    where
        F: FnOnce(Arc<dyn MessageListener>) -> Arc<dyn ChannelBus>,
    {
        let registry = Arc::new(ConnectionRegistry::new());
        let bus = make_bus(Self::listener_for(&registry));
        Self::assemble(config, registry, bus)
    }

    /// Fallible variant of [`AppContext::with_bus`].
    pub fn try_with_bus<F>(config: ServerConfig, make_bus: F) -> Result<Arc<Self>>
    where
        F: FnOnce(Arc<dyn MessageListener>) -> Result<Arc<dyn ChannelBus>>,
    {
        let registry = Arc::new(ConnectionRegistry::new());
        let bus = make_bus(Self::listener_for(&registry))?;
        Ok(Self::assemble(config, registry, bus))
    }

    fn listener_for(registry: &Arc<ConnectionRegistry>) -> Arc<dyn MessageListener> {
        Arc::new(NotificationListener::new(Arc::clone(registry)))
    }

    fn assemble(
        config: ServerConfig,
        registry: Arc<ConnectionRegistry>,
        bus: Arc<dyn ChannelBus>,
    ) -> Arc<Self> {
        let node_id = config
            .cluster
            .as_ref()
            .map(|cluster| cluster.node_id.clone())
            .unwrap_or_else(|| "standalone".to_string());

        let tracker = Arc::new(SubscriptionTracker::new(Arc::clone(&bus)));
        let sessions = Arc::new(SessionManager::new(
            Arc::clone(&registry),
            Arc::clone(&tracker),
            config.stream.clone(),
        ));
        let dispatcher = Arc::new(NotificationDispatcher::new(Arc::clone(&bus)));

        Arc::new(Self {
            config: Arc::new(config),
            node_id,
            registry,
            bus,
            tracker,
            sessions,
            dispatcher,
            started_at: Instant::now(),
        })
    }

    pub fn config(&self) -> &Arc<ServerConfig> {
        &self.config
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn server_version(&self) -> &'static str {
        SERVER_VERSION
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    pub fn bus(&self) -> &Arc<dyn ChannelBus> {
        &self.bus
    }

    pub fn subscriptions(&self) -> &Arc<SubscriptionTracker> {
        &self.tracker
    }

    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    pub fn dispatcher(&self) -> &Arc<NotificationDispatcher> {
        &self.dispatcher
    }
}
