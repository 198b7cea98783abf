//! Server lifecycle: building the application context, wiring the HTTP
//! server, and coordinating graceful shutdown.

use actix_web::{web, App, HttpServer};
use anyhow::Result;
use log::{debug, info};
use ordercast_configs::ServerConfig;
use ordercast_core::AppContext;
use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use std::time::Instant;

use crate::middleware;

/// Build the application context (registry, listener, bus, tracker, dispatcher).
///
/// Must run inside the server's runtime: the peer bus spawns its workers here.
pub async fn bootstrap(config: &ServerConfig) -> Result<Arc<AppContext>> {
    let bootstrap_start = Instant::now();

    let app_context = AppContext::init(config.clone())
        .map_err(|e| anyhow::anyhow!("Failed to initialize live delivery: {}", e))?;

    match &config.cluster {
        Some(cluster) => info!(
            "Cluster mode: cluster_id={}, node_id={}, peers={}",
            cluster.cluster_id,
            cluster.node_id,
            cluster.peers.len()
        ),
        None => info!("Standalone mode: notifications stay within this process"),
    }
    debug!(
        "Stream settings: idle_timeout={}s, keepalive={}s, channel_capacity={}, max_connections={}",
        config.stream.idle_timeout_secs,
        config.stream.keepalive_interval_secs,
        config.stream.channel_capacity,
        config.stream.max_connections
    );

    info!(
        "Bootstrap completed in {:.2}ms",
        bootstrap_start.elapsed().as_secs_f64() * 1000.0
    );
    Ok(app_context)
}

fn worker_count(config: &ServerConfig) -> usize {
    if config.server.workers == 0 {
        num_cpus::get()
    } else {
        config.server.workers
    }
}

/// Start the HTTP server and manage graceful shutdown.
pub async fn run(config: &ServerConfig, app_context: Arc<AppContext>) -> Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting HTTP server on {}", bind_addr);
    debug!("Endpoints: GET /v1/api/subscribe, POST /v1/api/notifications, POST /v1/api/cluster/notify");

    let cors_config = config.clone();
    let app_context_for_handler = app_context.clone();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::request_logger())
            .wrap(middleware::build_cors_from_config(&cors_config))
            .app_data(web::Data::new(app_context_for_handler.clone()))
            .configure(ordercast_api::configure_routes)
    })
    .bind(&bind_addr)?
    .workers(worker_count(config))
    // Open event streams end on their own once sessions are closed
    .shutdown_timeout(config.server.shutdown_timeout_secs)
    .disable_signals()
    .run();

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    tokio::select! {
        result = server_task => {
            match result {
                Ok(Err(e)) => log::error!("Server failed: {}", e),
                Err(e) => log::error!("Server task failed: {}", e),
                Ok(Ok(())) => {},
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, initiating graceful shutdown...");

            // Refuse new sessions and end every open stream
            let closed = app_context.sessions().shutdown();
            info!("Closed {} stream sessions", closed);

            server_handle.stop(true).await;
            drop(app_context);

            debug!("Graceful shutdown complete");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

/// A running HTTP server instance intended for integration tests.
///
/// Starts the same Actix app wiring as the production server but binds to an
/// ephemeral port and provides an explicit shutdown handle.
pub struct RunningTestHttpServer {
    pub base_url: String,
    pub bind_addr: SocketAddr,
    pub app_context: Arc<AppContext>,
    server_handle: actix_web::dev::ServerHandle,
    server_task: tokio::task::JoinHandle<std::io::Result<()>>,
}

impl RunningTestHttpServer {
    pub async fn shutdown(self) {
        self.app_context.sessions().shutdown();
        self.server_handle.stop(false).await;
        let _ = self.server_task.await;
    }
}

/// Start the HTTP server for integration tests on a random available port.
///
/// Does not install Ctrl+C handling; caller must invoke `shutdown()`.
pub async fn run_for_tests(config: &ServerConfig) -> Result<RunningTestHttpServer> {
    let bind_ip = if config.server.host.is_empty() {
        "127.0.0.1"
    } else {
        config.server.host.as_str()
    };
    let listener = TcpListener::bind((bind_ip, 0))?;
    let bind_addr = listener.local_addr()?;

    let app_context = bootstrap(config).await?;
    let cors_config = config.clone();
    let app_context_for_handler = app_context.clone();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::request_logger())
            .wrap(middleware::build_cors_from_config(&cors_config))
            .app_data(web::Data::new(app_context_for_handler.clone()))
            .configure(ordercast_api::configure_routes)
    })
    .listen(listener)?
    .workers(1)
    .shutdown_timeout(1)
    .disable_signals()
    .run();

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    Ok(RunningTestHttpServer {
        base_url: format!("http://{}", bind_addr),
        bind_addr,
        app_context,
        server_handle,
        server_task,
    })
}
