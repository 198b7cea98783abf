// ordercast Server entrypoint
//!
//! Initialization and graceful shutdown live in dedicated modules so this file
//! remains a thin orchestrator.

use anyhow::Result;
use log::info;
use ordercast_configs::ServerConfig;
use ordercast_server::lifecycle::{bootstrap, run};
use ordercast_server::logging;
use std::env;
use std::path::Path;

const DEFAULT_CONFIG_PATH: &str = "server.toml";

#[actix_web::main]
async fn main() -> Result<()> {
    // First positional argument overrides the config path
    let config_path = env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    // Load configuration (fallback to defaults when config file missing)
    let mut config = if Path::new(&config_path).exists() {
        match ServerConfig::from_file(&config_path) {
            Ok(cfg) => {
                eprintln!("Loaded config from: {}", config_path);
                cfg
            },
            Err(e) => {
                eprintln!("FATAL: Failed to load {}: {}", config_path, e);
                std::process::exit(1);
            },
        }
    } else {
        eprintln!("Config file {} not found, using defaults", config_path);
        ServerConfig::default()
    };

    if let Err(e) = config.finalize() {
        eprintln!("FATAL: Invalid configuration: {}", e);
        std::process::exit(1);
    }

    // Logging before any other side effects
    let server_log_path = format!("{}/server.log", config.logging.logs_path);
    logging::init_logging(
        &config.logging.level,
        &server_log_path,
        config.logging.log_to_console,
        Some(&config.logging.targets),
        &config.logging.format,
    )?;

    info!(
        "ordercast server v{} (commit {}, branch {}, built {})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_COMMIT_HASH"),
        env!("GIT_BRANCH"),
        env!("BUILD_DATE")
    );
    info!("Host: {}  Port: {}", config.server.host, config.server.port);

    let app_context = bootstrap(&config).await?;

    // Run HTTP server until termination signal is received
    run(&config, app_context).await
}
