//! dsdviz server binary

use anyhow::{Context, Result};
use dsdviz::api::{create_router, ApiState};
use dsdviz::Config;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting dsdviz server v{}", env!("CARGO_PKG_VERSION"));

    // An explicit path must exist; the default one may be absent
    let explicit_path = std::env::args().nth(1);
    let config = match explicit_path {
        Some(path) => Config::load(&path)?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => Config::load(DEFAULT_CONFIG_PATH)?,
        None => {
            warn!(
                config_path = DEFAULT_CONFIG_PATH,
                "Config file not found, using defaults"
            );
            Config::default()
        }
    };

    info!(
        host = %config.server.host,
        port = config.server.port,
        domain_length = config.layout.domain_length,
        bound_gap = config.layout.bound_gap,
        "Loaded configuration"
    );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid listen address: {}:{}",
                config.server.host, config.server.port
            )
        })?;

    // Create API state and router
    let state = Arc::new(ApiState::new(config));
    let app = create_router(state);

    // Start server
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
