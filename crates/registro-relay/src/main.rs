//! Registro Relay - Entry point.

use anyhow::{Context, Result};
use registro_relay::{
    api::{create_router_with_path, AppState},
    config::{Config, LogConfig, LogFormat},
    upstream::ScriptClient,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.log);

    if let Err(e) = run(config).await {
        error!("Server error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<()> {
    info!("Starting Registro Relay");

    let script_url = config.script_url().map(str::to_string);
    let script_client =
        ScriptClient::new(script_url).context("Failed to create Apps Script client")?;

    if !script_client.is_configured() {
        warn!("GOOGLE_SCRIPT_URL is not set; every registration will fail until it is configured");
    }

    let state = AppState::new(script_client);
    let app = create_router_with_path(state, &config.server.relay_path);

    // Bind to address
    let addr = SocketAddr::new(
        config.server.listen_addr.parse().unwrap_or([0, 0, 0, 0].into()),
        config.server.port,
    );

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!(relay_path = %config.server.relay_path, "Listening on {}", addr);

    axum::serve(listener, app).await.context("Server stopped")?;

    Ok(())
}

fn init_logging(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let registry = tracing_subscriber::registry().with(filter);

    match log.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}
