use std::sync::Arc;

use clap::Args;
use tracing::{debug, info, warn};

use crate::app::{app, AppState};
use crate::config;
use crate::database::{DatabaseManager, MemoryStore, PgStore, Store};
use crate::resources;

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[arg(long, help = "Port to listen on (default: AGORA_API_PORT, PORT, or 3000)")]
    pub port: Option<u16>,

    #[arg(long, default_value = "0.0.0.0", help = "Address to bind")]
    pub bind: String,
}

pub async fn handle(args: ServeArgs) -> anyhow::Result<()> {
    let config = config::config();
    info!("Starting Agora API in {:?} mode", config.environment);
    if config.security.jwt_secret.is_empty() {
        warn!("SECURITY_JWT_SECRET is not set; every /api/v1 request will be rejected");
    } else if crate::is_development!() {
        debug!("Using the development JWT secret unless SECURITY_JWT_SECRET overrides it");
    }

    let store = open_store().await?;
    let registry = resources::catalog();
    info!("Serving {} resources from the {} store", registry.len(), store.name());

    let port = args.port.unwrap_or_else(port_from_env);
    let bind_addr = format!("{}:{}", args.bind, port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", bind_addr, e))?;

    info!("Agora API listening on http://{}", bind_addr);
    axum::serve(listener, app(AppState::new(store, registry))).await?;
    Ok(())
}

/// Postgres when `DATABASE_URL` is set, otherwise an in-memory store
async fn open_store() -> anyhow::Result<Arc<dyn Store>> {
    if DatabaseManager::database_url().is_some() {
        let pool = DatabaseManager::connect(&config::config().database).await?;
        return Ok(Arc::new(PgStore::new(pool)));
    }

    warn!("DATABASE_URL not set; using the in-memory store (data is lost on exit)");
    Ok(Arc::new(MemoryStore::new()))
}

fn port_from_env() -> u16 {
    std::env::var("AGORA_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000)
}
