mod analysis;
mod config;
mod db;
mod errors;
mod feedback;
mod gateway;
mod models;
mod normalize;
mod recovery;
mod routes;
mod session;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::gateway::GatewayClient;
use crate::recovery::{RecoveryController, RecoveryPolicy};
use crate::routes::build_router;
use crate::session::SessionRegistry;
use crate::state::AppState;
use crate::store::{MemoryRecordStore, PgRecordStore, RecordStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Insight API v{}", env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn RecordStore> = match &config.database_url {
        Some(url) => Arc::new(PgRecordStore::new(create_pool(url).await?)),
        None => {
            warn!("DATABASE_URL not set; feedback and analysis records are kept in memory only");
            Arc::new(MemoryRecordStore::new())
        }
    };
    info!("Record store: {}", store.backend());

    let gateway = GatewayClient::new(config.clone())?;
    let recovery = RecoveryController::new(config.clone(), RecoveryPolicy::default())?;
    info!(
        "Upstream analysis backend: {} (timeout {}s)",
        config.backend_url, config.upstream_timeout_secs
    );

    let state = AppState {
        config: config.clone(),
        gateway,
        recovery,
        store,
        sessions: SessionRegistry::default(),
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()), // TODO: restrict origins to the frontend host once it is configurable
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
