mod config;
mod db;
mod entries;
mod errors;
mod export;
mod llm_client;
mod models;
mod related;
mod resume;
mod routes;
mod state;
mod store;
mod uploads;

#[cfg(test)]
mod testing;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::{CompletionProvider, LlmClient};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::postgres::PgEntryStore;
use crate::store::EntryStore;
use crate::uploads::build_s3_client;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting FreeBird API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let pool = create_pool(&config.database_url).await?;
    let store: Arc<dyn EntryStore> = Arc::new(PgEntryStore::new(pool));

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized (bucket: {})", config.s3_bucket);

    // Initialize LLM client (optional)
    let llm: Option<Arc<dyn CompletionProvider>> = match &config.anthropic_api_key {
        Some(key) => {
            let client = LlmClient::new(key.clone(), config.llm_timeout)?;
            info!(
                "LLM client initialized (model: {}, timeout: {:?})",
                llm_client::MODEL,
                config.llm_timeout
            );
            Some(Arc::new(client))
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set: related entries use keyword matching, resume enhancement is disabled");
            None
        }
    };

    let state = AppState {
        store,
        llm,
        s3,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
