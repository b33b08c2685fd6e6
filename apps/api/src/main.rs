mod cache;
mod career;
mod config;
mod cv;
mod db;
mod errors;
mod internships;
mod jobs;
mod llm_client;
mod local;
mod models;
mod resources;
mod routes;
mod state;
mod store;
#[cfg(test)]
mod testing;
mod todos;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cache::{MemoryCache, RedisCache, SharedCache};
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::resources::YoutubeClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Compass API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (runs migrations)
    let db = create_pool(&config.database_url).await?;

    // Shared cache: Redis when configured, in-process otherwise
    let cache: Arc<dyn SharedCache> = match &config.redis_url {
        Some(url) => {
            let client = redis::Client::open(url.as_str())?;
            info!("Shared cache backed by Redis");
            Arc::new(RedisCache::new(client))
        }
        None => {
            warn!("REDIS_URL not set; using in-process shared cache");
            Arc::new(MemoryCache::new())
        }
    };

    // Initialize LLM client
    let llm = LlmClient::new(
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
        Duration::from_secs(config.generation_timeout_secs),
    )?;
    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY not set; every AI generation call will fail until it is configured");
    }
    info!(
        "LLM client initialized (model: {}, timeout: {}s)",
        llm.model(),
        config.generation_timeout_secs
    );

    let videos = YoutubeClient::new(config.youtube_api_key.clone())?;
    if config.youtube_api_key.is_none() {
        info!("YOUTUBE_API_KEY not set; resource links fall back to search URLs");
    }

    // Build app state
    let state = AppState {
        store: Arc::new(PgStore::new(db)),
        cache,
        llm: Arc::new(llm),
        videos: Arc::new(videos),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
