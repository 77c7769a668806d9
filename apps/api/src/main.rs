mod auth;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod profiles;
mod recommendation;
mod routes;
mod state;
mod store;
mod validation;

#[cfg(test)]
mod testing;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::AuthConfig;
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::OpenAiClient;
use crate::recommendation::pipeline::RecommendationPipeline;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::PgProfileStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting HireMatch API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    let store = Arc::new(PgProfileStore::new(db));

    // Initialize the model client
    let llm = Arc::new(OpenAiClient::new(&config.ai)?);
    info!(
        "Model client initialized (model: {}, temperature: {})",
        config.ai.model, config.ai.temperature
    );

    let pipeline = RecommendationPipeline::new(
        store.clone(),
        store.clone(),
        llm,
        &config.ai,
        config.audit_policy,
    );
    info!("Recommendation audit policy: {:?}", config.audit_policy);

    // Build app state
    let state = AppState {
        store,
        pipeline: Arc::new(pipeline),
        auth: AuthConfig::hs256(&config.jwt_secret),
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
