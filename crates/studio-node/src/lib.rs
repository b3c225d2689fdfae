//! # Studio Node
//!
//! HTTP API server for Anoma Studio: intent building and signing, key
//! management, and the compile/simulate sandbox.

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod api;
pub mod config;
pub mod error;
pub mod state;

use config::NodeConfig;
use state::AppState;

/// Run the studio node until the listener fails.
pub async fn run_server(config: NodeConfig) -> anyhow::Result<()> {
    let state = AppState::from_config(&config).await?;
    let app = create_router(state);

    info!("Listening on http://{}", config.bind_addr);
    let listener = TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(api::health::health_check))
        // Intents
        .route("/api/intent-types", get(api::intent::list_intent_types))
        .route("/api/intents", post(api::intent::create))
        .route("/api/intents/sign", post(api::intent::sign))
        .route("/api/intents/verify", post(api::intent::verify))
        .route("/api/intents/export", post(api::intent::export))
        // Keys
        .route("/api/keys", post(api::keys::generate))
        .route("/api/keys/active", get(api::keys::active))
        .route("/api/keys/import", post(api::keys::import))
        .route("/api/keys/export", get(api::keys::export))
        // Sandbox
        .route("/api/compile", post(api::compile::compile))
        .route("/api/compile/template", get(api::compile::template))
        .route("/api/compile/export", post(api::compile::export))
        .route("/api/simulate/functions", get(api::simulate::list_functions))
        .route("/api/simulate", post(api::simulate::simulate))
        .route("/api/simulate/query", post(api::simulate::query))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
