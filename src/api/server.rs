//! HTTP server setup and configuration.

use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::config::Config;
use crate::storage::MessageStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MessageStore>,
}

/// Create the axum router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/messages",
            get(handlers::list_messages).post(handlers::ingest_message),
        )
        .route("/messages/:msg_id", get(handlers::get_message))
        .route("/groups", get(handlers::list_groups))
        .route("/health", get(handlers::health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // The query API is consumed by browser dashboards on other origins.
        .layer(CorsLayer::permissive())
}

/// Run the HTTP server.
pub async fn run_server(config: Config, store: MessageStore) -> anyhow::Result<()> {
    let state = AppState {
        store: Arc::new(store),
    };
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.listen).await?;
    tracing::info!(address = %config.server.listen, "Starting group message API server");

    axum::serve(listener, app).await?;

    Ok(())
}
