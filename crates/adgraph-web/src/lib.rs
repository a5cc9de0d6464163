//! ADGraph Web Server
//!
//! Axum-based HTTP surface for graph exploration presets.

pub mod routes;
pub mod state;

use std::sync::Arc;

use adgraph_graph::GraphStore;
use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/graph", get(routes::graph::explore))
        .route("/graph/legend", get(routes::graph::legend))
        .route("/graph/stats", get(routes::graph::stats))
        .route("/health", get(routes::health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the web server.
pub async fn run_server(store: Arc<dyn GraphStore>, host: &str, port: u16) -> anyhow::Result<()> {
    let app = create_router(AppState::new(store));

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;
    tracing::info!("Web server listening on http://{}:{}", host, port);

    axum::serve(listener, app).await?;
    Ok(())
}
