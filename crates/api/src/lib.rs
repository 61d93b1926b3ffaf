//! `api` crate — the mock workflow backend served over HTTP.
//!
//! Exposes:
//!   GET  /automations
//!   POST /validate
//!   POST /simulate[?strict=true]
//!
//! Request bodies are the editor's `{ nodes, edges }` export document.

pub mod backend;
pub mod config;
pub mod error;
mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

pub use backend::{MockBackend, SimulationRun, WorkflowBackend};
pub use config::BackendConfig;
pub use error::ApiError;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn WorkflowBackend>,
}

impl AppState {
    pub fn new(backend: impl WorkflowBackend + 'static) -> Self {
        Self { backend: Arc::new(backend) }
    }
}

/// Build the router with tracing and permissive CORS for a browser editor.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/automations", get(handlers::automations::list))
        .route("/validate", post(handlers::workflows::validate))
        .route("/simulate", post(handlers::workflows::simulate))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the router on `bind` until the process is stopped.
pub async fn serve(bind: &str, state: AppState) -> Result<(), ApiError> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("mock backend listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

#[cfg(test)]
mod router_tests;
